//! Atom XML rendering.
//!
//! Converts routed nodes into `atom_syndication` types and serializes them.
//! Date text is parsed here, so values that only looked like RFC 3339 during
//! routing (e.g. month 13) fail at this point with `MalformedDate`.

use super::{
    FeedError,
    node::{
        CategoryNode, EntryNode, Extensions, FeedNode, GeneratorNode, LinkNode, PersonNode,
        SourceNode,
    },
};
use crate::field::FieldValue;
use atom_syndication::{
    Category, CategoryBuilder, Content, ContentBuilder, Entry, EntryBuilder, Feed, FeedBuilder,
    FixedDateTime, Generator, GeneratorBuilder, Link, LinkBuilder, Person, PersonBuilder, Source,
    SourceBuilder, Text,
    extension::{Extension, ExtensionBuilder, ExtensionMap},
};
use std::{borrow::Cow, collections::BTreeMap};

/// Rendering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// XML prefix bound to the extension namespace.
    pub prefix: String,
    pub minify: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            prefix: "ext".to_string(),
            minify: false,
        }
    }
}

/// Render a feed node as Atom XML.
pub fn to_xml(feed: &FeedNode, options: &RenderOptions) -> Result<String, FeedError> {
    let xml = to_atom(feed, options)?.to_string();
    Ok(minify_xml(&xml, options.minify).into_owned())
}

/// Convert a feed node into an `atom_syndication` feed.
pub fn to_atom(feed: &FeedNode, options: &RenderOptions) -> Result<Feed, FeedError> {
    let mut prefixes = Prefixes::new(&options.prefix);

    let entries = feed
        .entries
        .iter()
        .map(|entry| to_atom_entry(entry, &mut prefixes))
        .collect::<Result<Vec<_>, _>>()?;
    let extensions = to_extension_map(&feed.extensions, &mut prefixes);

    Ok(FeedBuilder::default()
        .id(feed.id.clone().unwrap_or_default())
        .title(plain(feed.title.as_deref()))
        .updated(required_date("updated", feed.updated.as_deref())?)
        .subtitle(feed.subtitle.as_deref().map(Text::plain))
        .rights(feed.rights.as_deref().map(Text::plain))
        .icon(feed.icon.clone())
        .logo(feed.logo.clone())
        .generator(feed.generator.as_ref().map(to_atom_generator))
        .categories(feed.categories.iter().map(to_atom_category).collect::<Vec<_>>())
        .authors(feed.authors.iter().map(to_atom_person).collect::<Vec<_>>())
        .contributors(feed.contributors.iter().map(to_atom_person).collect::<Vec<_>>())
        .links(feed.links.iter().map(to_atom_link).collect::<Vec<_>>())
        .entries(entries)
        .extensions(extensions)
        .namespaces(prefixes.into_namespaces())
        .build())
}

fn to_atom_entry(entry: &EntryNode, prefixes: &mut Prefixes<'_>) -> Result<Entry, FeedError> {
    Ok(EntryBuilder::default()
        .id(entry.id.clone().unwrap_or_default())
        .title(plain(entry.title.as_deref()))
        .updated(required_date("updated", entry.updated.as_deref())?)
        .published(optional_date("published", entry.published.as_deref())?)
        .content(entry.content.as_deref().map(to_atom_content))
        .summary(entry.summary.as_deref().map(Text::plain))
        .rights(entry.rights.as_deref().map(Text::plain))
        .source(entry.source.as_ref().map(to_atom_source).transpose()?)
        .categories(entry.categories.iter().map(to_atom_category).collect::<Vec<_>>())
        .authors(entry.authors.iter().map(to_atom_person).collect::<Vec<_>>())
        .contributors(entry.contributors.iter().map(to_atom_person).collect::<Vec<_>>())
        .links(entry.links.iter().map(to_atom_link).collect::<Vec<_>>())
        .extensions(to_extension_map(&entry.extensions, prefixes))
        .build())
}

fn to_atom_person(person: &PersonNode) -> Person {
    PersonBuilder::default()
        .name(person.name.clone().unwrap_or_default())
        .uri(person.uri.clone())
        .email(person.email.clone())
        .build()
}

fn to_atom_link(link: &LinkNode) -> Link {
    LinkBuilder::default()
        .href(link.href.clone().unwrap_or_default())
        .rel(link.rel.clone().unwrap_or_else(|| "alternate".to_string()))
        .mime_type(link.mime_type.clone())
        .hreflang(link.hreflang.clone())
        .title(link.title.clone())
        .length(link.length.clone())
        .build()
}

fn to_atom_category(category: &CategoryNode) -> Category {
    CategoryBuilder::default()
        .term(category.term.clone())
        .scheme(category.scheme.clone())
        .label(category.label.clone())
        .build()
}

fn to_atom_generator(generator: &GeneratorNode) -> Generator {
    GeneratorBuilder::default()
        .value(generator.value.clone())
        .uri(generator.uri.clone())
        .version(generator.version.clone())
        .build()
}

fn to_atom_source(source: &SourceNode) -> Result<Source, FeedError> {
    Ok(SourceBuilder::default()
        .id(source.id.clone().unwrap_or_default())
        .title(plain(source.title.as_deref()))
        .updated(required_date("source.updated", source.updated.as_deref())?)
        .build())
}

fn to_atom_content(value: &str) -> Content {
    ContentBuilder::default()
        .value(Some(value.to_string()))
        .content_type(Some("text".to_string()))
        .build()
}

fn plain(text: Option<&str>) -> Text {
    Text::plain(text.unwrap_or_default())
}

/// Parse a required date; a missing one renders as the Unix epoch.
fn required_date(element: &str, value: Option<&str>) -> Result<FixedDateTime, FeedError> {
    Ok(optional_date(element, value)?.unwrap_or_default())
}

fn optional_date(element: &str, value: Option<&str>) -> Result<Option<FixedDateTime>, FeedError> {
    value
        .map(|text| {
            FixedDateTime::parse_from_rfc3339(text).map_err(|source| FeedError::MalformedDate {
                element: element.to_string(),
                value: text.to_string(),
                source,
            })
        })
        .transpose()
}

// ============================================================================
// Extensions
// ============================================================================

/// Assigns XML prefixes to extension namespace URIs.
///
/// The first URI gets the configured prefix; any further URI gets a numbered one.
struct Prefixes<'a> {
    base: &'a str,
    assigned: Vec<(String, String)>,
}

impl<'a> Prefixes<'a> {
    fn new(base: &'a str) -> Self {
        Self {
            base,
            assigned: Vec::new(),
        }
    }

    fn prefix_for(&mut self, uri: &str) -> String {
        if let Some((_, prefix)) = self.assigned.iter().find(|(known, _)| known == uri) {
            return prefix.clone();
        }
        let prefix = match self.assigned.len() {
            0 => self.base.to_string(),
            n => format!("{}{}", self.base, n + 1),
        };
        self.assigned.push((uri.to_string(), prefix.clone()));
        prefix
    }

    fn into_namespaces(self) -> BTreeMap<String, String> {
        self.assigned
            .into_iter()
            .map(|(uri, prefix)| (prefix, uri))
            .collect()
    }
}

fn to_extension_map(extensions: &Extensions, prefixes: &mut Prefixes<'_>) -> ExtensionMap {
    let mut map = ExtensionMap::default();
    for (key, values) in extensions.iter() {
        let prefix = prefixes.prefix_for(&key.namespace);
        let qname = format!("{prefix}:{}", key.name);
        let elements = map
            .entry(prefix.clone())
            .or_default()
            .entry(qname.clone())
            .or_default();
        for value in values {
            elements.extend(to_extensions(&qname, value, &prefix));
        }
    }
    map
}

/// Lists repeat the element, maps become child elements, scalars become text.
fn to_extensions(qname: &str, value: &FieldValue, prefix: &str) -> Vec<Extension> {
    match value {
        FieldValue::List(items) => items
            .iter()
            .flat_map(|item| to_extensions(qname, item, prefix))
            .collect(),
        FieldValue::Map(fields) => {
            let mut children: BTreeMap<String, Vec<Extension>> = BTreeMap::new();
            for (name, child) in fields.iter() {
                let child_qname = format!("{prefix}:{name}");
                let rendered = to_extensions(&child_qname, child, prefix);
                children.entry(child_qname).or_default().extend(rendered);
            }
            vec![
                ExtensionBuilder::default()
                    .name(qname.to_string())
                    .children(children)
                    .build(),
            ]
        }
        scalar => vec![
            ExtensionBuilder::default()
                .name(qname.to_string())
                .value(scalar.as_text())
                .build(),
        ],
    }
}

/// Minify XML by trimming lines and joining them.
pub fn minify_xml(xml: &str, enabled: bool) -> Cow<'_, str> {
    if !enabled {
        return Cow::Borrowed(xml);
    }
    let minified = xml
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("");
    Cow::Owned(minified)
}

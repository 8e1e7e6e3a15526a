//! Atom vocabulary and setter dispatch tables.
//!
//! Element lists follow <http://atomenabled.org/developers/syndication/>.
//! Each destination kind maps its recognized element names to a typed setter,
//! built once on first use.

use super::{
    FeedError,
    node::{CategoryNode, EntryNode, FeedNode, GeneratorNode, SourceNode},
    route::{links_from, people_from},
};
use crate::{field::FieldValue, utils::date};
use rustc_hash::FxHashMap;
use std::sync::LazyLock;

/// Marker prefix that lets a field share its name with a nested structure.
pub const ELEMENT_PREFIX: &str = "atom_";

/// Reserved field carrying the extension namespace URI for one call.
pub const XML_NAMESPACE_FIELD: &str = "xml_namespace";

pub const PERSON_ATTRIBUTES: &[&str] = &["name", "uri", "email"];

pub const LINK_ATTRIBUTES: &[&str] = &["href", "rel", "type", "hreflang", "title", "length"];

/// Atom date constructs (RFC 4287 §3.3).
pub const DATE_PROPERTIES: &[&str] = &["updated", "published"];

/// Destination kind of a routed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Feed,
    Entry,
}

impl NodeKind {
    /// Whether the kind owns the given list collection.
    pub const fn has_list(self, list: ListProperty) -> bool {
        match (self, list) {
            (Self::Feed, _) => true,
            (Self::Entry, ListProperty::Entries) => false,
            (Self::Entry, ListProperty::Authors | ListProperty::Links) => true,
        }
    }
}

/// Fields expanded by a list builder instead of a setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListProperty {
    Authors,
    Links,
    Entries,
}

impl ListProperty {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "authors" => Some(Self::Authors),
            "links" => Some(Self::Links),
            "entries" => Some(Self::Entries),
            _ => None,
        }
    }
}

pub fn is_date_property(name: &str) -> bool {
    DATE_PROPERTIES.contains(&name)
}

// ============================================================================
// Setter tables
// ============================================================================
//
// The tables are the element vocabulary of each kind: a name routes to a
// setter exactly when it is a recognized Atom element of that kind.

pub type Setter<N> = fn(&mut N, FieldValue) -> Result<(), FeedError>;

pub static FEED_SETTERS: LazyLock<FxHashMap<&'static str, Setter<FeedNode>>> =
    LazyLock::new(|| {
        let setters: [(&'static str, Setter<FeedNode>); 12] = [
            ("id", |feed, value| set_text(&mut feed.id, "id", value)),
            ("title", |feed, value| set_text(&mut feed.title, "title", value)),
            ("updated", |feed, value| {
                set_text(&mut feed.updated, "updated", value)
            }),
            ("author", |feed, value| {
                feed.authors = people_from(value);
                Ok(())
            }),
            ("link", |feed, value| {
                feed.links = links_from(value);
                Ok(())
            }),
            ("category", |feed, value| {
                feed.categories = categories_from(value);
                Ok(())
            }),
            ("contributor", |feed, value| {
                feed.contributors = people_from(value);
                Ok(())
            }),
            ("generator", |feed, value| {
                feed.generator = generator_from(value);
                Ok(())
            }),
            ("icon", |feed, value| set_text(&mut feed.icon, "icon", value)),
            ("logo", |feed, value| set_text(&mut feed.logo, "logo", value)),
            ("rights", |feed, value| {
                set_text(&mut feed.rights, "rights", value)
            }),
            ("subtitle", |feed, value| {
                set_text(&mut feed.subtitle, "subtitle", value)
            }),
        ];
        setters.into_iter().collect()
    });

pub static ENTRY_SETTERS: LazyLock<FxHashMap<&'static str, Setter<EntryNode>>> =
    LazyLock::new(|| {
        let setters: [(&'static str, Setter<EntryNode>); 12] = [
            ("id", |entry, value| set_text(&mut entry.id, "id", value)),
            ("title", |entry, value| {
                set_text(&mut entry.title, "title", value)
            }),
            ("updated", |entry, value| {
                set_text(&mut entry.updated, "updated", value)
            }),
            ("author", |entry, value| {
                entry.authors = people_from(value);
                Ok(())
            }),
            ("content", |entry, value| {
                set_text(&mut entry.content, "content", value)
            }),
            ("link", |entry, value| {
                entry.links = links_from(value);
                Ok(())
            }),
            ("summary", |entry, value| {
                set_text(&mut entry.summary, "summary", value)
            }),
            ("category", |entry, value| {
                entry.categories = categories_from(value);
                Ok(())
            }),
            ("contributor", |entry, value| {
                entry.contributors = people_from(value);
                Ok(())
            }),
            ("published", |entry, value| {
                set_text(&mut entry.published, "published", value)
            }),
            ("source", |entry, value| {
                entry.source = source_from(value)?;
                Ok(())
            }),
            ("rights", |entry, value| {
                set_text(&mut entry.rights, "rights", value)
            }),
        ];
        setters.into_iter().collect()
    });

// ============================================================================
// Value conversion
// ============================================================================

/// Assign a text attribute. Null clears it; lists and maps are rejected.
fn set_text(slot: &mut Option<String>, element: &str, value: FieldValue) -> Result<(), FeedError> {
    *slot = match value {
        FieldValue::Null => None,
        FieldValue::List(_) | FieldValue::Map(_) => {
            return Err(FeedError::unsupported(element, value.kind()));
        }
        scalar => scalar.as_text(),
    };
    Ok(())
}

fn categories_from(value: FieldValue) -> Vec<CategoryNode> {
    value
        .into_items()
        .into_iter()
        .filter_map(|item| match item {
            FieldValue::Map(fields) => Some(CategoryNode {
                term: fields.get("term")?.as_text()?,
                scheme: fields.get("scheme").and_then(FieldValue::as_text),
                label: fields.get("label").and_then(FieldValue::as_text),
            }),
            scalar => scalar.as_text().map(|term| CategoryNode {
                term,
                ..CategoryNode::default()
            }),
        })
        .collect()
}

fn generator_from(value: FieldValue) -> Option<GeneratorNode> {
    match value {
        FieldValue::Map(fields) => Some(GeneratorNode {
            value: fields.get("value")?.as_text()?,
            uri: fields.get("uri").and_then(FieldValue::as_text),
            version: fields.get("version").and_then(FieldValue::as_text),
        }),
        scalar => scalar.as_text().map(|value| GeneratorNode {
            value,
            ..GeneratorNode::default()
        }),
    }
}

fn source_from(value: FieldValue) -> Result<Option<SourceNode>, FeedError> {
    let mut fields = match value {
        FieldValue::Map(fields) => fields,
        scalar => {
            return Ok(scalar.as_text().map(|id| SourceNode {
                id: Some(id),
                ..SourceNode::default()
            }));
        }
    };

    let updated = match fields.remove("updated") {
        Some(updated) => date::format_date_element(updated)
            .map_err(|err| FeedError::invalid_date("source.updated", err))?
            .as_text(),
        None => None,
    };

    Ok(Some(SourceNode {
        id: fields.get("id").and_then(FieldValue::as_text),
        title: fields.get("title").and_then(FieldValue::as_text),
        updated,
    }))
}

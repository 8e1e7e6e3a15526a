//! Field routing.
//!
//! Each field of a flattened mapping lands in exactly one place on the output
//! node, checked in this order:
//!
//! 1. a known attribute of the node kind (setter table in [`super::schema`])
//! 2. a list property (`authors`, `links`, `entries`) expanded by a builder
//! 3. an extension bucket keyed by `(namespace, element)`
//!
//! `updated` and `published` are date-normalized before any of the above.

use super::{
    FeedError,
    node::{EntryNode, ExtensionKey, Extensions, FeedNode, LinkNode, PersonNode},
    schema::{
        ELEMENT_PREFIX, ENTRY_SETTERS, FEED_SETTERS, LINK_ATTRIBUTES, ListProperty, NodeKind,
        PERSON_ATTRIBUTES, Setter, is_date_property,
    },
};
use crate::{debug, field::FieldValue, utils::date};

/// An output node that fields can be routed into.
pub trait AtomNode: Sized {
    const KIND: NodeKind;

    fn setter(element: &str) -> Option<Setter<Self>>;
    fn authors_mut(&mut self) -> &mut Vec<PersonNode>;
    fn links_mut(&mut self) -> &mut Vec<LinkNode>;
    fn extensions_mut(&mut self) -> &mut Extensions;

    /// Entry collection, for kinds that own one.
    fn entries_mut(&mut self) -> Option<&mut Vec<EntryNode>> {
        None
    }
}

impl AtomNode for FeedNode {
    const KIND: NodeKind = NodeKind::Feed;

    fn setter(element: &str) -> Option<Setter<Self>> {
        FEED_SETTERS.get(element).copied()
    }

    fn authors_mut(&mut self) -> &mut Vec<PersonNode> {
        &mut self.authors
    }

    fn links_mut(&mut self) -> &mut Vec<LinkNode> {
        &mut self.links
    }

    fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    fn entries_mut(&mut self) -> Option<&mut Vec<EntryNode>> {
        Some(&mut self.entries)
    }
}

impl AtomNode for EntryNode {
    const KIND: NodeKind = NodeKind::Entry;

    fn setter(element: &str) -> Option<Setter<Self>> {
        ENTRY_SETTERS.get(element).copied()
    }

    fn authors_mut(&mut self) -> &mut Vec<PersonNode> {
        &mut self.authors
    }

    fn links_mut(&mut self) -> &mut Vec<LinkNode> {
        &mut self.links
    }

    fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

/// Route one field into `node`.
///
/// Date normalization keys on the name after the `atom_` marker is stripped,
/// so `atom_updated` is normalized and validated exactly like `updated`.
///
/// `namespace` is only consulted when the field falls through to an extension.
pub fn route<N: AtomNode>(
    node: &mut N,
    name: &str,
    value: FieldValue,
    namespace: Option<&str>,
) -> Result<(), FeedError> {
    let element = name.strip_prefix(ELEMENT_PREFIX).unwrap_or(name);

    let value = if is_date_property(element) {
        date::format_date_element(value).map_err(|err| FeedError::invalid_date(element, err))?
    } else {
        value
    };

    if let Some(setter) = N::setter(element) {
        return setter(node, value);
    }

    if let Some(list) = ListProperty::from_name(element)
        && N::KIND.has_list(list)
    {
        match list {
            ListProperty::Authors => node.authors_mut().extend(people_from(value)),
            ListProperty::Links => node.links_mut().extend(links_from(value)),
            ListProperty::Entries => {
                if let Some(entries) = node.entries_mut() {
                    add_entries(entries, value, namespace)?;
                }
            }
        }
        return Ok(());
    }

    add_extension(node.extensions_mut(), element, value, namespace)
}

/// Build one entry node per mapping, routing its fields with entry semantics.
fn add_entries(
    entries: &mut Vec<EntryNode>,
    value: FieldValue,
    namespace: Option<&str>,
) -> Result<(), FeedError> {
    for item in value.into_items() {
        let fields = match item {
            FieldValue::Map(fields) => fields,
            other => return Err(FeedError::unsupported("entries", other.kind())),
        };

        let mut entry = EntryNode::default();
        for (name, value) in fields {
            route(&mut entry, &name, value, namespace)?;
        }
        entries.push(entry);
    }
    Ok(())
}

fn add_extension(
    extensions: &mut Extensions,
    element: &str,
    value: FieldValue,
    namespace: Option<&str>,
) -> Result<(), FeedError> {
    let namespace = namespace
        .filter(|ns| !ns.is_empty())
        .ok_or_else(|| FeedError::MissingNamespace {
            element: element.to_owned(),
        })?;

    extensions.push(ExtensionKey::new(namespace, element), value);
    Ok(())
}

// ============================================================================
// Whitelisted builders
// ============================================================================

/// Build person nodes from a list (or a single item).
///
/// Scalars become the person's name. Mappings keep only person attributes;
/// anything else is dropped without error.
pub(super) fn people_from(value: FieldValue) -> Vec<PersonNode> {
    value.into_items().into_iter().filter_map(person_from).collect()
}

fn person_from(item: FieldValue) -> Option<PersonNode> {
    let fields = match item {
        FieldValue::Map(fields) => fields,
        scalar => return scalar.as_text().map(PersonNode::named),
    };

    let mut person = PersonNode::default();
    for (name, value) in fields {
        if !PERSON_ATTRIBUTES.contains(&name.as_str()) {
            debug!("feed"; "dropping person attribute `{}`", name);
            continue;
        }
        let text = value.as_text();
        match name.as_str() {
            "name" => person.name = text,
            "uri" => person.uri = text,
            _ => person.email = text,
        }
    }
    Some(person)
}

/// Build link nodes from a list (or a single item).
///
/// Scalars become the link's `href`. Mappings keep only link attributes;
/// anything else is dropped without error.
pub(super) fn links_from(value: FieldValue) -> Vec<LinkNode> {
    value.into_items().into_iter().filter_map(link_from).collect()
}

fn link_from(item: FieldValue) -> Option<LinkNode> {
    let fields = match item {
        FieldValue::Map(fields) => fields,
        scalar => return scalar.as_text().map(LinkNode::to),
    };

    let mut link = LinkNode::default();
    for (name, value) in fields {
        if !LINK_ATTRIBUTES.contains(&name.as_str()) {
            debug!("feed"; "dropping link attribute `{}`", name);
            continue;
        }
        let text = value.as_text();
        match name.as_str() {
            "href" => link.href = text,
            "rel" => link.rel = text,
            "type" => link.mime_type = text,
            "hreflang" => link.hreflang = text,
            "title" => link.title = text,
            _ => link.length = text,
        }
    }
    Some(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldMap;
    use chrono::NaiveDate;

    fn map<const N: usize>(fields: [(&str, FieldValue); N]) -> FieldValue {
        FieldValue::Map(fields.into_iter().collect())
    }

    #[test]
    fn test_route_scalar_attribute() {
        let mut feed = FeedNode::default();
        route(&mut feed, "title", "The Avengers".into(), None).unwrap();
        assert_eq!(feed.title.as_deref(), Some("The Avengers"));
    }

    #[test]
    fn test_route_strips_marker_prefix() {
        let mut feed = FeedNode::default();
        route(&mut feed, "atom_id", "marvel:avengers".into(), None).unwrap();
        assert_eq!(feed.id.as_deref(), Some("marvel:avengers"));
    }

    #[test]
    fn test_route_formats_date_values() {
        let mut feed = FeedNode::default();
        let date = NaiveDate::from_ymd_opt(2016, 12, 21).unwrap();
        route(&mut feed, "updated", date.into(), None).unwrap();
        assert_eq!(feed.updated.as_deref(), Some("2016-12-21T00:00:00+00:00"));
    }

    #[test]
    fn test_route_keeps_formatted_dates() {
        let mut feed = FeedNode::default();
        route(&mut feed, "updated", "2016-12-21T00:00:02Z".into(), None).unwrap();
        assert_eq!(feed.updated.as_deref(), Some("2016-12-21T00:00:02Z"));
    }

    #[test]
    fn test_route_rejects_invalid_dates() {
        let mut feed = FeedNode::default();
        let err = route(&mut feed, "updated", "tomorrow".into(), None).unwrap_err();
        assert!(matches!(
            err,
            FeedError::InvalidDateType { ref element, kind: "string" } if element == "updated"
        ));
        assert_eq!(feed.updated, None);
    }

    #[test]
    fn test_route_marked_date_is_normalized() {
        let mut feed = FeedNode::default();
        let date = NaiveDate::from_ymd_opt(2016, 12, 21).unwrap();
        route(&mut feed, "atom_updated", date.into(), None).unwrap();
        assert_eq!(feed.updated.as_deref(), Some("2016-12-21T00:00:00+00:00"));

        let err = route(&mut feed, "atom_updated", "tomorrow".into(), None).unwrap_err();
        assert!(matches!(
            err,
            FeedError::InvalidDateType { ref element, kind: "string" } if element == "updated"
        ));
        assert_eq!(feed.updated.as_deref(), Some("2016-12-21T00:00:00+00:00"));
    }

    #[test]
    fn test_route_scalar_authors() {
        let mut feed = FeedNode::default();
        route(&mut feed, "authors", vec!["Marvel"].into(), None).unwrap();
        assert_eq!(feed.authors, vec![PersonNode::named("Marvel")]);
    }

    #[test]
    fn test_route_author_mapping_is_whitelisted() {
        let mut feed = FeedNode::default();
        let author = map([
            ("name", "Stan Lee".into()),
            ("email", "stan@marvel.com".into()),
            ("nickname", "The Man".into()),
        ]);
        route(&mut feed, "authors", FieldValue::List(vec![author]), None).unwrap();

        assert_eq!(
            feed.authors,
            vec![PersonNode {
                name: Some("Stan Lee".to_string()),
                uri: None,
                email: Some("stan@marvel.com".to_string()),
            }]
        );
    }

    #[test]
    fn test_route_links_are_whitelisted() {
        let mut feed = FeedNode::default();
        let link = map([
            ("href", "http://x".into()),
            ("rel", "self".into()),
            ("unrelated", "drop-me".into()),
        ]);
        route(&mut feed, "links", FieldValue::List(vec![link]), None).unwrap();

        assert_eq!(
            feed.links,
            vec![LinkNode {
                href: Some("http://x".to_string()),
                rel: Some("self".to_string()),
                ..LinkNode::default()
            }]
        );
    }

    #[test]
    fn test_route_scalar_links_and_type_attribute() {
        let mut feed = FeedNode::default();
        let typed = map([
            ("href", "http://x/feed".into()),
            ("type", "application/atom+xml".into()),
            ("length", 1024_i64.into()),
        ]);
        route(
            &mut feed,
            "links",
            FieldValue::List(vec!["http://marvel.wikia.com/wiki/Avengers".into(), typed]),
            None,
        )
        .unwrap();

        assert_eq!(feed.links.len(), 2);
        assert_eq!(
            feed.links[0],
            LinkNode::to("http://marvel.wikia.com/wiki/Avengers")
        );
        assert_eq!(feed.links[1].mime_type.as_deref(), Some("application/atom+xml"));
        assert_eq!(feed.links[1].length.as_deref(), Some("1024"));
    }

    #[test]
    fn test_route_extension_requires_namespace() {
        let mut feed = FeedNode::default();

        let err = route(&mut feed, "custom_friend", "Hawkeye".into(), Some("")).unwrap_err();
        assert!(matches!(err, FeedError::MissingNamespace { .. }));

        let err = route(&mut feed, "custom_friend", "Hawkeye".into(), None).unwrap_err();
        assert!(matches!(err, FeedError::MissingNamespace { .. }));

        assert!(feed.extensions.is_empty());
    }

    #[test]
    fn test_route_extension_accumulates() {
        let mut feed = FeedNode::default();
        route(&mut feed, "custom_friend", "Hawkeye".into(), Some("http://ns")).unwrap();
        route(&mut feed, "custom_friend", "Falcon".into(), Some("http://ns")).unwrap();

        assert_eq!(
            feed.extensions.get("http://ns", "custom_friend"),
            Some([FieldValue::from("Hawkeye"), FieldValue::from("Falcon")].as_slice())
        );
    }

    #[test]
    fn test_route_published_on_feed_is_extension() {
        // `published` is an entry element; on a feed it is still normalized.
        let mut feed = FeedNode::default();
        let date = NaiveDate::from_ymd_opt(2016, 2, 9).unwrap();
        route(&mut feed, "published", date.into(), Some("http://ns")).unwrap();

        assert_eq!(
            feed.extensions.get("http://ns", "published"),
            Some([FieldValue::from("2016-02-09T00:00:00+00:00")].as_slice())
        );
    }

    #[test]
    fn test_route_entries_in_order() {
        let mut feed = FeedNode::default();
        let date = NaiveDate::from_ymd_opt(2016, 12, 21).unwrap();
        let entries = FieldValue::List(vec![
            map([
                ("id", "a".into()),
                ("title", "b".into()),
                ("updated", date.into()),
            ]),
            map([("id", "c".into()), ("title", "d".into())]),
        ]);
        route(&mut feed, "entries", entries, None).unwrap();

        assert_eq!(feed.entries.len(), 2);
        assert_eq!(feed.entries[0].id.as_deref(), Some("a"));
        assert_eq!(
            feed.entries[0].updated.as_deref(),
            Some("2016-12-21T00:00:00+00:00")
        );
        assert_eq!(feed.entries[1].id.as_deref(), Some("c"));
    }

    #[test]
    fn test_route_entry_nested_lists() {
        let mut feed = FeedNode::default();
        let entry = map([
            ("id", "marvel:avengers:black-widow".into()),
            (
                "links",
                vec!["http://marvel.wikia.com/wiki/Black_Widow"].into(),
            ),
            ("authors", vec!["Marvel"].into()),
        ]);
        route(&mut feed, "entries", FieldValue::List(vec![entry]), None).unwrap();

        let entry = &feed.entries[0];
        assert_eq!(
            entry.links,
            vec![LinkNode::to("http://marvel.wikia.com/wiki/Black_Widow")]
        );
        assert_eq!(entry.authors, vec![PersonNode::named("Marvel")]);
        assert!(feed.links.is_empty());
        assert!(feed.authors.is_empty());
    }

    #[test]
    fn test_route_entry_errors_propagate() {
        let mut feed = FeedNode::default();
        let entry = map([("id", "a".into()), ("custom_power", "flight".into())]);
        let err = route(&mut feed, "entries", FieldValue::List(vec![entry]), None).unwrap_err();
        assert!(matches!(err, FeedError::MissingNamespace { ref element } if element == "custom_power"));
    }

    #[test]
    fn test_route_nested_entries_become_extensions() {
        let mut entry = EntryNode::default();
        route(&mut entry, "entries", vec!["x"].into(), Some("http://ns")).unwrap();
        assert!(entry.extensions.get("http://ns", "entries").is_some());
    }

    #[test]
    fn test_route_entries_reject_scalars() {
        let mut feed = FeedNode::default();
        let err = route(&mut feed, "entries", vec!["oops"].into(), None).unwrap_err();
        assert!(matches!(err, FeedError::UnsupportedValue { kind: "string", .. }));
    }

    #[test]
    fn test_route_entry_only_elements() {
        let mut entry = EntryNode::default();
        route(&mut entry, "summary", "Natasha Romanoff".into(), None).unwrap();
        route(&mut entry, "published", "2016-02-09T00:05:24Z".into(), None).unwrap();
        route(&mut entry, "source", "marvel:comics".into(), None).unwrap();

        assert_eq!(entry.summary.as_deref(), Some("Natasha Romanoff"));
        assert_eq!(entry.published.as_deref(), Some("2016-02-09T00:05:24Z"));
        assert_eq!(
            entry.source.as_ref().and_then(|s| s.id.as_deref()),
            Some("marvel:comics")
        );
    }

    #[test]
    fn test_author_setter_replaces_collection() {
        let mut feed = FeedNode::default();
        route(&mut feed, "authors", vec!["Marvel"].into(), None).unwrap();
        let person: FieldMap = [("name", "Stan Lee")].into_iter().collect();
        route(&mut feed, "author", person.into(), None).unwrap();

        assert_eq!(feed.authors, vec![PersonNode::named("Stan Lee")]);
    }
}

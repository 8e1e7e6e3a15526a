//! Atom feed mapping.
//!
//! Turns a flattened field mapping into an Atom 1.0 feed:
//!
//! - **route**: dispatches each field to an attribute, list builder or extension
//! - **schema**: Atom vocabulary and per-kind setter tables
//! - **node**: output nodes filled by the router
//! - **render**: output nodes to `atom_syndication` and XML text

mod error;
pub mod node;
pub mod render;
pub mod route;
pub mod schema;

pub use error::FeedError;
pub use node::{
    CategoryNode, EntryNode, ExtensionKey, Extensions, FeedNode, GeneratorNode, LinkNode,
    PersonNode, SourceNode,
};
pub use render::{RenderOptions, to_xml};
pub use route::{AtomNode, route};

use crate::{
    debug,
    field::{self, FieldMap},
};
use schema::XML_NAMESPACE_FIELD;
use serde::Serialize;

/// Build a feed node from a flattened field mapping.
///
/// An `xml_namespace` field is removed from the mapping and, when present,
/// replaces `namespace` for this call (null or empty unsets it). Remaining
/// fields are routed in mapping order.
pub fn to_feed(mut fields: FieldMap, namespace: Option<&str>) -> Result<FeedNode, FeedError> {
    let namespace = match fields.remove(XML_NAMESPACE_FIELD) {
        Some(value) => value.as_text(),
        None => namespace.map(str::to_owned),
    };

    debug!("feed"; "routing {} fields (namespace: {:?})", fields.len(), namespace);

    let mut feed = FeedNode::default();
    for (name, value) in fields {
        route(&mut feed, &name, value, namespace.as_deref())?;
    }
    Ok(feed)
}

/// Flatten a serializable value and build a feed node from it.
pub fn to_feed_from<T: Serialize + ?Sized>(
    source: &T,
    namespace: Option<&str>,
) -> Result<FeedNode, FeedError> {
    to_feed(field::flatten(source)?, namespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldValue;
    use serde_json::json;

    #[derive(Serialize)]
    struct Avengers {
        id: &'static str,
        title: &'static str,
        updated: &'static str,
        authors: Vec<&'static str>,
        links: Vec<&'static str>,
        entries: Vec<serde_json::Value>,
    }

    fn avengers() -> Avengers {
        Avengers {
            id: "marvel:avengers",
            title: "The Avengers",
            updated: "2016-12-21T00:00:02Z",
            authors: vec!["Marvel"],
            links: vec!["http://marvel.wikia.com/wiki/Avengers"],
            entries: vec![json!({
                "id": "marvel:avengers:black-widow",
                "title": "Black Widow",
                "updated": "2016-13-21T00:00:02Z",
            })],
        }
    }

    #[test]
    fn test_to_feed_fills_required_elements() {
        let feed = to_feed_from(&avengers(), None).unwrap();

        assert_eq!(feed.id.as_deref(), Some("marvel:avengers"));
        assert_eq!(feed.title.as_deref(), Some("The Avengers"));
        assert_eq!(feed.updated.as_deref(), Some("2016-12-21T00:00:02Z"));
        assert_eq!(feed.authors, vec![PersonNode::named("Marvel")]);
        assert_eq!(
            feed.links,
            vec![LinkNode::to("http://marvel.wikia.com/wiki/Avengers")]
        );
    }

    #[test]
    fn test_to_feed_entries_keep_preformatted_dates() {
        let feed = to_feed_from(&avengers(), None).unwrap();

        assert_eq!(
            feed.entries,
            vec![EntryNode {
                id: Some("marvel:avengers:black-widow".to_string()),
                title: Some("Black Widow".to_string()),
                updated: Some("2016-13-21T00:00:02Z".to_string()),
                ..EntryNode::default()
            }]
        );
    }

    #[test]
    fn test_to_feed_xml_namespace_field() {
        let fields = FieldValue::from(json!({
            "xml_namespace": "http://marvel.com/ns",
            "title": "The Avengers",
            "custom_friend": "Hawkeye",
        }));
        let FieldValue::Map(fields) = fields else {
            unreachable!()
        };

        let feed = to_feed(fields, None).unwrap();
        assert_eq!(
            feed.extensions.get("http://marvel.com/ns", "custom_friend"),
            Some([FieldValue::from("Hawkeye")].as_slice())
        );
        assert!(feed.extensions.get("http://marvel.com/ns", "xml_namespace").is_none());
    }

    #[test]
    fn test_to_feed_xml_namespace_overrides_argument() {
        let fields: FieldMap = [("xml_namespace", "http://a"), ("custom_friend", "Hawkeye")]
            .into_iter()
            .collect();

        let feed = to_feed(fields, Some("http://b")).unwrap();
        assert!(feed.extensions.get("http://a", "custom_friend").is_some());
        assert!(feed.extensions.get("http://b", "custom_friend").is_none());
    }

    #[test]
    fn test_to_feed_null_xml_namespace_unsets_default() {
        let mut fields = FieldMap::new();
        fields.insert("xml_namespace", FieldValue::Null);
        fields.insert("custom_friend", "Hawkeye");

        let err = to_feed(fields, Some("http://b")).unwrap_err();
        assert!(matches!(err, FeedError::MissingNamespace { .. }));
    }

    #[test]
    fn test_to_feed_default_namespace() {
        let fields: FieldMap = [("custom_friend", "Hawkeye")].into_iter().collect();
        let feed = to_feed(fields, Some("http://ns")).unwrap();
        assert!(feed.extensions.get("http://ns", "custom_friend").is_some());
    }

    #[test]
    fn test_to_feed_missing_namespace() {
        let fields: FieldMap = [("title", "The Avengers"), ("custom_friend", "Hawkeye")]
            .into_iter()
            .collect();
        let err = to_feed(fields, None).unwrap_err();
        assert!(matches!(err, FeedError::MissingNamespace { ref element } if element == "custom_friend"));
    }
}

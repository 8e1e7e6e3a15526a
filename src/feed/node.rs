//! Output nodes built by the router.
//!
//! Nodes hold Atom values as text. Dates are stored exactly as routed, so a
//! pre-formatted string is never re-validated here; parsing happens in
//! [`super::render`].

use crate::field::FieldValue;

/// Atom `<feed>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedNode {
    pub id: Option<String>,
    pub title: Option<String>,
    pub updated: Option<String>,
    pub subtitle: Option<String>,
    pub rights: Option<String>,
    pub icon: Option<String>,
    pub logo: Option<String>,
    pub generator: Option<GeneratorNode>,
    pub categories: Vec<CategoryNode>,
    pub authors: Vec<PersonNode>,
    pub contributors: Vec<PersonNode>,
    pub links: Vec<LinkNode>,
    pub entries: Vec<EntryNode>,
    pub extensions: Extensions,
}

/// Atom `<entry>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryNode {
    pub id: Option<String>,
    pub title: Option<String>,
    pub updated: Option<String>,
    pub published: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub rights: Option<String>,
    pub source: Option<SourceNode>,
    pub categories: Vec<CategoryNode>,
    pub authors: Vec<PersonNode>,
    pub contributors: Vec<PersonNode>,
    pub links: Vec<LinkNode>,
    pub extensions: Extensions,
}

/// Atom person construct (`<author>`, `<contributor>`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonNode {
    pub name: Option<String>,
    pub uri: Option<String>,
    pub email: Option<String>,
}

impl PersonNode {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Atom `<link>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkNode {
    pub href: Option<String>,
    pub rel: Option<String>,
    /// The `type` attribute.
    pub mime_type: Option<String>,
    pub hreflang: Option<String>,
    pub title: Option<String>,
    pub length: Option<String>,
}

impl LinkNode {
    pub fn to(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryNode {
    pub term: String,
    pub scheme: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorNode {
    pub value: String,
    pub uri: Option<String>,
    pub version: Option<String>,
}

/// Atom `<source>` of an entry copied from another feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceNode {
    pub id: Option<String>,
    pub title: Option<String>,
    pub updated: Option<String>,
}

// ============================================================================
// Extensions
// ============================================================================

/// Identifies a custom element by namespace URI and local name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionKey {
    pub namespace: String,
    pub name: String,
}

impl ExtensionKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

/// Extension buckets in first-insertion order.
///
/// Each key holds a sequence: repeated values under the same key accumulate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extensions {
    slots: Vec<(ExtensionKey, Vec<FieldValue>)>,
}

impl Extensions {
    pub fn push(&mut self, key: ExtensionKey, value: FieldValue) {
        match self.slots.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, values)) => values.push(value),
            None => self.slots.push((key, vec![value])),
        }
    }

    pub fn get(&self, namespace: &str, name: &str) -> Option<&[FieldValue]> {
        self.slots
            .iter()
            .find(|(key, _)| key.namespace == namespace && key.name == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ExtensionKey, &[FieldValue])> {
        self.slots
            .iter()
            .map(|(key, values)| (key, values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

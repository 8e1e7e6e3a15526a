//! Tola Atom - map structured data into Atom 1.0 feeds.
//!
//! A source value is flattened into an ordered field mapping, each field is
//! routed to an Atom element, a list builder or a namespaced extension, and
//! the resulting nodes are rendered with `atom_syndication`.
//!
//! ```ignore
//! let feed = tola_atom::to_feed_from(&avengers, Some("http://marvel.com/ns"))?;
//! let xml = tola_atom::to_xml(&feed, &RenderOptions::default())?;
//! ```

pub mod config;
pub mod feed;
pub mod field;
pub mod logger;
pub mod utils;

pub use feed::{FeedError, FeedNode, RenderOptions, to_feed, to_feed_from, to_xml};
pub use field::{FieldMap, FieldValue};

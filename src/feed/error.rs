//! Feed mapping error types.

use crate::utils::date::InvalidDateType;
use thiserror::Error;

/// Errors raised while routing fields or rendering a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("`{element}` must be an RFC 3339 string or a date value, got {kind}")]
    InvalidDateType { element: String, kind: &'static str },

    #[error("`{element}` is not an Atom element and no xml_namespace is configured")]
    MissingNamespace { element: String },

    #[error("`{element}` cannot hold a {kind} value")]
    UnsupportedValue { element: String, kind: &'static str },

    #[error("`{element}` is not a valid RFC 3339 date-time: `{value}`")]
    MalformedDate {
        element: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("failed to flatten source value")]
    Json(#[from] serde_json::Error),
}

impl FeedError {
    pub(crate) fn invalid_date(element: &str, err: InvalidDateType) -> Self {
        Self::InvalidDateType {
            element: element.to_owned(),
            kind: err.kind,
        }
    }

    pub(crate) fn unsupported(element: &str, kind: &'static str) -> Self {
        Self::UnsupportedValue {
            element: element.to_owned(),
            kind,
        }
    }
}

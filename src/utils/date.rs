//! RFC 3339 date normalization for Atom date constructs.
//!
//! Atom requires `updated` and `published` to be RFC 3339 date-times
//! (<https://tools.ietf.org/html/rfc4287#section-3.3>). Values arrive either as
//! text that is already formatted or as typed dates:
//!
//! - `FieldValue::Date`: calendar date, rendered at midnight `+00:00`
//! - `FieldValue::DateTime`: fixed-offset date-time, rendered as-is
//! - `FieldValue::Timestamp`: UTC instant, converted to a fixed offset first
//!
//! # Examples
//!
//! ```ignore
//! let value = FieldValue::from("2016-02-09T00:05:24Z");
//! assert!(is_rfc3339(&value));
//! assert_eq!(format_date_element(value.clone())?, value);
//! ```

use crate::field::FieldValue;
use chrono::{NaiveTime, SecondsFormat};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Loose RFC 3339 shape: `YYYY-MM-DDTHH:MM:SS` with optional separators,
/// followed by `Z` or a signed `HH:MM` offset.
static RFC3339: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]{2,4}-?){3}T(?:[0-9]{2}:?){3}(?:[+-](?:[0-9]{2}:?){2}|Z)+$").unwrap()
});

/// Value is neither RFC 3339 text nor a date type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected an RFC 3339 string or a date value, got {kind}")]
pub struct InvalidDateType {
    pub kind: &'static str,
}

/// Check whether the value is a string shaped like an RFC 3339 date-time.
///
/// Only the shape is checked, not the calendar: `2016-13-21T00:00:02Z` matches.
pub fn is_rfc3339(value: &FieldValue) -> bool {
    value.as_str().is_some_and(|s| RFC3339.is_match(s))
}

/// Check whether the value is one of the date variants.
pub const fn is_date_like(value: &FieldValue) -> bool {
    matches!(
        value,
        FieldValue::Date(_) | FieldValue::DateTime(_) | FieldValue::Timestamp(_)
    )
}

/// Format a date value as RFC 3339 (`YYYY-MM-DDTHH:MM:SS±HH:MM`).
pub fn to_rfc3339(value: &FieldValue) -> Result<String, InvalidDateType> {
    let datetime = match value {
        FieldValue::Date(date) => date.and_time(NaiveTime::MIN).and_utc().fixed_offset(),
        FieldValue::DateTime(datetime) => *datetime,
        FieldValue::Timestamp(timestamp) => timestamp.fixed_offset(),
        other => return Err(InvalidDateType { kind: other.kind() }),
    };
    Ok(datetime.to_rfc3339_opts(SecondsFormat::Secs, false))
}

/// Normalize a date element.
///
/// Text that already looks like RFC 3339 is returned untouched, without the
/// stricter date-type check. Everything else goes through [`to_rfc3339`].
pub fn format_date_element(value: FieldValue) -> Result<FieldValue, InvalidDateType> {
    if is_rfc3339(&value) {
        return Ok(value);
    }
    to_rfc3339(&value).map(FieldValue::String)
}

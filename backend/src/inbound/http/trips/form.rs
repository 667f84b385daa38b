//! Lenient readers for trip values posted from HTML forms.
//!
//! Form inputs submit numbers and dates as strings, so each field accepts
//! either the typed JSON value or its text. Blank text counts as absent.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{TripField, TripValidationError};

/// A typed value, its text rendering, or anything else a client sent.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FormValue<T> {
    Typed(T),
    Text(String),
    Other(Value),
}

/// Parsing of the text rendering of a form value.
pub trait FromFormText: Sized {
    fn from_form_text(text: &str) -> Option<Self>;
}

impl FromFormText for f64 {
    fn from_form_text(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl FromFormText for i32 {
    fn from_form_text(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

/// RFC 3339 timestamps, or `YYYY-MM-DD` read as midnight UTC.
impl FromFormText for DateTime<Utc> {
    fn from_form_text(text: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(text)
            .map(|stamp| stamp.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .map(|day| day.and_time(NaiveTime::MIN).and_utc())
            })
    }
}

/// Resolve an optional form value for `field`.
///
/// `None` and blank text are absent; text that does not parse and values of
/// any other JSON type are [`TripValidationError::Unreadable`].
pub fn read<T: FromFormText>(
    value: Option<FormValue<T>>,
    field: TripField,
) -> Result<Option<T>, TripValidationError> {
    match value {
        None => Ok(None),
        Some(FormValue::Typed(typed)) => Ok(Some(typed)),
        Some(FormValue::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            T::from_form_text(trimmed)
                .map(Some)
                .ok_or(TripValidationError::Unreadable(field))
        }
        Some(FormValue::Other(_)) => Err(TripValidationError::Unreadable(field)),
    }
}

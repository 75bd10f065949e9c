use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("date must be YYYY-MM-DD text or a calendar value, got {0:?}")]
    Malformed(String),
}

/// A date as accepted by the remote API helpers: free text or a calendar value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput::Text(value)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(value: NaiveDate) -> Self {
        DateInput::Date(value)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(value: NaiveDateTime) -> Self {
        DateInput::DateTime(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput {
    fn from(value: DateTime<Tz>) -> Self {
        DateInput::DateTime(value.naive_local())
    }
}

/// Normalize a date to the `YYYY-MM-DD` form the API expects.
///
/// Text must start with `\d{4}-\d{2}-\d{2}`; anything after the first ten
/// characters (a time component, say) is dropped.
pub fn normalize_date(input: impl Into<DateInput>) -> Result<String, DateError> {
    match input.into() {
        DateInput::Date(date) => Ok(date.format(DATE_FORMAT).to_string()),
        DateInput::DateTime(datetime) => Ok(datetime.format(DATE_FORMAT).to_string()),
        DateInput::Text(text) => {
            if has_date_prefix(&text) {
                Ok(text[..DATE_LEN].to_string())
            } else {
                Err(DateError::Malformed(text))
            }
        }
    }
}

pub fn normalize_optional_date<D: Into<DateInput>>(
    input: Option<D>,
) -> Result<Option<String>, DateError> {
    input.map(|value| normalize_date(value)).transpose()
}

fn has_date_prefix(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() < DATE_LEN {
        return false;
    }
    bytes[..DATE_LEN].iter().enumerate().all(|(idx, byte)| match idx {
        4 | 7 => *byte == b'-',
        _ => byte.is_ascii_digit(),
    })
}

/// Deserialize an optional date the service may send with a time suffix.
pub(crate) fn deserialize_lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => {
            let normalized = normalize_date(text).map_err(serde::de::Error::custom)?;
            NaiveDate::parse_from_str(&normalized, DATE_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

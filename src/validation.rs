//! Insert validation. Each entity exposes a hand-written `validate` on its
//! `New*` type; the helpers here pull typed values out of an untyped field
//! map and normalize date-like input to calendar dates. Failures are
//! reported synchronously, no side effects happen before validation
//! completes.

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("field `{0}` must be a positive integer")]
    NotPositive(&'static str),
    #[error("field `{0}` is not a recognizable date")]
    UnparseableDate(&'static str),
}

impl ValidationError {
    /// Name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField(field) => field,
            ValidationError::WrongType { field, .. } => field,
            ValidationError::NotPositive(field) => field,
            ValidationError::UnparseableDate(field) => field,
        }
    }
}

pub(crate) fn require_text(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

pub(crate) fn optional_text(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

pub(crate) fn require_integer(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<i32, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(value) => integer(value, field),
    }
}

pub(crate) fn optional_integer(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<i32>, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => integer(value, field).map(Some),
    }
}

pub(crate) fn optional_positive(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<i32>, ValidationError> {
    match optional_integer(fields, field)? {
        None => Ok(None),
        Some(n) if n > 0 => Ok(Some(n)),
        Some(_) => Err(ValidationError::NotPositive(field)),
    }
}

pub(crate) fn require_date(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<NaiveDate, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(value) => coerce_date(value, field),
    }
}

pub(crate) fn optional_date(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<NaiveDate>, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => coerce_date(value, field).map(Some),
    }
}

fn integer(value: &Value, field: &'static str) -> Result<i32, ValidationError> {
    value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or(ValidationError::WrongType {
            field,
            expected: "a 32-bit integer",
        })
}

/// Accepts an ISO `YYYY-MM-DD` string, an RFC 3339 timestamp string, or
/// integer epoch milliseconds, normalized to a calendar date.
fn coerce_date(value: &Value, field: &'static str) -> Result<NaiveDate, ValidationError> {
    match value {
        Value::String(text) => {
            if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                return Ok(date);
            }
            DateTime::parse_from_rfc3339(text)
                .map(|timestamp| timestamp.date_naive())
                .map_err(|_| ValidationError::UnparseableDate(field))
        }
        Value::Number(millis) => millis
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|timestamp| timestamp.date_naive())
            .ok_or(ValidationError::UnparseableDate(field)),
        _ => Err(ValidationError::UnparseableDate(field)),
    }
}

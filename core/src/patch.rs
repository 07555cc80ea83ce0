//! Partial-update building blocks.
//!
//! # Design
//! A change set says, per field, whether to leave it alone, set it, or (for
//! nullable fields) clear it. Plain `Option<T>` covers fields the backend
//! never nulls; `Patch<T>` adds the third state. Unchanged fields are left
//! out of the serialized body entirely.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::error::ApiError;
use crate::types::ApiResponse;

/// Tri-state change for a nullable field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Unchanged,
    Set(T),
    Clear,
}

impl<T> Patch<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Patch::Unchanged)
    }

    /// `Set` for `Some`, `Clear` for `None`.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
        match self {
            Patch::Unchanged => Patch::Unchanged,
            Patch::Set(value) => Patch::Set(f(value)),
            Patch::Clear => Patch::Clear,
        }
    }

    pub fn try_map<U, E, F: FnOnce(T) -> Result<U, E>>(self, f: F) -> Result<Patch<U>, E> {
        Ok(match self {
            Patch::Unchanged => Patch::Unchanged,
            Patch::Set(value) => Patch::Set(f(value)?),
            Patch::Clear => Patch::Clear,
        })
    }

    /// Drop the change if applying it would leave `current` as it is.
    pub fn unless_equal<C>(self, current: Option<&C>, same: impl FnOnce(&T, &C) -> bool) -> Self {
        let unchanged = match (&self, current) {
            (Patch::Unchanged, _) => true,
            (Patch::Clear, None) => true,
            (Patch::Set(value), Some(current)) => same(value, current),
            _ => false,
        };
        if unchanged {
            Patch::Unchanged
        } else {
            self
        }
    }
}

// Only reached for fields not skipped via `is_unchanged`.
impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Set(value) => value.serialize(serializer),
            Patch::Unchanged | Patch::Clear => serializer.serialize_none(),
        }
    }
}

/// Result of an update call.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome<T> {
    /// The change set was empty; no request was sent.
    NoChanges,
    Updated(ApiResponse<T>),
}

impl<T> UpdateOutcome<T> {
    pub fn is_no_changes(&self) -> bool {
        matches!(self, UpdateOutcome::NoChanges)
    }

    pub fn into_response(self) -> Option<ApiResponse<T>> {
        match self {
            UpdateOutcome::NoChanges => None,
            UpdateOutcome::Updated(response) => Some(response),
        }
    }
}

/// A date supplied by the caller, either already typed or as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    At(DateTime<Utc>),
    Text(String),
}

impl DateInput {
    /// Parse into a UTC instant.
    ///
    /// Text may be RFC 3339 with any offset, or a bare `YYYY-MM-DD` which
    /// is taken as midnight UTC.
    pub fn to_utc(&self, field: &'static str) -> Result<DateTime<Utc>, ApiError> {
        match self {
            DateInput::At(at) => Ok(*at),
            DateInput::Text(text) => parse_instant(text).ok_or_else(|| ApiError::InvalidDate {
                field,
                value: text.clone(),
            }),
        }
    }

    /// Millisecond-precision `YYYY-MM-DDTHH:MM:SS.mmmZ`.
    pub fn to_utc_iso_string(&self, field: &'static str) -> Result<String, ApiError> {
        self.to_utc(field).map(format_instant)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(at: DateTime<Utc>) -> Self {
        DateInput::At(at)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

pub(crate) fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn format_instant(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Whether a coerced timestamp names the same instant as a stored one.
pub(crate) fn same_instant(coerced: &str, stored: &str) -> bool {
    match (parse_instant(coerced), parse_instant(stored)) {
        (Some(a), Some(b)) => a == b,
        _ => coerced == stored,
    }
}

pub(crate) fn keep_if_changed<T: PartialEq>(value: Option<T>, current: &T) -> Option<T> {
    value.filter(|value| value != current)
}

pub(crate) fn keep_if_other_instant(value: Option<String>, current: &str) -> Option<String> {
    value.filter(|value| !same_instant(value, current))
}

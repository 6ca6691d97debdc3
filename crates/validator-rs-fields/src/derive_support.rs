//! Runtime helpers for `#[derive(Schema)]` expansions. Not a public API.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use validator_rs_core::ValidatorError;

use crate::value::Value;

fn declaration(owner: &str, field: &str, what: &str, reason: impl std::fmt::Display) -> ValidatorError {
    ValidatorError::Declaration(format!("{owner}.{field}: invalid {what}: {reason}"))
}

/// Parses an ISO date bound.
pub fn date(owner: &str, field: &str, raw: &str) -> Result<NaiveDate, ValidatorError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| declaration(owner, field, "date", e))
}

/// Parses an ISO date-time bound, with or without the `T` separator.
pub fn datetime(owner: &str, field: &str, raw: &str) -> Result<NaiveDateTime, ValidatorError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|e| declaration(owner, field, "datetime", e))
}

/// Compiles a declared pattern.
pub fn pattern(owner: &str, field: &str, raw: &str) -> Result<Regex, ValidatorError> {
    Regex::new(raw).map_err(|e| declaration(owner, field, "pattern", e))
}

/// Builds the choice list of a string field.
pub fn choices(items: &[&str]) -> Vec<Value> {
    items.iter().copied().map(Value::from).collect()
}

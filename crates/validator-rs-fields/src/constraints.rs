//! The constraint evaluator.
//!
//! Pure functions that check an already-typed value against one declared
//! rule and report a [`ConstraintViolation`] naming the rule and the bound.
//! Field variants call them in a fixed order from their
//! [`built_in_validation`](crate::fields::Field::built_in_validation):
//! nullability first (short-circuiting everything else), then bounds, then
//! length, then pattern.
//!
//! Bounds are inclusive: a value equal to `min` or `max` passes. A value
//! that cannot be ordered against a bound (a NaN float) never passes.

use std::cmp::Ordering;
use std::fmt;

use regex::Regex;
use validator_rs_core::{ConstraintViolation, Rule};

use crate::value::Value;

/// Which vocabulary a range check reports with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    /// Numeric `min_value` / `max_value`.
    Value,
    /// Temporal `min_date` / `max_date`.
    Date,
}

impl RangeKind {
    const fn rules(self) -> (Rule, Rule) {
        match self {
            Self::Value => (Rule::MinValue, Rule::MaxValue),
            Self::Date => (Rule::MinDate, Rule::MaxDate),
        }
    }

    const fn noun(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Date => "date",
        }
    }
}

/// Formats a violation message as `Field `<name>` value <value> is <error> <bound>`.
pub fn violation_message(
    field: &str,
    value: impl fmt::Display,
    error: &str,
    bound: impl fmt::Display,
) -> String {
    format!("Field `{field}` value {value} is {error} {bound}")
        .trim_end()
        .to_string()
}

/// Rejects the null sentinel unless the field is nullable.
pub fn check_nullable(field: &str, nullable: bool, value: &Value) -> Result<(), ConstraintViolation> {
    if value.is_null() && !nullable {
        return Err(ConstraintViolation::new(
            field,
            Rule::Nullable,
            format!("{field} field is not nullable"),
        ));
    }
    Ok(())
}

/// Checks `min <= value <= max` for any ordered value.
pub fn check_range<T>(
    field: &str,
    value: &T,
    min: Option<&T>,
    max: Option<&T>,
    kind: RangeKind,
) -> Result<(), ConstraintViolation>
where
    T: PartialOrd + fmt::Display,
{
    let (min_rule, max_rule) = kind.rules();
    let noun = kind.noun();

    if let Some(min) = min {
        if !matches!(value.partial_cmp(min), Some(Ordering::Greater | Ordering::Equal)) {
            return Err(ConstraintViolation::new(
                field,
                min_rule,
                violation_message(field, value, &format!("smaller than min {noun}"), min),
            ));
        }
    }

    if let Some(max) = max {
        if !matches!(value.partial_cmp(max), Some(Ordering::Less | Ordering::Equal)) {
            return Err(ConstraintViolation::new(
                field,
                max_rule,
                violation_message(field, value, &format!("greater than max {noun}"), max),
            ));
        }
    }

    Ok(())
}

/// Checks the character count of a string against inclusive length bounds.
pub fn check_length(
    field: &str,
    value: &str,
    min_length: Option<usize>,
    max_length: Option<usize>,
) -> Result<(), ConstraintViolation> {
    let length = value.chars().count();

    if let Some(min) = min_length {
        if length < min {
            return Err(ConstraintViolation::new(
                field,
                Rule::MinLength,
                violation_message(field, value, "shorter than min length", min),
            ));
        }
    }

    if let Some(max) = max_length {
        if length > max {
            return Err(ConstraintViolation::new(
                field,
                Rule::MaxLength,
                violation_message(field, value, "longer than max length", max),
            ));
        }
    }

    Ok(())
}

/// Checks a string against a regular expression.
pub fn check_pattern(field: &str, value: &str, pattern: &Regex) -> Result<(), ConstraintViolation> {
    if pattern.is_match(value) {
        Ok(())
    } else {
        Err(ConstraintViolation::new(
            field,
            Rule::Pattern,
            violation_message(field, value, "not a valid pattern", ""),
        ))
    }
}

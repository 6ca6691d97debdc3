//! Custom field validators.
//!
//! Validators run after a field's built-in rules, in the order they were
//! attached, and only see coerced, non-null values. The first failure wins.

use std::fmt;

use regex::Regex;
use validator_rs_core::ValidationError;

use crate::value::Value;

/// A trait for validating field values.
///
/// Validators are attached with [`Field::validator`](crate::fields::Field::validator).
/// An error whose `field` is unset is attributed to the owning field.
///
/// # Examples
///
/// ```
/// use validator_rs_fields::validators::{ChoicesValidator, Validator};
/// use validator_rs_fields::Value;
///
/// let v = ChoicesValidator::new(vec![Value::from("red"), Value::from("blue")]);
/// assert!(v.validate(&Value::from("red")).is_ok());
/// assert!(v.validate(&Value::from("green")).is_err());
/// ```
pub trait Validator: Send + Sync + fmt::Debug {
    /// Validates the given value, returning an error if invalid.
    fn validate(&self, value: &Value) -> Result<(), ValidationError>;

    /// Returns a human-readable name for this validator.
    fn name(&self) -> &str;
}

/// Wraps a closure as a named validator.
pub struct FnValidator<F> {
    name: String,
    func: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&Value) -> Result<(), ValidationError> + Send + Sync,
{
    /// Creates a validator called `name` from `func`.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator").field("name", &self.name).finish()
    }
}

impl<F> Validator for FnValidator<F>
where
    F: Fn(&Value) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        (self.func)(value)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Validates that a string value matches a regular expression.
///
/// Non-string values are ignored.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    regex: Regex,
    message: String,
}

impl RegexValidator {
    /// Creates a validator for `regex` that fails with `message`.
    pub fn new(regex: Regex, message: impl Into<String>) -> Self {
        Self {
            regex,
            message: message.into(),
        }
    }
}

impl Validator for RegexValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        if let Value::String(s) = value {
            if !self.regex.is_match(s) {
                return Err(ValidationError::new(self.message.clone(), "invalid")
                    .with_param("pattern", self.regex.as_str()));
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "RegexValidator"
    }
}

/// Validates that a value is one of a fixed set of choices.
#[derive(Debug, Clone)]
pub struct ChoicesValidator {
    choices: Vec<Value>,
}

impl ChoicesValidator {
    /// Creates a validator accepting exactly `choices`.
    pub fn new(choices: Vec<Value>) -> Self {
        Self { choices }
    }
}

impl Validator for ChoicesValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        if self.choices.contains(value) {
            Ok(())
        } else {
            Err(ValidationError::new(
                format!("Select a valid choice. {value} is not one of the available choices."),
                "invalid_choice",
            )
            .with_param("value", value.to_string()))
        }
    }

    fn name(&self) -> &str {
        "ChoicesValidator"
    }
}

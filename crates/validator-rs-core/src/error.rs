//! Core error types for the validator-rs workspace.
//!
//! Failures fall into two groups. The recoverable kinds, collected in
//! [`FieldError`], describe why a single value was rejected:
//!
//! - [`ConversionError`] - the raw value could not be coerced to the field type
//! - [`ConstraintViolation`] - the coerced value broke a declared rule
//! - [`ValidationError`] - a user hook or custom validator rejected the value
//!
//! A form cycle catches these and records them; direct assignment returns
//! them to the caller. [`ValidatorError`] is the top-level error and also
//! covers programmer mistakes (declaration errors, unknown attributes) and
//! configuration failures.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Represents a validation error raised by user code.
///
/// Hooks and custom validators return this to reject a value. When raised
/// inside a form cycle the error is recorded under `field` if set, otherwise
/// under the field being cleaned (or the non-field key for form-level hooks).
///
/// # Examples
///
/// ```
/// use validator_rs_core::error::ValidationError;
///
/// let err = ValidationError::new("Invalid name for audience", "invalid");
/// assert_eq!(err.to_string(), "Invalid name for audience");
///
/// let err = ValidationError::invalid("Passwords do not match").for_field("password2");
/// assert_eq!(err.field.as_deref(), Some("password2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the type of validation failure (e.g. "invalid").
    pub code: String,
    /// Additional parameters providing context for the error message.
    pub params: HashMap<String, String>,
    /// The field this error belongs to, if any.
    pub field: Option<String>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
            field: None,
        }
    }

    /// Creates a `ValidationError` with the generic `invalid` code.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(message, "invalid")
    }

    /// Attaches the error to a named field.
    #[must_use]
    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// A raw value could not be coerced into a field's target type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Field `{field}` value {raw} cannot be converted to {target}: {reason}")]
pub struct ConversionError {
    /// The field being assigned.
    pub field: String,
    /// The raw value, rendered for display.
    pub raw: String,
    /// The target type name (e.g. "int", "datetime").
    pub target: String,
    /// Why the conversion failed.
    pub reason: String,
}

impl ConversionError {
    /// Creates a new `ConversionError`.
    pub fn new(
        field: impl Into<String>,
        raw: impl fmt::Display,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            raw: raw.to_string(),
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// The declared rule a value violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// A null value was assigned to a non-nullable field.
    Nullable,
    /// The value is below `min_value`.
    MinValue,
    /// The value is above `max_value`.
    MaxValue,
    /// The value is shorter than `min_length`.
    MinLength,
    /// The value is longer than `max_length`.
    MaxLength,
    /// The value does not match the field's pattern.
    Pattern,
    /// The date is before `min_date`.
    MinDate,
    /// The date is after `max_date`.
    MaxDate,
    /// A rule introduced by a custom field.
    Custom(&'static str),
}

impl Rule {
    /// Returns the stable code for this rule.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Nullable => "nullable",
            Self::MinValue => "min_value",
            Self::MaxValue => "max_value",
            Self::MinLength => "min_length",
            Self::MaxLength => "max_length",
            Self::Pattern => "pattern",
            Self::MinDate => "min_date",
            Self::MaxDate => "max_date",
            Self::Custom(code) => *code,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A coerced value failed one of the field's declared rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ConstraintViolation {
    /// The field being assigned.
    pub field: String,
    /// The violated rule.
    pub rule: Rule,
    /// The human-readable message.
    pub message: String,
}

impl ConstraintViolation {
    /// Creates a new `ConstraintViolation`.
    pub fn new(field: impl Into<String>, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule,
            message: message.into(),
        }
    }
}

/// A recoverable failure of one value.
///
/// These are the errors a form cycle records in its error mapping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The raw value could not be coerced.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The coerced value broke a declared rule.
    #[error(transparent)]
    Constraint(#[from] ConstraintViolation),

    /// A hook or custom validator rejected the value.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl FieldError {
    /// Returns the name of the field this error refers to, if known.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Conversion(e) => Some(&e.field),
            Self::Constraint(e) => Some(&e.field),
            Self::Validation(e) => e.field.as_deref(),
        }
    }

    /// Returns a short code for the error.
    pub fn code(&self) -> &str {
        match self {
            Self::Conversion(_) => "conversion",
            Self::Constraint(e) => e.rule.code(),
            Self::Validation(e) => &e.code,
        }
    }

    /// Returns `true` for a [`ConversionError`].
    pub const fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion(_))
    }

    /// Returns `true` for a [`ConstraintViolation`].
    pub const fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint(_))
    }

    /// Returns `true` for a [`ValidationError`].
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// The primary error type for the validator-rs workspace.
#[derive(Error, Debug)]
pub enum ValidatorError {
    // ── Value failures ───────────────────────────────────────────────

    /// A value was rejected while assigning a field.
    #[error("Field `{field}`: {source}")]
    Field {
        /// The field being assigned.
        field: String,
        /// The underlying failure.
        source: FieldError,
    },

    // ── Programmer errors ────────────────────────────────────────────

    /// A field or form was declared incorrectly.
    #[error("Declaration error: {0}")]
    Declaration(String),

    /// An attribute name that the owner type does not declare.
    #[error("{owner} has no field `{field}`")]
    UnknownField {
        /// The owner type name.
        owner: String,
        /// The requested attribute.
        field: String,
    },

    /// A non-nullable field was read before any value was assigned.
    #[error("Field `{0}` has no value")]
    Unset(String),

    /// A form was validated without being bound to data.
    #[error("No data was provided for {0}")]
    Unbound(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FieldError> for ValidatorError {
    fn from(source: FieldError) -> Self {
        Self::Field {
            field: source.field().unwrap_or_default().to_string(),
            source,
        }
    }
}

impl ValidatorError {
    /// Returns the recoverable field error, if this is one.
    pub const fn as_field_error(&self) -> Option<&FieldError> {
        match self {
            Self::Field { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Returns `true` if this error signals programmer misuse rather than bad input.
    pub const fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            Self::Declaration(_) | Self::UnknownField { .. } | Self::Unbound(_)
        )
    }
}

/// A convenience type alias for `Result<T, ValidatorError>`.
pub type ValidatorResult<T> = Result<T, ValidatorError>;

use std::sync::OnceLock;

use regex::Regex;
use validator_rs_core::ConstraintViolation;

use super::{Field, FieldKind, FieldSpec};
use crate::constraints;
use crate::value::Value;

const EMAIL_PATTERN: &str = r"(?i)^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$";

const URL_PATTERN: &str = r"(?i)^(?:http|ftp)s?://(?:(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+(?:[a-z]{2,6}\.?|[a-z0-9-]{2,}\.?)|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("valid email regex"))
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(URL_PATTERN).expect("valid url regex"))
}

/// A string with optional length bounds and a pattern.
///
/// Lengths count characters, not bytes.
///
/// ```
/// use validator_rs_fields::fields::{Field, StringField};
/// use validator_rs_fields::Value;
///
/// let mut email = StringField::email();
/// email.bind("Audience", "email").unwrap();
///
/// assert!(email.validate(Value::from("test.valid1@test.com")).is_ok());
/// assert!(email.validate(Value::from("invalid4test.com")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct StringField {
    spec: FieldSpec,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Regex>,
}

impl StringField {
    /// Creates an unconstrained string field.
    pub fn new() -> Self {
        Self {
            spec: FieldSpec::new(FieldKind::String),
            min_length: None,
            max_length: None,
            pattern: None,
        }
    }

    /// Creates a field accepting e-mail addresses.
    pub fn email() -> Self {
        Self::new().pattern(email_regex().clone())
    }

    /// Creates a field accepting http(s) and ftp(s) URLs.
    pub fn url() -> Self {
        Self::new().pattern(url_regex().clone())
    }

    /// Sets the inclusive minimum length.
    #[must_use]
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Sets the inclusive maximum length.
    #[must_use]
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Sets the pattern the whole value must match.
    #[must_use]
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

impl Default for StringField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for StringField {
    fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    fn spec_mut(&mut self) -> &mut FieldSpec {
        &mut self.spec
    }

    fn built_in_validation(&self, value: &Value) -> Result<(), ConstraintViolation> {
        let Some(s) = value.as_str() else {
            return Ok(());
        };
        constraints::check_length(self.name(), s, self.min_length, self.max_length)?;
        if let Some(pattern) = &self.pattern {
            constraints::check_pattern(self.name(), s, pattern)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator_rs_core::Rule;

    fn bound(mut field: StringField, name: &str) -> StringField {
        field.bind("Audience", name).unwrap();
        field
    }

    #[test]
    fn test_length_bounds() {
        let field = bound(StringField::new().min_length(1).max_length(5), "name");
        assert!(field.validate(Value::from("Test")).is_ok());

        let err = field.validate(Value::from("")).unwrap_err();
        assert_eq!(err.code(), Rule::MinLength.code());

        let err = field.validate(Value::from("test string")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field `name` value test string is longer than max length 5"
        );
    }

    #[test]
    fn test_pattern() {
        let field = bound(
            StringField::new().pattern(Regex::new(r"^[A-Z][a-z]+$").unwrap()),
            "name",
        );
        assert!(field.validate(Value::from("Alice")).is_ok());
        let err = field.validate(Value::from("alice")).unwrap_err();
        assert_eq!(err.code(), Rule::Pattern.code());
    }

    #[test]
    fn test_length_is_checked_before_pattern() {
        let field = bound(
            StringField::new()
                .max_length(3)
                .pattern(Regex::new(r"^\d+$").unwrap()),
            "code",
        );
        let err = field.validate(Value::from("abcd")).unwrap_err();
        assert_eq!(err.code(), Rule::MaxLength.code());
    }

    #[test]
    fn test_email() {
        let field = bound(StringField::email(), "email");
        for valid in ["test.valid1@test.com", "valid2@test.com", "a+b@sub.example.org"] {
            assert!(field.validate(Value::from(valid)).is_ok(), "{valid}");
        }
        for invalid in [
            ".invalid1@test.com",
            "invalid2@test.com.",
            "@invalid3@test.com",
            "invalid4test.com",
            "invalid5@test",
        ] {
            assert!(field.validate(Value::from(invalid)).is_err(), "{invalid}");
        }
    }

    #[test]
    fn test_url() {
        let field = bound(StringField::url(), "site");
        for valid in [
            "https://test.com",
            "http://test.com:8080",
            "ftp://files.example.org/pub",
            "http://localhost:8000/",
            "http://127.0.0.1",
        ] {
            assert!(field.validate(Value::from(valid)).is_ok(), "{valid}");
        }
        for invalid in ["http://test", "http:/test.com:8080", "test.com:8000"] {
            assert!(field.validate(Value::from(invalid)).is_err(), "{invalid}");
        }
    }

    #[test]
    fn test_forced_string_from_int() {
        let field = bound(StringField::new().max_length(2).force_conversion(true), "code");
        assert_eq!(field.validate(Value::Int(42)).unwrap(), Value::from("42"));
        assert!(field.validate(Value::Int(420)).unwrap_err().is_constraint());
    }
}

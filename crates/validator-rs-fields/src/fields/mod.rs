//! Field definitions: the attribute-interception unit of the engine.
//!
//! A [`Field`] owns its [`FieldSpec`] (identity, nullability, coercion
//! policy, custom validators) and a per-variant rule set. It never owns a
//! value: values live in the [`FieldStore`] of each host instance and are
//! only written through [`Field::set`], which coerces, checks, and then
//! stores atomically.
//!
//! Variants:
//!
//! - [`NumericField`] ([`IntField`], [`FloatField`]) - `min_value` / `max_value`
//! - [`StringField`] - `min_length` / `max_length` / pattern, plus email and URL shapes
//! - [`TemporalField`] ([`DateField`], [`DateTimeField`]) - `min_date` / `max_date` / input formats
//! - [`BooleanField`] - no constraints beyond nullability
//!
//! A custom field embeds a [`FieldSpec`] and implements
//! [`built_in_validation`](Field::built_in_validation):
//!
//! ```
//! use validator_rs_core::{ConstraintViolation, Rule};
//! use validator_rs_fields::fields::{Field, FieldKind, FieldSpec};
//! use validator_rs_fields::{FieldStore, Value};
//!
//! #[derive(Debug, Clone)]
//! struct EvenField {
//!     spec: FieldSpec,
//! }
//!
//! impl Field for EvenField {
//!     fn spec(&self) -> &FieldSpec {
//!         &self.spec
//!     }
//!
//!     fn spec_mut(&mut self) -> &mut FieldSpec {
//!         &mut self.spec
//!     }
//!
//!     fn built_in_validation(&self, value: &Value) -> Result<(), ConstraintViolation> {
//!         match value.as_int() {
//!             Some(n) if n % 2 != 0 => Err(ConstraintViolation::new(
//!                 self.name(),
//!                 Rule::Custom("even"),
//!                 format!("Field `{}` value {n} is not even", self.name()),
//!             )),
//!             _ => Ok(()),
//!         }
//!     }
//! }
//!
//! let mut field = EvenField { spec: FieldSpec::new(FieldKind::Int) };
//! field.bind("Counter", "step").unwrap();
//!
//! let mut store = FieldStore::new();
//! assert!(field.set(&mut store, Value::Int(3)).is_err());
//! field.set(&mut store, Value::Int(4)).unwrap();
//! assert_eq!(field.get(&store).unwrap(), Value::Int(4));
//! ```

mod boolean;
mod numeric;
mod string;
mod temporal;

use std::fmt;
use std::sync::Arc;

use validator_rs_core::{ConstraintViolation, FieldError, ValidatorError};

use crate::coercion::{self, Conversion};
use crate::constraints;
use crate::store::FieldStore;
use crate::validators::Validator;
use crate::value::Value;

pub use boolean::BooleanField;
pub use numeric::{FloatField, IntField, Numeric, NumericField};
pub use string::StringField;
pub use temporal::{DateField, DateTimeField, Temporal, TemporalField};

/// The target type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// 64-bit integers.
    Int,
    /// 64-bit floats.
    Float,
    /// UTF-8 strings.
    String,
    /// Booleans.
    Bool,
    /// Dates without time.
    Date,
    /// Dates with time, no timezone.
    DateTime,
    /// Any value; no type check and no default conversion.
    Any,
}

impl FieldKind {
    /// Returns the type name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Any => "any",
        }
    }

    /// Returns `true` if `value` already has this type.
    ///
    /// The null sentinel matches no kind; callers handle it separately.
    pub const fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Any, _)
                | (Self::Int, Value::Int(_))
                | (Self::Float, Value::Float(_))
                | (Self::String, Value::String(_))
                | (Self::Bool, Value::Bool(_))
                | (Self::Date, Value::Date(_))
                | (Self::DateTime, Value::DateTime(_))
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The declaration-time configuration shared by every field variant.
///
/// The identity (`owner` + `name`) is fixed by [`Field::bind`] exactly once.
#[derive(Clone)]
pub struct FieldSpec {
    name: Option<String>,
    owner: Option<String>,
    /// The target type.
    pub kind: FieldKind,
    /// Whether the null sentinel is accepted.
    pub nullable: bool,
    /// Whether mismatched raw values go through the kind's default conversion.
    pub force_conversion: bool,
    /// A user conversion, preferred over `force_conversion`.
    pub custom_conversion: Option<Conversion>,
    /// The value `get` returns before anything was assigned.
    pub default: Option<Value>,
    /// Additional validators, run in order after the built-in rules.
    pub validators: Vec<Arc<dyn Validator>>,
}

impl FieldSpec {
    /// Creates an unbound spec for the given kind: not nullable, type-strict.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            name: None,
            owner: None,
            kind,
            nullable: false,
            force_conversion: false,
            custom_conversion: None,
            default: None,
            validators: Vec::new(),
        }
    }

    /// Returns the bound name, or `<unbound>` before binding.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unbound>")
    }

    /// Returns the owner type name, if bound.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Returns `true` once the spec has been bound to a name.
    pub const fn is_bound(&self) -> bool {
        self.name.is_some()
    }

    fn bind(&mut self, owner: &str, name: &str) -> Result<(), ValidatorError> {
        if name.is_empty() {
            return Err(ValidatorError::Declaration(format!(
                "{owner} declares a field with an empty name"
            )));
        }
        match &self.name {
            Some(bound) if bound != name => Err(ValidatorError::Declaration(format!(
                "field `{bound}` of {} cannot be rebound as `{name}` on {owner}",
                self.owner().unwrap_or("<unknown>")
            ))),
            Some(_) => Ok(()),
            None => {
                self.name = Some(name.to_string());
                self.owner = Some(owner.to_string());
                Ok(())
            }
        }
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .field("force_conversion", &self.force_conversion)
            .field("custom_conversion", &self.custom_conversion.is_some())
            .field("default", &self.default)
            .field("validators", &self.validators)
            .finish()
    }
}

/// The capability set every field variant implements.
///
/// Only [`spec`](Field::spec), [`spec_mut`](Field::spec_mut), and
/// [`built_in_validation`](Field::built_in_validation) are required; variants
/// with their own parsing rules also override [`convert`](Field::convert).
pub trait Field: Send + Sync + fmt::Debug {
    /// Returns the field's declaration.
    fn spec(&self) -> &FieldSpec;

    /// Returns the field's declaration mutably (declaration time only).
    fn spec_mut(&mut self) -> &mut FieldSpec;

    /// Checks an already-typed, non-null value against the variant's rules.
    fn built_in_validation(&self, value: &Value) -> Result<(), ConstraintViolation>;

    /// The default conversion used under `force_conversion`.
    fn convert(&self, raw: &Value) -> Result<Value, String> {
        coercion::default_conversion(self.spec().kind, raw)
    }

    /// Returns the bound attribute name.
    fn name(&self) -> &str {
        self.spec().name()
    }

    /// Fixes the field's identity. Rebinding to a different name fails.
    fn bind(&mut self, owner: &str, name: &str) -> Result<(), ValidatorError> {
        self.spec_mut().bind(owner, name)
    }

    /// Applies the coercion policy to a raw value.
    fn coerce(&self, raw: Value) -> Result<Value, FieldError> {
        coercion::coerce(self, raw)
    }

    /// Coerces and checks a raw value without storing it.
    ///
    /// Order: coercion, nullability, built-in rules, custom validators.
    fn validate(&self, raw: Value) -> Result<Value, FieldError> {
        let value = self.coerce(raw)?;
        constraints::check_nullable(self.name(), self.spec().nullable, &value)?;
        if value.is_null() {
            return Ok(value);
        }

        self.built_in_validation(&value)?;

        for validator in &self.spec().validators {
            validator.validate(&value).map_err(|mut e| {
                if e.field.is_none() {
                    e.field = Some(self.name().to_string());
                }
                FieldError::Validation(e)
            })?;
        }

        Ok(value)
    }

    /// Reads the field from an instance's store.
    ///
    /// Falls back to the declared default, then to `Null` for nullable
    /// fields; a non-nullable field that was never set is an error.
    fn get(&self, store: &FieldStore) -> Result<Value, ValidatorError> {
        if let Some(value) = store.get(self.name()) {
            return Ok(value.clone());
        }
        if let Some(default) = &self.spec().default {
            return Ok(default.clone());
        }
        if self.spec().nullable {
            Ok(Value::Null)
        } else {
            Err(ValidatorError::Unset(self.name().to_string()))
        }
    }

    /// Validates `raw` and stores the result. On failure the store is untouched.
    fn set(&self, store: &mut FieldStore, raw: Value) -> Result<(), FieldError> {
        let value = self.validate(raw)?;
        tracing::trace!(field = self.name(), value = %value, "field assigned");
        store.insert(self.name(), value);
        Ok(())
    }

    // ── Builder options ──────────────────────────────────────────────

    /// Sets whether the null sentinel is accepted.
    #[must_use]
    fn nullable(mut self, nullable: bool) -> Self
    where
        Self: Sized,
    {
        self.spec_mut().nullable = nullable;
        self
    }

    /// Enables the kind's default conversion for mismatched raw values.
    #[must_use]
    fn force_conversion(mut self, force: bool) -> Self
    where
        Self: Sized,
    {
        self.spec_mut().force_conversion = force;
        self
    }

    /// Sets a user conversion; its errors propagate as returned.
    #[must_use]
    fn custom_conversion<C>(mut self, conversion: C) -> Self
    where
        Self: Sized,
        C: Fn(&Value) -> Result<Value, FieldError> + Send + Sync + 'static,
    {
        self.spec_mut().custom_conversion = Some(Arc::new(conversion));
        self
    }

    /// Sets the value returned by `get` before any assignment.
    #[must_use]
    fn default_value(mut self, value: impl Into<Value>) -> Self
    where
        Self: Sized,
    {
        self.spec_mut().default = Some(value.into());
        self
    }

    /// Appends a custom validator.
    #[must_use]
    fn validator<V>(mut self, validator: V) -> Self
    where
        Self: Sized,
        V: Validator + 'static,
    {
        self.spec_mut().validators.push(Arc::new(validator));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::FnValidator;
    use validator_rs_core::{Rule, ValidationError};

    fn bound<F: Field>(mut field: F, name: &str) -> F {
        field.bind("Audience", name).unwrap();
        field
    }

    #[test]
    fn test_kind_matches() {
        assert!(FieldKind::Int.matches(&Value::Int(1)));
        assert!(!FieldKind::Int.matches(&Value::Float(1.0)));
        assert!(!FieldKind::Float.matches(&Value::Int(1)));
        assert!(!FieldKind::String.matches(&Value::Null));
        assert!(FieldKind::Any.matches(&Value::Null));
    }

    #[test]
    fn test_bind_once() {
        let mut field = IntField::new();
        assert!(!field.spec().is_bound());
        assert_eq!(field.name(), "<unbound>");

        field.bind("Audience", "age").unwrap();
        assert_eq!(field.name(), "age");
        assert_eq!(field.spec().owner(), Some("Audience"));

        // Same name is idempotent, a different name is a declaration error.
        field.bind("Audience", "age").unwrap();
        let err = field.bind("Audience", "years").unwrap_err();
        assert!(matches!(err, ValidatorError::Declaration(_)));
        assert_eq!(field.name(), "age");
    }

    #[test]
    fn test_bind_empty_name() {
        let mut field = StringField::new();
        assert!(field.bind("Audience", "").is_err());
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let field = bound(IntField::new(), "age");
        let mut store = FieldStore::new();
        field.set(&mut store, Value::Int(30)).unwrap();
        assert_eq!(field.get(&store).unwrap(), Value::Int(30));
    }

    #[test]
    fn test_set_failure_keeps_previous_value() {
        let field = bound(IntField::new().min_value(18), "age");
        let mut store = FieldStore::new();
        field.set(&mut store, Value::Int(20)).unwrap();

        assert!(field.set(&mut store, Value::Int(2)).is_err());
        assert!(field.set(&mut store, Value::from("20")).is_err());
        assert_eq!(field.get(&store).unwrap(), Value::Int(20));
    }

    #[test]
    fn test_get_unset() {
        let field = bound(IntField::new(), "age");
        let store = FieldStore::new();
        assert!(matches!(field.get(&store), Err(ValidatorError::Unset(_))));

        let field = bound(IntField::new().nullable(true), "age");
        assert_eq!(field.get(&store).unwrap(), Value::Null);

        let field = bound(IntField::new().default_value(21), "age");
        assert_eq!(field.get(&store).unwrap(), Value::Int(21));
    }

    #[test]
    fn test_null_handling() {
        let strict = bound(StringField::new().min_length(3), "name");
        let err = strict.validate(Value::Null).unwrap_err();
        assert!(matches!(
            err,
            FieldError::Constraint(ConstraintViolation { rule: Rule::Nullable, .. })
        ));

        // Nullable fields skip the remaining rules for null.
        let lenient = bound(StringField::new().min_length(3).nullable(true), "name");
        assert_eq!(lenient.validate(Value::Null).unwrap(), Value::Null);

        let mut store = FieldStore::new();
        lenient.set(&mut store, Value::Null).unwrap();
        assert_eq!(lenient.get(&store).unwrap(), Value::Null);
    }

    #[test]
    fn test_custom_validators_run_after_built_ins() {
        let field = bound(
            IntField::new()
                .max_value(100)
                .validator(FnValidator::new("odd", |v: &Value| {
                    if v.as_int().is_some_and(|n| n % 2 == 0) {
                        Err(ValidationError::new("must be odd", "odd"))
                    } else {
                        Ok(())
                    }
                })),
            "lucky",
        );

        assert!(field.validate(Value::Int(7)).is_ok());

        let err = field.validate(Value::Int(8)).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("lucky"));

        // The built-in bound fires before the validator sees the value.
        let err = field.validate(Value::Int(200)).unwrap_err();
        assert!(err.is_constraint());
    }

    #[test]
    fn test_spec_debug_hides_closures() {
        let field = IntField::new().custom_conversion(|_| Ok(Value::Int(0)));
        let rendered = format!("{:?}", field.spec());
        assert!(rendered.contains("custom_conversion: true"));
    }
}

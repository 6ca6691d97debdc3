//! # validator-rs
//!
//! Declarative field validation for Rust.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `validator-rs` to get everything, or depend on
//! individual crates for finer-grained control.
//!
//! ```
//! use validator_rs::prelude::*;
//!
//! let class = FormClass::builder("Audience")
//!     .field("name", StringField::new().min_length(1).max_length(5))
//!     .field("age", IntField::new().min_value(18).force_conversion(true))
//!     .build()
//!     .unwrap();
//!
//! let mut form = Form::bound(&class, [("name", Value::from("Ann")), ("age", Value::from("19"))]);
//! assert!(form.is_valid());
//! assert_eq!(form.cleaned_data().get("age"), Some(&Value::Int(19)));
//! ```

/// Errors, settings, and logging setup.
pub use validator_rs_core as core;

/// Values, fields, coercion, constraints, and schemas.
pub use validator_rs_fields as fields;

/// `#[derive(Schema)]`.
#[cfg(feature = "macros")]
pub use validator_rs_macros as macros;

/// Form classes and the clean cycle.
#[cfg(feature = "forms")]
pub use validator_rs_forms as forms;

pub use chrono;
pub use regex;
pub use serde_json;
pub use tracing;

/// The types most programs need.
pub mod prelude {
    pub use validator_rs_core::{
        ConstraintViolation, ConversionError, FieldError, Rule, Settings, ValidationError,
        ValidatorError, SETTINGS,
    };
    pub use validator_rs_fields::{
        BooleanField, ChoicesValidator, DateField, DateTimeField, Declared, Field, FieldKind,
        FloatField, FnValidator, FromValue, Host, IntField, Record, RegexValidator, Schema,
        StringField, Validator, Value, ValueSource,
    };

    #[cfg(feature = "forms")]
    pub use validator_rs_forms::{
        CleanState, CleanedData, ErrorDict, Form, FormClass, NON_FIELD_ERRORS,
    };

    #[cfg(feature = "macros")]
    pub use validator_rs_macros::Schema;
}

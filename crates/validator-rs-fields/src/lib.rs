//! # validator-rs-fields
//!
//! The field engine. A [`Field`](fields::Field) declares the type, coercion
//! policy, and rules of one attribute; a [`Schema`](schema::Schema) groups the
//! fields of a type; every write through a [`Host`](schema::Host) is coerced
//! and checked before it is stored.
//!
//! ## Module Overview
//!
//! - [`value`] - The dynamic [`Value`](value::Value) enum
//! - [`fields`] - The [`Field`](fields::Field) trait and its variants
//! - [`coercion`] - Strict, forced, and custom conversion of raw values
//! - [`constraints`] - Range, length, pattern, and nullability checks
//! - [`validators`] - Pluggable custom validators
//! - [`schema`] - Schemas, hosts, and records
//! - [`store`] - Per-instance value storage

// Builder methods return `Self` and are self-documenting.
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::doc_markdown)]

pub mod coercion;
pub mod constraints;
pub mod fields;
pub mod schema;
pub mod store;
pub mod validators;
pub mod value;

#[doc(hidden)]
pub mod derive_support;

pub use fields::{
    BooleanField, DateField, DateTimeField, Field, FieldKind, FieldSpec, FloatField, IntField,
    NumericField, StringField, TemporalField,
};
pub use schema::{Declared, Host, Record, Schema, SchemaBuilder};
pub use store::{extract, FieldStore, ValueSource};
pub use validators::{ChoicesValidator, FnValidator, RegexValidator, Validator};
pub use value::{FromValue, Value};

#[doc(hidden)]
pub use validator_rs_core as __core;

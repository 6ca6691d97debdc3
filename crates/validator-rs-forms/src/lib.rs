//! # validator-rs-forms
//!
//! Form clean cycles for validator-rs. A [`FormClass`] declares an ordered
//! set of fields plus per-field and whole-form clean hooks; a [`Form`] binds
//! raw input to it and runs the multi-phase cycle described in
//! [`validation`], producing either [`CleanedData`] or an [`ErrorDict`].
//!
//! ## Module Overview
//!
//! - [`form`] - [`FormClass`], its builder, [`Form`], and [`CleanState`]
//! - [`validation`] - The clean-cycle phases
//! - [`data`] - [`CleanedData`] and [`ErrorDict`]

#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::needless_pass_by_value)]

pub mod data;
pub mod form;
pub mod validation;

pub use data::{CleanedData, ErrorDict, NON_FIELD_ERRORS};
pub use form::{CleanState, FieldHook, Form, FormClass, FormClassBuilder, FormHook};

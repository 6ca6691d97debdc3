//! # validator-rs-core
//!
//! Core error types, settings, and logging for the validator-rs workspace.
//! This crate has no dependency on the field engine and provides the
//! foundation every other crate builds on.
//!
//! ## Modules
//!
//! - [`error`] - Conversion, constraint, validation, and declaration errors
//! - [`settings`] - Engine settings and global configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{
    ConstraintViolation, ConversionError, FieldError, Rule, ValidationError, ValidatorError,
    ValidatorResult,
};
pub use settings::{Settings, SETTINGS};

//! Settings for the validator-rs engine.
//!
//! This module provides the [`Settings`] struct, which holds engine-wide
//! configuration, and [`LazySettings`], a globally-accessible, lazily-initialized
//! settings instance. Fields read their default input formats from here.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::ValidatorError;

/// The complete set of engine settings.
///
/// # Examples
///
/// ```
/// use validator_rs_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.log_level, "info");
/// assert!(!settings.raise_on_error);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level filter (e.g. "info", "debug", "validator_rs_forms=trace").
    pub log_level: String,

    // ── Coercion ─────────────────────────────────────────────────────

    /// `chrono` formats tried, in order, when converting strings to dates.
    pub date_input_formats: Vec<String>,
    /// `chrono` formats tried, in order, when converting strings to date-times.
    pub datetime_input_formats: Vec<String>,

    // ── Forms ────────────────────────────────────────────────────────

    /// Default for new form classes: stop the clean cycle at the first failure.
    pub raise_on_error: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            date_input_formats: vec![
                "%Y-%m-%d".to_string(),
                "%m/%d/%Y".to_string(),
                "%m/%d/%y".to_string(),
                "%b %d %Y".to_string(),
                "%d %B %Y".to_string(),
            ],
            datetime_input_formats: vec![
                "%Y-%m-%d %H:%M:%S%.f".to_string(),
                "%Y-%m-%dT%H:%M:%S%.f".to_string(),
                "%Y-%m-%d %H:%M".to_string(),
                "%Y-%m-%dT%H:%M".to_string(),
                "%m/%d/%Y %H:%M:%S".to_string(),
                "%m/%d/%Y %H:%M".to_string(),
            ],
            raise_on_error: false,
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup. Readers that
/// can live with defaults use [`get_or_default`](LazySettings::get_or_default).
pub struct LazySettings {
    inner: OnceLock<Settings>,
    fallback: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
            fallback: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called at most once.
    pub fn configure(&self, settings: Settings) -> Result<(), ValidatorError> {
        self.inner.set(settings).map_err(|_| {
            ValidatorError::Configuration("Settings have already been configured".to_string())
        })
    }

    /// Returns the configured settings, if any.
    pub fn get(&self) -> Option<&Settings> {
        self.inner.get()
    }

    /// Returns the configured settings, or the defaults when unconfigured.
    pub fn get_or_default(&self) -> &Settings {
        match self.inner.get() {
            Some(settings) => settings,
            None => self.fallback.get_or_init(Settings::default),
        }
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();

//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files, JSON
//! files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `VALIDATOR_DEBUG` | `debug` |
//! | `VALIDATOR_LOG_LEVEL` | `log_level` |
//! | `VALIDATOR_DATE_INPUT_FORMATS` | `date_input_formats` (`;`-separated) |
//! | `VALIDATOR_DATETIME_INPUT_FORMATS` | `datetime_input_formats` (`;`-separated) |
//! | `VALIDATOR_RAISE_ON_ERROR` | `raise_on_error` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use validator_rs_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/validator.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::ValidatorError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any settings not present in the TOML keep their default values.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, ValidatorError> {
    // Round-trip through serde_json so that missing keys fall back to the defaults.
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| ValidatorError::Configuration(format!("Failed to parse TOML: {e}")))?;

    let json_value = toml_to_json(toml_value);
    merge_with_defaults(json_value, "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, ValidatorError> {
    let content = read_config_file(path.as_ref(), "TOML")?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, ValidatorError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> Result<Settings, ValidatorError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| ValidatorError::Configuration(format!("Failed to parse JSON: {e}")))?;
    merge_with_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, ValidatorError> {
    let content = read_config_file(path.as_ref(), "JSON")?;
    from_json_str(&content)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, ValidatorError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// Boolean variables accept "true"/"1"/"yes"; anything else means false.
/// Format lists are separated by `;` because formats may contain commas.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("VALIDATOR_DEBUG") {
        settings.debug = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("VALIDATOR_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("VALIDATOR_DATE_INPUT_FORMATS") {
        settings.date_input_formats = split_formats(&val);
    }

    if let Ok(val) = std::env::var("VALIDATOR_DATETIME_INPUT_FORMATS") {
        settings.datetime_input_formats = split_formats(&val);
    }

    if let Ok(val) = std::env::var("VALIDATOR_RAISE_ON_ERROR") {
        settings.raise_on_error = parse_bool(&val);
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_config_file(path: &Path, format: &str) -> Result<String, ValidatorError> {
    std::fs::read_to_string(path).map_err(|e| {
        ValidatorError::Configuration(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_with_defaults(
    value: serde_json::Value,
    format: &str,
) -> Result<Settings, ValidatorError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        ValidatorError::Configuration(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        ValidatorError::Configuration(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

fn parse_bool(val: &str) -> bool {
    matches!(val.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

fn split_formats(val: &str) -> Vec<String> {
    val.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

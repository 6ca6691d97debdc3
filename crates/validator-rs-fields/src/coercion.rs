//! The coercion policy.
//!
//! Decides what happens to a raw value before any constraint sees it:
//!
//! 1. `Null`, or a value that already has the field's kind, passes through.
//! 2. A `custom_conversion` runs next; its errors propagate as returned.
//! 3. With `force_conversion`, the field's default conversion runs; failures
//!    become [`ConversionError`]s.
//! 4. Otherwise the field is type-strict and the mismatch is a
//!    [`ConversionError`].
//!
//! A converted value that still does not have the field's kind is rejected
//! too, so constraints only ever see correctly typed values.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use validator_rs_core::{ConversionError, FieldError, SETTINGS};

use crate::fields::{Field, FieldKind};
use crate::value::Value;

/// A user-supplied conversion from a raw value to the field's kind.
pub type Conversion = Arc<dyn Fn(&Value) -> Result<Value, FieldError> + Send + Sync>;

/// Applies the coercion policy of `field` to `raw`.
pub fn coerce<F: Field + ?Sized>(field: &F, raw: Value) -> Result<Value, FieldError> {
    let spec = field.spec();
    if raw.is_null() || spec.kind.matches(&raw) {
        return Ok(raw);
    }

    let converted = if let Some(conversion) = &spec.custom_conversion {
        conversion(&raw)?
    } else if spec.force_conversion {
        field
            .convert(&raw)
            .map_err(|reason| ConversionError::new(spec.name(), &raw, spec.kind.name(), reason))?
    } else {
        return Err(ConversionError::new(
            spec.name(),
            &raw,
            spec.kind.name(),
            format!("expected {}, got {}", spec.kind, raw.type_name()),
        )
        .into());
    };

    if converted.is_null() || spec.kind.matches(&converted) {
        tracing::trace!(field = spec.name(), from = raw.type_name(), to = %spec.kind, "value converted");
        Ok(converted)
    } else {
        Err(ConversionError::new(
            spec.name(),
            &raw,
            spec.kind.name(),
            format!("conversion produced {}", converted.type_name()),
        )
        .into())
    }
}

/// The default conversion for each kind, with date formats from the
/// global settings.
pub fn default_conversion(kind: FieldKind, raw: &Value) -> Result<Value, String> {
    let settings = SETTINGS.get_or_default();
    match kind {
        FieldKind::Int => to_int(raw),
        FieldKind::Float => to_float(raw),
        FieldKind::String => to_string(raw),
        FieldKind::Bool => to_bool(raw),
        FieldKind::Date => to_date(
            raw,
            &settings.date_input_formats,
            &settings.datetime_input_formats,
        ),
        FieldKind::DateTime => to_datetime(
            raw,
            &settings.datetime_input_formats,
            &settings.date_input_formats,
        ),
        FieldKind::Any => Ok(raw.clone()),
    }
}

/// Converts strings, integral floats and booleans to `Int`.
pub fn to_int(raw: &Value) -> Result<Value, String> {
    match raw {
        Value::Int(_) => Ok(raw.clone()),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| format!("invalid literal for int: '{s}'")),
        #[allow(clippy::cast_possible_truncation)]
        Value::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.2e18 => {
            Ok(Value::Int(*f as i64))
        }
        Value::Float(f) => Err(format!("float {f} has no exact int value")),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        other => Err(format!("cannot convert {} to int", other.type_name())),
    }
}

/// Converts strings, integers and booleans to `Float`.
pub fn to_float(raw: &Value) -> Result<Value, String> {
    match raw {
        Value::Float(_) => Ok(raw.clone()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| format!("could not convert string to float: '{s}'")),
        #[allow(clippy::cast_precision_loss)]
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        other => Err(format!("cannot convert {} to float", other.type_name())),
    }
}

/// Renders any scalar as a `String`.
pub fn to_string(raw: &Value) -> Result<Value, String> {
    match raw {
        Value::List(_) | Value::Json(_) => {
            Err(format!("cannot convert {} to string", raw.type_name()))
        }
        other => Ok(Value::String(other.to_string())),
    }
}

/// Converts the usual textual and numeric spellings to `Bool`.
pub fn to_bool(raw: &Value) -> Result<Value, String> {
    match raw {
        Value::Bool(_) => Ok(raw.clone()),
        Value::Int(0) => Ok(Value::Bool(false)),
        Value::Int(1) => Ok(Value::Bool(true)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
            "false" | "0" | "no" | "off" | "" => Ok(Value::Bool(false)),
            _ => Err(format!("'{s}' is not a boolean")),
        },
        other => Err(format!("cannot convert {other} to bool")),
    }
}

/// Parses a date.
///
/// Strings are tried against `date_formats` first, then against
/// `datetime_formats` (keeping only the date part). A `DateTime` value is
/// truncated to its date.
pub fn to_date(
    raw: &Value,
    date_formats: &[String],
    datetime_formats: &[String],
) -> Result<Value, String> {
    match raw {
        Value::Date(_) => Ok(raw.clone()),
        Value::DateTime(dt) => Ok(Value::Date(dt.date())),
        Value::String(s) => {
            let s = s.trim();
            parse_date(s, date_formats)
                .or_else(|| parse_datetime(s, datetime_formats).map(|dt| dt.date()))
                .map(Value::Date)
                .ok_or_else(|| format!("Unknown string format: {s}"))
        }
        other => Err(format!("cannot convert {} to date", other.type_name())),
    }
}

/// Parses a date-time.
///
/// Strings are tried against `datetime_formats` first, then against
/// `date_formats` (at midnight). A `Date` value is promoted to midnight.
pub fn to_datetime(
    raw: &Value,
    datetime_formats: &[String],
    date_formats: &[String],
) -> Result<Value, String> {
    match raw {
        Value::DateTime(_) => Ok(raw.clone()),
        Value::Date(d) => Ok(Value::DateTime(d.and_time(NaiveTime::MIN))),
        Value::String(s) => {
            let s = s.trim();
            parse_datetime(s, datetime_formats)
                .or_else(|| parse_date(s, date_formats).map(|d| d.and_time(NaiveTime::MIN)))
                .map(Value::DateTime)
                .ok_or_else(|| format!("Unknown string format: {s}"))
        }
        other => Err(format!("cannot convert {} to datetime", other.type_name())),
    }
}

fn parse_date(s: &str, formats: &[String]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn parse_datetime(s: &str, formats: &[String]) -> Option<NaiveDateTime> {
    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

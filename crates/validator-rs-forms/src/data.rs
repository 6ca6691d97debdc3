//! Clean-cycle results: cleaned data and aggregated errors.

use indexmap::IndexMap;
use validator_rs_core::FieldError;
use validator_rs_fields::{FromValue, Value, ValueSource};

/// The key form-level errors are recorded under.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Validated, post-hook values keyed by field name, in the order fields passed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedData {
    values: IndexMap<String, Value>,
}

impl CleanedData {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns the value for `name` extracted as `T`.
    ///
    /// `None` if the key is missing or holds another type.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Option<T> {
        self.values.get(name).and_then(T::from_value)
    }

    /// Inserts or replaces a value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Removes a value, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    /// Returns `true` if `name` is present.
    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the underlying ordered map.
    pub fn as_map(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    /// Renders the data as a JSON object (dates as ISO-8601 strings).
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl ValueSource for CleanedData {
    fn value(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for CleanedData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Errors recorded during a clean cycle, keyed by field name.
///
/// Form-level errors live under [`NON_FIELD_ERRORS`]. Keys keep the order in
/// which their first error was recorded; nothing recorded is ever dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorDict {
    errors: IndexMap<String, Vec<FieldError>>,
}

impl ErrorDict {
    /// Creates an empty error mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `error` under `key`.
    pub fn add(&mut self, key: impl Into<String>, error: impl Into<FieldError>) {
        self.errors.entry(key.into()).or_default().push(error.into());
    }

    /// Returns the errors recorded under `key`.
    pub fn get(&self, key: &str) -> &[FieldError] {
        self.errors.get(key).map_or(&[], Vec::as_slice)
    }

    /// Returns the error messages recorded under `key`.
    pub fn messages(&self, key: &str) -> Vec<String> {
        self.get(key).iter().map(ToString::to_string).collect()
    }

    /// Returns the form-level errors.
    pub fn non_field_errors(&self) -> &[FieldError] {
        self.get(NON_FIELD_ERRORS)
    }

    /// Returns `true` if anything was recorded under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.errors.contains_key(key)
    }

    /// Returns the keys with errors, in recording order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Iterates over `(key, errors)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldError])> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Returns the number of keys with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Renders the errors as `{ key: [message, ...] }`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.errors
                .iter()
                .map(|(k, errs)| {
                    let messages = errs
                        .iter()
                        .map(|e| serde_json::Value::String(e.to_string()))
                        .collect();
                    (k.clone(), serde_json::Value::Array(messages))
                })
                .collect(),
        )
    }
}

//! Per-instance value storage.

use std::collections::HashMap;

use indexmap::IndexMap;
use validator_rs_core::{ConversionError, FieldError, ValidatorError};

use crate::value::{FromValue, Value};

/// The values of one host instance, keyed by field name.
///
/// Only [`Field::set`](crate::fields::Field::set) writes here, so every stored
/// value has passed coercion and validation. Two instances never share a
/// store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldStore {
    values: HashMap<String, Value>,
}

impl FieldStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value for `name`, if one was assigned.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns `true` if a value was assigned to `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of assigned fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was assigned yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn insert(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }
}

/// Anything values can be read from by field name.
///
/// Lets typed structs be rebuilt from a store, a plain map, or a form's
/// cleaned data alike.
pub trait ValueSource {
    /// Returns the value stored under `name`.
    fn value(&self, name: &str) -> Option<&Value>;
}

impl ValueSource for FieldStore {
    fn value(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<S: std::hash::BuildHasher> ValueSource for HashMap<String, Value, S> {
    fn value(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<S: std::hash::BuildHasher> ValueSource for IndexMap<String, Value, S> {
    fn value(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

/// Reads `name` from `source` as a `T`.
///
/// A missing key reads as null, so optional targets come back as `None`.
/// A null for a required target is [`ValidatorError::Unset`]; any other
/// mismatch is a conversion error for `name`.
pub fn extract<T, S>(source: &S, name: &str) -> Result<T, ValidatorError>
where
    T: FromValue,
    S: ValueSource + ?Sized,
{
    let value = source.value(name).unwrap_or(&Value::Null);
    T::from_value(value).ok_or_else(|| {
        if value.is_null() {
            return ValidatorError::Unset(name.to_string());
        }
        FieldError::from(ConversionError::new(
            name,
            value,
            std::any::type_name::<T>(),
            format!("unexpected {}", value.type_name()),
        ))
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_basics() {
        let mut store = FieldStore::new();
        assert!(store.is_empty());

        store.insert("age", Value::Int(3));
        assert!(store.contains("age"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.value("age"), Some(&Value::Int(3)));
        assert_eq!(store.value("name"), None);
    }

    #[test]
    fn test_maps_are_sources() {
        let mut map = IndexMap::new();
        map.insert("name".to_string(), Value::from("Ann"));
        assert_eq!(map.value("name"), Some(&Value::from("Ann")));

        let hash: HashMap<String, Value> = map.into_iter().collect();
        assert!(hash.value("name").is_some());
    }

    #[test]
    fn test_extract() {
        let mut map = HashMap::new();
        map.insert("age".to_string(), Value::Int(19));
        map.insert("name".to_string(), Value::Null);

        assert_eq!(extract::<i64, _>(&map, "age").unwrap(), 19);
        assert_eq!(extract::<Option<String>, _>(&map, "name").unwrap(), None);
        assert_eq!(extract::<Option<String>, _>(&map, "city").unwrap(), None);

        assert!(matches!(
            extract::<String, _>(&map, "city"),
            Err(ValidatorError::Unset(ref name)) if name == "city"
        ));
        let err = extract::<String, _>(&map, "age").unwrap_err();
        assert!(err.as_field_error().is_some_and(|e| e.is_conversion()));
    }
}

//! Schemas, hosts, and records.
//!
//! A [`Schema`] is the ordered, per-type set of bound fields. It is built
//! once with a [`SchemaBuilder`] and then shared (usually behind an `Arc`) by
//! every instance of the owning type. A [`Host`] is anything that pairs a
//! schema with its own [`FieldStore`]; [`Record`] is the ready-made one.
//!
//! ```
//! use std::sync::Arc;
//!
//! use validator_rs_fields::fields::{Field, IntField, StringField};
//! use validator_rs_fields::schema::{Host, Record, Schema};
//!
//! let schema = Schema::builder("Audience")
//!     .field("name", StringField::new().min_length(1).max_length(5))
//!     .field("age", IntField::new().min_value(18))
//!     .build()
//!     .unwrap();
//!
//! let mut audience = Record::new(Arc::new(schema));
//! audience.set("age", 30).unwrap();
//! assert!(audience.set("age", 3).is_err());
//! assert_eq!(audience.get("age").unwrap().as_int(), Some(30));
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use validator_rs_core::ValidatorError;

use crate::fields::Field;
use crate::store::{FieldStore, ValueSource};
use crate::value::Value;

/// The ordered set of fields declared on one type.
#[derive(Debug, Clone)]
pub struct Schema {
    owner: String,
    fields: Vec<Arc<dyn Field>>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Starts declaring the fields of `owner`.
    pub fn builder(owner: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(owner)
    }

    /// Returns the owning type's name.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the fields in declaration order (inherited fields first).
    pub fn fields(&self) -> &[Arc<dyn Field>] {
        &self.fields
    }

    /// Returns the field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name())
    }

    /// Returns the field bound to `name`.
    pub fn field(&self, name: &str) -> Option<&Arc<dyn Field>> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Returns the field bound to `name`, or an unknown-field error.
    pub fn lookup(&self, name: &str) -> Result<&Arc<dyn Field>, ValidatorError> {
        self.field(name).ok_or_else(|| ValidatorError::UnknownField {
            owner: self.owner.clone(),
            field: name.to_string(),
        })
    }

    /// Returns `true` if a field is bound to `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Collects field declarations and produces a [`Schema`].
///
/// Declaration problems (empty or duplicate names, a rebound field, a
/// default that would not validate) are reported together by
/// [`build`](SchemaBuilder::build).
#[derive(Debug)]
pub struct SchemaBuilder {
    owner: String,
    fields: Vec<Arc<dyn Field>>,
    inherited: HashSet<String>,
    errors: Vec<String>,
}

impl SchemaBuilder {
    /// Creates a builder for `owner`.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            fields: Vec::new(),
            inherited: HashSet::new(),
            errors: Vec::new(),
        }
    }

    /// Copies every field of `parent`, keeping its order.
    ///
    /// A later parent overrides an earlier one's field of the same name in
    /// place; a field declared with [`field`](Self::field) overrides both.
    #[must_use]
    pub fn extend(mut self, parent: &Schema) -> Self {
        for field in parent.fields() {
            let name = field.name().to_string();
            match self.position(&name) {
                Some(i) if self.inherited.contains(&name) => self.fields[i] = Arc::clone(field),
                Some(_) => {}
                None => {
                    self.fields.push(Arc::clone(field));
                    self.inherited.insert(name);
                }
            }
        }
        self
    }

    /// Declares `field` under `name`.
    #[must_use]
    pub fn field<F: Field + 'static>(mut self, name: &str, mut field: F) -> Self {
        if let Err(e) = field.bind(&self.owner, name) {
            self.errors.push(e.to_string());
            return self;
        }
        self.push(name, Arc::new(field));
        self
    }

    /// Declares a field shared with another schema. It must already be bound to `name`.
    #[must_use]
    pub fn shared_field(mut self, name: &str, field: Arc<dyn Field>) -> Self {
        if !field.spec().is_bound() {
            self.errors.push(format!(
                "shared field `{name}` on {} must be bound before it is shared",
                self.owner
            ));
            return self;
        }
        if field.name() != name {
            self.errors.push(format!(
                "field `{}` cannot be rebound as `{name}` on {}",
                field.name(),
                self.owner
            ));
            return self;
        }
        self.push(name, field);
        self
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    fn push(&mut self, name: &str, field: Arc<dyn Field>) {
        match self.position(name) {
            Some(i) if self.inherited.remove(name) => self.fields[i] = field,
            Some(_) => self
                .errors
                .push(format!("{} declares field `{name}` twice", self.owner)),
            None => self.fields.push(field),
        }
    }

    /// Finishes the declaration.
    pub fn build(self) -> Result<Schema, ValidatorError> {
        let mut errors = self.errors;

        for field in &self.fields {
            if let Some(default) = &field.spec().default {
                if let Err(e) = field.validate(default.clone()) {
                    errors.push(format!("default of `{}` is invalid: {e}", field.name()));
                }
            }
        }

        if !errors.is_empty() {
            return Err(ValidatorError::Declaration(errors.join("; ")));
        }

        let index = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect();

        tracing::debug!(owner = %self.owner, fields = self.fields.len(), "schema declared");

        Ok(Schema {
            owner: self.owner,
            fields: self.fields,
            index,
        })
    }
}

/// An object whose declared attributes are managed by fields.
///
/// Implementors expose their schema and their own store; reads and writes by
/// name go through the matching field, so a write either stores a fully
/// validated value or leaves the previous one untouched.
pub trait Host {
    /// Returns the schema shared by all instances of this type.
    fn schema(&self) -> &Schema;

    /// Returns this instance's values.
    fn store(&self) -> &FieldStore;

    /// Returns this instance's values mutably.
    fn store_mut(&mut self) -> &mut FieldStore;

    /// Reads a declared attribute.
    fn get(&self, name: &str) -> Result<Value, ValidatorError> {
        self.schema().lookup(name)?.get(self.store())
    }

    /// Writes a declared attribute.
    fn set(&mut self, name: &str, raw: impl Into<Value>) -> Result<(), ValidatorError>
    where
        Self: Sized,
    {
        let field = Arc::clone(self.schema().lookup(name)?);
        field
            .set(self.store_mut(), raw.into())
            .map_err(|source| ValidatorError::Field {
                field: name.to_string(),
                source,
            })
    }
}

/// A schema-backed host with no other state.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<Schema>,
    store: FieldStore,
}

impl Record {
    /// Creates an instance with nothing assigned.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            store: FieldStore::new(),
        }
    }

    /// Creates an instance and assigns `values` in order, stopping at the
    /// first failure.
    pub fn with_values<I, K, V>(schema: Arc<Schema>, values: I) -> Result<Self, ValidatorError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut record = Self::new(schema);
        for (name, value) in values {
            record.set(name.as_ref(), value)?;
        }
        Ok(record)
    }

    /// Returns the shared schema handle.
    pub fn schema_handle(&self) -> &Arc<Schema> {
        &self.schema
    }
}

impl Host for Record {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn store(&self) -> &FieldStore {
        &self.store
    }

    fn store_mut(&mut self) -> &mut FieldStore {
        &mut self.store
    }
}

impl ValueSource for Record {
    fn value(&self, name: &str) -> Option<&Value> {
        self.store.get(name)
    }
}

/// A plain Rust type whose fields are declared with a [`Schema`].
///
/// Usually derived with `#[derive(Schema)]`. The typed struct holds plain
/// values; [`validate`](Declared::validate) runs them through the schema.
pub trait Declared: Sized {
    /// Builds the schema for this type.
    fn schema() -> Result<Schema, ValidatorError>;

    /// Rebuilds an instance from validated values, such as a form's cleaned data.
    fn from_cleaned_data<S: ValueSource + ?Sized>(data: &S) -> Result<Self, ValidatorError>;

    /// Returns the instance's values in declaration order.
    fn to_values(&self) -> Vec<(&'static str, Value)>;

    /// Assigns every value through the schema and returns the resulting record.
    fn validate(&self) -> Result<Record, ValidatorError> {
        Record::with_values(Arc::new(Self::schema()?), self.to_values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{IntField, StringField};

    fn audience() -> Arc<Schema> {
        Arc::new(
            Schema::builder("Audience")
                .field("name", StringField::new().min_length(1).max_length(5))
                .field("age", IntField::new().min_value(18).max_value(60))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_declaration_order() {
        let schema = audience();
        assert_eq!(schema.names().collect::<Vec<_>>(), ["name", "age"]);
        assert_eq!(schema.owner(), "Audience");
        assert_eq!(schema.len(), 2);
        assert!(schema.contains("age"));
        assert_eq!(schema.field("age").unwrap().spec().owner(), Some("Audience"));
    }

    #[test]
    fn test_duplicate_declaration_fails() {
        let err = Schema::builder("Audience")
            .field("age", IntField::new())
            .field("age", IntField::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidatorError::Declaration(ref m) if m.contains("twice")));
    }

    #[test]
    fn test_invalid_default_fails() {
        let err = Schema::builder("Audience")
            .field("age", IntField::new().min_value(18).default_value(3))
            .build()
            .unwrap_err();
        assert!(err.is_programmer_error());
    }

    #[test]
    fn test_extend_and_override() {
        let parent = audience();
        let child = Schema::builder("Adult")
            .extend(&parent)
            .field("age", IntField::new().min_value(21))
            .field("email", StringField::email())
            .build()
            .unwrap();

        assert_eq!(child.names().collect::<Vec<_>>(), ["name", "age", "email"]);

        let mut adult = Record::new(Arc::new(child));
        assert!(adult.set("age", 19).is_err());
        adult.set("age", 21).unwrap();
    }

    #[test]
    fn test_shared_field_must_match_name() {
        let parent = audience();
        let age = Arc::clone(parent.field("age").unwrap());

        let ok = Schema::builder("Copy").shared_field("age", Arc::clone(&age)).build();
        assert!(ok.is_ok());

        let err = Schema::builder("Copy").shared_field("years", age).build();
        assert!(err.is_err());
    }

    #[test]
    fn test_unknown_field() {
        let mut record = Record::new(audience());
        let err = record.set("height", 180).unwrap_err();
        assert!(matches!(err, ValidatorError::UnknownField { .. }));
        assert_eq!(err.to_string(), "Audience has no field `height`");
        assert!(record.get("height").is_err());
    }

    #[test]
    fn test_instances_do_not_share_values() {
        let schema = audience();
        let mut a = Record::new(Arc::clone(&schema));
        let mut b = Record::new(schema);
        a.set("age", 20).unwrap();
        b.set("age", 40).unwrap();
        assert_eq!(a.get("age").unwrap(), Value::Int(20));
        assert_eq!(b.get("age").unwrap(), Value::Int(40));
    }

    #[test]
    fn test_failed_write_is_wrapped_with_field_name() {
        let mut record = Record::new(audience());
        let err = record.set("name", "test string").unwrap_err();
        let field_err = err.as_field_error().unwrap();
        assert!(field_err.is_constraint());
        assert!(matches!(err, ValidatorError::Field { ref field, .. } if field == "name"));
    }

    #[test]
    fn test_with_values() {
        let record =
            Record::with_values(audience(), [("name", Value::from("Ann")), ("age", Value::Int(30))])
                .unwrap();
        assert_eq!(record.value("name"), Some(&Value::from("Ann")));
        assert_eq!(record.store().len(), 2);
    }
}

//! Form classes and form instances.
//!
//! A [`FormClass`] is the shared declaration of a form: an ordered
//! [`Schema`], a registry of per-field clean hooks, an optional whole-form
//! hook, and options. It is built once and shared behind an `Arc`.
//!
//! A [`Form`] is one validation attempt over one input snapshot. Binding new
//! input resets every piece of per-attempt state.
//!
//! ```
//! use validator_rs_core::ValidationError;
//! use validator_rs_fields::{IntField, StringField, Value};
//! use validator_rs_forms::{Form, FormClass};
//!
//! let class = FormClass::builder("AudienceForm")
//!     .field("name", StringField::new().max_length(20))
//!     .field("age", IntField::new().min_value(18))
//!     .clean_field("name", |value, _| match value.as_str() {
//!         Some(name) if name.starts_with('A') => Ok(value.clone()),
//!         _ => Err(ValidationError::invalid("Invalid name for audience")),
//!     })
//!     .build()
//!     .unwrap();
//!
//! let mut form = Form::bound(&class, [("name", Value::from("Alice")), ("age", Value::Int(19))]);
//! assert!(form.is_valid());
//! assert_eq!(form.cleaned_data().get("age"), Some(&Value::Int(19)));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use validator_rs_core::{ValidationError, ValidatorError, SETTINGS};
use validator_rs_fields::{Declared, Field, FieldStore, Host, Schema, SchemaBuilder, Value};

use crate::data::{CleanedData, ErrorDict};
use crate::validation;

/// A per-field clean hook: receives the field's current value and the
/// cleaned data so far, returns the new candidate value.
pub type FieldHook =
    Arc<dyn Fn(&Value, &CleanedData) -> Result<Value, ValidationError> + Send + Sync>;

/// A whole-form clean hook: may reject the form or derive cleaned values.
pub type FormHook = Arc<dyn Fn(&mut CleanedData) -> Result<(), ValidationError> + Send + Sync>;

/// The shared declaration of a form.
pub struct FormClass {
    name: String,
    schema: Arc<Schema>,
    field_hooks: HashMap<String, FieldHook>,
    form_hook: Option<FormHook>,
    raise_on_error: bool,
}

impl FormClass {
    /// Starts declaring a form class called `name`.
    pub fn builder(name: impl Into<String>) -> FormClassBuilder {
        FormClassBuilder::new(name)
    }

    /// Returns the class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared fields.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the clean hook registered for `field`.
    pub fn field_hook(&self, field: &str) -> Option<&FieldHook> {
        self.field_hooks.get(field)
    }

    /// Returns the whole-form clean hook.
    pub fn form_hook(&self) -> Option<&FormHook> {
        self.form_hook.as_ref()
    }

    /// Returns whether forms of this class stop at the first failure.
    pub fn raise_on_error(&self) -> bool {
        self.raise_on_error
    }
}

impl fmt::Debug for FormClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hooks: Vec<_> = self.field_hooks.keys().collect();
        hooks.sort();
        f.debug_struct("FormClass")
            .field("name", &self.name)
            .field("fields", &self.schema.names().collect::<Vec<_>>())
            .field("field_hooks", &hooks)
            .field("form_hook", &self.form_hook.is_some())
            .field("raise_on_error", &self.raise_on_error)
            .finish()
    }
}

/// Builds a [`FormClass`].
pub struct FormClassBuilder {
    name: String,
    schema: SchemaBuilder,
    field_hooks: HashMap<String, FieldHook>,
    form_hook: Option<FormHook>,
    raise_on_error: Option<bool>,
    failure: Option<ValidatorError>,
}

impl FormClassBuilder {
    /// Creates a builder for a form class called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            schema: SchemaBuilder::new(name.clone()),
            name,
            field_hooks: HashMap::new(),
            form_hook: None,
            raise_on_error: None,
            failure: None,
        }
    }

    /// Inherits the fields, hooks, and options of `parent`.
    ///
    /// Parent fields come first; a field or hook declared on this builder
    /// replaces the parent's one of the same name.
    #[must_use]
    pub fn extends(mut self, parent: &FormClass) -> Self {
        self.schema = self.schema.extend(&parent.schema);
        for (name, hook) in &parent.field_hooks {
            self.field_hooks
                .entry(name.clone())
                .or_insert_with(|| Arc::clone(hook));
        }
        if self.form_hook.is_none() {
            self.form_hook.clone_from(&parent.form_hook);
        }
        if self.raise_on_error.is_none() {
            self.raise_on_error = Some(parent.raise_on_error);
        }
        self
    }

    /// Declares every field of a typed schema, e.g. one derived with
    /// `#[derive(Schema)]`.
    #[must_use]
    pub fn fields_of<T: Declared>(mut self) -> Self {
        match T::schema() {
            Ok(schema) => self.schema = self.schema.extend(&schema),
            Err(e) => {
                self.failure.get_or_insert(e);
            }
        }
        self
    }

    /// Declares `field` under `name`.
    #[must_use]
    pub fn field<F: Field + 'static>(mut self, name: &str, field: F) -> Self {
        self.schema = self.schema.field(name, field);
        self
    }

    /// Registers the clean hook for the field called `name`.
    #[must_use]
    pub fn clean_field<H>(mut self, name: &str, hook: H) -> Self
    where
        H: Fn(&Value, &CleanedData) -> Result<Value, ValidationError> + Send + Sync + 'static,
    {
        self.field_hooks.insert(name.to_string(), Arc::new(hook));
        self
    }

    /// Registers the whole-form clean hook.
    #[must_use]
    pub fn clean<H>(mut self, hook: H) -> Self
    where
        H: Fn(&mut CleanedData) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.form_hook = Some(Arc::new(hook));
        self
    }

    /// Stops every clean cycle at its first failure.
    ///
    /// Defaults to the configured `raise_on_error` setting.
    #[must_use]
    pub fn raise_on_error(mut self, raise: bool) -> Self {
        self.raise_on_error = Some(raise);
        self
    }

    /// Finishes the declaration.
    pub fn build(self) -> Result<Arc<FormClass>, ValidatorError> {
        if let Some(failure) = self.failure {
            return Err(failure);
        }
        let schema = self.schema.build()?;

        let mut orphans: Vec<&str> = self
            .field_hooks
            .keys()
            .map(String::as_str)
            .filter(|name| !schema.contains(name))
            .collect();
        if !orphans.is_empty() {
            orphans.sort_unstable();
            return Err(ValidatorError::Declaration(format!(
                "{} registers clean hooks for undeclared fields: {}",
                self.name,
                orphans.join(", ")
            )));
        }

        let raise_on_error = self
            .raise_on_error
            .unwrap_or_else(|| SETTINGS.get_or_default().raise_on_error);

        tracing::debug!(
            form = %self.name,
            fields = schema.len(),
            hooks = self.field_hooks.len(),
            "form class declared"
        );

        Ok(Arc::new(FormClass {
            name: self.name,
            schema: Arc::new(schema),
            field_hooks: self.field_hooks,
            form_hook: self.form_hook,
            raise_on_error,
        }))
    }
}

/// Where a form is in its clean cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleanState {
    /// No input is bound.
    Unbound,
    /// Matching input keys against declared fields.
    Binding,
    /// Assigning every bound value through its field.
    FieldPass1,
    /// Running per-field clean hooks.
    FieldHooks,
    /// Re-assigning hook output through its field.
    FieldPass2,
    /// Running the whole-form clean hook.
    FormHook,
    /// The last cycle finished without errors.
    Valid,
    /// The last cycle recorded at least one error.
    Invalid,
}

impl CleanState {
    /// Returns `true` for [`Valid`](Self::Valid) and [`Invalid`](Self::Invalid).
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Valid | Self::Invalid)
    }
}

impl fmt::Display for CleanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unbound => "UNBOUND",
            Self::Binding => "BINDING",
            Self::FieldPass1 => "FIELD_PASS_1",
            Self::FieldHooks => "FIELD_HOOKS",
            Self::FieldPass2 => "FIELD_PASS_2",
            Self::FormHook => "FORM_HOOK",
            Self::Valid => "VALID",
            Self::Invalid => "INVALID",
        };
        f.write_str(name)
    }
}

/// One validation attempt over one input snapshot.
///
/// The form is also the transient instance its fields write to: after a
/// cycle, [`value`](Form::value) reads what the last successful assignment
/// of each field stored.
#[derive(Debug, Clone)]
pub struct Form {
    class: Arc<FormClass>,
    raw_data: Option<IndexMap<String, Value>>,
    raise_on_error: bool,
    store: FieldStore,
    cleaned_data: CleanedData,
    errors: ErrorDict,
    state: CleanState,
}

impl Form {
    /// Creates an unbound form.
    pub fn new(class: &Arc<FormClass>) -> Self {
        Self {
            raise_on_error: class.raise_on_error(),
            class: Arc::clone(class),
            raw_data: None,
            store: FieldStore::new(),
            cleaned_data: CleanedData::new(),
            errors: ErrorDict::new(),
            state: CleanState::Unbound,
        }
    }

    /// Creates a form bound to `data`.
    pub fn bound<I, K, V>(class: &Arc<FormClass>, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut form = Self::new(class);
        form.bind(data);
        form
    }

    /// Binds new input, discarding all state from earlier cycles.
    ///
    /// Only a completely empty mapping counts as no data and leaves the
    /// form unbound. Input whose keys match no declared field still binds,
    /// and every field is then validated as null.
    pub fn bind<I, K, V>(&mut self, data: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let raw: IndexMap<String, Value> = data
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        self.store = FieldStore::new();
        self.cleaned_data = CleanedData::new();
        self.errors = ErrorDict::new();
        self.state = CleanState::Unbound;
        self.raw_data = if raw.is_empty() { None } else { Some(raw) };
    }

    /// Binds the entries of a JSON object. Anything else leaves the form unbound.
    pub fn bind_json(&mut self, data: serde_json::Value) {
        match data {
            serde_json::Value::Object(entries) => self.bind(entries),
            other => {
                tracing::warn!(form = %self.class.name(), input = %other, "ignoring non-object input");
                self.bind(std::iter::empty::<(String, Value)>());
            }
        }
    }

    /// Overrides the class's `raise_on_error` option for this form.
    pub fn set_raise_on_error(&mut self, raise: bool) {
        self.raise_on_error = raise;
    }

    /// Returns `true` if input is bound.
    pub fn is_bound(&self) -> bool {
        self.raw_data.is_some()
    }

    /// Returns the form's class.
    pub fn class(&self) -> &Arc<FormClass> {
        &self.class
    }

    /// Returns the bound input, if any.
    pub fn raw_data(&self) -> Option<&IndexMap<String, Value>> {
        self.raw_data.as_ref()
    }

    /// Runs the clean cycle and reports whether it finished without errors.
    ///
    /// Every call re-runs the whole cycle from the bound input. Unbound forms
    /// are never valid.
    pub fn is_valid(&mut self) -> bool {
        self.full_clean().is_ok() && self.state == CleanState::Valid
    }

    /// Runs the clean cycle.
    ///
    /// Recoverable failures are recorded in [`errors`](Form::errors) and do
    /// not make this return `Err`, unless `raise_on_error` is set, in which
    /// case the first failure is returned as [`ValidatorError::Field`].
    pub fn full_clean(&mut self) -> Result<(), ValidatorError> {
        let Some(raw) = &self.raw_data else {
            tracing::warn!(form = %self.class.name(), "clean requested on an unbound form");
            return Err(ValidatorError::Unbound(self.class.name().to_string()));
        };

        let outcome = validation::run(&self.class, raw, self.raise_on_error);
        self.store = outcome.store;
        self.cleaned_data = outcome.cleaned_data;
        self.errors = outcome.errors;
        self.state = outcome.state;

        outcome.raised.map_or(Ok(()), Err)
    }

    /// Returns the validated, post-hook values of the last cycle.
    pub fn cleaned_data(&self) -> &CleanedData {
        &self.cleaned_data
    }

    /// Returns the errors of the last cycle.
    pub fn errors(&self) -> &ErrorDict {
        &self.errors
    }

    /// Returns the form-level errors of the last cycle.
    pub fn non_field_errors(&self) -> &[validator_rs_core::FieldError] {
        self.errors.non_field_errors()
    }

    /// Returns the current clean state.
    pub fn state(&self) -> CleanState {
        self.state
    }

    /// Reads a field's value from the transient instance view.
    pub fn value(&self, name: &str) -> Result<Value, ValidatorError> {
        Host::get(self, name)
    }

    /// Rebuilds a typed struct from the cleaned data.
    pub fn to_typed<T: Declared>(&self) -> Result<T, ValidatorError> {
        T::from_cleaned_data(&self.cleaned_data)
    }
}

impl Host for Form {
    fn schema(&self) -> &Schema {
        &self.class.schema
    }

    fn store(&self) -> &FieldStore {
        &self.store
    }

    fn store_mut(&mut self) -> &mut FieldStore {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator_rs_fields::{IntField, StringField};

    fn audience_form() -> Arc<FormClass> {
        FormClass::builder("AudienceForm")
            .field("name", StringField::new().max_length(20))
            .field("age", IntField::new().min_value(18))
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_form_is_unbound() {
        let class = audience_form();
        let mut form = Form::new(&class);
        assert!(!form.is_bound());
        assert_eq!(form.state(), CleanState::Unbound);
        assert!(!form.is_valid());

        let err = form.full_clean().unwrap_err();
        assert_eq!(err.to_string(), "No data was provided for AudienceForm");
    }

    #[test]
    fn test_empty_input_is_unbound() {
        let class = audience_form();
        let form = Form::bound(&class, Vec::<(String, Value)>::new());
        assert!(!form.is_bound());
    }

    #[test]
    fn test_rebind_resets_state() {
        let class = audience_form();
        let mut form = Form::bound(&class, [("name", Value::from("Alice")), ("age", Value::Int(2))]);
        assert!(!form.is_valid());
        assert!(form.errors().contains_key("age"));

        form.bind([("name", Value::from("Alice")), ("age", Value::Int(19))]);
        assert_eq!(form.state(), CleanState::Unbound);
        assert!(form.errors().is_empty());
        assert!(form.cleaned_data().is_empty());
        assert!(form.is_valid());
        assert_eq!(form.state(), CleanState::Valid);
    }

    #[test]
    fn test_bind_json() {
        let class = audience_form();
        let mut form = Form::new(&class);
        form.bind_json(serde_json::json!({"name": "Alice", "age": 19, "extra": true}));
        assert!(form.is_valid());
        assert_eq!(
            form.cleaned_data().to_json(),
            serde_json::json!({"name": "Alice", "age": 19})
        );

        form.bind_json(serde_json::json!([1, 2]));
        assert!(!form.is_bound());
    }

    #[test]
    fn test_hook_for_undeclared_field_fails() {
        let err = FormClass::builder("AudienceForm")
            .field("name", StringField::new())
            .clean_field("nickname", |v, _| Ok(v.clone()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidatorError::Declaration(ref m) if m.contains("nickname")));
    }

    #[test]
    fn test_value_view_after_cycle() {
        let class = audience_form();
        let mut form = Form::bound(&class, [("name", Value::from("Alice")), ("age", Value::Int(2))]);
        assert!(!form.is_valid());
        assert_eq!(form.value("name").unwrap(), Value::from("Alice"));
        assert!(matches!(form.value("age"), Err(ValidatorError::Unset(_))));
        assert!(form.value("height").is_err());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(CleanState::FieldPass1.to_string(), "FIELD_PASS_1");
        assert!(CleanState::Invalid.is_terminal());
        assert!(!CleanState::FormHook.is_terminal());
    }

    #[test]
    fn test_class_debug_lists_fields() {
        let rendered = format!("{:?}", audience_form());
        assert!(rendered.contains("AudienceForm"));
        assert!(rendered.contains("\"age\""));
    }
}

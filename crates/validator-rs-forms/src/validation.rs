//! The clean cycle.
//!
//! One pass per validation attempt, strictly in this order:
//!
//! 1. **Binding**: input keys are matched against declared fields; unknown
//!    keys are ignored and missing ones become `Null`.
//! 2. **Field pass 1**: every field, in declaration order, assigns its raw
//!    value. Failures are recorded and the scan continues.
//! 3. **Field hooks**: each field that passed and has a clean hook gets its
//!    value replaced by the hook's output, or its entry rejected.
//! 4. **Field pass 2**: hook output is assigned again, so it still has to
//!    satisfy the field's own rules.
//! 5. **Form hook**: runs only if nothing failed so far.
//!
//! Errors accumulate rather than short-circuiting, unless the form stops at
//! the first failure (`raise_on_error`).

use std::sync::Arc;

use indexmap::IndexMap;
use validator_rs_core::logging::clean_cycle_span;
use validator_rs_core::{FieldError, ValidationError, ValidatorError};
use validator_rs_fields::{Field, FieldStore, Schema, Value};

use crate::data::{CleanedData, ErrorDict, NON_FIELD_ERRORS};
use crate::form::{CleanState, Form, FormClass};

/// Everything one cycle produced.
#[derive(Debug)]
pub(crate) struct Outcome {
    pub store: FieldStore,
    pub cleaned_data: CleanedData,
    pub errors: ErrorDict,
    pub state: CleanState,
    pub raised: Option<ValidatorError>,
}

struct Cycle<'a> {
    class: &'a FormClass,
    raise_on_error: bool,
    store: FieldStore,
    cleaned_data: CleanedData,
    errors: ErrorDict,
    state: CleanState,
}

/// Runs one clean cycle of `class` over `raw`.
pub(crate) fn run(class: &FormClass, raw: &IndexMap<String, Value>, raise_on_error: bool) -> Outcome {
    let span = clean_cycle_span(class.name());
    let _guard = span.enter();

    let mut cycle = Cycle {
        class,
        raise_on_error,
        store: FieldStore::new(),
        cleaned_data: CleanedData::new(),
        errors: ErrorDict::new(),
        state: CleanState::Unbound,
    };

    let raised = cycle.drive(raw).err();
    let state = if cycle.errors.is_empty() && raised.is_none() {
        CleanState::Valid
    } else {
        CleanState::Invalid
    };
    cycle.transition(state);

    tracing::debug!(
        cleaned = cycle.cleaned_data.len(),
        errors = cycle.errors.len(),
        "clean cycle finished"
    );

    Outcome {
        store: cycle.store,
        cleaned_data: cycle.cleaned_data,
        errors: cycle.errors,
        state,
        raised,
    }
}

/// Matches raw input against the declared fields, in declaration order.
pub fn bind(schema: &Schema, raw: &IndexMap<String, Value>) -> Vec<(Arc<dyn Field>, Value)> {
    for key in raw.keys().filter(|key| !schema.contains(key)) {
        tracing::trace!(key = %key, "ignoring undeclared input key");
    }

    schema
        .fields()
        .iter()
        .map(|field| {
            let value = raw.get(field.name()).cloned().unwrap_or(Value::Null);
            (Arc::clone(field), value)
        })
        .collect()
}

impl Cycle<'_> {
    fn drive(&mut self, raw: &IndexMap<String, Value>) -> Result<(), ValidatorError> {
        self.transition(CleanState::Binding);
        let bound = bind(self.class.schema(), raw);

        self.transition(CleanState::FieldPass1);
        for (field, value) in bound {
            self.assign(field.as_ref(), value)?;
        }

        self.transition(CleanState::FieldHooks);
        let modified = self.field_hooks()?;

        self.transition(CleanState::FieldPass2);
        for (field, value) in modified {
            self.assign(field.as_ref(), value)?;
        }

        self.transition(CleanState::FormHook);
        self.form_hook()
    }

    fn transition(&mut self, next: CleanState) {
        tracing::debug!(from = %self.state, to = %next, "clean state transition");
        self.state = next;
    }

    /// Assigns through `field`; on success the stored value enters the
    /// cleaned data, on failure the error is recorded.
    fn assign(&mut self, field: &dyn Field, raw: Value) -> Result<(), ValidatorError> {
        let name = field.name();
        match field.set(&mut self.store, raw) {
            Ok(()) => {
                let value = self.store.get(name).cloned().unwrap_or(Value::Null);
                tracing::trace!(field = name, value = %value, "field passed");
                self.cleaned_data.insert(name, value);
                Ok(())
            }
            Err(error) => {
                tracing::trace!(field = name, error = %error, "field rejected");
                self.record(name, error)
            }
        }
    }

    fn field_hooks(&mut self) -> Result<Vec<(Arc<dyn Field>, Value)>, ValidatorError> {
        let class = self.class;
        let mut modified = Vec::new();

        for field in class.schema().fields() {
            let name = field.name();
            let Some(hook) = class.field_hook(name) else {
                continue;
            };
            let Some(current) = self.cleaned_data.get(name).cloned() else {
                continue;
            };

            tracing::trace!(field = name, "running field hook");
            match hook(&current, &self.cleaned_data) {
                Ok(value) => modified.push((Arc::clone(field), value)),
                Err(mut error) => {
                    if error.field.is_none() {
                        error.field = Some(name.to_string());
                    }
                    self.record(name, FieldError::Validation(error))?;
                }
            }
        }

        Ok(modified)
    }

    fn form_hook(&mut self) -> Result<(), ValidatorError> {
        let class = self.class;
        let Some(hook) = class.form_hook() else {
            return Ok(());
        };
        if !self.errors.is_empty() {
            tracing::debug!("skipping form hook after field errors");
            return Ok(());
        }

        match hook(&mut self.cleaned_data) {
            Ok(()) => Ok(()),
            Err(error) => {
                let key = match &error.field {
                    Some(field) if class.schema().contains(field) => field.clone(),
                    _ => NON_FIELD_ERRORS.to_string(),
                };
                self.record(&key, FieldError::Validation(error))
            }
        }
    }

    /// Records `error` under `key` and drops the key from the cleaned data.
    fn record(&mut self, key: &str, error: FieldError) -> Result<(), ValidatorError> {
        self.cleaned_data.remove(key);
        self.errors.add(key, error.clone());
        if self.raise_on_error {
            tracing::debug!(key, "stopping at first failure");
            return Err(ValidatorError::Field {
                field: key.to_string(),
                source: error,
            });
        }
        Ok(())
    }
}

/// Runs the clean cycle of `form` and returns its result as data.
///
/// An unbound form yields a single non-field error.
pub fn full_clean(form: &mut Form) -> Result<CleanedData, ErrorDict> {
    match form.full_clean() {
        Ok(()) if form.errors().is_empty() => Ok(form.cleaned_data().clone()),
        Err(ValidatorError::Unbound(name)) => {
            let mut errors = ErrorDict::new();
            errors.add(
                NON_FIELD_ERRORS,
                ValidationError::new(format!("No data was provided for {name}"), "unbound"),
            );
            Err(errors)
        }
        Ok(()) | Err(_) => Err(form.errors().clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use validator_rs_fields::{IntField, StringField};

    fn class_with_counter(counter: Arc<AtomicUsize>) -> Arc<FormClass> {
        FormClass::builder("CountingForm")
            .field("name", StringField::new().max_length(5))
            .field("age", IntField::new().min_value(18))
            .clean_field("name", move |value, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(value.clone())
            })
            .build()
            .unwrap()
    }

    fn raw(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_bind_ignores_unknown_and_fills_missing() {
        let class = class_with_counter(Arc::default());
        let bound = bind(
            class.schema(),
            &raw(&[("age", Value::Int(20)), ("height", Value::Int(180))]),
        );
        let pairs: Vec<_> = bound.iter().map(|(f, v)| (f.name(), v.clone())).collect();
        assert_eq!(pairs, [("name", Value::Null), ("age", Value::Int(20))]);
    }

    #[test]
    fn test_full_scan_records_every_failure() {
        let class = class_with_counter(Arc::default());
        let outcome = run(
            &class,
            &raw(&[("name", Value::from("too long")), ("age", Value::Int(2))]),
            false,
        );
        assert_eq!(outcome.state, CleanState::Invalid);
        assert_eq!(outcome.errors.keys().collect::<Vec<_>>(), ["name", "age"]);
        assert!(outcome.cleaned_data.is_empty());
        assert!(outcome.raised.is_none());
    }

    #[test]
    fn test_hooks_only_run_for_passing_fields() {
        let counter = Arc::new(AtomicUsize::new(0));
        let class = class_with_counter(Arc::clone(&counter));

        run(&class, &raw(&[("name", Value::from("too long"))]), false);
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        run(&class, &raw(&[("name", Value::from("Ann"))]), false);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_raise_stops_at_first_failure() {
        let class = class_with_counter(Arc::default());
        let outcome = run(
            &class,
            &raw(&[("name", Value::from("too long")), ("age", Value::Int(2))]),
            true,
        );
        assert_eq!(outcome.state, CleanState::Invalid);
        assert_eq!(outcome.errors.keys().collect::<Vec<_>>(), ["name"]);
        assert!(matches!(
            outcome.raised,
            Some(ValidatorError::Field { ref field, .. }) if field == "name"
        ));
    }

    #[test]
    fn test_full_clean_on_unbound_form() {
        let class = class_with_counter(Arc::default());
        let mut form = Form::new(&class);
        let errors = full_clean(&mut form).unwrap_err();
        assert_eq!(
            errors.messages(NON_FIELD_ERRORS),
            ["No data was provided for CountingForm"]
        );
    }

    #[test]
    fn test_full_clean_returns_cleaned_data() {
        let class = class_with_counter(Arc::default());
        let mut form = Form::bound(&class, [("name", Value::from("Ann")), ("age", Value::Int(30))]);
        let cleaned = full_clean(&mut form).unwrap();
        assert_eq!(cleaned.get("age"), Some(&Value::Int(30)));
    }
}

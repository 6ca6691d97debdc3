use validator_rs_core::ConstraintViolation;

use super::{Field, FieldKind, FieldSpec};
use crate::value::Value;

/// A boolean. No constraints beyond nullability.
#[derive(Debug, Clone)]
pub struct BooleanField {
    spec: FieldSpec,
}

impl BooleanField {
    /// Creates a boolean field.
    pub fn new() -> Self {
        Self {
            spec: FieldSpec::new(FieldKind::Bool),
        }
    }
}

impl Default for BooleanField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for BooleanField {
    fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    fn spec_mut(&mut self) -> &mut FieldSpec {
        &mut self.spec
    }

    fn built_in_validation(&self, _value: &Value) -> Result<(), ConstraintViolation> {
        Ok(())
    }
}

use std::fmt;

use validator_rs_core::ConstraintViolation;

use super::{Field, FieldKind, FieldSpec};
use crate::constraints::{self, RangeKind};
use crate::value::Value;

/// A number type a [`NumericField`] can hold.
pub trait Numeric: Copy + PartialOrd + fmt::Display + fmt::Debug + Send + Sync + 'static {
    /// The kind values are coerced to.
    const KIND: FieldKind;

    /// Extracts the number from a coerced value.
    fn extract(value: &Value) -> Option<Self>;
}

impl Numeric for i64 {
    const KIND: FieldKind = FieldKind::Int;

    fn extract(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl Numeric for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn extract(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

/// A number with optional inclusive `min_value` / `max_value` bounds.
#[derive(Debug, Clone)]
pub struct NumericField<N: Numeric> {
    spec: FieldSpec,
    min_value: Option<N>,
    max_value: Option<N>,
}

/// An integer field.
pub type IntField = NumericField<i64>;

/// A floating-point field.
pub type FloatField = NumericField<f64>;

impl<N: Numeric> NumericField<N> {
    /// Creates an unbounded field.
    pub fn new() -> Self {
        Self {
            spec: FieldSpec::new(N::KIND),
            min_value: None,
            max_value: None,
        }
    }

    /// Sets the inclusive lower bound.
    #[must_use]
    pub fn min_value(mut self, min: N) -> Self {
        self.min_value = Some(min);
        self
    }

    /// Sets the inclusive upper bound.
    #[must_use]
    pub fn max_value(mut self, max: N) -> Self {
        self.max_value = Some(max);
        self
    }
}

impl<N: Numeric> Default for NumericField<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Numeric> Field for NumericField<N> {
    fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    fn spec_mut(&mut self) -> &mut FieldSpec {
        &mut self.spec
    }

    fn built_in_validation(&self, value: &Value) -> Result<(), ConstraintViolation> {
        let Some(n) = N::extract(value) else {
            return Ok(());
        };
        constraints::check_range(
            self.name(),
            &n,
            self.min_value.as_ref(),
            self.max_value.as_ref(),
            RangeKind::Value,
        )
    }
}

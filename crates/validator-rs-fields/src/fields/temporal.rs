use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use validator_rs_core::{ConstraintViolation, Settings, SETTINGS};

use super::{Field, FieldKind, FieldSpec};
use crate::coercion;
use crate::constraints::{self, RangeKind};
use crate::value::Value;

/// A point in time a [`TemporalField`] can hold.
pub trait Temporal: Copy + PartialOrd + fmt::Display + fmt::Debug + Send + Sync + 'static {
    /// The kind values are coerced to.
    const KIND: FieldKind;

    /// Extracts the point in time from a coerced value.
    fn extract(value: &Value) -> Option<Self>;

    /// Parses `raw`, trying `formats` (or the configured ones) first.
    fn parse(raw: &Value, formats: Option<&[String]>, settings: &Settings) -> Result<Value, String>;
}

impl Temporal for NaiveDate {
    const KIND: FieldKind = FieldKind::Date;

    fn extract(value: &Value) -> Option<Self> {
        value.as_date()
    }

    fn parse(raw: &Value, formats: Option<&[String]>, settings: &Settings) -> Result<Value, String> {
        coercion::to_date(
            raw,
            formats.unwrap_or(settings.date_input_formats.as_slice()),
            &settings.datetime_input_formats,
        )
    }
}

impl Temporal for NaiveDateTime {
    const KIND: FieldKind = FieldKind::DateTime;

    fn extract(value: &Value) -> Option<Self> {
        value.as_datetime()
    }

    fn parse(raw: &Value, formats: Option<&[String]>, settings: &Settings) -> Result<Value, String> {
        coercion::to_datetime(
            raw,
            formats.unwrap_or(settings.datetime_input_formats.as_slice()),
            &settings.date_input_formats,
        )
    }
}

/// A date or date-time with optional inclusive `min_date` / `max_date` bounds.
///
/// Under `force_conversion`, strings are parsed with the field's own input
/// formats when set, otherwise with the configured ones. A date-only string
/// assigned to a [`DateTimeField`] lands at midnight.
#[derive(Debug, Clone)]
pub struct TemporalField<T: Temporal> {
    spec: FieldSpec,
    min_date: Option<T>,
    max_date: Option<T>,
    input_formats: Option<Vec<String>>,
}

/// A date field.
pub type DateField = TemporalField<NaiveDate>;

/// A date-time field.
pub type DateTimeField = TemporalField<NaiveDateTime>;

impl<T: Temporal> TemporalField<T> {
    /// Creates an unbounded field.
    pub fn new() -> Self {
        Self {
            spec: FieldSpec::new(T::KIND),
            min_date: None,
            max_date: None,
            input_formats: None,
        }
    }

    /// Sets the inclusive lower bound.
    #[must_use]
    pub fn min_date(mut self, min: T) -> Self {
        self.min_date = Some(min);
        self
    }

    /// Sets the inclusive upper bound.
    #[must_use]
    pub fn max_date(mut self, max: T) -> Self {
        self.max_date = Some(max);
        self
    }

    /// Sets the `strftime` formats tried before the fallback formats.
    #[must_use]
    pub fn input_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }
}

impl<T: Temporal> Default for TemporalField<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Temporal> Field for TemporalField<T> {
    fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    fn spec_mut(&mut self) -> &mut FieldSpec {
        &mut self.spec
    }

    fn convert(&self, raw: &Value) -> Result<Value, String> {
        T::parse(raw, self.input_formats.as_deref(), SETTINGS.get_or_default())
    }

    fn built_in_validation(&self, value: &Value) -> Result<(), ConstraintViolation> {
        let Some(t) = T::extract(value) else {
            return Ok(());
        };
        constraints::check_range(
            self.name(),
            &t,
            self.min_date.as_ref(),
            self.max_date.as_ref(),
            RangeKind::Date,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use validator_rs_core::Rule;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_bounds() {
        let mut field = DateField::new()
            .min_date(ymd(2000, 1, 1))
            .max_date(ymd(2000, 12, 31));
        field.bind("Audience", "joined").unwrap();

        assert!(field.validate(Value::Date(ymd(2000, 1, 1))).is_ok());
        let err = field.validate(Value::Date(ymd(2001, 1, 1))).unwrap_err();
        assert_eq!(err.code(), Rule::MaxDate.code());
        assert_eq!(
            err.to_string(),
            "Field `joined` value 2001-01-01 is greater than max date 2000-12-31"
        );
    }

    #[test]
    fn test_date_is_strict_by_default() {
        let mut field = DateField::new();
        field.bind("Audience", "joined").unwrap();
        assert!(field.validate(Value::from("2000-11-07")).unwrap_err().is_conversion());
    }

    #[test]
    fn test_forced_date_parsing() {
        let mut field = DateField::new().force_conversion(true);
        field.bind("Audience", "joined").unwrap();

        assert_eq!(
            field.validate(Value::from("2000-11-07")).unwrap(),
            Value::Date(ymd(2000, 11, 7))
        );
        assert_eq!(
            field.validate(Value::from("11/07/2000")).unwrap(),
            Value::Date(ymd(2000, 11, 7))
        );

        let err = field.validate(Value::from("200-10-2000")).unwrap_err();
        assert!(err.is_conversion());
        assert!(err.to_string().contains("Unknown string format: 200-10-2000"));
    }

    #[test]
    fn test_own_input_formats_come_first() {
        let mut field = DateField::new()
            .force_conversion(true)
            .input_formats(["%d.%m.%Y"]);
        field.bind("Audience", "joined").unwrap();

        assert_eq!(
            field.validate(Value::from("07.11.2000")).unwrap(),
            Value::Date(ymd(2000, 11, 7))
        );
    }

    #[test]
    fn test_datetime_from_date_string_is_midnight() {
        let mut field = DateTimeField::new()
            .force_conversion(true)
            .min_date(ymd(2000, 1, 1).and_time(NaiveTime::MIN));
        field.bind("Audience", "created").unwrap();

        assert_eq!(
            field.validate(Value::from("2000-11-07")).unwrap(),
            Value::DateTime(ymd(2000, 11, 7).and_time(NaiveTime::MIN))
        );
        assert!(field
            .validate(Value::from("1999-12-31 23:59"))
            .unwrap_err()
            .is_constraint());
    }
}

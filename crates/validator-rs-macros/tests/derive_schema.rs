//! Integration tests for `#[derive(Schema)]`.
//!
//! These tests verify that the generated schema declares the struct's
//! fields with the right rules, and that validated values come back as the
//! typed struct.

use chrono::NaiveDate;
use validator_rs_core::{Rule, ValidationError, ValidatorError};
use validator_rs_fields::{Declared, FieldKind, Host, Value};
use validator_rs_forms::{Form, FormClass};
use validator_rs_macros::Schema;

// ── Basic schema ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Schema)]
pub struct Audience {
    #[field(min_value = 18, max_value = 60, force_conversion)]
    pub age: i64,

    #[field(min_length = 1, max_length = 5, force_conversion)]
    pub name: Option<String>,

    #[field(kind = "email")]
    pub email: String,

    #[field(kind = "url")]
    pub social_media_link: Option<String>,

    #[field(force_conversion)]
    pub date_of_birth: NaiveDate,
}

fn alice() -> Audience {
    Audience {
        age: 30,
        name: Some("Alice".to_string()),
        email: "alice@test.com".to_string(),
        social_media_link: None,
        date_of_birth: NaiveDate::from_ymd_opt(1994, 3, 1).unwrap(),
    }
}

#[test]
fn test_audience_field_order() {
    let schema = Audience::schema().unwrap();
    assert_eq!(schema.owner(), "Audience");
    assert_eq!(
        schema.names().collect::<Vec<_>>(),
        ["age", "name", "email", "social_media_link", "date_of_birth"]
    );
}

#[test]
fn test_audience_field_kinds() {
    let schema = Audience::schema().unwrap();
    let kind = |name: &str| schema.field(name).unwrap().spec().kind;
    assert_eq!(kind("age"), FieldKind::Int);
    assert_eq!(kind("name"), FieldKind::String);
    assert_eq!(kind("email"), FieldKind::String);
    assert_eq!(kind("date_of_birth"), FieldKind::Date);
}

#[test]
fn test_option_fields_are_nullable() {
    let schema = Audience::schema().unwrap();
    assert!(schema.field("name").unwrap().spec().nullable);
    assert!(schema.field("social_media_link").unwrap().spec().nullable);
    assert!(!schema.field("age").unwrap().spec().nullable);
}

#[test]
fn test_declared_rules_apply() {
    let schema = Audience::schema().unwrap();
    let age = schema.field("age").unwrap();

    let err = age.validate(Value::Int(17)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Field `age` value 17 is smaller than min value 18"
    );
    assert_eq!(age.validate(Value::from("18")).unwrap(), Value::Int(18));

    let email = schema.field("email").unwrap();
    assert_eq!(
        email.validate(Value::from("invalid4test.com")).unwrap_err().code(),
        Rule::Pattern.code()
    );
}

// ── Instances ───────────────────────────────────────────────────────────

#[test]
fn test_validate_instance() {
    let record = alice().validate().unwrap();
    assert_eq!(record.get("age").unwrap(), Value::Int(30));
    assert_eq!(record.get("social_media_link").unwrap(), Value::Null);
}

#[test]
fn test_validate_rejects_bad_instance() {
    let mut audience = alice();
    audience.name = Some("Alice Cooper".to_string());

    let err = audience.validate().unwrap_err();
    assert!(matches!(err, ValidatorError::Field { ref field, .. } if field == "name"));
}

#[test]
fn test_from_cleaned_data_through_form() {
    let class = FormClass::builder("AudienceForm")
        .fields_of::<Audience>()
        .build()
        .unwrap();
    let mut form = Form::bound(
        &class,
        [
            ("age", Value::from("30")),
            ("name", Value::from("Alice")),
            ("email", Value::from("alice@test.com")),
            ("date_of_birth", Value::from("1994-03-01")),
        ],
    );

    assert!(form.is_valid(), "{:?}", form.errors());
    assert_eq!(form.to_typed::<Audience>().unwrap(), alice());
}

#[test]
fn test_from_cleaned_data_missing_required() {
    let data = [("age".to_string(), Value::Int(30))]
        .into_iter()
        .collect::<std::collections::HashMap<_, _>>();

    let err = Audience::from_cleaned_data(&data).unwrap_err();
    assert!(matches!(err, ValidatorError::Unset(ref name) if name == "email"));
}

// ── Extra attributes ────────────────────────────────────────────────────

fn not_admin(value: &Value) -> Result<(), ValidationError> {
    if value.as_str() == Some("admin") {
        Err(ValidationError::invalid("reserved user name"))
    } else {
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq, Schema)]
#[schema(name = "Account")]
pub struct AccountInput {
    #[field(rename = "user_name", validator = not_admin)]
    pub name: String,

    #[field(choices("free", "pro"), default = "free")]
    pub plan: String,

    #[field(min_value = 0, max_value = 100)]
    pub discount: f64,

    #[field(min_date = "2000-01-01", force_conversion)]
    pub joined: Option<NaiveDate>,

    #[field(skip)]
    pub session: Vec<u8>,
}

#[test]
fn test_schema_name_and_rename() {
    let schema = AccountInput::schema().unwrap();
    assert_eq!(schema.owner(), "Account");
    assert_eq!(
        schema.names().collect::<Vec<_>>(),
        ["user_name", "plan", "discount", "joined"]
    );
}

#[test]
fn test_validator_and_choices() {
    let schema = AccountInput::schema().unwrap();

    let err = schema
        .field("user_name")
        .unwrap()
        .validate(Value::from("admin"))
        .unwrap_err();
    assert_eq!(err.to_string(), "reserved user name");

    let plan = schema.field("plan").unwrap();
    assert!(plan.validate(Value::from("pro")).is_ok());
    assert_eq!(
        plan.validate(Value::from("gold")).unwrap_err().code(),
        "invalid_choice"
    );
    assert_eq!(plan.spec().default, Some(Value::from("free")));
}

#[test]
fn test_float_and_date_bounds() {
    let schema = AccountInput::schema().unwrap();

    let discount = schema.field("discount").unwrap();
    assert!(discount.validate(Value::Float(12.5)).is_ok());
    assert!(discount.validate(Value::Float(100.5)).is_err());

    let joined = schema.field("joined").unwrap();
    let err = joined.validate(Value::from("1999-12-31")).unwrap_err();
    assert_eq!(err.code(), Rule::MinDate.code());
    assert!(joined.validate(Value::from("2001-05-05")).is_ok());
}

#[test]
fn test_skipped_field_uses_default() {
    let data: std::collections::HashMap<String, Value> = [
        ("user_name".to_string(), Value::from("bob")),
        ("plan".to_string(), Value::from("pro")),
        ("discount".to_string(), Value::Float(5.0)),
    ]
    .into_iter()
    .collect();

    let account = AccountInput::from_cleaned_data(&data).unwrap();
    assert_eq!(account.name, "bob");
    assert_eq!(account.joined, None);
    assert!(account.session.is_empty());

    let names: Vec<_> = account.to_values().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, ["user_name", "plan", "discount", "joined"]);
}

// ── Declaration errors ──────────────────────────────────────────────────

#[derive(Debug, Schema)]
pub struct BrokenPattern {
    #[field(pattern = "(")]
    pub code: String,
}

#[test]
fn test_bad_pattern_is_a_declaration_error() {
    let err = BrokenPattern::schema().unwrap_err();
    assert!(err.is_programmer_error());
    assert!(err.to_string().contains("BrokenPattern.code: invalid pattern"));
}

#[test]
fn test_bad_pattern_fails_form_build() {
    let result = FormClass::builder("BrokenForm")
        .fields_of::<BrokenPattern>()
        .build();
    assert!(matches!(result, Err(ValidatorError::Declaration(_))));
}

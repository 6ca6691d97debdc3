//! # validator-rs-macros
//!
//! Procedural macros for validator-rs. `#[derive(Schema)]` turns a plain
//! struct into a declared type: its fields become a
//! `validator_rs_fields::Schema`, and validated values can be read back into
//! the struct.
//!
//! This crate is independent of all other validator-rs crates because
//! proc-macro crates cannot depend on crates that use them.
//!
//! ```ignore
//! use validator_rs_fields::Declared;
//! use validator_rs_macros::Schema;
//!
//! #[derive(Schema)]
//! struct Audience {
//!     #[field(min_value = 18, max_value = 60, force_conversion)]
//!     age: i64,
//!     #[field(min_length = 1, max_length = 5)]
//!     name: Option<String>,
//!     #[field(kind = "email")]
//!     email: String,
//! }
//!
//! let schema = Audience::schema()?;
//! ```

mod schema;
mod string_list;
mod types;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `validator_rs_fields::Declared` for a struct with named fields.
///
/// Struct attribute: `#[schema(name = "...")]` sets the owner name used in
/// messages (defaults to the struct name).
///
/// Field attributes, all under `#[field(...)]`:
///
/// | Attribute | Applies to | Effect |
/// |-----------|------------|--------|
/// | `kind = "..."` | all | `int`, `float`, `string`, `email`, `url`, `bool`, `date`, `datetime`; inferred from the type when omitted |
/// | `min_value`, `max_value` | numbers | inclusive bounds |
/// | `min_length`, `max_length` | strings | inclusive character counts |
/// | `pattern = "..."` | strings | regular expression |
/// | `choices("a", "b")` | strings | allowed values |
/// | `min_date`, `max_date` | dates | ISO `YYYY-MM-DD` (date-times also take a time) |
/// | `nullable` | all | accept null; inferred from `Option<T>` |
/// | `force_conversion` | all | convert mismatched input instead of rejecting it |
/// | `default = expr` | all | value read before any assignment; `"text"` stays a string, other expressions are used as written |
/// | `validator = path` | all | `fn(&Value) -> Result<(), ValidationError>` run after the built-in rules |
/// | `rename = "..."` | all | declared name, if not the Rust name |
/// | `skip` | all | not declared; rebuilt with `Default::default()` |
#[proc_macro_derive(Schema, attributes(schema, field))]
pub fn derive_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    schema::derive_schema_impl(&input).into()
}

//! `#[derive(Schema)]` implementation.
//!
//! Generates a `validator_rs_fields::Declared` impl: a schema builder chain
//! with one field per struct member, typed extraction from any value source,
//! and the reverse mapping back to values.

use darling::{FromDeriveInput, FromField};
use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::string_list::StringList;
use crate::types::{is_option_type, type_name, unwrap_option_type};

/// Struct-level attributes from `#[schema(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(schema), supports(struct_named))]
pub struct SchemaOpts {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    pub data: darling::ast::Data<(), FieldOpts>,

    /// Owner name used in messages.
    #[darling(default)]
    pub name: Option<String>,
}

/// Per-field attributes from `#[field(...)]`.
#[derive(Debug, FromField)]
#[darling(attributes(field))]
pub struct FieldOpts {
    pub ident: Option<syn::Ident>,
    pub ty: syn::Type,

    #[darling(default)]
    pub kind: Option<String>,

    #[darling(default)]
    pub rename: Option<String>,

    #[darling(default)]
    pub skip: bool,

    #[darling(default)]
    pub nullable: Option<bool>,

    #[darling(default)]
    pub force_conversion: bool,

    #[darling(default)]
    pub min_value: Option<syn::Expr>,

    #[darling(default)]
    pub max_value: Option<syn::Expr>,

    #[darling(default)]
    pub min_length: Option<usize>,

    #[darling(default)]
    pub max_length: Option<usize>,

    #[darling(default)]
    pub pattern: Option<String>,

    #[darling(default)]
    pub choices: Option<StringList>,

    #[darling(default)]
    pub min_date: Option<String>,

    #[darling(default)]
    pub max_date: Option<String>,

    #[darling(default, with = default_expr)]
    pub default: Option<syn::Expr>,

    #[darling(default)]
    pub validator: Option<syn::Path>,
}

/// Reads `default = ...` as written: a string literal stays a string.
fn default_expr(meta: &syn::Meta) -> darling::Result<Option<syn::Expr>> {
    match meta {
        syn::Meta::NameValue(nv) => Ok(Some(nv.value.clone())),
        other => Err(darling::Error::unsupported_format("non-value").with_span(other)),
    }
}

/// The field variant a struct member maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Int,
    Float,
    String,
    Email,
    Url,
    Bool,
    Date,
    DateTime,
}

impl Kind {
    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "int" => Self::Int,
            "float" => Self::Float,
            "string" => Self::String,
            "email" => Self::Email,
            "url" => Self::Url,
            "bool" => Self::Bool,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            _ => return None,
        })
    }

    fn infer(ty: &syn::Type) -> Option<Self> {
        let inner = unwrap_option_type(ty).unwrap_or(ty);
        Some(match type_name(inner).as_str() {
            "i64" | "i32" => Self::Int,
            "f64" => Self::Float,
            "String" => Self::String,
            "bool" => Self::Bool,
            "NaiveDate" => Self::Date,
            "NaiveDateTime" => Self::DateTime,
            _ => return None,
        })
    }

    const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    const fn is_string(self) -> bool {
        matches!(self, Self::String | Self::Email | Self::Url)
    }

    const fn is_temporal(self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }

    fn constructor(self) -> TokenStream {
        match self {
            Self::Int => quote! { ::validator_rs_fields::IntField::new() },
            Self::Float => quote! { ::validator_rs_fields::FloatField::new() },
            Self::String => quote! { ::validator_rs_fields::StringField::new() },
            Self::Email => quote! { ::validator_rs_fields::StringField::email() },
            Self::Url => quote! { ::validator_rs_fields::StringField::url() },
            Self::Bool => quote! { ::validator_rs_fields::BooleanField::new() },
            Self::Date => quote! { ::validator_rs_fields::DateField::new() },
            Self::DateTime => quote! { ::validator_rs_fields::DateTimeField::new() },
        }
    }
}

/// Generates the `Declared` implementation for the struct.
pub fn derive_schema_impl(input: &DeriveInput) -> TokenStream {
    let opts = match SchemaOpts::from_derive_input(input) {
        Ok(o) => o,
        Err(e) => return e.write_errors(),
    };
    match expand(&opts) {
        Ok(tokens) => tokens,
        Err(e) => e.write_errors(),
    }
}

fn expand(opts: &SchemaOpts) -> darling::Result<TokenStream> {
    let struct_name = &opts.ident;
    let owner = opts.name.clone().unwrap_or_else(|| struct_name.to_string());
    let (impl_generics, ty_generics, where_clause) = opts.generics.split_for_impl();

    let Some(fields) = opts.data.as_ref().take_struct() else {
        return Err(darling::Error::unsupported_shape("enum").with_span(struct_name));
    };

    let mut errors = darling::Error::accumulator();
    let mut declarations = Vec::new();
    let mut extractions = Vec::new();
    let mut values = Vec::new();

    for field in fields.fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };

        if field.skip {
            extractions.push(quote! { #ident: ::core::default::Default::default() });
            continue;
        }

        let name = field.rename.clone().unwrap_or_else(|| ident.to_string());
        if let Some(declaration) = errors.handle(generate_declaration(&owner, &name, field)) {
            declarations.push(declaration);
        }
        extractions.push(quote! {
            #ident: ::validator_rs_fields::extract(data, #name)?
        });
        values.push(quote! {
            (#name, ::validator_rs_fields::Value::from(::core::clone::Clone::clone(&self.#ident)))
        });
    }

    errors.finish()?;

    Ok(quote! {
        impl #impl_generics ::validator_rs_fields::Declared for #struct_name #ty_generics #where_clause {
            fn schema() -> ::core::result::Result<
                ::validator_rs_fields::Schema,
                ::validator_rs_fields::__core::ValidatorError,
            > {
                #[allow(unused_imports)]
                use ::validator_rs_fields::Field as _;

                ::validator_rs_fields::Schema::builder(#owner)
                    #(#declarations)*
                    .build()
            }

            #[allow(unused_variables)]
            fn from_cleaned_data<S: ::validator_rs_fields::ValueSource + ?Sized>(
                data: &S,
            ) -> ::core::result::Result<Self, ::validator_rs_fields::__core::ValidatorError> {
                ::core::result::Result::Ok(Self {
                    #(#extractions),*
                })
            }

            fn to_values(&self) -> ::std::vec::Vec<(&'static str, ::validator_rs_fields::Value)> {
                ::std::vec![#(#values),*]
            }
        }
    })
}

/// Generates one `.field(name, constructor...)` call.
fn generate_declaration(owner: &str, name: &str, f: &FieldOpts) -> darling::Result<TokenStream> {
    let span_of = |msg: String| darling::Error::custom(msg).with_span(&f.ty);

    let kind = match &f.kind {
        Some(explicit) => Kind::parse(explicit).ok_or_else(|| {
            span_of(format!(
                "unknown field kind `{explicit}`; expected int, float, string, email, url, bool, date or datetime"
            ))
        })?,
        None => Kind::infer(&f.ty).ok_or_else(|| {
            span_of(format!(
                "cannot infer the field kind of `{name}`; set #[field(kind = \"...\")]"
            ))
        })?,
    };

    let misplaced = |attr: &str, applies_to: &str| {
        span_of(format!("`{attr}` applies to {applies_to} fields only"))
    };

    let mut errors = darling::Error::accumulator();
    let mut chain = Vec::new();

    if f.min_value.is_some() || f.max_value.is_some() {
        if kind.is_numeric() {
            if let Some(ref min) = f.min_value {
                let min = numeric_literal(min, kind);
                chain.push(quote! { .min_value(#min) });
            }
            if let Some(ref max) = f.max_value {
                let max = numeric_literal(max, kind);
                chain.push(quote! { .max_value(#max) });
            }
        } else {
            errors.push(misplaced("min_value/max_value", "int and float"));
        }
    }

    let has_string_rule = f.min_length.is_some()
        || f.max_length.is_some()
        || f.pattern.is_some()
        || f.choices.is_some();
    if has_string_rule && !kind.is_string() {
        errors.push(misplaced("min_length/max_length/pattern/choices", "string"));
    } else {
        if let Some(min) = f.min_length {
            chain.push(quote! { .min_length(#min) });
        }
        if let Some(max) = f.max_length {
            chain.push(quote! { .max_length(#max) });
        }
        if let Some(ref pattern) = f.pattern {
            chain.push(quote! {
                .pattern(::validator_rs_fields::derive_support::pattern(#owner, #name, #pattern)?)
            });
        }
        if let Some(ref choices) = f.choices {
            let items = &choices.0;
            chain.push(quote! {
                .validator(::validator_rs_fields::ChoicesValidator::new(
                    ::validator_rs_fields::derive_support::choices(&[#(#items),*]),
                ))
            });
        }
    }

    if f.min_date.is_some() || f.max_date.is_some() {
        if kind.is_temporal() {
            let parse = if kind == Kind::Date {
                quote! { ::validator_rs_fields::derive_support::date }
            } else {
                quote! { ::validator_rs_fields::derive_support::datetime }
            };
            if let Some(ref min) = f.min_date {
                chain.push(quote! { .min_date(#parse(#owner, #name, #min)?) });
            }
            if let Some(ref max) = f.max_date {
                chain.push(quote! { .max_date(#parse(#owner, #name, #max)?) });
            }
        } else {
            errors.push(misplaced("min_date/max_date", "date and datetime"));
        }
    }

    errors.finish()?;

    if f.nullable.unwrap_or_else(|| is_option_type(&f.ty)) {
        chain.push(quote! { .nullable(true) });
    }
    if f.force_conversion {
        chain.push(quote! { .force_conversion(true) });
    }
    if let Some(ref default) = f.default {
        chain.push(quote! { .default_value(#default) });
    }
    if let Some(ref path) = f.validator {
        let label = quote!(#path).to_string().replace(' ', "");
        chain.push(quote! {
            .validator(::validator_rs_fields::FnValidator::new(#label, #path))
        });
    }

    let constructor = kind.constructor();
    Ok(quote! {
        .field(#name, #constructor #(#chain)*)
    })
}

/// Float bounds written as integer literals (`min_value = 0`) become `0.0`.
fn numeric_literal(expr: &syn::Expr, kind: Kind) -> TokenStream {
    if kind != Kind::Float {
        return quote! { #expr };
    }
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Int(int),
            ..
        }) => float_from_int(int),
        syn::Expr::Unary(syn::ExprUnary {
            op: syn::UnOp::Neg(_),
            expr: inner,
            ..
        }) => match inner.as_ref() {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Int(int),
                ..
            }) => {
                let float = float_from_int(int);
                quote! { -#float }
            }
            _ => quote! { #expr },
        },
        _ => quote! { #expr },
    }
}

fn float_from_int(int: &syn::LitInt) -> TokenStream {
    let lit = syn::LitFloat::new(&format!("{}.0", int.base10_digits()), int.span());
    quote! { #lit }
}

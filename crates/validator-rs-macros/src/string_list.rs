//! A `Vec<String>` attribute value.
//!
//! Accepts both `choices("a", "b")` and `choices = ["a", "b"]`.

use darling::FromMeta;

#[derive(Debug, Clone, Default)]
pub struct StringList(pub Vec<String>);

fn string_literal(lit: &syn::Lit) -> darling::Result<String> {
    match lit {
        syn::Lit::Str(s) => Ok(s.value()),
        other => Err(darling::Error::unexpected_lit_type(other)),
    }
}

impl FromMeta for StringList {
    fn from_list(items: &[darling::ast::NestedMeta]) -> darling::Result<Self> {
        items
            .iter()
            .map(|item| match item {
                darling::ast::NestedMeta::Lit(lit) => string_literal(lit),
                darling::ast::NestedMeta::Meta(_) => {
                    Err(darling::Error::unexpected_type("non-string literal"))
                }
            })
            .collect::<darling::Result<Vec<_>>>()
            .map(StringList)
    }

    fn from_expr(expr: &syn::Expr) -> darling::Result<Self> {
        let syn::Expr::Array(array) = expr else {
            return Err(darling::Error::unexpected_expr_type(expr));
        };
        array
            .elems
            .iter()
            .map(|elem| match elem {
                syn::Expr::Lit(syn::ExprLit { lit, .. }) => string_literal(lit),
                other => Err(darling::Error::unexpected_expr_type(other)),
            })
            .collect::<darling::Result<Vec<_>>>()
            .map(StringList)
    }
}

//! Type inspection helpers.

use quote::quote;
use syn::Type;

/// Returns `true` if the type is `Option<T>`.
pub(crate) fn is_option_type(ty: &Type) -> bool {
    unwrap_option_type(ty).is_some()
}

/// If the type is `Option<T>`, returns `Some(&T)`. Otherwise `None`.
pub(crate) fn unwrap_option_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty {
        let segment = type_path.path.segments.last()?;
        if segment.ident == "Option" {
            if let syn::PathArguments::AngleBracketed(ref args) = segment.arguments {
                if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                    return Some(inner);
                }
            }
        }
    }
    None
}

/// Returns the last path segment of a type, e.g. `NaiveDate` for
/// `chrono::NaiveDate`.
pub(crate) fn type_name(ty: &Type) -> String {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map_or_else(|| quote!(#ty).to_string(), |s| s.ident.to_string()),
        _ => quote!(#ty).to_string(),
    }
}

//! The export block: marker constants and the `schema()` entry point.

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use swagql_runtime::Markers;

use crate::tree::Declaration;

/// Generates the marker constants and `schema()`.
///
/// `declarations` pairs every declaration with the function that builds it,
/// in tree order.
///
/// ## Examples
///
/// ```ignore
/// pub const FETCH: &str = "swagql.fetch.4f2a...";
/// pub const VERIFY_AUTH_STATUS: &str = "swagql.verify_auth_status.4f2a...";
///
/// pub fn schema() -> Result<swagql_runtime::ExecutableSchema, swagql_runtime::AssemblyError> {
///     swagql_runtime::SchemaAssembly::new(swagql_runtime::Markers::new(FETCH, VERIFY_AUTH_STATUS))
///         .scalar(json_type())
///         .object(pet_type())
///         .query(query_type())
///         .finish()
/// }
/// ```
pub fn generate_exports(markers: &Markers, declarations: &[(&Declaration, Ident)]) -> TokenStream {
    let fetch = markers.fetch.as_str();
    let verify = markers.verify_auth_status.as_str();

    let registrations = declarations.iter().map(|(declaration, fn_name)| {
        match declaration {
            Declaration::Scalar(_) => quote!(.scalar(#fn_name())),
            Declaration::Enum(_) => quote!(.enum_type(#fn_name())),
            Declaration::Object(_) => quote!(.object(#fn_name())),
            Declaration::InputObject(_) => quote!(.input_object(#fn_name())),
            Declaration::Query(_) => quote!(.query(#fn_name())),
            Declaration::Mutation(_) => quote!(.mutation(#fn_name())),
        }
    });

    quote! {
        /// Key under which the execution context holds the fetch capability.
        pub const FETCH: &str = #fetch;

        /// Key under which the execution context holds the auth verifier.
        pub const VERIFY_AUTH_STATUS: &str = #verify;

        /// Assembles the executable schema.
        pub fn schema() -> Result<swagql_runtime::ExecutableSchema, swagql_runtime::AssemblyError> {
            swagql_runtime::SchemaAssembly::new(swagql_runtime::Markers::new(FETCH, VERIFY_AUTH_STATUS))
                #(#registrations)*
                .finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::format_ident;
    use swagql_runtime::{ObjectType, ScalarType};

    #[test]
    fn registers_declarations_in_order() {
        let json = Declaration::Scalar(ScalarType::new("JSON"));
        let query = Declaration::Query(ObjectType::new("Query"));
        let tokens = generate_exports(
            &Markers::new("swagql.fetch.ab", "swagql.verify_auth_status.ab"),
            &[
                (&json, format_ident!("json_type")),
                (&query, format_ident!("query_type")),
            ],
        );
        let source = prettyplease::unparse(&syn::parse2(tokens).unwrap());

        assert!(source.contains("pub const FETCH: &str = \"swagql.fetch.ab\";"));
        assert!(source.contains("pub const VERIFY_AUTH_STATUS: &str = \"swagql.verify_auth_status.ab\";"));
        let scalar = source.find(".scalar(json_type())").unwrap();
        let root = source.find(".query(query_type())").unwrap();
        assert!(scalar < root);
    }
}

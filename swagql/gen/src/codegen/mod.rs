//! Code generation for swagql modules.
//!
//! Turns a [`SyntaxTree`] into tokens for one self-contained Rust module.
//!
//! ## Submodules
//!
//! - [`declarations`] - One builder function per declaration
//! - [`exports`] - Marker constants and the `schema()` entry point
//!
//! ## Output Format
//!
//! Generators return `proc_macro2::TokenStream`, which is then validated
//! with `syn::parse2` and formatted with `prettyplease`. See
//! [`crate::output`].

pub mod declarations;
pub mod exports;

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

pub use declarations::generate_declaration;
pub use exports::generate_exports;

use crate::errors::GeneratorError;
use crate::identifiers::{Case, Scope};
use crate::tree::{Declaration, Item, SyntaxTree};

/// Generates the module body for `tree`, in tree order.
///
/// Builder functions are named `<type>_type` in snake case; collisions get
/// numeric suffixes.
pub fn generate_module(tree: &SyntaxTree) -> Result<TokenStream, GeneratorError> {
    let mut fn_names = Scope::new("generated functions", Case::Snake).with_reserved(&["schema"]);
    let mut registered: Vec<(&Declaration, Ident)> = Vec::new();
    let mut tokens = TokenStream::new();

    for item in &tree.items {
        match item {
            Item::Plugin { item, .. } => tokens.extend(quote!(#item)),
            Item::Declaration(decl) => {
                let fn_name =
                    format_ident!("{}", fn_names.fresh(&format!("{} type", decl.declaration.name()))?);
                tokens.extend(generate_declaration(decl, &fn_name));
                registered.push((&decl.declaration, fn_name));
            }
            Item::Exports(markers) => tokens.extend(generate_exports(markers, &registered)),
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use swagql_runtime::{Markers, ObjectType, ScalarType};

    #[test]
    fn function_names_are_unique_snake_case() {
        let mut tree = SyntaxTree::new("test");
        tree.push_declaration(Declaration::Scalar(ScalarType::new("JSON")), None);
        tree.push_declaration(Declaration::Object(ObjectType::new("PetSafe")), None);
        tree.push_declaration(Declaration::Object(ObjectType::new("Pet_Safe")), None);
        tree.push_exports(Markers::new("f", "v"));

        let source = prettyplease::unparse(&syn::parse2(generate_module(&tree).unwrap()).unwrap());
        assert!(source.contains("pub fn json_type()"));
        assert!(source.contains("pub fn pet_safe_type()"));
        assert!(source.contains("pub fn pet_safe_type2()"));
        assert!(source.contains(".object(pet_safe_type2())"));
    }
}

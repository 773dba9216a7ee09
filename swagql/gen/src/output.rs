//! Output assembly: validation, formatting and the provenance header.
//!
//! ## Safety Guarantees
//!
//! - **Validation**: All generated code is validated with `syn` before it is returned
//! - **Formatting**: Output is formatted with `prettyplease` for consistent style

use proc_macro2::TokenStream;
use swagql_define::SpecDocument;

use crate::codegen::generate_module;
use crate::errors::GeneratorError;
use crate::tree::SyntaxTree;

/// The provenance header for a document, without the leading `//`.
///
/// ```
/// use swagql_define::SpecDocument;
/// use swagql_gen::output::provenance;
///
/// let doc = SpecDocument::from_json(r#"{"info": {"title": "Petstore", "version": "1.0.0"}}"#).unwrap();
/// assert!(provenance(&doc).starts_with("Generated by swagql-gen "));
/// assert!(provenance(&doc).ends_with(" from Petstore 1.0.0"));
/// ```
pub fn provenance(doc: &SpecDocument) -> String {
    let header = format!(
        "Generated by swagql-gen {} from {} {}",
        env!("CARGO_PKG_VERSION"),
        doc.info.title,
        doc.info.version
    );
    // Keep the header a single comment line.
    header.replace(['\r', '\n'], " ")
}

/// Validates generated code by parsing it with syn.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the tokens do not form a valid
/// Rust file.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {e}")))
}

/// Formats generated code using prettyplease, prepending the header as a
/// single line comment.
pub fn format_code(file: &syn::File, header: &str) -> String {
    let formatted = prettyplease::unparse(file);
    format!("// {header}\n\n{formatted}")
}

/// Serializes a tree to formatted source text.
pub fn render_source(tree: &SyntaxTree) -> Result<String, GeneratorError> {
    let tokens = generate_module(tree)?;
    let file = validate_code(&tokens)?;
    Ok(format_code(&file, &tree.header))
}

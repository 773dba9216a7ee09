//! swagql schema generator library.
//!
//! This crate turns a Swagger 2.0 document into a GraphQL schema module:
//! Rust source text that rebuilds the schema through `swagql-runtime`, plus
//! the same schema instantiated in-process.
//!
//! ## Pipeline
//!
//! 1. [`graph`] - Resolve every definition and inline schema into a type graph
//! 2. [`identifiers`] - Map raw names onto GraphQL-safe identifiers
//! 3. [`operations`] - Extract one descriptor per path and verb
//! 4. [`resolvers`] - Bind each descriptor to a REST call
//! 5. [`emitter`] - Lay declarations out in a [`tree::SyntaxTree`]
//! 6. [`plugins`] - Splice plugin statements ahead of the declarations
//! 7. [`codegen`] / [`output`] - Serialize, validate and format the module
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::PathBuf;
//! use swagql_define::SpecDocument;
//! use swagql_gen::generate_schema;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = SpecDocument::from_json(&std::fs::read_to_string("petstore.json")?)?;
//! let module = generate_schema(&doc, &[PathBuf::from("plugins/env.rs")]).await?;
//! println!("{}", module.source_text);
//!
//! let schema = module.executable_schema()?;
//! println!("{}", schema.sdl());
//! # Ok(())
//! # }
//! ```

pub mod codegen;
pub mod emitter;
pub mod errors;
pub mod graph;
pub mod identifiers;
pub mod operations;
pub mod output;
pub mod plugins;
pub mod resolvers;
pub mod tree;

#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use swagql_define::SpecDocument;
use swagql_runtime::{ExecutableSchema, Markers};
use tracing::info;

pub use errors::GeneratorError;
pub use plugins::{FilePlugin, Plugin, PluginContribution};
pub use tree::{ApiTypeTag, Declaration, DeclarationItem, Item, SyntaxTree};

use crate::emitter::{RootFields, emit_declarations};
use crate::graph::GraphBuilder;
use crate::identifiers::{Case, Scope};
use crate::operations::{RootKind, extract_operations};
use crate::output::{provenance, render_source};
use crate::resolvers::synthesize;

/// Generation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Appended to an object's name to form its input type name.
    pub input_suffix: String,
    /// Adds the `rawInputOptions` field to every object type.
    pub emit_raw_input_options: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            input_suffix: "Input".to_string(),
            emit_raw_input_options: true,
        }
    }
}

/// The result of one generation call.
#[derive(Debug, Clone)]
pub struct GeneratedModule {
    pub tree: SyntaxTree,
    /// Formatted Rust source, starting with the provenance line.
    pub source_text: String,
    pub markers: Markers,
}

impl GeneratedModule {
    /// Instantiates the schema in-process from the tree's descriptors.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::SchemaBuild` when the runtime rejects the
    /// schema, e.g. because the document declares no query operation.
    pub fn executable_schema(&self) -> Result<ExecutableSchema, GeneratorError> {
        self.tree
            .assembly(self.markers.clone())
            .finish()
            .map_err(|e| GeneratorError::SchemaBuild(e.to_string()))
    }
}

/// Derives the capability marker keys from the document's content.
///
/// Identical documents always produce identical keys.
pub fn compute_markers(doc: &SpecDocument) -> Markers {
    let digest = blake3::hash(&doc.canonical_bytes()).to_hex();
    Markers::new(
        format!("swagql.fetch.{digest}"),
        format!("swagql.verify_auth_status.{digest}"),
    )
}

/// Generates a module with default options, loading plugins from files.
pub async fn generate_schema(
    doc: &SpecDocument,
    plugins: &[PathBuf],
) -> Result<GeneratedModule, GeneratorError> {
    generate_schema_with_options(doc, plugins, &GeneratorOptions::default()).await
}

/// Generates a module, loading plugins from files.
pub async fn generate_schema_with_options(
    doc: &SpecDocument,
    plugins: &[PathBuf],
    options: &GeneratorOptions,
) -> Result<GeneratedModule, GeneratorError> {
    let plugins = plugins::file_plugins(plugins);
    generate_with_plugins(doc, &plugins, options).await
}

/// Generates a module with arbitrary [`Plugin`] implementations.
///
/// Every plugin is loaded before any code is emitted.
pub async fn generate_with_plugins(
    doc: &SpecDocument,
    plugins: &[Box<dyn Plugin>],
    options: &GeneratorOptions,
) -> Result<GeneratedModule, GeneratorError> {
    let sources = plugins::load_sources(plugins).await?;
    let contributions = plugins::parse_sources(sources)?;
    generate_from_contributions(doc, contributions, options)
}

/// Generates a module from already-parsed plugin contributions.
pub fn generate_from_contributions(
    doc: &SpecDocument,
    contributions: Vec<PluginContribution>,
    options: &GeneratorOptions,
) -> Result<GeneratedModule, GeneratorError> {
    let mut builder = GraphBuilder::new(doc, options.emit_raw_input_options);
    builder.build_definitions()?;

    let mut query_scope = Scope::new("fields of Query", Case::LowerCamel);
    let mut mutation_scope = Scope::new("fields of Mutation", Case::LowerCamel);
    let operations = extract_operations(doc, &mut builder, &mut query_scope, &mut mutation_scope)?;
    let mut graph = builder.finish();

    let mut roots = RootFields::default();
    for op in &operations {
        let field = synthesize(&mut graph, op, &options.input_suffix)?;
        match op.kind {
            RootKind::Query => roots.query.push(field),
            RootKind::Mutation => roots.mutation.push(field),
        }
    }
    let (queries, mutations) = (roots.query.len(), roots.mutation.len());

    let markers = compute_markers(doc);
    let mut tree = SyntaxTree::new(provenance(doc));
    emit_declarations(&mut tree, &mut graph, roots, options)?;
    tree.push_exports(markers.clone());
    tree.insert_plugin_contributions(contributions);

    let source_text = render_source(&tree)?;

    info!(
        title = %doc.info.title,
        types = graph.len(),
        inputs = graph.input_count(),
        queries,
        mutations,
        plugin_items = tree.plugin_items().count(),
        "generated schema module"
    );

    Ok(GeneratedModule {
        tree,
        source_text,
        markers,
    })
}

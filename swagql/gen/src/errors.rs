//! Error types for the swagql generator.

use std::path::PathBuf;

use swagql_define::{DocumentError, Verb};
use thiserror::Error;

/// Errors that can occur during schema generation.
///
/// Every variant is fatal: generation never returns a partial module.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A schema uses a construct the type graph cannot represent.
    #[error("Unsupported schema at '{pointer}': {reason}")]
    UnsupportedSchema {
        /// JSON pointer to the offending schema within the document.
        pointer: String,
        reason: String,
    },

    /// A raw name sanitizes to an empty identifier.
    #[error("Name '{raw}' in {scope} has no valid identifier characters")]
    InvalidIdentifier {
        raw: String,
        /// The naming scope, e.g. `fields of Pet`.
        scope: String,
    },

    /// Two operations share a verb and a path template.
    ///
    /// Paths are compared with parameter names erased, so `/pet/{id}` and
    /// `/pet/{petId}` are the same path.
    #[error("Duplicate operation: {verb} {path}")]
    DuplicateOperation { verb: Verb, path: String },

    /// A plugin could not be read or parsed.
    #[error("Failed to load plugin '{}': {reason}", path.display())]
    PluginLoadError { path: PathBuf, reason: String },

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// The generated descriptors were rejected by the runtime.
    #[error("Failed to build executable schema: {0}")]
    SchemaBuild(String),

    /// The input document could not be parsed.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Failed to read an input file
    #[error("Failed to read '{}': {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GeneratorError {
    pub(crate) fn unsupported(pointer: &str, reason: impl Into<String>) -> Self {
        Self::UnsupportedSchema {
            pointer: pointer.to_string(),
            reason: reason.into(),
        }
    }
}

//! SwagQL document model
//!
//! Types describing a Swagger 2.0 document, as consumed by `swagql-gen`.
//! The model keeps document order everywhere (via `indexmap`) so generation
//! over it is deterministic.
//!
//! ## Core Types
//!
//! - [`SpecDocument`] - The whole document: definitions plus paths
//! - [`PathItem`] / [`Operation`] - Operations per path template and verb
//! - [`Parameter`] - Operation parameters with their [`ParameterLocation`]
//! - [`Response`] - Response declarations
//! - [`Schema`] - The JSON Schema subset used for payloads
//! - [`Verb`] - HTTP verbs
//!
//! ## Examples
//!
//! ```
//! use swagql_define::SpecDocument;
//!
//! let doc = SpecDocument::from_json(r#"{
//!     "swagger": "2.0",
//!     "info": { "title": "Petstore", "version": "1.0.0" },
//!     "definitions": {
//!         "Pet": {
//!             "type": "object",
//!             "properties": { "is-nick-name": { "type": "boolean" } }
//!         }
//!     },
//!     "paths": {}
//! }"#).unwrap();
//!
//! assert!(doc.definitions["Pet"].properties.contains_key("is-nick-name"));
//! ```

pub mod document;
pub mod prelude;
pub mod schema;
pub mod types;

pub use document::{DocumentError, Info, Operation, Parameter, PathItem, Response, SpecDocument};
pub use schema::{AdditionalProperties, DEFINITIONS_PREFIX, Schema};
pub use types::{CollectionFormat, ParameterLocation, Verb};

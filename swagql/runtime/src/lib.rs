//! Runtime for GraphQL schemas generated from Swagger 2.0 documents.
//!
//! A generated module is a set of plain descriptors ([`ObjectType`],
//! [`InputObjectType`], [`EnumType`], [`ScalarType`]) fed into a
//! [`SchemaAssembly`]. Assembly yields an [`ExecutableSchema`] whose
//! operation fields call the REST API through capabilities found in the
//! request's [`ExecutionContext`].
//!
//! ## Examples
//!
//! ```no_run
//! use swagql_runtime::{AllowAll, ExecutableSchema, ExecutionContext, HttpFetcher};
//!
//! # async fn run(schema: ExecutableSchema) -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = ExecutionContext::new()
//!     .with_fetcher(&schema.markers.fetch, HttpFetcher::parse("http://localhost/v2")?)
//!     .with_auth_verifier(&schema.markers.verify_auth_status, AllowAll);
//!
//! let response = schema.execute("{ petById(petId: 1) { name } }", ctx).await;
//! assert!(response.errors.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod assembly;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod http;
pub mod names;
pub mod path;
pub mod request;
pub mod resolve;
pub mod translate;

pub use assembly::{AssemblyError, ExecutableSchema, SchemaAssembly};
pub use context::{AllowAll, AuthVerifier, Capability, ExecutionContext, Fetcher};
pub use descriptor::{
    EnumType, FieldResolver, FieldSpec, InputFieldSpec, InputObjectType, InputShape,
    JSON_SCALAR, MarkerKey, Markers, ObjectType, OperationBinding, OutputShape, ParamBinding,
    RAW_INPUT_OPTIONS_FIELD, ScalarType, TypeSpec,
};
pub use error::{AuthError, FetchError, ResolutionError};
pub use http::HttpFetcher;
pub use names::{NameConflict, NameMap};
pub use request::{OutboundRequest, RequestOptions};

pub use async_graphql::dynamic;
pub use async_graphql::{Request, Response, Variables};
pub use swagql_define::{CollectionFormat, ParameterLocation, Verb};

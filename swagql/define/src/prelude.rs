//! Convenient re-exports for working with Swagger documents.
//!
//! ```
//! use swagql_define::prelude::*;
//!
//! let doc = SpecDocument::default();
//! assert_eq!(doc.operations().count(), 0);
//! ```

pub use crate::document::{Info, Operation, Parameter, PathItem, Response, SpecDocument};
pub use crate::schema::Schema;
pub use crate::types::{CollectionFormat, ParameterLocation, Verb};

//! Schema descriptors: the intermediate representation shared by the
//! generator and the runtime.
//!
//! Descriptors are plain data. The generator builds them from a Swagger
//! document, serializes them to Rust source (each descriptor has a builder
//! constructor the emitted code calls), and [`crate::SchemaAssembly`] turns
//! them into an executable `async_graphql::dynamic::Schema`.
//!
//! ## Types
//!
//! - [`TypeSpec`] - A GraphQL type reference (`Pet`, `[Pet!]`, `Int!`)
//! - [`OutputShape`] / [`InputShape`] - How raw JSON maps onto GraphQL values
//! - [`ObjectType`] / [`FieldSpec`] / [`FieldResolver`] - Output types
//! - [`InputObjectType`] / [`InputFieldSpec`] - Input types
//! - [`EnumType`] / [`ScalarType`] - Leaf types
//! - [`OperationBinding`] / [`ParamBinding`] - A REST call behind a root field
//! - [`Markers`] / [`MarkerKey`] - Capability lookup keys

use std::fmt;

use async_graphql::dynamic::TypeRef;
use serde::{Deserialize, Serialize};
use swagql_define::{CollectionFormat, ParameterLocation, Verb};

/// A GraphQL type reference.
///
/// ## Examples
///
/// ```
/// use swagql_runtime::TypeSpec;
///
/// let ty = TypeSpec::named("Pet").non_null().list().non_null();
/// assert_eq!(ty.to_string(), "[Pet!]!");
/// assert_eq!(ty.base_name(), "Pet");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeSpec {
    Named(String),
    NonNull(Box<TypeSpec>),
    List(Box<TypeSpec>),
}

impl TypeSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Wraps in non-null; already non-null types are returned unchanged.
    pub fn non_null(self) -> Self {
        match self {
            Self::NonNull(_) => self,
            other => Self::NonNull(Box::new(other)),
        }
    }

    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// The innermost named type.
    pub fn base_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::NonNull(inner) | Self::List(inner) => inner.base_name(),
        }
    }

    /// Converts to the execution engine's type reference.
    pub fn to_type_ref(&self) -> TypeRef {
        match self {
            Self::Named(name) => TypeRef::Named(name.clone().into()),
            Self::NonNull(inner) => TypeRef::NonNull(Box::new(inner.to_type_ref())),
            Self::List(inner) => TypeRef::List(Box::new(inner.to_type_ref())),
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
            Self::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

/// How a raw JSON value is presented as a GraphQL output value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputShape {
    /// Passed through unchanged.
    Scalar,
    /// A raw string mapped onto an item of the named enum.
    Enum(String),
    /// A JSON object whose fields read raw keys.
    Object,
    List(Box<OutputShape>),
    /// The whole response body, wrapped even when it is empty.
    Raw,
}

/// How a GraphQL input value is turned back into raw JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputShape {
    Scalar,
    /// An enum item mapped back to its raw value.
    Enum(String),
    /// An input object whose sanitized keys map back to raw keys.
    Object(String),
    List(Box<InputShape>),
}

/// Lookup key under which an [`crate::ExecutionContext`] holds a capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerKey(String);

impl MarkerKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two capability keys a generated module exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    pub fetch: MarkerKey,
    pub verify_auth_status: MarkerKey,
}

impl Markers {
    pub fn new(fetch: impl Into<String>, verify_auth_status: impl Into<String>) -> Self {
        Self {
            fetch: MarkerKey::new(fetch),
            verify_auth_status: MarkerKey::new(verify_auth_status),
        }
    }
}

/// A scalar type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
}

impl ScalarType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An enum type declaration: raw values and their item names, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<(String, String)>,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            values: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an item named `item` standing for the raw value `raw`.
    pub fn value(mut self, raw: impl Into<String>, item: impl Into<String>) -> Self {
        self.values.push((raw.into(), item.into()));
        self
    }
}

/// How an output field computes its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldResolver {
    /// Reads `parent[raw]`.
    RawKey { raw: String, shape: OutputShape },
    /// The whole parent payload as JSON.
    ParentValue,
    /// The request options that produced the parent object.
    RawInputOptions,
    /// Issues a REST call.
    Operation(OperationBinding),
}

/// An output field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub ty: TypeSpec,
    pub description: Option<String>,
    pub deprecated: bool,
    pub resolver: FieldResolver,
}

/// Name of the field exposing request options on operation results.
pub const RAW_INPUT_OPTIONS_FIELD: &str = "rawInputOptions";

/// Name of the opaque JSON scalar.
pub const JSON_SCALAR: &str = "JSON";

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: TypeSpec, resolver: FieldResolver) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            deprecated: false,
            resolver,
        }
    }

    /// A field reading the raw key `raw` of its parent.
    pub fn raw_key(
        name: impl Into<String>,
        raw: impl Into<String>,
        ty: TypeSpec,
        shape: OutputShape,
    ) -> Self {
        Self::new(
            name,
            ty,
            FieldResolver::RawKey {
                raw: raw.into(),
                shape,
            },
        )
    }

    /// The `rawInputOptions: JSON` field.
    pub fn raw_input_options() -> Self {
        Self::new(
            RAW_INPUT_OPTIONS_FIELD,
            TypeSpec::named(JSON_SCALAR),
            FieldResolver::RawInputOptions,
        )
    }

    /// A `JSON` field returning the parent payload.
    pub fn parent_value(name: impl Into<String>) -> Self {
        Self::new(name, TypeSpec::named(JSON_SCALAR), FieldResolver::ParentValue)
    }

    /// A root field backed by a REST operation.
    pub fn operation(name: impl Into<String>, ty: TypeSpec, binding: OperationBinding) -> Self {
        Self::new(name, ty, FieldResolver::Operation(binding))
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }
}

/// An object type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }
}

/// An input object field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFieldSpec {
    pub name: String,
    pub raw: String,
    pub ty: TypeSpec,
    pub shape: InputShape,
    pub description: Option<String>,
}

impl InputFieldSpec {
    pub fn new(
        name: impl Into<String>,
        raw: impl Into<String>,
        ty: TypeSpec,
        shape: InputShape,
    ) -> Self {
        Self {
            name: name.into(),
            raw: raw.into(),
            ty,
            shape,
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An input object type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<InputFieldSpec>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: InputFieldSpec) -> Self {
        self.fields.push(field);
        self
    }
}

/// One argument of an operation field and where it goes in the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamBinding {
    pub raw: String,
    pub name: String,
    pub location: ParameterLocation,
    pub ty: TypeSpec,
    pub shape: InputShape,
    pub collection_format: CollectionFormat,
    pub description: Option<String>,
}

impl ParamBinding {
    pub fn new(
        raw: impl Into<String>,
        name: impl Into<String>,
        location: ParameterLocation,
        ty: TypeSpec,
        shape: InputShape,
    ) -> Self {
        Self {
            raw: raw.into(),
            name: name.into(),
            location,
            ty,
            shape,
            collection_format: CollectionFormat::default(),
            description: None,
        }
    }

    pub fn collection_format(mut self, format: CollectionFormat) -> Self {
        self.collection_format = format;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The REST call behind a Query or Mutation field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationBinding {
    pub verb: Verb,
    /// Path template, e.g. `/pet/{petId}`.
    pub path: String,
    pub operation_id: String,
    pub params: Vec<ParamBinding>,
    pub response: OutputShape,
}

impl OperationBinding {
    pub fn new(
        verb: Verb,
        path: impl Into<String>,
        operation_id: impl Into<String>,
        response: OutputShape,
    ) -> Self {
        Self {
            verb,
            path: path.into(),
            operation_id: operation_id.into(),
            params: Vec::new(),
            response,
        }
    }

    pub fn param(mut self, param: ParamBinding) -> Self {
        self.params.push(param);
        self
    }

    /// Raw parameter name for a sanitized argument name.
    pub fn raw_param_name(&self, argument: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name == argument)
            .map(|p| p.raw.as_str())
    }
}

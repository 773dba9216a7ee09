//! Assembly of descriptors into an executable schema.

use std::sync::Arc;

use async_graphql::dynamic::{
    Enum, EnumItem, InputObject, InputValue, Object, Scalar, Schema, SchemaError,
};
use async_graphql::{Request, Response};
use thiserror::Error;
use tracing::debug;

use crate::context::ExecutionContext;
use crate::descriptor::{
    EnumType, FieldResolver, InputObjectType, InputShape, Markers, ObjectType, OutputShape,
    ScalarType,
};
use crate::names::NameConflict;
use crate::resolve::{ModuleData, build_field};
use crate::translate::TypeRegistry;

/// Errors raised while assembling a schema.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// An enum maps two raw values to one item, or one value to two items.
    #[error("Enum '{enum_name}' is not one-to-one: {source}")]
    EnumConflict {
        enum_name: String,
        #[source]
        source: NameConflict,
    },

    /// A shape names an enum or input object that was never registered.
    #[error("Unknown type '{name}' referenced from '{referrer}'")]
    UnknownType { name: String, referrer: String },

    /// No Query root was supplied.
    #[error("Schema has no Query root")]
    MissingQuery,

    /// The execution engine rejected the schema.
    #[error("Failed to build schema: {0}")]
    Build(#[from] SchemaError),
}

/// Collects descriptors and builds an [`ExecutableSchema`].
///
/// ## Examples
///
/// ```
/// use swagql_runtime::{FieldSpec, Markers, ObjectType, ScalarType, SchemaAssembly, TypeSpec};
///
/// let schema = SchemaAssembly::new(Markers::new("f", "v"))
///     .scalar(ScalarType::new("JSON"))
///     .query(ObjectType::new("Query").field(FieldSpec::parent_value("echo")))
///     .finish()
///     .unwrap();
///
/// assert!(schema.sdl().contains("scalar JSON"));
/// ```
#[derive(Debug, Clone)]
pub struct SchemaAssembly {
    markers: Markers,
    scalars: Vec<ScalarType>,
    objects: Vec<ObjectType>,
    inputs: Vec<InputObjectType>,
    enums: Vec<EnumType>,
    query: Option<ObjectType>,
    mutation: Option<ObjectType>,
}

impl SchemaAssembly {
    pub fn new(markers: Markers) -> Self {
        Self {
            markers,
            scalars: Vec::new(),
            objects: Vec::new(),
            inputs: Vec::new(),
            enums: Vec::new(),
            query: None,
            mutation: None,
        }
    }

    pub fn scalar(mut self, scalar: ScalarType) -> Self {
        self.scalars.push(scalar);
        self
    }

    pub fn object(mut self, object: ObjectType) -> Self {
        self.objects.push(object);
        self
    }

    pub fn input_object(mut self, input: InputObjectType) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn enum_type(mut self, ty: EnumType) -> Self {
        self.enums.push(ty);
        self
    }

    pub fn query(mut self, query: ObjectType) -> Self {
        self.query = Some(query);
        self
    }

    pub fn mutation(mut self, mutation: ObjectType) -> Self {
        self.mutation = Some(mutation);
        self
    }

    /// Validates shape references and builds the schema.
    pub fn finish(self) -> Result<ExecutableSchema, AssemblyError> {
        let query = self.query.ok_or(AssemblyError::MissingQuery)?;

        let mut registry = TypeRegistry::new();
        for ty in &self.enums {
            registry
                .register_enum(ty)
                .map_err(|source| AssemblyError::EnumConflict {
                    enum_name: ty.name.clone(),
                    source,
                })?;
        }
        for ty in &self.inputs {
            registry.register_input(ty);
        }

        for ty in &self.inputs {
            for field in &ty.fields {
                check_input_shape(&registry, &field.shape, &ty.name)?;
            }
        }
        let roots = std::iter::once(&query).chain(self.mutation.as_ref());
        for object in self.objects.iter().chain(roots) {
            for field in &object.fields {
                match &field.resolver {
                    FieldResolver::RawKey { shape, .. } => {
                        check_output_shape(&registry, shape, &object.name)?
                    }
                    FieldResolver::Operation(binding) => {
                        check_output_shape(&registry, &binding.response, &object.name)?;
                        for param in &binding.params {
                            check_input_shape(&registry, &param.shape, &object.name)?;
                        }
                    }
                    FieldResolver::ParentValue | FieldResolver::RawInputOptions => {}
                }
            }
        }

        let module = Arc::new(ModuleData {
            markers: self.markers.clone(),
            registry,
        });

        let mut builder = Schema::build(
            &query.name,
            self.mutation.as_ref().map(|m| m.name.as_str()),
            None,
        );

        for scalar in &self.scalars {
            let mut ty = Scalar::new(&scalar.name);
            if let Some(description) = &scalar.description {
                ty = ty.description(description);
            }
            builder = builder.register(ty);
        }

        for def in &self.enums {
            let mut ty = Enum::new(&def.name);
            if let Some(description) = &def.description {
                ty = ty.description(description);
            }
            for (_, item) in &def.values {
                ty = ty.item(EnumItem::new(item));
            }
            builder = builder.register(ty);
        }

        for def in &self.inputs {
            let mut ty = InputObject::new(&def.name);
            if let Some(description) = &def.description {
                ty = ty.description(description);
            }
            for field in &def.fields {
                let mut value = InputValue::new(&field.name, field.ty.to_type_ref());
                if let Some(description) = &field.description {
                    value = value.description(description);
                }
                ty = ty.field(value);
            }
            builder = builder.register(ty);
        }

        let roots = std::iter::once(&query).chain(self.mutation.as_ref());
        for def in self.objects.iter().chain(roots) {
            builder = builder.register(build_object(def, &module));
        }

        debug!(
            objects = self.objects.len(),
            inputs = self.inputs.len(),
            enums = self.enums.len(),
            "assembling schema"
        );

        Ok(ExecutableSchema {
            schema: builder.finish()?,
            markers: self.markers,
        })
    }
}

fn build_object(def: &ObjectType, module: &Arc<ModuleData>) -> Object {
    let mut object = Object::new(&def.name);
    if let Some(description) = &def.description {
        object = object.description(description);
    }
    def.fields
        .iter()
        .fold(object, |object, field| object.field(build_field(field, module)))
}

fn check_input_shape(
    registry: &TypeRegistry,
    shape: &InputShape,
    referrer: &str,
) -> Result<(), AssemblyError> {
    match shape {
        InputShape::Scalar => Ok(()),
        InputShape::Enum(name) if registry.has_enum(name) => Ok(()),
        InputShape::Object(name) if registry.has_input(name) => Ok(()),
        InputShape::Enum(name) | InputShape::Object(name) => Err(AssemblyError::UnknownType {
            name: name.clone(),
            referrer: referrer.to_string(),
        }),
        InputShape::List(inner) => check_input_shape(registry, inner, referrer),
    }
}

fn check_output_shape(
    registry: &TypeRegistry,
    shape: &OutputShape,
    referrer: &str,
) -> Result<(), AssemblyError> {
    match shape {
        OutputShape::Scalar | OutputShape::Object | OutputShape::Raw => Ok(()),
        OutputShape::Enum(name) if registry.has_enum(name) => Ok(()),
        OutputShape::Enum(name) => Err(AssemblyError::UnknownType {
            name: name.clone(),
            referrer: referrer.to_string(),
        }),
        OutputShape::List(inner) => check_output_shape(registry, inner, referrer),
    }
}

/// A live schema plus the marker keys its resolvers look up.
#[derive(Clone)]
pub struct ExecutableSchema {
    pub schema: Schema,
    pub markers: Markers,
}

impl ExecutableSchema {
    /// Executes `request` with `ctx` attached.
    pub async fn execute(&self, request: impl Into<Request>, ctx: ExecutionContext) -> Response {
        self.schema.execute(request.into().data(ctx)).await
    }

    /// GraphQL SDL of the schema.
    pub fn sdl(&self) -> String {
        self.schema.sdl()
    }
}

impl std::fmt::Debug for ExecutableSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutableSchema")
            .field("markers", &self.markers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FieldSpec, InputFieldSpec, TypeSpec};

    fn markers() -> Markers {
        Markers::new("swagql.fetch.t", "swagql.verify_auth_status.t")
    }

    fn query() -> ObjectType {
        ObjectType::new("Query").field(FieldSpec::parent_value("echo"))
    }

    #[test]
    fn builds_sdl_with_enums_and_inputs() {
        let schema = SchemaAssembly::new(markers())
            .scalar(ScalarType::new("JSON"))
            .enum_type(EnumType::new("Status").value("on-hold", "ON_HOLD"))
            .input_object(InputObjectType::new("TagInput").field(InputFieldSpec::new(
                "tagName",
                "tag-name",
                TypeSpec::named("String"),
                InputShape::Scalar,
            )))
            .query(query())
            .finish()
            .unwrap();

        let sdl = schema.sdl();
        assert!(sdl.contains("enum Status"));
        assert!(sdl.contains("ON_HOLD"));
        assert!(sdl.contains("input TagInput"));
        assert!(sdl.contains("tagName: String"));
    }

    #[test]
    fn rejects_missing_query() {
        let err = SchemaAssembly::new(markers()).finish().unwrap_err();
        assert!(matches!(err, AssemblyError::MissingQuery));
    }

    #[test]
    fn rejects_unknown_enum_reference() {
        let err = SchemaAssembly::new(markers())
            .scalar(ScalarType::new("JSON"))
            .object(ObjectType::new("Pet").field(FieldSpec::raw_key(
                "status",
                "status",
                TypeSpec::named("Status"),
                OutputShape::Enum("Status".into()),
            )))
            .query(query())
            .finish()
            .unwrap_err();
        assert!(matches!(err, AssemblyError::UnknownType { ref name, .. } if name == "Status"));
    }

    #[test]
    fn rejects_non_bijective_enum() {
        let err = SchemaAssembly::new(markers())
            .enum_type(
                EnumType::new("Status")
                    .value("on-hold", "ON_HOLD")
                    .value("on_hold", "ON_HOLD"),
            )
            .query(query())
            .finish()
            .unwrap_err();
        assert!(matches!(err, AssemblyError::EnumConflict { .. }));
    }
}

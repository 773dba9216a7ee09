//! Field resolvers.
//!
//! Each [`FieldResolver`] descriptor becomes an `async_graphql` dynamic
//! field whose closure holds only shared, immutable data.

use std::sync::Arc;

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, InputValue};
use async_graphql::{ErrorExtensions, Value as GqlValue};
use serde_json::Value;
use tracing::{debug, warn};

use crate::context::ExecutionContext;
use crate::descriptor::{FieldResolver, FieldSpec, Markers, OperationBinding, OutputShape};
use crate::error::{FetchError, ResolutionError};
use crate::request::{RequestOptions, build_request};
use crate::translate::TypeRegistry;

/// Data shared by every resolver of one schema.
#[derive(Debug, Clone)]
pub struct ModuleData {
    pub markers: Markers,
    pub registry: TypeRegistry,
}

/// The parent value of object fields: a raw payload plus the options of
/// the request that produced it.
#[derive(Debug, Clone)]
pub struct ResolvedObject {
    pub payload: Value,
    /// Set only on objects returned directly from an operation.
    pub options: Option<Arc<RequestOptions>>,
}

/// Builds the dynamic field for `spec`.
pub fn build_field(spec: &FieldSpec, module: &Arc<ModuleData>) -> Field {
    let field = match &spec.resolver {
        FieldResolver::RawKey { raw, shape } => raw_key_field(spec, raw, shape, module),
        FieldResolver::ParentValue => Field::new(&spec.name, spec.ty.to_type_ref(), |ctx| {
            FieldFuture::new(async move {
                let parent = ctx.parent_value.try_downcast_ref::<ResolvedObject>()?;
                Ok(Some(FieldValue::value(to_gql(parent.payload.clone())?)))
            })
        }),
        FieldResolver::RawInputOptions => Field::new(&spec.name, spec.ty.to_type_ref(), |ctx| {
            FieldFuture::new(async move {
                let parent = ctx.parent_value.try_downcast_ref::<ResolvedObject>()?;
                match &parent.options {
                    Some(options) => Ok(Some(FieldValue::value(to_gql(options.to_json())?))),
                    None => Ok(None),
                }
            })
        }),
        FieldResolver::Operation(binding) => operation_field(spec, binding, module),
    };

    let field = match &spec.description {
        Some(description) => field.description(description),
        None => field,
    };
    if spec.deprecated {
        field.deprecation(None)
    } else {
        field
    }
}

fn raw_key_field(
    spec: &FieldSpec,
    raw: &str,
    shape: &OutputShape,
    module: &Arc<ModuleData>,
) -> Field {
    let raw = raw.to_string();
    let shape = shape.clone();
    let module = Arc::clone(module);

    Field::new(&spec.name, spec.ty.to_type_ref(), move |ctx| {
        let raw = raw.clone();
        let shape = shape.clone();
        let module = Arc::clone(&module);
        FieldFuture::new(async move {
            let parent = ctx.parent_value.try_downcast_ref::<ResolvedObject>()?;
            let value = parent.payload.get(&raw).cloned().unwrap_or(Value::Null);
            shape_output(value, &shape, &module.registry, None).map_err(|e| e.extend())
        })
    })
}

fn operation_field(spec: &FieldSpec, binding: &OperationBinding, module: &Arc<ModuleData>) -> Field {
    let arguments: Vec<InputValue> = binding
        .params
        .iter()
        .map(|param| {
            let input = InputValue::new(&param.name, param.ty.to_type_ref());
            match &param.description {
                Some(description) => input.description(description),
                None => input,
            }
        })
        .collect();

    let binding = Arc::new(binding.clone());
    let module = Arc::clone(module);

    let field = Field::new(&spec.name, spec.ty.to_type_ref(), move |ctx| {
        let binding = Arc::clone(&binding);
        let module = Arc::clone(&module);
        FieldFuture::new(async move {
            let exec = ctx
                .data_opt::<ExecutionContext>()
                .cloned()
                .ok_or(ResolutionError::MissingContext)
                .map_err(|e| e.extend())?;
            let args: Vec<Option<GqlValue>> = binding
                .params
                .iter()
                .map(|param| ctx.args.get(&param.name).map(|v| v.as_value().clone()))
                .collect();

            resolve_operation(&exec, &binding, &module, args)
                .await
                .map_err(|e| {
                    warn!(operation = %binding.operation_id, error = %e, "operation failed");
                    e.extend()
                })
        })
    });

    arguments
        .into_iter()
        .fold(field, |field, argument| field.argument(argument))
}

/// Runs one REST operation and shapes its payload.
///
/// Verification happens before any argument is translated.
async fn resolve_operation<'a>(
    exec: &ExecutionContext,
    binding: &OperationBinding,
    module: &ModuleData,
    args: Vec<Option<GqlValue>>,
) -> Result<Option<FieldValue<'a>>, ResolutionError> {
    let verifier = exec.auth_verifier(&module.markers.verify_auth_status)?;
    verifier.verify(binding).await?;

    let mut raw_args = Vec::with_capacity(binding.params.len());
    for (param, value) in binding.params.iter().zip(args) {
        if let Some(value) = value {
            let raw = module.registry.to_raw(&param.name, &value, &param.shape)?;
            raw_args.push((param, raw));
        }
    }

    let request = build_request(binding, &raw_args)?;
    let fetcher = exec.fetcher(&module.markers.fetch)?;

    debug!(
        operation = %binding.operation_id,
        method = %request.options.method,
        url_path = %request.url_path,
        "fetching"
    );
    let payload = fetcher.fetch(&request.url_path, &request.options).await?;

    shape_output(
        payload,
        &binding.response,
        &module.registry,
        Some(Arc::new(request.options)),
    )
}

/// Presents a raw JSON value according to `shape`.
pub fn shape_output<'a>(
    value: Value,
    shape: &OutputShape,
    registry: &TypeRegistry,
    options: Option<Arc<RequestOptions>>,
) -> Result<Option<FieldValue<'a>>, ResolutionError> {
    if let OutputShape::Raw = shape {
        return Ok(Some(FieldValue::owned_any(ResolvedObject {
            payload: value,
            options,
        })));
    }
    if value.is_null() {
        return Ok(None);
    }

    match shape {
        OutputShape::Scalar => Ok(Some(FieldValue::value(to_gql_value(value)?))),
        OutputShape::Enum(enum_name) => match registry.enum_output(enum_name, &value) {
            Some(item) => Ok(Some(FieldValue::value(item))),
            None => {
                warn!(enum_name = %enum_name, value = %value, "unmapped enum value");
                Ok(None)
            }
        },
        OutputShape::Object | OutputShape::Raw => Ok(Some(FieldValue::owned_any(ResolvedObject {
            payload: value,
            options,
        }))),
        OutputShape::List(inner) => {
            let items = match value {
                Value::Array(items) => items,
                single => vec![single],
            };
            let shaped = items
                .into_iter()
                .map(|item| {
                    shape_output(item, inner, registry, options.clone())
                        .map(|v| v.unwrap_or(FieldValue::NULL))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(FieldValue::list(shaped)))
        }
    }
}

fn to_gql_value(value: Value) -> Result<GqlValue, ResolutionError> {
    GqlValue::from_json(value).map_err(|e| FetchError::Decode(e.to_string()).into())
}

fn to_gql(value: Value) -> async_graphql::Result<GqlValue> {
    to_gql_value(value).map_err(|e| e.extend())
}

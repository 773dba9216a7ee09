//! Resolver synthesis: operation descriptors become runtime bindings.
//!
//! The runtime contract of a binding is implemented by
//! `swagql_runtime::resolve`; this module only decides shapes and types.

use swagql_runtime::{
    FieldSpec, InputShape, OperationBinding, OutputShape, ParamBinding, TypeSpec,
};

use crate::errors::GeneratorError;
use crate::graph::{RAW_RESPONSE, TypeGraph, TypeId, TypeKind};
use crate::operations::OperationDescriptor;

/// Output type of a node. Output positions are always nullable.
pub fn output_type(graph: &TypeGraph, id: TypeId) -> TypeSpec {
    match &graph.node(id).kind {
        TypeKind::Array { item } => output_type(graph, *item).list(),
        _ => TypeSpec::named(graph.type_name(id)),
    }
}

/// How a raw value of a node is presented.
pub fn output_shape(graph: &TypeGraph, id: TypeId) -> OutputShape {
    match &graph.node(id).kind {
        TypeKind::Object { .. } => OutputShape::Object,
        TypeKind::Array { item } => OutputShape::List(Box::new(output_shape(graph, *item))),
        TypeKind::Enum { .. } => OutputShape::Enum(graph.type_name(id).to_string()),
        TypeKind::Scalar(_) | TypeKind::Json => OutputShape::Scalar,
    }
}

/// Input type of a node; objects map to their input counterparts.
///
/// `required` makes the outer type non-null.
pub fn input_type(
    graph: &mut TypeGraph,
    id: TypeId,
    required: bool,
    suffix: &str,
) -> Result<TypeSpec, GeneratorError> {
    let ty = match graph.node(id).kind.clone() {
        TypeKind::Object { .. } => TypeSpec::named(graph.input_name(id, suffix)?),
        TypeKind::Array { item } => input_type(graph, item, false, suffix)?.list(),
        _ => TypeSpec::named(graph.type_name(id)),
    };
    Ok(if required { ty.non_null() } else { ty })
}

/// How an input value of a node is translated back to raw JSON.
pub fn input_shape(
    graph: &mut TypeGraph,
    id: TypeId,
    suffix: &str,
) -> Result<InputShape, GeneratorError> {
    Ok(match graph.node(id).kind.clone() {
        TypeKind::Object { .. } => InputShape::Object(graph.input_name(id, suffix)?),
        TypeKind::Array { item } => InputShape::List(Box::new(input_shape(graph, item, suffix)?)),
        TypeKind::Enum { .. } => InputShape::Enum(graph.type_name(id).to_string()),
        TypeKind::Scalar(_) | TypeKind::Json => InputShape::Scalar,
    })
}

/// Builds the root field for one operation.
pub fn synthesize(
    graph: &mut TypeGraph,
    op: &OperationDescriptor,
    input_suffix: &str,
) -> Result<FieldSpec, GeneratorError> {
    let (ty, response) = match op.response {
        Some(id) => (output_type(graph, id), output_shape(graph, id)),
        None => {
            graph.mark_raw_response();
            (TypeSpec::named(RAW_RESPONSE), OutputShape::Raw)
        }
    };

    let mut binding = OperationBinding::new(op.verb, &op.path, &op.operation_id, response);
    for param in &op.parameters {
        let mut bound = ParamBinding::new(
            &param.raw_name,
            &param.sanitized_name,
            param.location,
            input_type(graph, param.ty, param.required, input_suffix)?,
            input_shape(graph, param.ty, input_suffix)?,
        )
        .collection_format(param.collection_format);
        if let Some(description) = &param.description {
            bound = bound.description(description);
        }
        binding = binding.param(bound);
    }

    let mut field = FieldSpec::operation(&op.field_name, ty, binding);
    if let Some(description) = &op.description {
        field = field.description(description);
    }
    if op.deprecated {
        field = field.deprecated();
    }
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::identifiers::{Case, Scope};
    use crate::operations::extract_operations;
    use crate::test_utils::petstore;
    use swagql_runtime::{FieldResolver, ParameterLocation};

    fn synthesized(name: &str) -> (FieldSpec, TypeGraph) {
        let doc = petstore();
        let mut builder = GraphBuilder::new(&doc, true);
        builder.build_definitions().unwrap();
        let mut query = Scope::new("fields of Query", Case::LowerCamel);
        let mut mutation = Scope::new("fields of Mutation", Case::LowerCamel);
        let ops = extract_operations(&doc, &mut builder, &mut query, &mut mutation).unwrap();
        let mut graph = builder.finish();
        let op = ops.iter().find(|o| o.field_name == name).unwrap();
        let field = synthesize(&mut graph, op, "Input").unwrap();
        (field, graph)
    }

    fn binding(field: &FieldSpec) -> &OperationBinding {
        match &field.resolver {
            FieldResolver::Operation(binding) => binding,
            other => panic!("expected operation, got {other:?}"),
        }
    }

    #[test]
    fn query_binding_substitutes_path_parameter() {
        let (field, _) = synthesized("petById");
        assert_eq!(field.ty.to_string(), "Pet");
        let binding = binding(&field);
        assert_eq!(binding.path, "/pet/{petId}");
        assert_eq!(binding.response, OutputShape::Object);
        let pet_id = &binding.params[0];
        assert_eq!(pet_id.location, ParameterLocation::Path);
        assert_eq!(pet_id.ty.to_string(), "Int!");
    }

    #[test]
    fn body_parameters_use_input_types() {
        let (field, graph) = synthesized("addPet");
        let body = binding(&field)
            .params
            .iter()
            .find(|p| p.location == ParameterLocation::Body)
            .unwrap();
        assert_eq!(body.ty.to_string(), "PetInput!");
        assert_eq!(body.shape, InputShape::Object("PetInput".into()));
        assert!(graph.inputs().any(|(_, name)| name == "PetInput"));
    }

    #[test]
    fn list_responses_are_nullable_lists() {
        let (field, _) = synthesized("findPetsByStatus");
        assert_eq!(field.ty.to_string(), "[Pet]");
        assert_eq!(
            binding(&field).response,
            OutputShape::List(Box::new(OutputShape::Object))
        );
        let status = &binding(&field).params[0];
        assert_eq!(status.ty.to_string(), "[FindPetsByStatusStatusItem]!");
        assert_eq!(
            status.shape,
            InputShape::List(Box::new(InputShape::Enum(
                "FindPetsByStatusStatusItem".into()
            )))
        );
    }

    #[test]
    fn operations_without_response_schema_return_raw_response() {
        let (field, graph) = synthesized("deletePet");
        assert_eq!(field.ty.to_string(), "RawResponse");
        assert_eq!(binding(&field).response, OutputShape::Raw);
        assert!(graph.uses_raw_response());
    }
}

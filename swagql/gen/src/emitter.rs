//! Type/field emission: renders the type graph and root fields into the
//! declaration tree.
//!
//! Order is fixed: the `JSON` scalar, then object and enum types in
//! first-seen order, `RawResponse` when an operation needs it, input objects
//! in the order they were first used, then `Query` and `Mutation`.

use swagql_runtime::{
    EnumType, FieldSpec, InputFieldSpec, InputObjectType, JSON_SCALAR, ObjectType, ScalarType,
};
use tracing::debug;

use crate::GeneratorOptions;
use crate::errors::GeneratorError;
use crate::graph::{RAW_RESPONSE, TypeGraph, TypeId, TypeKind, TypeNode};
use crate::resolvers::{input_shape, input_type, output_shape, output_type};
use crate::tree::{ApiTypeTag, Declaration, SyntaxTree};

/// Root fields produced by the resolver synthesizer.
#[derive(Debug, Clone, Default)]
pub struct RootFields {
    pub query: Vec<FieldSpec>,
    pub mutation: Vec<FieldSpec>,
}

/// Appends every declaration to `tree`.
pub fn emit_declarations(
    tree: &mut SyntaxTree,
    graph: &mut TypeGraph,
    roots: RootFields,
    options: &GeneratorOptions,
) -> Result<(), GeneratorError> {
    tree.push_declaration(
        Declaration::Scalar(
            ScalarType::new(JSON_SCALAR).description("Arbitrary JSON value, passed through unchanged."),
        ),
        None,
    );

    for (id, node) in graph.iter() {
        match &node.kind {
            TypeKind::Object { .. } => {
                let object = object_type(graph, id, options);
                debug!(name = %object.name, fields = object.fields.len(), "emit object");
                tree.push_declaration(Declaration::Object(object), api_type(node));
            }
            TypeKind::Enum { values } => {
                let ty = values.iter().fold(
                    EnumType::new(graph.type_name(id)),
                    |ty, (raw, item)| ty.value(raw, item),
                );
                let ty = match &node.description {
                    Some(description) => ty.description(description),
                    None => ty,
                };
                debug!(name = %ty.name, values = ty.values.len(), "emit enum");
                tree.push_declaration(Declaration::Enum(ty), api_type(node));
            }
            TypeKind::Array { .. } | TypeKind::Scalar(_) | TypeKind::Json => {}
        }
    }

    if graph.uses_raw_response() {
        let mut raw = ObjectType::new(RAW_RESPONSE)
            .description("Response of an operation that declares no response schema.")
            .field(FieldSpec::parent_value("body"));
        if options.emit_raw_input_options {
            raw = raw.field(FieldSpec::raw_input_options());
        }
        tree.push_declaration(Declaration::Object(raw), None);
    }

    // Input objects can pull in further input objects, so walk by index
    // while the list grows.
    let mut index = 0;
    while let Some((id, name)) = graph.input_at(index) {
        let name = name.to_string();
        let input = input_object_type(graph, id, name, &options.input_suffix)?;
        debug!(name = %input.name, fields = input.fields.len(), "emit input object");
        tree.push_declaration(Declaration::InputObject(input), api_type(graph.node(id)));
        index += 1;
    }

    if !roots.query.is_empty() {
        let query = roots
            .query
            .into_iter()
            .fold(ObjectType::new("Query"), ObjectType::field);
        tree.push_declaration(Declaration::Query(query), None);
    }
    if !roots.mutation.is_empty() {
        let mutation = roots
            .mutation
            .into_iter()
            .fold(ObjectType::new("Mutation"), ObjectType::field);
        tree.push_declaration(Declaration::Mutation(mutation), None);
    }

    Ok(())
}

fn api_type(node: &TypeNode) -> Option<ApiTypeTag> {
    node.origin.as_ref().map(|origin| ApiTypeTag {
        pointer: origin.pointer.clone(),
        api_type: origin.schema.clone(),
    })
}

fn object_type(graph: &TypeGraph, id: TypeId, options: &GeneratorOptions) -> ObjectType {
    let node = graph.node(id);
    let mut object = ObjectType::new(graph.type_name(id));
    if let Some(description) = &node.description {
        object = object.description(description);
    }

    if let TypeKind::Object { fields } = &node.kind {
        for field in fields {
            let mut spec = FieldSpec::raw_key(
                &field.sanitized_name,
                &field.raw_name,
                output_type(graph, field.ty),
                output_shape(graph, field.ty),
            );
            if let Some(description) = &field.description {
                spec = spec.description(description);
            }
            object = object.field(spec);
        }
    }

    if options.emit_raw_input_options {
        object = object.field(
            FieldSpec::raw_input_options()
                .description("Options of the request that returned this object."),
        );
    }
    object
}

fn input_object_type(
    graph: &mut TypeGraph,
    id: TypeId,
    name: String,
    suffix: &str,
) -> Result<InputObjectType, GeneratorError> {
    let node = graph.node(id).clone();
    let mut input = InputObjectType::new(name);
    if let Some(description) = &node.description {
        input = input.description(description);
    }

    if let TypeKind::Object { fields } = node.kind {
        for field in fields {
            let mut spec = InputFieldSpec::new(
                &field.sanitized_name,
                &field.raw_name,
                input_type(graph, field.ty, field.required, suffix)?,
                input_shape(graph, field.ty, suffix)?,
            );
            if let Some(description) = &field.description {
                spec = spec.description(description);
            }
            input = input.field(spec);
        }
    }
    Ok(input)
}

//! Operation descriptor extraction.
//!
//! One [`OperationDescriptor`] per `(path, verb)` in document order, with
//! parameters classified by location and their types resolved through the
//! [`GraphBuilder`].

use std::collections::HashSet;

use heck::ToLowerCamelCase;
use swagql_define::{CollectionFormat, Parameter, ParameterLocation, SpecDocument, Verb};
use swagql_runtime::path::normalize_template;
use tracing::debug;

use crate::errors::GeneratorError;
use crate::graph::{GraphBuilder, TypeId, escape_pointer};
use crate::identifiers::{Case, Scope};

/// Which root type an operation field lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootKind {
    Query,
    Mutation,
}

impl RootKind {
    pub fn for_verb(verb: Verb) -> Self {
        if verb.is_mutating() {
            Self::Mutation
        } else {
            Self::Query
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
        }
    }
}

/// A classified operation parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub raw_name: String,
    pub sanitized_name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub ty: TypeId,
    pub collection_format: CollectionFormat,
    pub description: Option<String>,
}

/// Everything needed to synthesize one root field.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescriptor {
    pub path: String,
    pub verb: Verb,
    /// The document's `operationId`, or one derived from verb and path.
    pub operation_id: String,
    /// Sanitized field name on the root type.
    pub field_name: String,
    pub kind: RootKind,
    pub parameters: Vec<ParamSpec>,
    /// Type of the `in: body` parameter, if any.
    pub request_body: Option<TypeId>,
    /// `None` when no success response declares a schema.
    pub response: Option<TypeId>,
    pub description: Option<String>,
    pub deprecated: bool,
}

/// Derives an operation id from verb and path.
///
/// ```
/// use swagql_define::Verb;
/// use swagql_gen::operations::synthetic_operation_id;
///
/// assert_eq!(synthetic_operation_id(Verb::Get, "/pet/{petId}"), "getPetPetId");
/// assert_eq!(synthetic_operation_id(Verb::Delete, "/store/order/{orderId}"), "deleteStoreOrderOrderId");
/// ```
pub fn synthetic_operation_id(verb: Verb, path: &str) -> String {
    let words: String = path
        .chars()
        .map(|c| if c == '{' || c == '}' { ' ' } else { c })
        .collect();
    format!("{} {words}", verb.as_lowercase()).to_lower_camel_case()
}

/// Merges path-level parameters with operation parameters.
///
/// Operation parameters override path-level ones with the same name and
/// location, keeping the path-level position.
fn merge_parameters<'a>(shared: &'a [Parameter], own: &'a [Parameter]) -> Vec<&'a Parameter> {
    let mut merged: Vec<&Parameter> = shared.iter().collect();
    for param in own {
        match merged
            .iter()
            .position(|p| p.name == param.name && p.location == param.location)
        {
            Some(index) => merged[index] = param,
            None => merged.push(param),
        }
    }
    merged
}

/// Extracts every operation of the document.
///
/// Root field names are allocated in `query_scope` or `mutation_scope`.
pub fn extract_operations(
    doc: &SpecDocument,
    builder: &mut GraphBuilder<'_>,
    query_scope: &mut Scope,
    mutation_scope: &mut Scope,
) -> Result<Vec<OperationDescriptor>, GeneratorError> {
    let mut seen: HashSet<(Verb, String)> = HashSet::new();
    let mut operations = Vec::new();

    for (path, item) in &doc.paths {
        let normalized = normalize_template(path);
        let path_pointer = format!("/paths/{}", escape_pointer(path));

        for (verb, op) in item.operations() {
            if !seen.insert((verb, normalized.clone())) {
                return Err(GeneratorError::DuplicateOperation {
                    verb,
                    path: path.clone(),
                });
            }

            let op_pointer = format!("{path_pointer}/{}", verb.as_lowercase());
            let operation_id = op
                .operation_id
                .clone()
                .unwrap_or_else(|| synthetic_operation_id(verb, path));
            let kind = RootKind::for_verb(verb);
            let field_name = match kind {
                RootKind::Query => query_scope.fresh(&operation_id)?,
                RootKind::Mutation => mutation_scope.fresh(&operation_id)?,
            };

            let mut arguments = Scope::new(format!("arguments of {field_name}"), Case::LowerCamel);
            let mut parameters = Vec::new();
            let mut request_body = None;

            for (index, param) in merge_parameters(&item.parameters, &op.parameters)
                .into_iter()
                .enumerate()
            {
                let decl_path = match param.location {
                    ParameterLocation::Body => format!("{operation_id} Body"),
                    _ => format!("{operation_id} {}", param.name),
                };
                let pointer = match param.location {
                    ParameterLocation::Body => format!("{op_pointer}/parameters/{index}/schema"),
                    _ => format!("{op_pointer}/parameters/{index}"),
                };
                let ty = builder.resolve(&param.value_schema(), &decl_path, &pointer)?;
                if param.location == ParameterLocation::Body {
                    request_body = Some(ty);
                }

                parameters.push(ParamSpec {
                    raw_name: param.name.clone(),
                    sanitized_name: arguments.fresh(&param.name)?,
                    location: param.location,
                    required: param.required || param.location == ParameterLocation::Path,
                    ty,
                    collection_format: param.collection_format.unwrap_or_default(),
                    description: param.description.clone(),
                });
            }

            let response = match op.success_schema() {
                Some((code, schema)) => Some(builder.resolve(
                    schema,
                    &format!("{operation_id} Response"),
                    &format!("{op_pointer}/responses/{}/schema", escape_pointer(code)),
                )?),
                None => None,
            };

            debug!(
                verb = %verb,
                path = %path,
                field = %field_name,
                root = kind.type_name(),
                parameters = parameters.len(),
                "operation"
            );

            operations.push(OperationDescriptor {
                path: path.clone(),
                verb,
                operation_id,
                field_name,
                kind,
                parameters,
                request_body,
                response,
                description: op.summary.clone().or_else(|| op.description.clone()),
                deprecated: op.deprecated,
            });
        }
    }

    Ok(operations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{doc_with_paths, petstore};
    use serde_json::json;

    fn extract(doc: &SpecDocument) -> Result<Vec<OperationDescriptor>, GeneratorError> {
        let mut builder = GraphBuilder::new(doc, true);
        builder.build_definitions()?;
        let mut query = Scope::new("fields of Query", Case::LowerCamel);
        let mut mutation = Scope::new("fields of Mutation", Case::LowerCamel);
        extract_operations(doc, &mut builder, &mut query, &mut mutation)
    }

    #[test]
    fn classifies_roots_by_verb() {
        let ops = extract(&petstore()).unwrap();
        let find = |name: &str| ops.iter().find(|o| o.field_name == name).unwrap();

        assert_eq!(find("petById").kind, RootKind::Query);
        assert_eq!(find("addPet").kind, RootKind::Mutation);
        assert_eq!(find("updatePet").kind, RootKind::Mutation);
        assert!(find("addPet").request_body.is_some());
    }

    #[test]
    fn merges_path_level_parameters() {
        let ops = extract(&petstore()).unwrap();
        let update = ops.iter().find(|o| o.field_name == "updatePet").unwrap();
        let names: Vec<_> = update
            .parameters
            .iter()
            .map(|p| p.sanitized_name.as_str())
            .collect();
        assert!(names.contains(&"debug"));
        assert!(names.contains(&"body"));
    }

    #[test]
    fn operation_parameters_override_path_level() {
        let doc = doc_with_paths(json!({
            "/items/{id}": {
                "parameters": [
                    { "name": "id", "in": "path", "required": true, "type": "string" },
                    { "name": "verbose", "in": "query", "type": "boolean" }
                ],
                "get": {
                    "operationId": "getItem",
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "type": "integer", "description": "numeric" }
                    ],
                    "responses": { "200": { "description": "ok" } }
                }
            }
        }));
        let ops = extract(&doc).unwrap();
        let params = &ops[0].parameters;
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].raw_name, "id");
        assert_eq!(params[0].description.as_deref(), Some("numeric"));
        assert_eq!(params[1].raw_name, "verbose");
        assert!(!params[1].required);
    }

    #[test]
    fn missing_operation_id_is_synthesized() {
        let doc = doc_with_paths(json!({
            "/pet/{petId}": {
                "get": {
                    "parameters": [{ "name": "petId", "in": "path", "required": true, "type": "integer" }],
                    "responses": { "200": { "description": "ok" } }
                }
            }
        }));
        let ops = extract(&doc).unwrap();
        assert_eq!(ops[0].operation_id, "getPetPetId");
        assert_eq!(ops[0].field_name, "getPetPetId");
        assert!(ops[0].response.is_none());
    }

    #[test]
    fn duplicate_paths_after_normalization_fail() {
        let doc = doc_with_paths(json!({
            "/pet/{id}": { "get": { "operationId": "a", "responses": {} } },
            "/pet/{petId}": { "get": { "operationId": "b", "responses": {} } }
        }));
        match extract(&doc) {
            Err(GeneratorError::DuplicateOperation { verb, path }) => {
                assert_eq!(verb, Verb::Get);
                assert_eq!(path, "/pet/{petId}");
            }
            other => panic!("expected DuplicateOperation, got {other:?}"),
        }
    }

    #[test]
    fn same_path_different_verbs_is_fine() {
        let doc = doc_with_paths(json!({
            "/pet/{id}": {
                "get": { "operationId": "getPet", "responses": {} },
                "delete": { "operationId": "deletePet", "responses": {} }
            }
        }));
        assert_eq!(extract(&doc).unwrap().len(), 2);
    }

    #[test]
    fn colliding_field_names_are_suffixed() {
        let doc = doc_with_paths(json!({
            "/a": { "get": { "operationId": "list-items", "responses": {} } },
            "/b": { "get": { "operationId": "listItems", "responses": {} } }
        }));
        let ops = extract(&doc).unwrap();
        assert_eq!(ops[0].field_name, "listItems");
        assert_eq!(ops[1].field_name, "listItems2");
    }

    #[test]
    fn inline_response_objects_are_named_after_the_operation() {
        let doc = doc_with_paths(json!({
            "/status": {
                "get": {
                    "operationId": "getStatus",
                    "responses": {
                        "200": {
                            "description": "ok",
                            "schema": { "type": "object", "properties": { "up": { "type": "boolean" } } }
                        }
                    }
                }
            }
        }));
        let mut builder = GraphBuilder::new(&doc, true);
        let mut query = Scope::new("fields of Query", Case::LowerCamel);
        let mut mutation = Scope::new("fields of Mutation", Case::LowerCamel);
        let ops = extract_operations(&doc, &mut builder, &mut query, &mut mutation).unwrap();
        let graph = builder.finish();
        assert_eq!(
            graph.type_name(ops[0].response.unwrap()),
            "GetStatusResponse"
        );
    }
}

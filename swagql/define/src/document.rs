//! The Swagger 2.0 document model.
//!
//! Only the parts the generator reads are modelled. Unknown keys (including
//! `x-` vendor extensions) are ignored during deserialization.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::Schema;
use crate::types::{CollectionFormat, ParameterLocation, Verb};

/// Errors raised while reading a document from text.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The input was not valid JSON for a Swagger document.
    #[error("Failed to parse JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// The input was not valid YAML for a Swagger document.
    #[error("Failed to parse YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A parsed Swagger 2.0 document.
///
/// Maps are insertion-ordered so that everything derived from the document
/// is deterministic.
///
/// ## Examples
///
/// ```
/// use swagql_define::{SpecDocument, Verb};
///
/// let doc = SpecDocument::from_json(r#"{
///     "swagger": "2.0",
///     "info": { "title": "Petstore", "version": "1.0.0" },
///     "paths": {
///         "/pet/{petId}": {
///             "get": {
///                 "operationId": "getPetById",
///                 "parameters": [
///                     { "name": "petId", "in": "path", "required": true, "type": "integer" }
///                 ],
///                 "responses": { "200": { "description": "ok" } }
///             }
///         }
///     }
/// }"#).unwrap();
///
/// let ops: Vec<_> = doc.operations().collect();
/// assert_eq!(ops.len(), 1);
/// assert_eq!(ops[0].1, Verb::Get);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecDocument {
    #[serde(default)]
    pub swagger: String,
    #[serde(default)]
    pub info: Info,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    /// Shared type definitions, by name.
    #[serde(default)]
    pub definitions: IndexMap<String, Schema>,
    /// Path templates and their operations.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The operations available on one path template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// Parameters shared by every operation on this path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

impl PathItem {
    /// Iterates the declared operations in Swagger's canonical verb order.
    pub fn operations(&self) -> impl Iterator<Item = (Verb, &Operation)> {
        [
            (Verb::Get, self.get.as_ref()),
            (Verb::Put, self.put.as_ref()),
            (Verb::Post, self.post.as_ref()),
            (Verb::Delete, self.delete.as_ref()),
            (Verb::Options, self.options.as_ref()),
            (Verb::Head, self.head.as_ref()),
            (Verb::Patch, self.patch.as_ref()),
        ]
        .into_iter()
        .filter_map(|(verb, op)| op.map(|op| (verb, op)))
    }
}

/// A single REST operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Responses keyed by status code (or `default`).
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
    #[serde(default)]
    pub deprecated: bool,
}

impl Operation {
    /// Returns the schema of the success response.
    ///
    /// Picks the first `2xx` response that declares a schema, falling back to
    /// `default`.
    pub fn success_schema(&self) -> Option<(&str, &Schema)> {
        self.responses
            .iter()
            .filter(|(code, _)| code.starts_with('2'))
            .chain(self.responses.get_key_value("default"))
            .find_map(|(code, response)| {
                response.schema.as_ref().map(|schema| (code.as_str(), schema))
            })
    }
}

/// An operation parameter.
///
/// Non-body parameters describe their value inline (`type`, `items`, `enum`);
/// body parameters carry a full [`Schema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Body schema (only for `in: body`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_format: Option<CollectionFormat>,
}

impl Parameter {
    /// Returns the schema describing this parameter's value.
    ///
    /// Body parameters return their declared schema; other locations get a
    /// schema synthesized from the inline `type`/`items`/`enum` keywords.
    pub fn value_schema(&self) -> Cow<'_, Schema> {
        match &self.schema {
            Some(schema) => Cow::Borrowed(schema),
            None => Cow::Owned(Schema {
                schema_type: self.param_type.clone(),
                format: self.format.clone(),
                description: self.description.clone(),
                items: self.items.clone(),
                enum_values: self.enum_values.clone(),
                ..Schema::default()
            }),
        }
    }
}

/// A response declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl SpecDocument {
    /// Parses a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a document from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Converts an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, DocumentError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Iterates every `(path, verb, operation)` in document order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, Verb, &Operation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations()
                .map(move |(verb, op)| (path.as_str(), verb, op))
        })
    }

    /// Canonical JSON bytes of the document.
    ///
    /// Used to derive stable digests; key order follows the document.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r##"{
        "swagger": "2.0",
        "info": { "title": "Test", "version": "1.2.3" },
        "basePath": "/v2",
        "paths": {
            "/items/{id}": {
                "parameters": [
                    { "name": "id", "in": "path", "required": true, "type": "string" }
                ],
                "delete": { "responses": { "204": { "description": "gone" } } },
                "get": {
                    "operationId": "getItem",
                    "responses": {
                        "404": { "description": "missing", "schema": { "type": "string" } },
                        "200": { "description": "ok", "schema": { "$ref": "#/definitions/Item" } }
                    }
                }
            }
        },
        "definitions": {
            "Item": { "type": "object", "properties": { "id": { "type": "string" } } }
        }
    }"##;

    #[test]
    fn parses_json_document() {
        let doc = SpecDocument::from_json(DOC).unwrap();
        assert_eq!(doc.info.title, "Test");
        assert_eq!(doc.base_path.as_deref(), Some("/v2"));
        assert_eq!(doc.definitions.len(), 1);
        assert_eq!(doc.paths["/items/{id}"].parameters.len(), 1);
    }

    #[test]
    fn operations_follow_canonical_verb_order() {
        let doc = SpecDocument::from_json(DOC).unwrap();
        let verbs: Vec<_> = doc.operations().map(|(_, verb, _)| verb).collect();
        assert_eq!(verbs, vec![Verb::Get, Verb::Delete]);
    }

    #[test]
    fn success_schema_prefers_2xx() {
        let doc = SpecDocument::from_json(DOC).unwrap();
        let get = doc.paths["/items/{id}"].get.as_ref().unwrap();
        let (code, schema) = get.success_schema().unwrap();
        assert_eq!(code, "200");
        assert_eq!(schema.definition_name(), Some("Item"));

        let delete = doc.paths["/items/{id}"].delete.as_ref().unwrap();
        assert!(delete.success_schema().is_none());
    }

    #[test]
    fn value_schema_synthesizes_inline_parameters() {
        let param: Parameter = serde_json::from_str(
            r#"{"name":"status","in":"query","type":"array","items":{"type":"string","enum":["a","b"]},"collectionFormat":"multi"}"#,
        )
        .unwrap();
        let schema = param.value_schema();
        assert_eq!(schema.schema_type.as_deref(), Some("array"));
        assert_eq!(schema.items.as_ref().unwrap().enum_values.len(), 2);
        assert_eq!(param.collection_format, Some(CollectionFormat::Multi));
    }

    #[test]
    fn parses_yaml_document() {
        let yaml = "swagger: '2.0'\ninfo:\n  title: Yaml\n  version: '1'\npaths: {}\n";
        let doc = SpecDocument::from_yaml(yaml).unwrap();
        assert_eq!(doc.info.title, "Yaml");
        assert!(doc.paths.is_empty());
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = SpecDocument::from_json("{ not json").unwrap_err();
        assert!(matches!(err, DocumentError::Json(_)));
    }

    #[test]
    fn canonical_bytes_are_stable() {
        let a = SpecDocument::from_json(DOC).unwrap();
        let b = SpecDocument::from_json(DOC).unwrap();
        assert_eq!(a.canonical_bytes(), b.canonical_bytes());
    }
}

//! JSON Schema subset used by Swagger 2.0 definitions and operations.
//!
//! The model is deliberately loose: `type` stays a string so that the
//! generator, not the deserializer, decides what it can represent.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Prefix of local definition references.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// A Swagger 2.0 schema object.
///
/// ## Examples
///
/// ```
/// use swagql_define::Schema;
///
/// let schema: Schema = serde_json::from_str(r##"{
///     "type": "object",
///     "required": ["name"],
///     "properties": {
///         "name": { "type": "string" },
///         "category": { "$ref": "#/definitions/Category" }
///     }
/// }"##).unwrap();
///
/// assert!(schema.is_required("name"));
/// assert_eq!(
///     schema.properties["category"].definition_name(),
///     Some("Category")
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// A `$ref` pointer, e.g. `#/definitions/Pet`.
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// The primitive type name (`object`, `array`, `string`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Object properties in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    /// Names of required properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Item schema for arrays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Allowed values.
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,
    /// Schemas whose properties are merged, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Schema>,
}

/// The `additionalProperties` keyword: either a flag or a value schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<Schema>),
}

impl Schema {
    /// Creates a schema of the given primitive type.
    pub fn of_type(schema_type: impl Into<String>) -> Self {
        Self {
            schema_type: Some(schema_type.into()),
            ..Self::default()
        }
    }

    /// Creates a `$ref` to a named definition.
    pub fn reference_to(definition: &str) -> Self {
        Self {
            reference: Some(format!("{DEFINITIONS_PREFIX}{definition}")),
            ..Self::default()
        }
    }

    /// Returns the definition name when this is a local `#/definitions/` reference.
    pub fn definition_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(|r| r.strip_prefix(DEFINITIONS_PREFIX))
    }

    /// Whether the named property is listed in `required`.
    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }

    /// Whether the schema declares a map of arbitrary keys.
    pub fn has_additional_properties(&self) -> bool {
        match &self.additional_properties {
            Some(AdditionalProperties::Allowed(allowed)) => *allowed,
            Some(AdditionalProperties::Schema(_)) => true,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_name_only_for_local_refs() {
        assert_eq!(Schema::reference_to("Pet").definition_name(), Some("Pet"));

        let remote = Schema {
            reference: Some("other.json#/Pet".to_string()),
            ..Schema::default()
        };
        assert_eq!(remote.definition_name(), None);
        assert_eq!(Schema::of_type("string").definition_name(), None);
    }

    #[test]
    fn properties_keep_declaration_order() {
        let schema: Schema = serde_json::from_str(
            r#"{"type":"object","properties":{"zeta":{"type":"string"},"alpha":{"type":"integer"},"mid":{"type":"boolean"}}}"#,
        )
        .unwrap();
        let keys: Vec<_> = schema.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn additional_properties_accepts_flag_or_schema() {
        let flag: Schema =
            serde_json::from_str(r#"{"type":"object","additionalProperties":true}"#).unwrap();
        assert!(flag.has_additional_properties());

        let map: Schema = serde_json::from_str(
            r#"{"type":"object","additionalProperties":{"type":"integer"}}"#,
        )
        .unwrap();
        assert!(map.has_additional_properties());

        let closed: Schema =
            serde_json::from_str(r#"{"type":"object","additionalProperties":false}"#).unwrap();
        assert!(!closed.has_additional_properties());
    }

    #[test]
    fn unknown_type_survives_deserialization() {
        let schema: Schema = serde_json::from_str(r#"{"type":"tuple"}"#).unwrap();
        assert_eq!(schema.schema_type.as_deref(), Some("tuple"));
    }
}

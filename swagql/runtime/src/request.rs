//! Outbound request construction.
//!
//! Turns an [`OperationBinding`] plus raw argument values into the
//! `(url_path, options)` pair handed to a [`crate::Fetcher`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use swagql_define::{CollectionFormat, ParameterLocation, Verb};
use url::form_urlencoded;

use crate::descriptor::{OperationBinding, ParamBinding};
use crate::error::ResolutionError;
use crate::path::substitute_path_params;

/// Options of one outbound request.
///
/// Serialized as `{ "method", "headers", "body" }` when exposed through the
/// `rawInputOptions` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    pub method: Verb,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new(method: Verb) -> Self {
        Self {
            method,
            headers: IndexMap::new(),
            body: None,
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Merges `value` into the body.
    ///
    /// Objects merge key-wise into an object body; anything else replaces it.
    fn merge_body(&mut self, value: Value) {
        match (self.body.as_mut(), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                existing.extend(incoming);
            }
            (_, value) => self.body = Some(value),
        }
    }

    /// Inserts one form field into the body.
    fn insert_form_field(&mut self, key: &str, value: Value) {
        if !matches!(self.body, Some(Value::Object(_))) {
            self.body = Some(Value::Object(Map::new()));
        }
        if let Some(Value::Object(body)) = self.body.as_mut() {
            body.insert(key.to_string(), value);
        }
    }
}

/// A fully built request.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    /// Path with substituted parameters and query string.
    pub url_path: String,
    pub options: RequestOptions,
}

/// Builds the request for `binding` from raw argument values.
///
/// Arguments that were not supplied (or are `null`) are omitted. A missing
/// path parameter is an [`ResolutionError::InvalidArgument`].
///
/// ## Examples
///
/// ```
/// use serde_json::json;
/// use swagql_define::{ParameterLocation, Verb};
/// use swagql_runtime::request::build_request;
/// use swagql_runtime::{InputShape, OperationBinding, OutputShape, ParamBinding, TypeSpec};
///
/// let binding = OperationBinding::new(Verb::Get, "/pet/{petId}", "getPetById", OutputShape::Object)
///     .param(ParamBinding::new(
///         "petId", "petId", ParameterLocation::Path,
///         TypeSpec::named("Int").non_null(), InputShape::Scalar,
///     ));
///
/// let request = build_request(&binding, &[(&binding.params[0], json!(1))]).unwrap();
/// assert_eq!(request.url_path, "/pet/1");
/// ```
pub fn build_request(
    binding: &OperationBinding,
    args: &[(&ParamBinding, Value)],
) -> Result<OutboundRequest, ResolutionError> {
    let mut options = RequestOptions::new(binding.verb);
    let mut path_values: Vec<(&str, String)> = Vec::new();
    let mut query = form_urlencoded::Serializer::new(String::new());
    let mut has_query = false;

    for (param, value) in args {
        if value.is_null() {
            continue;
        }
        match param.location {
            ParameterLocation::Path => {
                path_values.push((param.raw.as_str(), scalar_text(value)));
            }
            ParameterLocation::Query => {
                for (key, text) in query_pairs(param, value) {
                    query.append_pair(key, &text);
                    has_query = true;
                }
            }
            ParameterLocation::Header => {
                options
                    .headers
                    .insert(param.raw.clone(), join_values(value, ","));
            }
            ParameterLocation::Body => options.merge_body(value.clone()),
            ParameterLocation::FormData => options.insert_form_field(&param.raw, value.clone()),
        }
    }

    for param in &binding.params {
        if param.location == ParameterLocation::Path
            && !path_values.iter().any(|(raw, _)| *raw == param.raw)
        {
            return Err(ResolutionError::InvalidArgument {
                name: param.name.clone(),
                reason: "path parameter is required".to_string(),
            });
        }
    }

    let substitutions: Vec<(&str, &str)> = path_values
        .iter()
        .map(|(raw, text)| (*raw, text.as_str()))
        .collect();
    let mut url_path = substitute_path_params(&binding.path, &substitutions);
    if has_query {
        url_path.push('?');
        url_path.push_str(&query.finish());
    }

    Ok(OutboundRequest { url_path, options })
}

/// Text of a scalar value as it appears in a URL or header.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn join_values(value: &Value, separator: &str) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(scalar_text)
            .collect::<Vec<_>>()
            .join(separator),
        other => scalar_text(other),
    }
}

fn query_pairs<'a>(param: &'a ParamBinding, value: &Value) -> Vec<(&'a str, String)> {
    let key = param.raw.as_str();
    match (value, param.collection_format) {
        (Value::Array(items), CollectionFormat::Multi) => {
            items.iter().map(|item| (key, scalar_text(item))).collect()
        }
        (Value::Array(_), format) => vec![(key, join_values(value, separator(format)))],
        (other, _) => vec![(key, scalar_text(other))],
    }
}

fn separator(format: CollectionFormat) -> &'static str {
    match format {
        CollectionFormat::Csv | CollectionFormat::Multi => ",",
        CollectionFormat::Ssv => " ",
        CollectionFormat::Tsv => "\t",
        CollectionFormat::Pipes => "|",
    }
}

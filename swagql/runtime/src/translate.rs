//! Translation between sanitized GraphQL values and raw REST values.
//!
//! Inputs go from GraphQL to REST: input object keys map back to their raw
//! keys and enum items to their raw values. Outputs only need the enum
//! direction; object fields read raw keys themselves.

use std::collections::HashMap;

use async_graphql::{Name, Value as GqlValue};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::descriptor::{EnumType, InputFieldSpec, InputObjectType, InputShape};
use crate::error::ResolutionError;
use crate::names::{NameConflict, NameMap};

/// Name tables for every enum and input object of one schema.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    enums: HashMap<String, NameMap>,
    inputs: HashMap<String, IndexMap<String, InputFieldSpec>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an enum's raw value ↔ item table.
    pub fn register_enum(&mut self, ty: &EnumType) -> Result<(), NameConflict> {
        let map = NameMap::from_pairs(ty.values.iter().cloned())?;
        self.enums.insert(ty.name.clone(), map);
        Ok(())
    }

    /// Registers an input object's fields by sanitized name.
    pub fn register_input(&mut self, ty: &InputObjectType) {
        let fields = ty
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.clone()))
            .collect();
        self.inputs.insert(ty.name.clone(), fields);
    }

    pub fn has_enum(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    pub fn has_input(&self, name: &str) -> bool {
        self.inputs.contains_key(name)
    }

    /// Item name of a raw enum value.
    pub fn enum_item(&self, enum_name: &str, raw: &str) -> Option<&str> {
        self.enums.get(enum_name)?.sanitized(raw)
    }

    /// Raw value of an enum item.
    pub fn enum_raw(&self, enum_name: &str, item: &str) -> Option<&str> {
        self.enums.get(enum_name)?.raw(item)
    }

    /// Converts a GraphQL input value to raw JSON.
    ///
    /// `argument` names the top-level argument for error messages.
    pub fn to_raw(
        &self,
        argument: &str,
        value: &GqlValue,
        shape: &InputShape,
    ) -> Result<Value, ResolutionError> {
        if matches!(value, GqlValue::Null) {
            return Ok(Value::Null);
        }

        match shape {
            InputShape::Scalar => value.clone().into_json().map_err(|e| invalid(argument, e)),
            InputShape::Enum(enum_name) => {
                let item = match value {
                    GqlValue::Enum(name) => name.as_str(),
                    GqlValue::String(s) => s.as_str(),
                    other => return Err(invalid(argument, format!("expected enum, got {other}"))),
                };
                self.enum_raw(enum_name, item)
                    .map(|raw| Value::String(raw.to_string()))
                    .ok_or_else(|| invalid(argument, format!("unknown {enum_name} item '{item}'")))
            }
            InputShape::Object(type_name) => {
                let GqlValue::Object(fields) = value else {
                    return Err(invalid(argument, format!("expected {type_name} object")));
                };
                let specs = self
                    .inputs
                    .get(type_name)
                    .ok_or_else(|| invalid(argument, format!("unknown input type {type_name}")))?;

                let mut raw = Map::new();
                for (key, field_value) in fields {
                    let spec = specs.get(key.as_str()).ok_or_else(|| {
                        invalid(argument, format!("unknown field '{key}' on {type_name}"))
                    })?;
                    raw.insert(
                        spec.raw.clone(),
                        self.to_raw(argument, field_value, &spec.shape)?,
                    );
                }
                Ok(Value::Object(raw))
            }
            InputShape::List(inner) => match value {
                GqlValue::List(items) => items
                    .iter()
                    .map(|item| self.to_raw(argument, item, inner))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                single => Ok(Value::Array(vec![self.to_raw(argument, single, inner)?])),
            },
        }
    }

    /// Converts a raw enum value into a GraphQL enum value.
    pub fn enum_output(&self, enum_name: &str, raw: &Value) -> Option<GqlValue> {
        let item = self.enum_item(enum_name, raw.as_str()?)?;
        Some(GqlValue::Enum(Name::new(item)))
    }
}

fn invalid(argument: &str, reason: impl ToString) -> ResolutionError {
    ResolutionError::InvalidArgument {
        name: argument.to_string(),
        reason: reason.to_string(),
    }
}

//! The type graph: every type a document declares or implies.
//!
//! Nodes live in an arena and refer to each other by [`TypeId`]. Named
//! definitions are allocated before their properties are walked, so a `$ref`
//! cycle resolves to the already-allocated node instead of expanding forever.
//! Anonymous objects and enums are named from where they are declared
//! (`Pet` → `safe` → `PetSafe`) and interned by declaration path plus a hash
//! of their structure.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde_json::Value;
use swagql_define::{Schema, SpecDocument};
use swagql_runtime::{JSON_SCALAR, RAW_INPUT_OPTIONS_FIELD};
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::errors::GeneratorError;
use crate::identifiers::{Case, Scope};

/// Name of the object returned by operations without a response schema.
pub const RAW_RESPONSE: &str = "RawResponse";

/// Type names no document type may take.
pub const RESERVED_TYPE_NAMES: &[&str] = &[
    "Query",
    "Mutation",
    "Subscription",
    JSON_SCALAR,
    RAW_RESPONSE,
    "Int",
    "Float",
    "String",
    "Boolean",
    "ID",
];

/// allOf chains deeper than this are treated as cyclic.
const MAX_ALL_OF_DEPTH: usize = 32;

/// Index of a node in a [`TypeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

impl TypeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Built-in GraphQL scalars a Swagger primitive maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int,
    Float,
    String,
    Boolean,
}

impl ScalarKind {
    /// Maps a Swagger primitive type name.
    ///
    /// `file` parameters travel as strings.
    pub fn from_swagger(type_name: &str) -> Option<Self> {
        match type_name {
            "integer" => Some(Self::Int),
            "number" => Some(Self::Float),
            "string" | "file" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    pub fn graphql_name(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Float => "Float",
            Self::String => "String",
            Self::Boolean => "Boolean",
        }
    }
}

/// One property of an object node.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    pub raw_name: String,
    pub sanitized_name: String,
    pub ty: TypeId,
    pub required: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Object { fields: Vec<FieldMapping> },
    Array { item: TypeId },
    Scalar(ScalarKind),
    /// Raw values paired with their item names.
    Enum { values: Vec<(String, String)> },
    /// Free-form payload exposed through the `JSON` scalar.
    Json,
}

/// Where a node came from in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Origin {
    /// JSON pointer to the schema.
    pub pointer: String,
    /// The schema itself.
    pub schema: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub kind: TypeKind,
    /// Set for objects, enums and scalars; arrays are anonymous.
    pub name: Option<String>,
    pub description: Option<String>,
    pub origin: Option<Origin>,
}

/// The arena of type nodes plus the global type-name scope.
#[derive(Debug, Clone)]
pub struct TypeGraph {
    nodes: Vec<TypeNode>,
    type_names: Scope,
    inputs: IndexMap<TypeId, String>,
    uses_raw_response: bool,
}

impl TypeGraph {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            type_names: Scope::new("type names", Case::UpperCamel)
                .with_reserved(RESERVED_TYPE_NAMES),
            inputs: IndexMap::new(),
            uses_raw_response: false,
        }
    }

    fn push(&mut self, node: TypeNode) -> TypeId {
        self.nodes.push(node);
        TypeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: TypeId) -> &TypeNode {
        &self.nodes[id.0]
    }

    /// Iterates nodes in allocation order, which is first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (TypeId(i), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// GraphQL name of a node; arrays report their item's name.
    pub fn type_name(&self, id: TypeId) -> &str {
        let node = self.node(id);
        match (&node.kind, &node.name) {
            (TypeKind::Array { item }, _) => self.type_name(*item),
            (_, Some(name)) => name,
            (_, None) => JSON_SCALAR,
        }
    }

    /// Input type name of an object node, allocated on first request.
    ///
    /// Allocation order is recorded and drives emission order.
    pub fn input_name(&mut self, id: TypeId, suffix: &str) -> Result<String, GeneratorError> {
        if let Some(name) = self.inputs.get(&id) {
            return Ok(name.clone());
        }
        let base = format!("{}{suffix}", self.type_name(id));
        let name = self.type_names.fresh(&base)?;
        self.inputs.insert(id, name.clone());
        Ok(name)
    }

    /// Object nodes used in input positions, with their input names.
    pub fn inputs(&self) -> impl Iterator<Item = (TypeId, &str)> {
        self.inputs.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Input object at position `index` in allocation order.
    pub fn input_at(&self, index: usize) -> Option<(TypeId, &str)> {
        self.inputs
            .get_index(index)
            .map(|(id, name)| (*id, name.as_str()))
    }

    pub fn mark_raw_response(&mut self) {
        self.uses_raw_response = true;
    }

    pub fn uses_raw_response(&self) -> bool {
        self.uses_raw_response
    }
}

/// Escapes one JSON pointer reference token.
pub fn escape_pointer(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

fn is_object_with_properties(schema: &Schema) -> bool {
    !schema.properties.is_empty() && matches!(schema.schema_type.as_deref(), None | Some("object"))
}

fn signature(schema: &Schema) -> u64 {
    xxh3_64(&serde_json::to_vec(schema).unwrap_or_default())
}

/// Builds a [`TypeGraph`] from a document.
pub struct GraphBuilder<'d> {
    doc: &'d SpecDocument,
    graph: TypeGraph,
    reserve_raw_input_options: bool,
    definitions: HashMap<String, TypeId>,
    in_progress: HashSet<String>,
    interned: HashMap<(String, u64), TypeId>,
    scalars: HashMap<ScalarKind, TypeId>,
    json: Option<TypeId>,
}

impl<'d> GraphBuilder<'d> {
    /// Creates a builder.
    ///
    /// With `reserve_raw_input_options`, every object reserves the
    /// `rawInputOptions` field name.
    pub fn new(doc: &'d SpecDocument, reserve_raw_input_options: bool) -> Self {
        Self {
            doc,
            graph: TypeGraph::new(),
            reserve_raw_input_options,
            definitions: HashMap::new(),
            in_progress: HashSet::new(),
            interned: HashMap::new(),
            scalars: HashMap::new(),
            json: None,
        }
    }

    /// Resolves every shared definition, in document order.
    pub fn build_definitions(&mut self) -> Result<(), GeneratorError> {
        let doc = self.doc;
        for name in doc.definitions.keys() {
            self.definition(name, "/definitions")?;
        }
        debug!(
            definitions = doc.definitions.len(),
            nodes = self.graph.len(),
            "resolved definitions"
        );
        Ok(())
    }

    /// Resolves a schema found at `pointer`.
    ///
    /// `decl_path` is the raw naming path used for anonymous types, e.g.
    /// `"Pet safe"` for the `safe` property of `Pet`.
    pub fn resolve(
        &mut self,
        schema: &Schema,
        decl_path: &str,
        pointer: &str,
    ) -> Result<TypeId, GeneratorError> {
        if let Some(reference) = &schema.reference {
            return match schema.definition_name() {
                Some(name) => self.definition(name, pointer),
                None => Err(GeneratorError::unsupported(
                    pointer,
                    format!("only local '#/definitions/' references are supported, found '{reference}'"),
                )),
            };
        }

        let merged = self.merge_all_of(schema, pointer, 0)?;
        if is_object_with_properties(&merged) {
            return self.inline_object(&merged, decl_path, pointer);
        }
        self.resolve_non_object(&merged, decl_path, pointer)
    }

    pub fn graph_mut(&mut self) -> &mut TypeGraph {
        &mut self.graph
    }

    pub fn finish(self) -> TypeGraph {
        self.graph
    }

    fn definition(&mut self, name: &str, referrer: &str) -> Result<TypeId, GeneratorError> {
        if let Some(id) = self.definitions.get(name) {
            return Ok(*id);
        }

        let doc = self.doc;
        let schema = doc.definitions.get(name).ok_or_else(|| {
            GeneratorError::unsupported(referrer, format!("dangling reference to '{name}'"))
        })?;
        let pointer = format!("/definitions/{}", escape_pointer(name));
        let is_alias = schema.reference.is_some();
        let merged = if is_alias {
            Cow::Borrowed(schema)
        } else {
            self.merge_all_of(schema, &pointer, 0)?
        };

        if !is_alias && is_object_with_properties(&merged) {
            let id = self.allocate_object(name, &merged, &pointer)?;
            self.definitions.insert(name.to_string(), id);
            self.fill_object(id, name, &merged, &pointer)?;
            return Ok(id);
        }

        if !self.in_progress.insert(name.to_string()) {
            return Err(GeneratorError::unsupported(
                &pointer,
                "definition refers to itself without declaring properties",
            ));
        }
        // A pure alias shares the node of its target.
        let id = if is_alias {
            self.resolve(&merged, name, &pointer)?
        } else {
            self.resolve_non_object(&merged, name, &pointer)?
        };
        self.in_progress.remove(name);
        self.definitions.insert(name.to_string(), id);
        Ok(id)
    }

    /// Folds `allOf` members into one schema; members first, own keys last.
    fn merge_all_of<'s>(
        &self,
        schema: &'s Schema,
        pointer: &str,
        depth: usize,
    ) -> Result<Cow<'s, Schema>, GeneratorError> {
        if schema.all_of.is_empty() {
            return Ok(Cow::Borrowed(schema));
        }
        if depth > MAX_ALL_OF_DEPTH {
            return Err(GeneratorError::unsupported(pointer, "allOf chain is cyclic"));
        }

        let mut merged = Schema {
            schema_type: schema.schema_type.clone(),
            description: schema.description.clone(),
            title: schema.title.clone(),
            ..Schema::default()
        };

        for (index, member) in schema.all_of.iter().enumerate() {
            let member_pointer = format!("{pointer}/allOf/{index}");
            let member = match (&member.reference, member.definition_name()) {
                (None, _) => member,
                (Some(_), Some(name)) => self.doc.definitions.get(name).ok_or_else(|| {
                    GeneratorError::unsupported(
                        &member_pointer,
                        format!("dangling reference to '{name}'"),
                    )
                })?,
                (Some(reference), None) => {
                    return Err(GeneratorError::unsupported(
                        &member_pointer,
                        format!("only local '#/definitions/' references are supported, found '{reference}'"),
                    ));
                }
            };
            let member = self.merge_all_of(member, &member_pointer, depth + 1)?;
            merged.properties.extend(
                member
                    .properties
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
            merged.required.extend(member.required.iter().cloned());
            if merged.schema_type.is_none() {
                merged.schema_type = member.schema_type.clone();
            }
        }

        merged.properties.extend(
            schema
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        merged.required.extend(schema.required.iter().cloned());
        Ok(Cow::Owned(merged))
    }

    fn resolve_non_object(
        &mut self,
        schema: &Schema,
        decl_path: &str,
        pointer: &str,
    ) -> Result<TypeId, GeneratorError> {
        match schema.schema_type.as_deref() {
            None | Some("object") => {
                if schema.has_additional_properties() {
                    debug!(pointer, "map-like object exposed as JSON");
                } else {
                    warn!(pointer, "schema without properties exposed as JSON");
                }
                Ok(self.json())
            }
            Some("array") => {
                let items = schema.items.as_deref().ok_or_else(|| {
                    GeneratorError::unsupported(pointer, "array schema has no 'items'")
                })?;
                let item = self.resolve(
                    items,
                    &format!("{decl_path} Item"),
                    &format!("{pointer}/items"),
                )?;
                Ok(self.graph.push(TypeNode {
                    kind: TypeKind::Array { item },
                    name: None,
                    description: schema.description.clone(),
                    origin: None,
                }))
            }
            Some("string") if !schema.enum_values.is_empty() => {
                self.enumeration(schema, decl_path, pointer)
            }
            Some(other) => match ScalarKind::from_swagger(other) {
                Some(kind) => Ok(self.scalar(kind)),
                None => Err(GeneratorError::unsupported(
                    pointer,
                    format!("unknown type '{other}'"),
                )),
            },
        }
    }

    fn enumeration(
        &mut self,
        schema: &Schema,
        decl_path: &str,
        pointer: &str,
    ) -> Result<TypeId, GeneratorError> {
        let raw_values: Option<Vec<&str>> =
            schema.enum_values.iter().map(Value::as_str).collect();
        let Some(raw_values) = raw_values else {
            warn!(pointer, "enum with non-string values exposed as String");
            return Ok(self.scalar(ScalarKind::String));
        };

        let key = (decl_path.to_string(), signature(schema));
        if let Some(id) = self.interned.get(&key) {
            return Ok(*id);
        }

        let name = self.graph.type_names.fresh(decl_path)?;
        let mut items = Scope::new(format!("items of {name}"), Case::ShoutySnake);
        let mut values = Vec::with_capacity(raw_values.len());
        for raw in raw_values {
            if items.names().sanitized(raw).is_some() {
                continue;
            }
            values.push((raw.to_string(), items.assign(raw)?));
        }

        debug!(name = %name, values = values.len(), "enum type");
        let id = self.graph.push(TypeNode {
            kind: TypeKind::Enum { values },
            name: Some(name),
            description: schema.description.clone(),
            origin: Some(origin(schema, pointer)),
        });
        self.interned.insert(key, id);
        Ok(id)
    }

    fn inline_object(
        &mut self,
        schema: &Schema,
        decl_path: &str,
        pointer: &str,
    ) -> Result<TypeId, GeneratorError> {
        let key = (decl_path.to_string(), signature(schema));
        if let Some(id) = self.interned.get(&key) {
            return Ok(*id);
        }
        let id = self.allocate_object(decl_path, schema, pointer)?;
        self.interned.insert(key, id);
        self.fill_object(id, decl_path, schema, pointer)?;
        Ok(id)
    }

    fn allocate_object(
        &mut self,
        decl_path: &str,
        schema: &Schema,
        pointer: &str,
    ) -> Result<TypeId, GeneratorError> {
        let name = self.graph.type_names.fresh(decl_path)?;
        debug!(name = %name, pointer, "object type");
        Ok(self.graph.push(TypeNode {
            kind: TypeKind::Object { fields: Vec::new() },
            name: Some(name),
            description: schema.description.clone().or_else(|| schema.title.clone()),
            origin: Some(origin(schema, pointer)),
        }))
    }

    fn fill_object(
        &mut self,
        id: TypeId,
        decl_path: &str,
        schema: &Schema,
        pointer: &str,
    ) -> Result<(), GeneratorError> {
        let name = self.graph.type_name(id).to_string();
        let mut scope = Scope::new(format!("fields of {name}"), Case::LowerCamel);
        if self.reserve_raw_input_options {
            scope.reserve(RAW_INPUT_OPTIONS_FIELD);
        }

        let mut fields = Vec::with_capacity(schema.properties.len());
        for (raw, property) in &schema.properties {
            let sanitized_name = scope.assign(raw)?;
            let ty = self.resolve(
                property,
                &format!("{decl_path} {raw}"),
                &format!("{pointer}/properties/{}", escape_pointer(raw)),
            )?;
            fields.push(FieldMapping {
                raw_name: raw.clone(),
                sanitized_name,
                ty,
                required: schema.is_required(raw),
                description: property.description.clone(),
            });
        }

        self.graph.nodes[id.0].kind = TypeKind::Object { fields };
        Ok(())
    }

    fn scalar(&mut self, kind: ScalarKind) -> TypeId {
        if let Some(id) = self.scalars.get(&kind) {
            return *id;
        }
        let id = self.graph.push(TypeNode {
            kind: TypeKind::Scalar(kind),
            name: Some(kind.graphql_name().to_string()),
            description: None,
            origin: None,
        });
        self.scalars.insert(kind, id);
        id
    }

    fn json(&mut self) -> TypeId {
        if let Some(id) = self.json {
            return id;
        }
        let id = self.graph.push(TypeNode {
            kind: TypeKind::Json,
            name: Some(JSON_SCALAR.to_string()),
            description: None,
            origin: None,
        });
        self.json = Some(id);
        id
    }
}

fn origin(schema: &Schema, pointer: &str) -> Origin {
    Origin {
        pointer: pointer.to_string(),
        schema: serde_json::to_value(schema).unwrap_or(Value::Null),
    }
}

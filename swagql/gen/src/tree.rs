//! The declaration tree: an ordered list of everything a generated module
//! contains.
//!
//! The tree is the single source of truth for both outputs. [`crate::codegen`]
//! serializes it to Rust source and [`SyntaxTree::assembly`] feeds the same
//! descriptors to the runtime.

use std::path::PathBuf;

use serde_json::Value;
use swagql_runtime::{
    EnumType, InputObjectType, Markers, ObjectType, ScalarType, SchemaAssembly,
};

use crate::plugins::PluginContribution;

/// Identifies the REST schema a declaration was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiTypeTag {
    /// JSON pointer into the document.
    pub pointer: String,
    /// The originating schema.
    pub api_type: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Scalar(ScalarType),
    Enum(EnumType),
    Object(ObjectType),
    InputObject(InputObjectType),
    Query(ObjectType),
    Mutation(ObjectType),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(ty) => &ty.name,
            Self::Enum(ty) => &ty.name,
            Self::Object(ty) | Self::Query(ty) | Self::Mutation(ty) => &ty.name,
            Self::InputObject(ty) => &ty.name,
        }
    }

    /// Kind label used in logs and generated doc comments.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Enum(_) => "enum",
            Self::Object(_) => "object",
            Self::InputObject(_) => "input object",
            Self::Query(_) => "query root",
            Self::Mutation(_) => "mutation root",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationItem {
    pub declaration: Declaration,
    pub api_type: Option<ApiTypeTag>,
}

#[derive(Debug, Clone)]
pub enum Item {
    /// A top-level statement contributed by a plugin.
    Plugin { plugin: PathBuf, item: syn::Item },
    Declaration(DeclarationItem),
    /// Marker constants and the `schema()` entry point. Always last.
    Exports(Markers),
}

/// An ordered module body plus its provenance header.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    /// Provenance comment, without the leading `//`.
    pub header: String,
    pub items: Vec<Item>,
}

impl SyntaxTree {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            items: Vec::new(),
        }
    }

    pub fn push_declaration(&mut self, declaration: Declaration, api_type: Option<ApiTypeTag>) {
        self.items.push(Item::Declaration(DeclarationItem {
            declaration,
            api_type,
        }));
    }

    pub fn push_exports(&mut self, markers: Markers) {
        self.items.push(Item::Exports(markers));
    }

    pub fn declarations(&self) -> impl Iterator<Item = &DeclarationItem> {
        self.items.iter().filter_map(|item| match item {
            Item::Declaration(decl) => Some(decl),
            _ => None,
        })
    }

    pub fn plugin_items(&self) -> impl Iterator<Item = (&PathBuf, &syn::Item)> {
        self.items.iter().filter_map(|item| match item {
            Item::Plugin { plugin, item } => Some((plugin, item)),
            _ => None,
        })
    }

    /// Splices plugin statements in before the first declaration, keeping
    /// plugin-list order.
    pub fn insert_plugin_contributions(&mut self, contributions: Vec<PluginContribution>) {
        let at = self
            .items
            .iter()
            .position(|item| !matches!(item, Item::Plugin { .. }))
            .unwrap_or(self.items.len());

        let spliced: Vec<Item> = contributions
            .into_iter()
            .flat_map(|contribution| {
                let plugin = contribution.plugin;
                contribution
                    .statements
                    .into_iter()
                    .map(move |item| Item::Plugin {
                        plugin: plugin.clone(),
                        item,
                    })
            })
            .collect();

        self.items.splice(at..at, spliced);
    }

    pub fn markers(&self) -> Option<&Markers> {
        self.items.iter().find_map(|item| match item {
            Item::Exports(markers) => Some(markers),
            _ => None,
        })
    }

    /// Feeds every declaration to a runtime [`SchemaAssembly`].
    pub fn assembly(&self, markers: Markers) -> SchemaAssembly {
        self.declarations()
            .fold(SchemaAssembly::new(markers), |assembly, item| {
                match &item.declaration {
                    Declaration::Scalar(ty) => assembly.scalar(ty.clone()),
                    Declaration::Enum(ty) => assembly.enum_type(ty.clone()),
                    Declaration::Object(ty) => assembly.object(ty.clone()),
                    Declaration::InputObject(ty) => assembly.input_object(ty.clone()),
                    Declaration::Query(ty) => assembly.query(ty.clone()),
                    Declaration::Mutation(ty) => assembly.mutation(ty.clone()),
                }
            })
    }
}

//! Shared test utilities for swagql-gen tests.

use serde_json::{Value, json};
use swagql_define::SpecDocument;

/// The petstore fixture used across unit and integration tests.
pub const PETSTORE: &str = include_str!("../tests/fixtures/petstore.json");

/// Parses the petstore fixture.
pub fn petstore() -> SpecDocument {
    SpecDocument::from_json(PETSTORE).expect("petstore fixture parses")
}

/// Creates a document with only the given `definitions`.
pub fn doc_with_definitions(definitions: Value) -> SpecDocument {
    SpecDocument::from_value(json!({
        "swagger": "2.0",
        "info": { "title": "Test", "version": "0.0.1" },
        "definitions": definitions,
        "paths": {}
    }))
    .expect("test document parses")
}

/// Creates a document with only the given `paths`.
pub fn doc_with_paths(paths: Value) -> SpecDocument {
    SpecDocument::from_value(json!({
        "swagger": "2.0",
        "info": { "title": "Test", "version": "0.0.1" },
        "paths": paths
    }))
    .expect("test document parses")
}

//! End-to-end tests: build the emitted module as its own crate.
//!
//! These tests are ignored by default since they invoke cargo.

use std::path::{Path, PathBuf};
use std::process::Command;

use swagql_define::SpecDocument;
use swagql_gen::generate_schema;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Writes a binary crate that prints the SDL of the emitted module.
fn write_crate(dir: &Path, source_text: &str) {
    let runtime = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../runtime")
        .canonicalize()
        .expect("runtime crate exists");
    let manifest = format!(
        r#"[package]
name = "swagql-generated-check"
version = "0.0.0"
edition = "2024"
publish = false

[dependencies]
swagql-runtime = {{ path = {runtime:?} }}

[workspace]
"#
    );
    std::fs::create_dir_all(dir.join("src")).expect("create src");
    std::fs::write(dir.join("Cargo.toml"), manifest).expect("write Cargo.toml");
    std::fs::write(dir.join("src/generated.rs"), source_text).expect("write module");
    std::fs::write(
        dir.join("src/main.rs"),
        r#"mod generated;

fn main() {
    match generated::schema() {
        Ok(schema) => print!("{}", schema.sdl()),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
"#,
    )
    .expect("write main.rs");
}

/// The emitted petstore module compiles against `swagql-runtime` and
/// rebuilds the same schema as the in-process tree.
#[tokio::test]
#[ignore = "slow: compiles generated code"]
async fn generated_code_compiles() {
    let text = std::fs::read_to_string(fixture("petstore.json")).expect("fixture readable");
    let doc = SpecDocument::from_json(&text).expect("fixture parses");
    let module = generate_schema(&doc, &[fixture("plugins/api_key.rs")])
        .await
        .expect("petstore generates");
    let expected = module.executable_schema().expect("schema builds").sdl();

    let dir = tempfile::tempdir().expect("temp dir");
    write_crate(dir.path(), &module.source_text);

    let output = Command::new("cargo")
        .args(["run", "--quiet"])
        .current_dir(dir.path())
        .env("CARGO_TARGET_DIR", dir.path().join("target"))
        .output()
        .expect("failed to run cargo");

    assert!(
        output.status.success(),
        "generated code failed to build:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout), expected);
}

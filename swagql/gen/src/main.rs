//! swagql Generator
//!
//! Generates a GraphQL schema module from a Swagger 2.0 document.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use colored::Colorize;
use swagql_define::SpecDocument;
use swagql_gen::errors::GeneratorError;
use swagql_gen::generate_schema_with_options;
use swagql_gen::GeneratorOptions;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Input document syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Guesses from the file extension; anything but `.yaml`/`.yml` is JSON.
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// swagql generator - turns Swagger 2.0 documents into GraphQL schema modules
#[derive(Parser, Debug)]
#[command(name = "swagql-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Swagger 2.0 document (JSON or YAML)
    spec: PathBuf,

    /// Plugin source file whose items are spliced into the module (repeatable)
    #[arg(short, long = "plugin")]
    plugins: Vec<PathBuf>,

    /// Document syntax; inferred from the extension when omitted
    #[arg(short, long, value_enum)]
    format: Option<DocumentFormat>,

    /// Suffix for input object type names
    #[arg(long, default_value = "Input")]
    input_suffix: String,

    /// Leave out the `rawInputOptions` field on object types
    #[arg(long)]
    no_raw_input_options: bool,

    /// Print the GraphQL SDL instead of the Rust module
    #[arg(long)]
    sdl: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,swagql_gen=info".to_string(),
            2 => "info,swagql_gen=debug,swagql_runtime=debug".to_string(),
            _ => "debug,swagql_gen=trace,swagql_runtime=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn read_document(path: &Path, format: DocumentFormat) -> Result<SpecDocument, GeneratorError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| GeneratorError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), bytes = text.len(), ?format, "read document");

    Ok(match format {
        DocumentFormat::Json => SpecDocument::from_json(&text)?,
        DocumentFormat::Yaml => SpecDocument::from_yaml(&text)?,
    })
}

async fn run(cli: Cli) -> Result<String, GeneratorError> {
    let format = cli
        .format
        .unwrap_or_else(|| DocumentFormat::from_path(&cli.spec));
    let doc = read_document(&cli.spec, format).await?;

    let options = GeneratorOptions {
        input_suffix: cli.input_suffix,
        emit_raw_input_options: !cli.no_raw_input_options,
    };
    let module = generate_schema_with_options(&doc, &cli.plugins, &options).await?;

    if cli.sdl {
        Ok(module.executable_schema()?.sdl())
    } else {
        Ok(module.source_text)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_is_inferred_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("api.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("api.yml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("api.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("api")), DocumentFormat::Json);
    }

    #[test]
    fn parses_repeated_plugins() {
        let cli = Cli::parse_from([
            "swagql-gen",
            "petstore.json",
            "--plugin",
            "a.rs",
            "-p",
            "b.rs",
            "-vv",
        ]);
        assert_eq!(cli.plugins, vec![PathBuf::from("a.rs"), PathBuf::from("b.rs")]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.format.is_none());
    }

    #[tokio::test]
    async fn missing_document_is_a_read_error() {
        let result = read_document(Path::new("/no/such/spec.json"), DocumentFormat::Json).await;
        assert!(matches!(result, Err(GeneratorError::ReadError { .. })));
    }
}

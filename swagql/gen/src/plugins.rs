//! Plugin hook system.
//!
//! A plugin is a Rust source fragment whose top-level items are spliced into
//! the generated module ahead of every declaration, e.g. a `use std::env;`
//! needed by hand-written resolver helpers.
//!
//! Sources are loaded concurrently; parsing happens once every load has
//! settled, in plugin-list order.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::debug;

use crate::errors::GeneratorError;

/// A source of plugin statements.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Identifies the plugin in errors and in the declaration tree.
    fn path(&self) -> &Path;

    /// Returns the plugin's Rust source.
    async fn load_source(&self) -> Result<String, GeneratorError>;
}

/// A plugin read from a `.rs` file.
#[derive(Debug, Clone)]
pub struct FilePlugin {
    path: PathBuf,
}

impl FilePlugin {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Plugin for FilePlugin {
    fn path(&self) -> &Path {
        &self.path
    }

    async fn load_source(&self) -> Result<String, GeneratorError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| GeneratorError::PluginLoadError {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }
}

/// Statements contributed by one plugin.
#[derive(Debug, Clone)]
pub struct PluginContribution {
    pub plugin: PathBuf,
    pub statements: Vec<syn::Item>,
}

/// Raw sources of every plugin, in list order.
///
/// Returned as text so the caller's future stays `Send`; see
/// [`parse_sources`].
pub async fn load_sources(
    plugins: &[Box<dyn Plugin>],
) -> Result<Vec<(PathBuf, String)>, GeneratorError> {
    let sources = try_join_all(plugins.iter().map(|plugin| async move {
        let source = plugin.load_source().await?;
        Ok::<_, GeneratorError>((plugin.path().to_path_buf(), source))
    }))
    .await?;

    debug!(plugins = sources.len(), "loaded plugin sources");
    Ok(sources)
}

/// Parses loaded sources into contributions.
pub fn parse_sources(
    sources: Vec<(PathBuf, String)>,
) -> Result<Vec<PluginContribution>, GeneratorError> {
    sources
        .into_iter()
        .map(|(plugin, source)| {
            let file = syn::parse_file(&source).map_err(|e| GeneratorError::PluginLoadError {
                path: plugin.clone(),
                reason: e.to_string(),
            })?;
            debug!(plugin = %plugin.display(), statements = file.items.len(), "parsed plugin");
            Ok(PluginContribution {
                plugin,
                statements: file.items,
            })
        })
        .collect()
}

/// Wraps plain paths as [`FilePlugin`]s.
pub fn file_plugins(paths: &[PathBuf]) -> Vec<Box<dyn Plugin>> {
    paths
        .iter()
        .map(|path| Box::new(FilePlugin::new(path.clone())) as Box<dyn Plugin>)
        .collect()
}

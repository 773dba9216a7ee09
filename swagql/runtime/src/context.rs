//! Capabilities supplied by the caller at execution time.
//!
//! A generated schema never performs I/O by itself. Each operation resolver
//! looks up a [`Fetcher`] and an [`AuthVerifier`] in the request's
//! [`ExecutionContext`], keyed by the module's [`Markers`](crate::Markers).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::descriptor::{MarkerKey, OperationBinding};
use crate::error::{AuthError, FetchError, ResolutionError};
use crate::request::RequestOptions;

/// Performs the REST call behind an operation field.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url_path` (path plus query string, relative to the API root).
    async fn fetch(&self, url_path: &str, options: &RequestOptions) -> Result<Value, FetchError>;
}

/// Decides whether an operation may run.
#[async_trait]
pub trait AuthVerifier: Send + Sync {
    async fn verify(&self, operation: &OperationBinding) -> Result<(), AuthError>;
}

/// Verifier that accepts every operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl AuthVerifier for AllowAll {
    async fn verify(&self, _operation: &OperationBinding) -> Result<(), AuthError> {
        Ok(())
    }
}

/// A registered capability.
#[derive(Clone)]
pub enum Capability {
    Fetch(Arc<dyn Fetcher>),
    VerifyAuthStatus(Arc<dyn AuthVerifier>),
}

impl Capability {
    fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::VerifyAuthStatus(_) => "verifyAuthStatus",
        }
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Capability").field(&self.kind()).finish()
    }
}

/// Per-request capability table, attached to a request as data.
///
/// ## Examples
///
/// ```
/// use swagql_runtime::{AllowAll, ExecutionContext, Markers};
///
/// let markers = Markers::new("swagql.fetch.1", "swagql.verify_auth_status.1");
/// let ctx = ExecutionContext::new().with_auth_verifier(&markers.verify_auth_status, AllowAll);
///
/// assert!(ctx.auth_verifier(&markers.verify_auth_status).is_ok());
/// assert!(ctx.fetcher(&markers.fetch).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    capabilities: HashMap<MarkerKey, Capability>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `fetcher` under `marker`.
    pub fn with_fetcher(mut self, marker: &MarkerKey, fetcher: impl Fetcher + 'static) -> Self {
        self.capabilities
            .insert(marker.clone(), Capability::Fetch(Arc::new(fetcher)));
        self
    }

    /// Registers a shared fetcher under `marker`.
    pub fn with_shared_fetcher(mut self, marker: &MarkerKey, fetcher: Arc<dyn Fetcher>) -> Self {
        self.capabilities
            .insert(marker.clone(), Capability::Fetch(fetcher));
        self
    }

    /// Registers `verifier` under `marker`.
    pub fn with_auth_verifier(
        mut self,
        marker: &MarkerKey,
        verifier: impl AuthVerifier + 'static,
    ) -> Self {
        self.capabilities.insert(
            marker.clone(),
            Capability::VerifyAuthStatus(Arc::new(verifier)),
        );
        self
    }

    /// Looks up the fetcher registered under `marker`.
    pub fn fetcher(&self, marker: &MarkerKey) -> Result<Arc<dyn Fetcher>, ResolutionError> {
        match self.capabilities.get(marker) {
            Some(Capability::Fetch(fetcher)) => Ok(Arc::clone(fetcher)),
            _ => Err(ResolutionError::MissingCapability {
                capability: "fetch",
                marker: marker.to_string(),
            }),
        }
    }

    /// Looks up the verifier registered under `marker`.
    pub fn auth_verifier(
        &self,
        marker: &MarkerKey,
    ) -> Result<Arc<dyn AuthVerifier>, ResolutionError> {
        match self.capabilities.get(marker) {
            Some(Capability::VerifyAuthStatus(verifier)) => Ok(Arc::clone(verifier)),
            _ => Err(ResolutionError::MissingCapability {
                capability: "verifyAuthStatus",
                marker: marker.to_string(),
            }),
        }
    }
}

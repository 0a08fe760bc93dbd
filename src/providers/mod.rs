//! Secret providers: pluggable sources of (name, raw value) entries.
//!
//! The store depends only on the [`SecretProvider`] trait; anything that
//! can list entries plugs in. Cloud secret managers (AWS Secrets
//! Manager, Azure Key Vault and friends) live outside this crate —
//! their naming conventions are captured by
//! [`Namespace`](crate::models::Namespace) so the store can apply
//! prefix filtering and key translation uniformly.

pub mod file;
pub mod statics;

use thiserror::Error;

use crate::models::{Namespace, SecretEntry};

/// Errors surfaced by a provider.
///
/// The store passes these through `load_secrets` unmodified: retry,
/// timeout, and auth policy belong to the provider, not the core.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A secrets document could not be read.
    #[error("failed to read secrets document {path}: {source}")]
    ReadDocument {
        /// Document location.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A secrets document was not valid JSON.
    #[error("failed to parse secrets document {path}: {source}")]
    ParseDocument {
        /// Document location.
        path: std::path::PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// A secrets document had the wrong shape.
    #[error("secrets document {path} must be a JSON object of string values")]
    InvalidDocument {
        /// Document location.
        path: std::path::PathBuf,
    },

    /// Opaque failure from an external backend.
    #[error(transparent)]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// A source of secret entries.
///
/// Calls are blocking and run to completion; the store queries each
/// provider once per `load_secrets` pass.
pub trait SecretProvider {
    /// Settings key for this provider: the store reads
    /// `secrets.<name>.{enabled, prefix, skip_unprefixed}` from the
    /// already-loaded tree.
    fn name(&self) -> &str;

    /// Naming convention used for namespace-qualified entry names.
    fn namespace(&self) -> Namespace;

    /// Fetch the provider's entries, in the provider's native order.
    fn list_entries(&self) -> Result<Vec<SecretEntry>, ProviderError>;
}

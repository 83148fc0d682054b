use std::path::PathBuf;
use thiserror::Error;

/// Failure raised by a provider while reading its source.
///
/// These never reach callers of [`Resolver::lookup`](crate::Resolver::lookup):
/// the engine treats them as "no value from this provider" and moves on,
/// logging them only when verbose logging is enabled.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse JSON from {origin}: {source}")]
    Json {
        origin: String,
        source: serde_json::Error,
    },

    #[error("{0}")]
    Other(String),
}

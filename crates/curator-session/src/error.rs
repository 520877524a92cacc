use curator_core::ColumnPath;
use thiserror::Error;
use uuid::Uuid;

use crate::enrich::EnrichmentKind;

/// Errors raised by connection persistence and edit sessions.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("connection not found: {0}")]
    NotFound(Uuid),
    /// The connection was rejected before or by the saver.
    #[error("validation error: {0}")]
    Validation(String),
    /// Another stored connection already points at the same data source.
    #[error("connection already exists: {0}")]
    AlreadyExists(Uuid),
    /// The store could not be reached or failed mid-operation.
    #[error("transport error: {0}")]
    Transport(String),
    #[error("core error: {0}")]
    Core(#[from] curator_core::Error),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Failure reported by an enrichment provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("provider transport error: {0}")]
    Transport(String),
    #[error("provider query failed: {0}")]
    Query(String),
    #[error("provider does not support this request: {0}")]
    Unsupported(String),
}

/// Enrichment failure surfaced to the caller once the pending flag is cleared.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("{kind} enrichment failed for column {path}: {source}")]
    Provider {
        kind: EnrichmentKind,
        path: ColumnPath,
        #[source]
        source: ProviderError,
    },
}

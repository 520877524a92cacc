use thiserror::Error;

/// Core error type shared across Curator crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Database error or adapter failure.
    #[error("database error: {0}")]
    Db(String),
    /// The schema set violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// A field value does not have the shape its field requires.
    #[error("invalid value for `{field}`: {message}")]
    InvalidValue { field: String, message: String },
    /// The connection string could not be accepted.
    #[error("invalid dsn: {0}")]
    InvalidDsn(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by Curator crates.
pub type Result<T> = std::result::Result<T, Error>;

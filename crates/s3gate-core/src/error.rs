//! Error types for the s3gate core.

/// Core error type for s3gate infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum S3GateError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for s3gate operations.
pub type S3GateResult<T> = Result<T, S3GateError>;

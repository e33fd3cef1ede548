//! Deployment error types.

use s3gate_model::ValidationError;

/// Error produced while reconciling the stack against a live account.
///
/// SDK errors are wrapped per service; the service's own error message (for
/// example `EntityAlreadyExists` or `BucketAlreadyExists`) is what the
/// operator needs to see, so it passes through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The declared stack failed validation before any API call was made.
    #[error("stack validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// An IAM operation failed.
    #[error("IAM operation failed: {0}")]
    Iam(#[from] aws_sdk_iam::Error),

    /// An S3 operation failed.
    #[error("S3 operation failed: {0}")]
    S3(#[from] aws_sdk_s3::Error),

    /// A CloudWatch Logs operation failed.
    #[error("CloudWatch Logs operation failed: {0}")]
    Logs(#[from] aws_sdk_cloudwatchlogs::Error),

    /// An API Gateway operation failed.
    #[error("API Gateway operation failed: {0}")]
    ApiGateway(#[from] aws_sdk_apigateway::Error),

    /// A created resource came back without a field the stack depends on.
    #[error("deployed resource is missing required field: {0}")]
    MissingField(&'static str),
}

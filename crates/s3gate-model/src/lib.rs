//! Typed resource descriptors for the API Gateway → S3 proxy stack.
//!
//! The stack is three resource groups declared in dependency order: an IAM
//! role assumable by API Gateway, an S3 bucket granting that role read and
//! write, and a regional REST API whose methods are direct AWS integrations
//! against the bucket, with access logging to a CloudWatch Logs group.
//!
//! [`ProxyStack`] assembles the descriptors from a
//! [`StackConfig`](s3gate_core::StackConfig), [`ProxyStack::validate`]
//! enforces the cross-resource invariants, and [`synth`](ProxyStack::synth)
//! renders a CloudFormation-style template for inspection and testing.

mod api;
mod bucket;
mod error;
mod logs;
mod policy;
mod responses;
mod role;
mod stack;
mod synth;

pub use api::{
    ACCESS_LOG_FORMAT, EndpointType, MethodLoggingLevel, MethodSpec, ResourcePath, RestApiSpec,
    S3Integration, StageOptions,
};
pub use bucket::{BucketSpec, Grant, READ_ACTIONS, WRITE_ACTIONS, validate_bucket_name};
pub use error::ValidationError;
pub use logs::{LogGroupSpec, RetentionDays};
pub use policy::{PolicyDocument, PolicyStatement, ServicePrincipal, StatementPrincipal};
pub use responses::{IntegrationResponse, MethodResponse, ResponseMapping};
pub use role::{PUSH_TO_LOGS_POLICY_ARN, RoleSpec};
pub use stack::ProxyStack;
pub use synth::Template;

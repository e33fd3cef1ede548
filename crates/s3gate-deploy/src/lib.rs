//! One-shot deploy/teardown engine for the proxy stack.
//!
//! [`Deployer`] reconciles a declared [`ProxyStack`](s3gate_model::ProxyStack)
//! against a live AWS account: `deploy` creates resources in dependency
//! order (role, bucket, log group, REST API), `destroy` deletes them in
//! reverse. There is no retry or backoff; the first service error aborts and
//! is surfaced to the caller.

mod deployer;
mod error;
mod ops;
mod outputs;

pub use deployer::Deployer;
pub use error::DeployError;
pub use outputs::StackOutputs;

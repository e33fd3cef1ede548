//! Core types, configuration, and errors for s3gate.
//!
//! This crate provides the foundational building blocks shared across the
//! s3gate workspace: the region newtype, the removal-policy lifecycle
//! marker, and the environment-driven stack configuration.

mod config;
mod error;
mod types;

pub use config::StackConfig;
pub use error::{S3GateError, S3GateResult};
pub use types::{AwsRegion, RemovalPolicy};

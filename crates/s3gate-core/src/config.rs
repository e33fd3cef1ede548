//! Stack configuration.
//!
//! All configuration is driven by environment variables. Defaults match the
//! resource names the stack has always shipped with, so a bare `deploy`
//! reproduces the canonical demo stack.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{S3GateError, S3GateResult};
use crate::types::AwsRegion;

/// Configuration for the proxy stack.
///
/// All fields have defaults; values can be loaded from environment variables
/// via [`StackConfig::from_env`].
///
/// # Examples
///
/// ```
/// use s3gate_core::StackConfig;
///
/// let config = StackConfig::default();
/// assert_eq!(config.bucket_name, "apigateway-s3-demo-bucket");
/// assert_eq!(config.stage_name, "prod");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct StackConfig {
    /// AWS region the stack deploys into.
    #[builder(default)]
    pub region: AwsRegion,

    /// Name of the IAM role API Gateway assumes for S3 access.
    #[builder(default = String::from("apigatewayS3AccessRole"))]
    pub role_name: String,

    /// Name of the S3 bucket backing the proxy.
    #[builder(default = String::from("apigateway-s3-demo-bucket"))]
    pub bucket_name: String,

    /// Name of the CloudWatch Logs group receiving access logs.
    #[builder(default = String::from("apigatewayS3DemoAccessLog"))]
    pub log_group_name: String,

    /// Name of the REST API.
    #[builder(default = String::from("apigatewayS3CDKRestAPI"))]
    pub api_name: String,

    /// Name of the deployed stage.
    #[builder(default = String::from("prod"))]
    pub stage_name: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            region: AwsRegion::default(),
            role_name: String::from("apigatewayS3AccessRole"),
            bucket_name: String::from("apigateway-s3-demo-bucket"),
            log_group_name: String::from("apigatewayS3DemoAccessLog"),
            api_name: String::from("apigatewayS3CDKRestAPI"),
            stage_name: String::from("prod"),
            log_level: String::from("info"),
        }
    }
}

impl StackConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `DEFAULT_REGION` | `us-east-1` |
    /// | `ROLE_NAME` | `apigatewayS3AccessRole` |
    /// | `BUCKET_NAME` | `apigateway-s3-demo-bucket` |
    /// | `LOG_GROUP_NAME` | `apigatewayS3DemoAccessLog` |
    /// | `API_NAME` | `apigatewayS3CDKRestAPI` |
    /// | `STAGE_NAME` | `prod` |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// # Errors
    ///
    /// Returns [`S3GateError::Config`] if a variable is set but empty.
    pub fn from_env() -> S3GateResult<Self> {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("DEFAULT_REGION") {
            config.region = AwsRegion::new(require_non_empty("DEFAULT_REGION", v)?);
        }
        if let Ok(v) = std::env::var("ROLE_NAME") {
            config.role_name = require_non_empty("ROLE_NAME", v)?;
        }
        if let Ok(v) = std::env::var("BUCKET_NAME") {
            config.bucket_name = require_non_empty("BUCKET_NAME", v)?;
        }
        if let Ok(v) = std::env::var("LOG_GROUP_NAME") {
            config.log_group_name = require_non_empty("LOG_GROUP_NAME", v)?;
        }
        if let Ok(v) = std::env::var("API_NAME") {
            config.api_name = require_non_empty("API_NAME", v)?;
        }
        if let Ok(v) = std::env::var("STAGE_NAME") {
            config.stage_name = require_non_empty("STAGE_NAME", v)?;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = require_non_empty("LOG_LEVEL", v)?;
        }

        Ok(config)
    }
}

/// Reject environment values that are set but blank.
fn require_non_empty(name: &'static str, value: String) -> S3GateResult<String> {
    if value.trim().is_empty() {
        return Err(S3GateError::Config(format!("{name} is set but empty")));
    }
    Ok(value)
}

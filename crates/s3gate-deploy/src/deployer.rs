//! The deployment engine.

use aws_config::{BehaviorVersion, Region};
use tracing::info;

use s3gate_core::AwsRegion;
use s3gate_model::ProxyStack;

use crate::error::DeployError;
use crate::outputs::StackOutputs;

/// Reconciles a declared stack against a live AWS account.
#[derive(Debug, Clone)]
pub struct Deployer {
    pub(crate) iam: aws_sdk_iam::Client,
    pub(crate) s3: aws_sdk_s3::Client,
    pub(crate) logs: aws_sdk_cloudwatchlogs::Client,
    pub(crate) apigateway: aws_sdk_apigateway::Client,
    pub(crate) region: AwsRegion,
}

impl Deployer {
    /// Create a deployer from explicit service clients.
    #[must_use]
    pub fn new(
        iam: aws_sdk_iam::Client,
        s3: aws_sdk_s3::Client,
        logs: aws_sdk_cloudwatchlogs::Client,
        apigateway: aws_sdk_apigateway::Client,
        region: AwsRegion,
    ) -> Self {
        Self {
            iam,
            s3,
            logs,
            apigateway,
            region,
        }
    }

    /// Create a deployer from the ambient AWS credential chain.
    pub async fn from_env(region: AwsRegion) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.as_str().to_owned()))
            .load()
            .await;
        Self {
            iam: aws_sdk_iam::Client::new(&shared),
            s3: aws_sdk_s3::Client::new(&shared),
            logs: aws_sdk_cloudwatchlogs::Client::new(&shared),
            apigateway: aws_sdk_apigateway::Client::new(&shared),
            region,
        }
    }

    /// Deploy the stack, creating resources in dependency order.
    ///
    /// The stack is validated first; an inconsistent stack is rejected
    /// before any cloud API is called.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError`] on validation failure or on the first failed
    /// service call. No rollback is attempted; rerun `destroy` to clean up a
    /// partial deployment.
    pub async fn deploy(&self, stack: &ProxyStack) -> Result<StackOutputs, DeployError> {
        stack.validate()?;

        info!(role = %stack.role.role_name, "creating access role");
        let role_arn = self.create_role(&stack.role).await?;

        info!(bucket = %stack.bucket.bucket_name, "creating storage bucket");
        self.create_bucket(&stack.bucket).await?;
        self.apply_grants(&stack.bucket).await?;

        info!(log_group = %stack.log_group.log_group_name, "creating access log group");
        let log_group_arn = self.create_log_group(&stack.log_group).await?;

        info!(api = %stack.api.api_name, "creating proxy API");
        let rest_api_id = self
            .create_rest_api(&stack.api, &role_arn, &log_group_arn)
            .await?;

        let invoke_url = format!(
            "https://{rest_api_id}.execute-api.{}.amazonaws.com/{}",
            self.region, stack.api.stage.stage_name
        );
        info!(%invoke_url, "stack deployed");

        Ok(StackOutputs {
            role_arn,
            bucket_name: stack.bucket.bucket_name.clone(),
            log_group_arn,
            rest_api_id,
            invoke_url,
        })
    }

    /// Tear the stack down in reverse dependency order.
    ///
    /// Resources declared with `RemovalPolicy::Retain` are skipped. Missing
    /// resources are treated as already deleted, so `destroy` can be rerun
    /// over a partial deployment.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError`] on the first failed service call.
    pub async fn destroy(&self, stack: &ProxyStack) -> Result<(), DeployError> {
        if stack.api.removal_policy.deletes_on_teardown() {
            info!(api = %stack.api.api_name, "deleting proxy API");
            self.delete_rest_api_by_name(&stack.api.api_name).await?;
        }

        if stack.log_group.removal_policy.deletes_on_teardown() {
            info!(log_group = %stack.log_group.log_group_name, "deleting access log group");
            self.delete_log_group(&stack.log_group.log_group_name).await?;
        }

        if stack.bucket.removal_policy.deletes_on_teardown() {
            info!(bucket = %stack.bucket.bucket_name, "emptying and deleting storage bucket");
            self.empty_bucket(&stack.bucket.bucket_name).await?;
            self.delete_bucket(&stack.bucket.bucket_name).await?;
        }

        if stack.role.removal_policy.deletes_on_teardown() {
            info!(role = %stack.role.role_name, "deleting access role");
            self.delete_role(&stack.role.role_name).await?;
        }

        info!("stack destroyed");
        Ok(())
    }
}

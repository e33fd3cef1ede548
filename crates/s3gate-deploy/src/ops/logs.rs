//! Access-log-group lifecycle operations.

use tracing::debug;

use s3gate_model::LogGroupSpec;

use crate::deployer::Deployer;
use crate::error::DeployError;

impl Deployer {
    /// Create the log group with its retention policy. Returns the log
    /// group ARN, trimmed for use as an access-log destination.
    pub(crate) async fn create_log_group(
        &self,
        log_group: &LogGroupSpec,
    ) -> Result<String, DeployError> {
        self.logs
            .create_log_group()
            .log_group_name(&log_group.log_group_name)
            .send()
            .await
            .map_err(aws_sdk_cloudwatchlogs::Error::from)?;

        self.logs
            .put_retention_policy()
            .log_group_name(&log_group.log_group_name)
            .retention_in_days(log_group.retention.as_days())
            .send()
            .await
            .map_err(aws_sdk_cloudwatchlogs::Error::from)?;

        let described = self
            .logs
            .describe_log_groups()
            .log_group_name_prefix(&log_group.log_group_name)
            .send()
            .await
            .map_err(aws_sdk_cloudwatchlogs::Error::from)?;

        let arn = described
            .log_groups()
            .iter()
            .find(|g| g.log_group_name() == Some(log_group.log_group_name.as_str()))
            .and_then(|g| g.arn())
            // API Gateway rejects the ":*" suffix CloudWatch reports.
            .map(|arn| arn.trim_end_matches(":*").to_owned())
            .ok_or(DeployError::MissingField("logGroup.arn"))?;

        debug!(log_group = %log_group.log_group_name, retention_days = log_group.retention.as_days(), "log group created");
        Ok(arn)
    }

    /// Delete the log group. A group that no longer exists counts as deleted.
    pub(crate) async fn delete_log_group(&self, log_group_name: &str) -> Result<(), DeployError> {
        match self
            .logs
            .delete_log_group()
            .log_group_name(log_group_name)
            .send()
            .await
            .map_err(aws_sdk_cloudwatchlogs::Error::from)
        {
            Ok(_) | Err(aws_sdk_cloudwatchlogs::Error::ResourceNotFoundException(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

//! Access-role lifecycle operations.

use tracing::debug;

use s3gate_model::{BucketSpec, RoleSpec};

use crate::deployer::Deployer;
use crate::error::DeployError;

/// Inline policy name for a bucket grant, matching the synthesized template.
fn grant_policy_name(role_name: &str) -> String {
    format!("{role_name}-bucket-access")
}

impl Deployer {
    /// Create the role with its trust policy and attach its managed
    /// policies. Returns the role ARN.
    pub(crate) async fn create_role(&self, role: &RoleSpec) -> Result<String, DeployError> {
        let created = self
            .iam
            .create_role()
            .role_name(&role.role_name)
            .assume_role_policy_document(role.assume_role_policy().to_json())
            .send()
            .await
            .map_err(aws_sdk_iam::Error::from)?;

        let role_arn = created
            .role()
            .map(|r| r.arn().to_owned())
            .ok_or(DeployError::MissingField("role.arn"))?;

        for policy_arn in &role.managed_policy_arns {
            self.iam
                .attach_role_policy()
                .role_name(&role.role_name)
                .policy_arn(policy_arn)
                .send()
                .await
                .map_err(aws_sdk_iam::Error::from)?;
            debug!(role = %role.role_name, policy = %policy_arn, "attached managed policy");
        }

        Ok(role_arn)
    }

    /// Attach the bucket's grants to their grantee roles as inline policies.
    pub(crate) async fn apply_grants(&self, bucket: &BucketSpec) -> Result<(), DeployError> {
        for grant in &bucket.grants {
            self.iam
                .put_role_policy()
                .role_name(&grant.grantee_role)
                .policy_name(grant_policy_name(&grant.grantee_role))
                .policy_document(bucket.grant_policy(grant).to_json())
                .send()
                .await
                .map_err(aws_sdk_iam::Error::from)?;
            debug!(
                role = %grant.grantee_role,
                bucket = %bucket.bucket_name,
                "granted bucket access"
            );
        }
        Ok(())
    }

    /// Delete the role after detaching managed policies and deleting inline
    /// policies. A role that no longer exists counts as deleted.
    pub(crate) async fn delete_role(&self, role_name: &str) -> Result<(), DeployError> {
        let attached = match self
            .iam
            .list_attached_role_policies()
            .role_name(role_name)
            .send()
            .await
            .map_err(aws_sdk_iam::Error::from)
        {
            Ok(resp) => resp,
            Err(aws_sdk_iam::Error::NoSuchEntityException(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        for policy in attached.attached_policies() {
            if let Some(arn) = policy.policy_arn() {
                self.iam
                    .detach_role_policy()
                    .role_name(role_name)
                    .policy_arn(arn)
                    .send()
                    .await
                    .map_err(aws_sdk_iam::Error::from)?;
            }
        }

        let inline = self
            .iam
            .list_role_policies()
            .role_name(role_name)
            .send()
            .await
            .map_err(aws_sdk_iam::Error::from)?;
        for policy_name in inline.policy_names() {
            self.iam
                .delete_role_policy()
                .role_name(role_name)
                .policy_name(policy_name)
                .send()
                .await
                .map_err(aws_sdk_iam::Error::from)?;
        }

        self.iam
            .delete_role()
            .role_name(role_name)
            .send()
            .await
            .map_err(aws_sdk_iam::Error::from)?;
        Ok(())
    }
}

//! Storage-bucket lifecycle operations.

use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use tracing::debug;

use s3gate_model::BucketSpec;

use crate::deployer::Deployer;
use crate::error::DeployError;

impl Deployer {
    /// Create the bucket in the deployer's region.
    ///
    /// Surfaces `BucketAlreadyExists` unchanged: bucket names are global and
    /// a taken name aborts the deployment.
    pub(crate) async fn create_bucket(&self, bucket: &BucketSpec) -> Result<(), DeployError> {
        let mut request = self.s3.create_bucket().bucket(&bucket.bucket_name);

        // us-east-1 is the default location and rejects an explicit constraint.
        if self.region.as_str() != "us-east-1" {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        request.send().await.map_err(aws_sdk_s3::Error::from)?;
        debug!(bucket = %bucket.bucket_name, region = %self.region, "bucket created");
        Ok(())
    }

    /// Delete every object in the bucket. A missing bucket counts as empty.
    pub(crate) async fn empty_bucket(&self, bucket_name: &str) -> Result<(), DeployError> {
        let mut continuation_token = None;
        loop {
            let mut request = self.s3.list_objects_v2().bucket(bucket_name);
            if let Some(token) = continuation_token.take() {
                request = request.continuation_token(token);
            }
            let resp = match request.send().await.map_err(aws_sdk_s3::Error::from) {
                Ok(resp) => resp,
                Err(aws_sdk_s3::Error::NoSuchBucket(_)) => return Ok(()),
                Err(e) => return Err(e.into()),
            };

            for object in resp.contents() {
                if let Some(key) = object.key() {
                    self.s3
                        .delete_object()
                        .bucket(bucket_name)
                        .key(key)
                        .send()
                        .await
                        .map_err(aws_sdk_s3::Error::from)?;
                }
            }

            if resp.is_truncated() == Some(true) {
                continuation_token = resp.next_continuation_token().map(ToOwned::to_owned);
            } else {
                break;
            }
        }
        debug!(bucket = %bucket_name, "bucket emptied");
        Ok(())
    }

    /// Delete the bucket. A bucket that no longer exists counts as deleted.
    pub(crate) async fn delete_bucket(&self, bucket_name: &str) -> Result<(), DeployError> {
        match self
            .s3
            .delete_bucket()
            .bucket(bucket_name)
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)
        {
            Ok(_) | Err(aws_sdk_s3::Error::NoSuchBucket(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

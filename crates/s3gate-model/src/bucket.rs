//! The storage bucket and its grants to the access role.

use std::net::Ipv4Addr;

use s3gate_core::RemovalPolicy;

use crate::error::ValidationError;
use crate::policy::PolicyDocument;

/// Minimum bucket name length.
const MIN_BUCKET_NAME_LEN: usize = 3;

/// Maximum bucket name length.
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Actions granted for bucket reads.
pub const READ_ACTIONS: &[&str] = &["s3:GetObject*", "s3:GetBucket*", "s3:List*"];

/// Actions granted for bucket writes.
pub const WRITE_ACTIONS: &[&str] = &[
    "s3:DeleteObject*",
    "s3:PutObject",
    "s3:PutObjectLegalHold",
    "s3:PutObjectRetention",
    "s3:PutObjectTagging",
    "s3:PutObjectVersionTagging",
    "s3:Abort*",
];

/// A permission grant from the bucket to an IAM role.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    /// Name of the role receiving the grant.
    pub grantee_role: String,
    /// S3 actions covered by the grant.
    pub actions: Vec<String>,
}

/// An S3 bucket with role grants.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSpec {
    /// Globally unique bucket name.
    pub bucket_name: String,
    /// Grants issued to stack roles.
    pub grants: Vec<Grant>,
    /// Lifecycle at stack teardown.
    pub removal_policy: RemovalPolicy,
}

impl BucketSpec {
    /// Declare a bucket with the given name, no grants, destroyed at teardown.
    #[must_use]
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            grants: Vec::new(),
            removal_policy: RemovalPolicy::Destroy,
        }
    }

    /// Grant read and write on this bucket to a role.
    #[must_use]
    pub fn grant_read_write(mut self, role_name: impl Into<String>) -> Self {
        let actions = READ_ACTIONS
            .iter()
            .chain(WRITE_ACTIONS)
            .map(|&a| a.to_owned())
            .collect();
        self.grants.push(Grant {
            grantee_role: role_name.into(),
            actions,
        });
        self
    }

    /// ARN of the bucket itself.
    #[must_use]
    pub fn arn(&self) -> String {
        format!("arn:aws:s3:::{}", self.bucket_name)
    }

    /// ARN pattern covering every object in the bucket.
    #[must_use]
    pub fn objects_arn(&self) -> String {
        format!("arn:aws:s3:::{}/*", self.bucket_name)
    }

    /// Render the permission policy a grant attaches to its grantee role.
    #[must_use]
    pub fn grant_policy(&self, grant: &Grant) -> PolicyDocument {
        PolicyDocument::allow(grant.actions.clone(), vec![self.arn(), self.objects_arn()])
    }
}

/// Validate an S3 bucket name.
///
/// Rules (per AWS documentation):
/// - 3-63 characters long
/// - Only lowercase letters, numbers, hyphens, and dots
/// - Must start and end with a letter or number
/// - No consecutive dots (`..`)
/// - Not formatted as an IPv4 address (e.g. `192.168.0.1`)
///
/// # Errors
///
/// Returns [`ValidationError::InvalidBucketName`] if any rule is violated.
pub fn validate_bucket_name(name: &str) -> Result<(), ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidBucketName {
        name: name.to_owned(),
        reason: reason.to_owned(),
    };

    let len = name.len();
    if !(MIN_BUCKET_NAME_LEN..=MAX_BUCKET_NAME_LEN).contains(&len) {
        return Err(invalid(&format!(
            "bucket name must be between {MIN_BUCKET_NAME_LEN} and {MAX_BUCKET_NAME_LEN} characters long"
        )));
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return Err(invalid(
            "bucket name must only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    let first = name.as_bytes()[0];
    let last = name.as_bytes()[len - 1];
    if !(first.is_ascii_lowercase() || first.is_ascii_digit())
        || !(last.is_ascii_lowercase() || last.is_ascii_digit())
    {
        return Err(invalid("bucket name must start and end with a letter or number"));
    }

    if name.contains("..") {
        return Err(invalid("bucket name must not contain consecutive dots"));
    }

    if name.parse::<Ipv4Addr>().is_ok() {
        return Err(invalid("bucket name must not be formatted as an IP address"));
    }

    Ok(())
}

//! Validation errors for the stack model.

/// A declared stack that cannot be deployed consistently.
///
/// Validation runs before any cloud API is called; a failing stack is
/// rejected locally instead of producing a half-deployed API.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Bucket name violates S3 naming rules.
    #[error("invalid bucket name {name:?}: {reason}")]
    InvalidBucketName {
        /// The offending bucket name.
        name: String,
        /// Which naming rule was violated.
        reason: String,
    },

    /// The access role must carry exactly one managed policy.
    #[error("role {role:?} must attach exactly one managed policy, found {count}")]
    ManagedPolicyCount {
        /// The role name.
        role: String,
        /// Number of managed policies attached.
        count: usize,
    },

    /// A bucket grant names a role that is not part of the stack.
    #[error("bucket grant targets unknown role {role:?}")]
    GrantTargetsUnknownRole {
        /// The grantee role name.
        role: String,
    },

    /// The bucket must grant both read and write to the access role.
    #[error("bucket {bucket:?} does not grant {action:?} to the access role")]
    MissingGrant {
        /// The bucket name.
        bucket: String,
        /// The action class that is not granted.
        action: &'static str,
    },

    /// Integration responses and method responses declare different status codes.
    #[error(
        "method {method} {path} declares mismatched status codes: \
         integration {integration:?} vs method {declared:?}"
    )]
    StatusCodeMismatch {
        /// HTTP verb of the method.
        method: String,
        /// Resource path of the method.
        path: String,
        /// Status codes declared by integration responses.
        integration: Vec<String>,
        /// Status codes declared by method responses.
        declared: Vec<String>,
    },

    /// An integration response maps a header the method response does not declare.
    #[error(
        "method {method} {path} status {status_code}: integration maps header \
         {header:?} which the method response does not declare"
    )]
    UndeclaredHeader {
        /// HTTP verb of the method.
        method: String,
        /// Resource path of the method.
        path: String,
        /// Status code of the offending mapping.
        status_code: String,
        /// The header parameter that is mapped but not declared.
        header: String,
    },

    /// A selection pattern is not a valid regular expression.
    #[error("method {method} {path} status {status_code}: invalid selection pattern {pattern:?}")]
    InvalidSelectionPattern {
        /// HTTP verb of the method.
        method: String,
        /// Resource path of the method.
        path: String,
        /// Status code of the offending mapping.
        status_code: String,
        /// The pattern that failed to compile.
        pattern: String,
    },

    /// An `{object}` method does not forward the object path parameter.
    #[error("method {method} {path} does not forward the object path parameter")]
    MissingPathParameter {
        /// HTTP verb of the method.
        method: String,
        /// Resource path of the method.
        path: String,
    },

    /// A resource is declared with a removal policy other than destroy.
    #[error("resource {resource:?} must use the destroy removal policy")]
    RetainedResource {
        /// Logical name of the retained resource.
        resource: String,
    },
}

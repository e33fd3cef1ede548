//! Common AWS type definitions shared across the workspace.

use std::fmt;

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Default region for the stack.
    pub const DEFAULT: &str = "us-east-1";

    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What happens to a declared resource when its declaration is removed.
///
/// Every resource in the proxy stack carries `Destroy`, so a teardown leaves
/// nothing behind in the account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemovalPolicy {
    /// Delete the resource at stack teardown.
    #[default]
    Destroy,
    /// Leave the resource in place at stack teardown.
    Retain,
}

impl RemovalPolicy {
    /// Whether teardown should delete the resource.
    #[must_use]
    pub fn deletes_on_teardown(self) -> bool {
        matches!(self, Self::Destroy)
    }
}

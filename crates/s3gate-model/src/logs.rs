//! The access-log group.

use s3gate_core::RemovalPolicy;

/// Log retention periods supported by CloudWatch Logs.
///
/// Only the variants the stack uses are modeled; CloudWatch accepts the
/// numeric day count directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RetentionDays {
    /// Retain log events for one day.
    OneDay,
    /// Retain log events for one week.
    OneWeek,
    /// Retain log events for one month.
    OneMonth,
}

impl RetentionDays {
    /// The numeric day count CloudWatch Logs expects.
    #[must_use]
    pub fn as_days(self) -> i32 {
        match self {
            Self::OneDay => 1,
            Self::OneWeek => 7,
            Self::OneMonth => 30,
        }
    }
}

/// A CloudWatch Logs log group.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogGroupSpec {
    /// Log group name.
    pub log_group_name: String,
    /// How long log events are retained.
    pub retention: RetentionDays,
    /// Lifecycle at stack teardown.
    pub removal_policy: RemovalPolicy,
}

impl LogGroupSpec {
    /// Declare an access-log group with one-week retention, destroyed at
    /// teardown.
    #[must_use]
    pub fn access_log(log_group_name: impl Into<String>) -> Self {
        Self {
            log_group_name: log_group_name.into(),
            retention: RetentionDays::OneWeek,
            removal_policy: RemovalPolicy::Destroy,
        }
    }
}

//! Outputs of a successful deployment.

use serde::{Deserialize, Serialize};

/// Identifiers of the deployed stack, printed by `s3gate deploy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackOutputs {
    /// ARN of the access role.
    pub role_arn: String,
    /// Name of the storage bucket.
    pub bucket_name: String,
    /// ARN of the access-log group.
    pub log_group_arn: String,
    /// ID of the REST API.
    pub rest_api_id: String,
    /// Invoke URL of the deployed stage.
    pub invoke_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_serialize_outputs_to_camel_case() {
        let outputs = StackOutputs {
            role_arn: "arn:aws:iam::123456789012:role/r".to_owned(),
            bucket_name: "b".to_owned(),
            log_group_arn: "arn:aws:logs:us-east-1:123456789012:log-group:g".to_owned(),
            rest_api_id: "abc123".to_owned(),
            invoke_url: "https://abc123.execute-api.us-east-1.amazonaws.com/prod".to_owned(),
        };
        let json = serde_json::to_string(&outputs).unwrap();
        assert!(json.contains("restApiId"));
        assert!(json.contains("invokeUrl"));
    }
}

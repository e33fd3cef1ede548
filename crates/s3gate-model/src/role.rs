//! The access role: the identity API Gateway assumes to reach S3 and
//! CloudWatch Logs.

use s3gate_core::RemovalPolicy;

use crate::policy::{PolicyDocument, ServicePrincipal};

/// Managed policy allowing API Gateway to push execution logs to CloudWatch.
pub const PUSH_TO_LOGS_POLICY_ARN: &str =
    "arn:aws:iam::aws:policy/service-role/AmazonAPIGatewayPushToCloudWatchLogs";

/// An IAM role assumable by a single AWS service.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSpec {
    /// IAM role name.
    pub role_name: String,
    /// The only principal allowed to assume this role.
    pub assumed_by: ServicePrincipal,
    /// ARNs of attached managed policies.
    pub managed_policy_arns: Vec<String>,
    /// Lifecycle at stack teardown.
    pub removal_policy: RemovalPolicy,
}

impl RoleSpec {
    /// Declare the API Gateway access role: assumable only by the gateway
    /// service, carrying the push-to-logs managed policy, destroyed at
    /// teardown.
    #[must_use]
    pub fn api_gateway_access(role_name: impl Into<String>) -> Self {
        Self {
            role_name: role_name.into(),
            assumed_by: ServicePrincipal::new(ServicePrincipal::API_GATEWAY),
            managed_policy_arns: vec![PUSH_TO_LOGS_POLICY_ARN.to_owned()],
            removal_policy: RemovalPolicy::Destroy,
        }
    }

    /// The trust policy document for this role.
    #[must_use]
    pub fn assume_role_policy(&self) -> PolicyDocument {
        PolicyDocument::assume_role_for(&self.assumed_by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_declare_api_gateway_access_role() {
        let role = RoleSpec::api_gateway_access("apigatewayS3AccessRole");
        assert_eq!(role.role_name, "apigatewayS3AccessRole");
        assert_eq!(role.assumed_by.as_str(), "apigateway.amazonaws.com");
        assert_eq!(role.managed_policy_arns, vec![PUSH_TO_LOGS_POLICY_ARN]);
        assert_eq!(role.removal_policy, RemovalPolicy::Destroy);
    }

    #[test]
    fn test_should_render_trust_policy_for_gateway_service() {
        let role = RoleSpec::api_gateway_access("r");
        let json: serde_json::Value =
            serde_json::from_str(&role.assume_role_policy().to_json()).unwrap();
        assert_eq!(
            json["Statement"][0]["Principal"]["Service"],
            "apigateway.amazonaws.com"
        );
    }
}

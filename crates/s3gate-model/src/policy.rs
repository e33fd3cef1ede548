//! IAM policy documents.
//!
//! Policy documents serialize to the exact JSON shape IAM accepts, so a
//! [`PolicyDocument`] can be passed verbatim to `CreateRole` or
//! `PutRolePolicy`.

use serde::{Deserialize, Serialize};

/// An AWS service principal (e.g. `apigateway.amazonaws.com`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePrincipal(String);

impl ServicePrincipal {
    /// The API Gateway service principal.
    pub const API_GATEWAY: &str = "apigateway.amazonaws.com";

    /// Create a service principal from a service DNS name.
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self(service.into())
    }

    /// The principal's DNS name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single policy statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    /// `Allow` or `Deny`.
    pub effect: String,
    /// Actions the statement covers.
    pub action: Vec<String>,
    /// Resources the statement covers; omitted for trust policies.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub resource: Vec<String>,
    /// Principal for trust policies; omitted for permission policies.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub principal: Option<StatementPrincipal>,
}

/// The `Principal` block of a trust-policy statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatementPrincipal {
    /// Service principal DNS name.
    pub service: String,
}

/// An IAM policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    /// Policy language version; always `2012-10-17`.
    pub version: String,
    /// The policy statements.
    pub statement: Vec<PolicyStatement>,
}

impl PolicyDocument {
    /// Current IAM policy language version.
    pub const VERSION: &str = "2012-10-17";

    /// Build a trust policy allowing `sts:AssumeRole` to a single service.
    #[must_use]
    pub fn assume_role_for(principal: &ServicePrincipal) -> Self {
        Self {
            version: Self::VERSION.to_owned(),
            statement: vec![PolicyStatement {
                effect: "Allow".to_owned(),
                action: vec!["sts:AssumeRole".to_owned()],
                resource: Vec::new(),
                principal: Some(StatementPrincipal {
                    service: principal.as_str().to_owned(),
                }),
            }],
        }
    }

    /// Build a permission policy from action/resource lists.
    #[must_use]
    pub fn allow(actions: Vec<String>, resources: Vec<String>) -> Self {
        Self {
            version: Self::VERSION.to_owned(),
            statement: vec![PolicyStatement {
                effect: "Allow".to_owned(),
                action: actions,
                resource: resources,
                principal: None,
            }],
        }
    }

    /// Render the document as the JSON string IAM expects.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("policy documents are always serializable")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_render_assume_role_policy() {
        let principal = ServicePrincipal::new(ServicePrincipal::API_GATEWAY);
        let doc = PolicyDocument::assume_role_for(&principal);
        let json: serde_json::Value = serde_json::from_str(&doc.to_json()).unwrap();

        assert_eq!(json["Version"], "2012-10-17");
        assert_eq!(json["Statement"][0]["Effect"], "Allow");
        assert_eq!(json["Statement"][0]["Action"][0], "sts:AssumeRole");
        assert_eq!(
            json["Statement"][0]["Principal"]["Service"],
            "apigateway.amazonaws.com"
        );
        // Trust policies carry no Resource key.
        assert!(json["Statement"][0].get("Resource").is_none());
    }

    #[test]
    fn test_should_render_permission_policy_without_principal() {
        let doc = PolicyDocument::allow(
            vec!["s3:GetObject*".to_owned()],
            vec!["arn:aws:s3:::demo/*".to_owned()],
        );
        let json: serde_json::Value = serde_json::from_str(&doc.to_json()).unwrap();

        assert_eq!(json["Statement"][0]["Resource"][0], "arn:aws:s3:::demo/*");
        assert!(json["Statement"][0].get("Principal").is_none());
    }
}

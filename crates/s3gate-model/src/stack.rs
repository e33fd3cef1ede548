//! Stack assembly and cross-resource validation.

use s3gate_core::StackConfig;

use crate::api::{MethodSpec, RestApiSpec};
use crate::bucket::{BucketSpec, validate_bucket_name};
use crate::error::ValidationError;
use crate::logs::LogGroupSpec;
use crate::role::RoleSpec;
use crate::synth::Template;

/// The declared proxy stack: access role, storage bucket, access-log group,
/// and the REST API, in dependency order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyStack {
    /// The access role API Gateway assumes.
    pub role: RoleSpec,
    /// The storage bucket behind the proxy.
    pub bucket: BucketSpec,
    /// The access-log group.
    pub log_group: LogGroupSpec,
    /// The proxy REST API.
    pub api: RestApiSpec,
}

impl ProxyStack {
    /// Assemble the stack from configuration.
    ///
    /// Resources are declared in dependency order: the role first, the
    /// bucket granting it read/write second, then the log group and the API
    /// that references both.
    #[must_use]
    pub fn from_config(config: &StackConfig) -> Self {
        let role = RoleSpec::api_gateway_access(&config.role_name);
        let bucket = BucketSpec::new(&config.bucket_name).grant_read_write(&config.role_name);
        let log_group = LogGroupSpec::access_log(&config.log_group_name);
        let api = RestApiSpec::s3_proxy(
            &config.api_name,
            &config.stage_name,
            &config.log_group_name,
            &config.bucket_name,
            &config.role_name,
        );

        Self {
            role,
            bucket,
            log_group,
            api,
        }
    }

    /// Validate the stack's deploy-time invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found. A stack that fails
    /// validation must not be deployed; it would reconcile into an
    /// inconsistent API.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_bucket_name(&self.bucket.bucket_name)?;
        self.validate_role()?;
        self.validate_grants()?;
        self.validate_removal_policies()?;
        for method in &self.api.methods {
            validate_method(method)?;
        }
        Ok(())
    }

    /// Render the stack as a CloudFormation-style template.
    #[must_use]
    pub fn synth(&self, config: &StackConfig) -> Template {
        Template::from_stack(self, config)
    }

    fn validate_role(&self) -> Result<(), ValidationError> {
        let count = self.role.managed_policy_arns.len();
        if count != 1 {
            return Err(ValidationError::ManagedPolicyCount {
                role: self.role.role_name.clone(),
                count,
            });
        }
        Ok(())
    }

    fn validate_grants(&self) -> Result<(), ValidationError> {
        for grant in &self.bucket.grants {
            if grant.grantee_role != self.role.role_name {
                return Err(ValidationError::GrantTargetsUnknownRole {
                    role: grant.grantee_role.clone(),
                });
            }
        }

        let granted_to_role = |prefix: &str| {
            self.bucket
                .grants
                .iter()
                .filter(|g| g.grantee_role == self.role.role_name)
                .any(|g| g.actions.iter().any(|a| a.starts_with(prefix)))
        };
        if !granted_to_role("s3:Get") {
            return Err(ValidationError::MissingGrant {
                bucket: self.bucket.bucket_name.clone(),
                action: "read",
            });
        }
        if !granted_to_role("s3:Put") {
            return Err(ValidationError::MissingGrant {
                bucket: self.bucket.bucket_name.clone(),
                action: "write",
            });
        }
        Ok(())
    }

    fn validate_removal_policies(&self) -> Result<(), ValidationError> {
        let retained = [
            ("role", self.role.removal_policy),
            ("bucket", self.bucket.removal_policy),
            ("logGroup", self.log_group.removal_policy),
            ("restApi", self.api.removal_policy),
        ]
        .into_iter()
        .find(|(_, policy)| !policy.deletes_on_teardown());

        match retained {
            Some((resource, _)) => Err(ValidationError::RetainedResource {
                resource: resource.to_owned(),
            }),
            None => Ok(()),
        }
    }
}

/// Validate one method's response tables and parameter forwarding.
fn validate_method(method: &MethodSpec) -> Result<(), ValidationError> {
    let verb = method.http_method.clone();
    let path = method.path.as_str().to_owned();
    let mapping = &method.integration.responses;

    let mut integration_codes: Vec<String> = mapping
        .integration_responses
        .iter()
        .map(|r| r.status_code.clone())
        .collect();
    let mut declared_codes: Vec<String> = mapping
        .method_responses
        .iter()
        .map(|r| r.status_code.clone())
        .collect();
    integration_codes.sort();
    declared_codes.sort();
    if integration_codes != declared_codes {
        return Err(ValidationError::StatusCodeMismatch {
            method: verb,
            path,
            integration: integration_codes,
            declared: declared_codes,
        });
    }

    for tier in &mapping.integration_responses {
        if let Some(pattern) = &tier.selection_pattern {
            if regex::Regex::new(pattern).is_err() {
                return Err(ValidationError::InvalidSelectionPattern {
                    method: verb,
                    path,
                    status_code: tier.status_code.clone(),
                    pattern: pattern.clone(),
                });
            }
        }

        // Every mapped header must be declared by the matching method
        // response; declaring extra headers is allowed.
        let declared = mapping
            .method_responses
            .iter()
            .find(|r| r.status_code == tier.status_code)
            .map(|r| &r.response_parameters);
        for header in tier.response_parameters.keys() {
            let is_declared =
                declared.is_some_and(|params| params.get(header).copied().unwrap_or(false));
            if !is_declared {
                return Err(ValidationError::UndeclaredHeader {
                    method: verb,
                    path,
                    status_code: tier.status_code.clone(),
                    header: header.clone(),
                });
            }
        }
    }

    // {object} methods must forward the path parameter into the backend call.
    if method.path == crate::api::ResourcePath::Object {
        let forwards = method
            .integration
            .request_parameters
            .get("integration.request.path.object")
            .is_some_and(|v| v == "method.request.path.object");
        let declares = method
            .request_parameters
            .get("method.request.path.object")
            .copied()
            .unwrap_or(false);
        if !forwards || !declares {
            return Err(ValidationError::MissingPathParameter { method: verb, path });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use s3gate_core::RemovalPolicy;

    use super::*;
    use crate::role::PUSH_TO_LOGS_POLICY_ARN;

    fn stack() -> ProxyStack {
        ProxyStack::from_config(&StackConfig::default())
    }

    #[test]
    fn test_should_assemble_stack_from_config() {
        let stack = stack();
        assert_eq!(stack.role.role_name, "apigatewayS3AccessRole");
        assert_eq!(stack.bucket.bucket_name, "apigateway-s3-demo-bucket");
        assert_eq!(stack.log_group.log_group_name, "apigatewayS3DemoAccessLog");
        assert_eq!(stack.api.api_name, "apigatewayS3CDKRestAPI");
        assert_eq!(stack.api.stage.access_log_group, "apigatewayS3DemoAccessLog");
    }

    #[test]
    fn test_should_validate_default_stack() {
        stack().validate().expect("default stack must be valid");
    }

    #[test]
    fn test_should_attach_exactly_one_managed_policy() {
        let stack = stack();
        assert_eq!(stack.role.managed_policy_arns, vec![PUSH_TO_LOGS_POLICY_ARN]);

        let mut broken = stack;
        broken.role.managed_policy_arns.push("arn:aws:iam::aws:policy/extra".to_owned());
        assert!(matches!(
            broken.validate(),
            Err(ValidationError::ManagedPolicyCount { count: 2, .. })
        ));
    }

    #[test]
    fn test_should_reject_grant_to_unknown_role() {
        let mut broken = stack();
        broken.bucket.grants[0].grantee_role = "someone-else".to_owned();
        assert!(matches!(
            broken.validate(),
            Err(ValidationError::GrantTargetsUnknownRole { .. })
        ));
    }

    #[test]
    fn test_should_require_read_and_write_grants() {
        let mut broken = stack();
        broken.bucket.grants[0].actions.retain(|a| !a.starts_with("s3:Put"));
        assert!(matches!(
            broken.validate(),
            Err(ValidationError::MissingGrant { action: "write", .. })
        ));
    }

    #[test]
    fn test_should_reject_retained_resources() {
        let mut broken = stack();
        broken.log_group.removal_policy = RemovalPolicy::Retain;
        assert!(matches!(
            broken.validate(),
            Err(ValidationError::RetainedResource { .. })
        ));
    }

    #[test]
    fn test_should_reject_status_code_mismatch() {
        let mut broken = stack();
        broken.api.methods[0]
            .integration
            .responses
            .method_responses
            .pop();
        assert!(matches!(
            broken.validate(),
            Err(ValidationError::StatusCodeMismatch { .. })
        ));
    }

    #[test]
    fn test_should_reject_mapped_but_undeclared_header() {
        let mut broken = stack();
        let mapping = &mut broken.api.methods[1].integration.responses;
        mapping.method_responses[0]
            .response_parameters
            .insert("method.response.header.Content-Type".to_owned(), false);
        assert!(matches!(
            broken.validate(),
            Err(ValidationError::UndeclaredHeader { .. })
        ));
    }

    #[test]
    fn test_should_reject_invalid_selection_pattern() {
        let mut broken = stack();
        broken.api.methods[0].integration.responses.integration_responses[1]
            .selection_pattern = Some("4(".to_owned());
        assert!(matches!(
            broken.validate(),
            Err(ValidationError::InvalidSelectionPattern { .. })
        ));
    }

    #[test]
    fn test_should_require_object_path_forwarding() {
        let mut broken = stack();
        broken.api.methods[2].integration.request_parameters.clear();
        assert!(matches!(
            broken.validate(),
            Err(ValidationError::MissingPathParameter { .. })
        ));
    }

    #[test]
    fn test_should_reject_invalid_bucket_name() {
        let config = StackConfig::builder().bucket_name("Bad_Name".into()).build();
        let stack = ProxyStack::from_config(&config);
        assert!(matches!(
            stack.validate(),
            Err(ValidationError::InvalidBucketName { .. })
        ));
    }
}

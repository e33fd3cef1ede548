//! CloudFormation-style template synthesis.
//!
//! The synthesized template is the inspectable artifact of the declared
//! stack: every resource with its properties and deletion policy, rendered
//! as plain JSON. Deployment does not upload this template; it exists so
//! configuration can be asserted on without touching a cloud account.

use serde_json::{Map, Value, json};

use s3gate_core::{RemovalPolicy, StackConfig};

use crate::api::{ACCESS_LOG_FORMAT, MethodSpec, ResourcePath};
use crate::responses::{IntegrationResponse, MethodResponse};
use crate::stack::ProxyStack;

/// A synthesized template.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Template(Value);

impl Template {
    /// Synthesize a template from a declared stack.
    #[must_use]
    pub fn from_stack(stack: &ProxyStack, config: &StackConfig) -> Self {
        let mut resources = Map::new();

        resources.insert(
            "AccessRole".to_owned(),
            resource(
                "AWS::IAM::Role",
                json!({
                    "RoleName": stack.role.role_name,
                    "AssumeRolePolicyDocument": stack.role.assume_role_policy(),
                    "ManagedPolicyArns": stack.role.managed_policy_arns,
                }),
                stack.role.removal_policy,
            ),
        );

        for (i, grant) in stack.bucket.grants.iter().enumerate() {
            let logical_id = if i == 0 {
                "AccessRoleDefaultPolicy".to_owned()
            } else {
                format!("AccessRolePolicy{i}")
            };
            resources.insert(
                logical_id,
                resource(
                    "AWS::IAM::Policy",
                    json!({
                        "PolicyName": format!("{}-bucket-access", grant.grantee_role),
                        "PolicyDocument": stack.bucket.grant_policy(grant),
                        "Roles": [{ "Ref": "AccessRole" }],
                    }),
                    stack.role.removal_policy,
                ),
            );
        }

        resources.insert(
            "DataBucket".to_owned(),
            resource(
                "AWS::S3::Bucket",
                json!({ "BucketName": stack.bucket.bucket_name }),
                stack.bucket.removal_policy,
            ),
        );

        resources.insert(
            "AccessLogGroup".to_owned(),
            resource(
                "AWS::Logs::LogGroup",
                json!({
                    "LogGroupName": stack.log_group.log_group_name,
                    "RetentionInDays": stack.log_group.retention.as_days(),
                }),
                stack.log_group.removal_policy,
            ),
        );

        resources.insert(
            "RestApi".to_owned(),
            resource(
                "AWS::ApiGateway::RestApi",
                json!({
                    "Name": stack.api.api_name,
                    "EndpointConfiguration": { "Types": [stack.api.endpoint_type.as_str()] },
                    "BinaryMediaTypes": stack.api.binary_media_types,
                }),
                stack.api.removal_policy,
            ),
        );

        resources.insert(
            "ObjectResource".to_owned(),
            resource(
                "AWS::ApiGateway::Resource",
                json!({
                    "RestApiId": { "Ref": "RestApi" },
                    "ParentId": { "Fn::GetAtt": ["RestApi", "RootResourceId"] },
                    "PathPart": "{object}",
                }),
                stack.api.removal_policy,
            ),
        );

        let mut method_ids = Vec::new();
        for method in &stack.api.methods {
            let logical_id = method_logical_id(method);
            resources.insert(
                logical_id.clone(),
                resource(
                    "AWS::ApiGateway::Method",
                    method_properties(method, config),
                    stack.api.removal_policy,
                ),
            );
            method_ids.push(logical_id);
        }

        let mut deployment = resource(
            "AWS::ApiGateway::Deployment",
            json!({ "RestApiId": { "Ref": "RestApi" } }),
            stack.api.removal_policy,
        );
        deployment["DependsOn"] = json!(method_ids);
        resources.insert("Deployment".to_owned(), deployment);

        resources.insert(
            "Stage".to_owned(),
            resource(
                "AWS::ApiGateway::Stage",
                json!({
                    "RestApiId": { "Ref": "RestApi" },
                    "DeploymentId": { "Ref": "Deployment" },
                    "StageName": stack.api.stage.stage_name,
                    "AccessLogSetting": {
                        "DestinationArn": { "Fn::GetAtt": ["AccessLogGroup", "Arn"] },
                        "Format": ACCESS_LOG_FORMAT,
                    },
                    "MethodSettings": [{
                        "HttpMethod": "*",
                        "ResourcePath": "/*",
                        "LoggingLevel": stack.api.stage.logging_level.as_str(),
                        "DataTraceEnabled": stack.api.stage.data_trace_enabled,
                    }],
                }),
                stack.api.removal_policy,
            ),
        );

        Self(json!({
            "Resources": Value::Object(resources),
            "Outputs": {
                "BucketName": { "Value": stack.bucket.bucket_name },
                "RestApiId": { "Value": { "Ref": "RestApi" } },
            },
        }))
    }

    /// The template as a JSON value.
    #[must_use]
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Pretty-printed JSON, as emitted by `s3gate synth`.
    #[must_use]
    pub fn to_string_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).expect("templates are always serializable")
    }

    /// Look up a resource by logical ID.
    #[must_use]
    pub fn resource(&self, logical_id: &str) -> Option<&Value> {
        self.0.get("Resources").and_then(|r| r.get(logical_id))
    }

    /// Count resources of a CloudFormation type.
    #[must_use]
    pub fn resource_count_of(&self, type_name: &str) -> usize {
        self.resources_of_type(type_name).len()
    }

    /// All resources of a CloudFormation type.
    #[must_use]
    pub fn resources_of_type(&self, type_name: &str) -> Vec<&Value> {
        self.0
            .get("Resources")
            .and_then(Value::as_object)
            .map(|resources| {
                resources
                    .values()
                    .filter(|r| r.get("Type").and_then(Value::as_str) == Some(type_name))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Wrap properties into a resource node with type and deletion policy.
fn resource(type_name: &str, properties: Value, removal_policy: RemovalPolicy) -> Value {
    let deletion_policy = match removal_policy {
        RemovalPolicy::Destroy => "Delete",
        RemovalPolicy::Retain => "Retain",
    };
    json!({
        "Type": type_name,
        "Properties": properties,
        "DeletionPolicy": deletion_policy,
    })
}

/// Logical ID for a method resource, e.g. `RootGetMethod`.
fn method_logical_id(method: &MethodSpec) -> String {
    let path = match method.path {
        ResourcePath::Root => "Root",
        ResourcePath::Object => "Object",
    };
    let verb = {
        let lower = method.http_method.to_lowercase();
        let mut chars = lower.chars();
        chars.next().map_or_else(String::new, |c| {
            c.to_uppercase().collect::<String>() + chars.as_str()
        })
    };
    format!("{path}{verb}Method")
}

/// Render a method's properties, integration included.
fn method_properties(method: &MethodSpec, config: &StackConfig) -> Value {
    let resource_id = match method.path {
        ResourcePath::Root => json!({ "Fn::GetAtt": ["RestApi", "RootResourceId"] }),
        ResourcePath::Object => json!({ "Ref": "ObjectResource" }),
    };

    let integration_responses: Vec<Value> = method
        .integration
        .responses
        .integration_responses
        .iter()
        .map(integration_response_node)
        .collect();
    let method_responses: Vec<Value> = method
        .integration
        .responses
        .method_responses
        .iter()
        .map(method_response_node)
        .collect();

    json!({
        "RestApiId": { "Ref": "RestApi" },
        "ResourceId": resource_id,
        "HttpMethod": method.http_method,
        "AuthorizationType": "NONE",
        "RequestParameters": method.request_parameters,
        "Integration": {
            "Type": "AWS",
            "IntegrationHttpMethod": method.integration.http_method,
            "Uri": method.integration.uri(&config.region),
            "Credentials": { "Fn::GetAtt": ["AccessRole", "Arn"] },
            "RequestParameters": method.integration.request_parameters,
            "IntegrationResponses": integration_responses,
        },
        "MethodResponses": method_responses,
    })
}

fn integration_response_node(tier: &IntegrationResponse) -> Value {
    let mut node = json!({
        "StatusCode": tier.status_code,
        "ResponseParameters": tier.response_parameters,
    });
    if let Some(pattern) = &tier.selection_pattern {
        node["SelectionPattern"] = json!(pattern);
    }
    node
}

fn method_response_node(declared: &MethodResponse) -> Value {
    json!({
        "StatusCode": declared.status_code,
        "ResponseParameters": declared.response_parameters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synth_default() -> Template {
        let config = StackConfig::default();
        ProxyStack::from_config(&config).synth(&config)
    }

    #[test]
    fn test_should_synthesize_expected_resource_counts() {
        let template = synth_default();
        assert_eq!(template.resource_count_of("AWS::IAM::Role"), 1);
        assert_eq!(template.resource_count_of("AWS::IAM::Policy"), 1);
        assert_eq!(template.resource_count_of("AWS::S3::Bucket"), 1);
        assert_eq!(template.resource_count_of("AWS::Logs::LogGroup"), 1);
        assert_eq!(template.resource_count_of("AWS::ApiGateway::RestApi"), 1);
        assert_eq!(template.resource_count_of("AWS::ApiGateway::Resource"), 1);
        assert_eq!(template.resource_count_of("AWS::ApiGateway::Method"), 3);
        assert_eq!(template.resource_count_of("AWS::ApiGateway::Deployment"), 1);
        assert_eq!(template.resource_count_of("AWS::ApiGateway::Stage"), 1);
    }

    #[test]
    fn test_should_mark_every_resource_for_deletion() {
        let template = synth_default();
        let resources = template.as_json()["Resources"].as_object().unwrap();
        for (id, node) in resources {
            assert_eq!(
                node["DeletionPolicy"], "Delete",
                "resource {id} must be destroyed at teardown"
            );
        }
    }

    #[test]
    fn test_should_render_role_with_single_managed_policy() {
        let template = synth_default();
        let role = template.resource("AccessRole").unwrap();
        assert_eq!(role["Properties"]["RoleName"], "apigatewayS3AccessRole");
        let arns = role["Properties"]["ManagedPolicyArns"].as_array().unwrap();
        assert_eq!(arns.len(), 1);
        assert!(
            arns[0]
                .as_str()
                .unwrap()
                .ends_with("service-role/AmazonAPIGatewayPushToCloudWatchLogs")
        );
    }

    #[test]
    fn test_should_render_log_group_with_week_retention() {
        let template = synth_default();
        let group = template.resource("AccessLogGroup").unwrap();
        assert_eq!(group["Properties"]["RetentionInDays"], 7);
    }

    #[test]
    fn test_should_render_regional_api_with_binary_media() {
        let template = synth_default();
        let api = template.resource("RestApi").unwrap();
        assert_eq!(
            api["Properties"]["EndpointConfiguration"]["Types"][0],
            "REGIONAL"
        );
        assert_eq!(api["Properties"]["BinaryMediaTypes"][0], "image/jpeg");
    }

    #[test]
    fn test_should_render_methods_with_matching_response_codes() {
        let template = synth_default();
        for id in ["RootGetMethod", "ObjectGetMethod", "ObjectPutMethod"] {
            let method = template.resource(id).unwrap();
            let integration_codes: Vec<_> = method["Properties"]["Integration"]
                ["IntegrationResponses"]
                .as_array()
                .unwrap()
                .iter()
                .map(|r| r["StatusCode"].as_str().unwrap().to_owned())
                .collect();
            let declared_codes: Vec<_> = method["Properties"]["MethodResponses"]
                .as_array()
                .unwrap()
                .iter()
                .map(|r| r["StatusCode"].as_str().unwrap().to_owned())
                .collect();
            assert_eq!(integration_codes, ["200", "400", "500"], "{id}");
            assert_eq!(declared_codes, ["200", "400", "500"], "{id}");
        }
    }

    #[test]
    fn test_should_render_object_methods_against_object_resource() {
        let template = synth_default();
        let get = template.resource("ObjectGetMethod").unwrap();
        assert_eq!(get["Properties"]["ResourceId"]["Ref"], "ObjectResource");
        assert_eq!(
            get["Properties"]["Integration"]["Uri"],
            "arn:aws:apigateway:us-east-1:s3:path/apigateway-s3-demo-bucket/{object}"
        );

        let root = template.resource("RootGetMethod").unwrap();
        assert_eq!(
            root["Properties"]["Integration"]["Uri"],
            "arn:aws:apigateway:us-east-1:s3:path/apigateway-s3-demo-bucket"
        );
    }

    #[test]
    fn test_should_wire_stage_to_access_log_group() {
        let template = synth_default();
        let stage = template.resource("Stage").unwrap();
        assert_eq!(
            stage["Properties"]["AccessLogSetting"]["DestinationArn"]["Fn::GetAtt"][0],
            "AccessLogGroup"
        );
        let settings = &stage["Properties"]["MethodSettings"][0];
        assert_eq!(settings["LoggingLevel"], "INFO");
        assert_eq!(settings["DataTraceEnabled"], true);
    }

    #[test]
    fn test_should_depend_deployment_on_all_methods() {
        let template = synth_default();
        let deployment = template.resource("Deployment").unwrap();
        let depends: Vec<_> = deployment["DependsOn"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            depends,
            ["RootGetMethod", "ObjectGetMethod", "ObjectPutMethod"]
        );
    }
}

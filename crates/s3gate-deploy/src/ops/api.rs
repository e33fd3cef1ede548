//! Proxy-API lifecycle operations.
//!
//! Creating the REST API is the long tail of the deployment: the API
//! itself, the `{object}` resource, three methods with their integrations
//! and response tables, a deployment, and the logged stage.

use aws_sdk_apigateway::types::{
    EndpointConfiguration, EndpointType, IntegrationType, Op, PatchOperation,
};
use tracing::debug;

use s3gate_model::{ACCESS_LOG_FORMAT, MethodSpec, ResourcePath, RestApiSpec};

use crate::deployer::Deployer;
use crate::error::DeployError;

/// Map the declared endpoint type onto the SDK enum.
fn endpoint_type(spec: s3gate_model::EndpointType) -> EndpointType {
    match spec {
        s3gate_model::EndpointType::Regional => EndpointType::Regional,
        s3gate_model::EndpointType::Edge => EndpointType::Edge,
        s3gate_model::EndpointType::Private => EndpointType::Private,
    }
}

impl Deployer {
    /// Create the REST API with its resources, methods, deployment, and
    /// logged stage. Returns the REST API ID.
    pub(crate) async fn create_rest_api(
        &self,
        api: &RestApiSpec,
        role_arn: &str,
        log_group_arn: &str,
    ) -> Result<String, DeployError> {
        let mut request = self
            .apigateway
            .create_rest_api()
            .name(&api.api_name)
            .endpoint_configuration(
                EndpointConfiguration::builder()
                    .types(endpoint_type(api.endpoint_type))
                    .build(),
            );
        for media_type in &api.binary_media_types {
            request = request.binary_media_types(media_type);
        }
        let created = request
            .send()
            .await
            .map_err(aws_sdk_apigateway::Error::from)?;
        let rest_api_id = created
            .id()
            .map(ToOwned::to_owned)
            .ok_or(DeployError::MissingField("restApi.id"))?;

        let root_id = self.root_resource_id(&rest_api_id).await?;
        let object_id = self.create_object_resource(&rest_api_id, &root_id).await?;

        for method in &api.methods {
            let resource_id = match method.path {
                ResourcePath::Root => root_id.as_str(),
                ResourcePath::Object => object_id.as_str(),
            };
            self.put_method(&rest_api_id, resource_id, method, role_arn)
                .await?;
        }

        let deployment = self
            .apigateway
            .create_deployment()
            .rest_api_id(&rest_api_id)
            .send()
            .await
            .map_err(aws_sdk_apigateway::Error::from)?;
        let deployment_id = deployment
            .id()
            .map(ToOwned::to_owned)
            .ok_or(DeployError::MissingField("deployment.id"))?;

        self.create_stage(api, &rest_api_id, &deployment_id, log_group_arn)
            .await?;

        debug!(api = %api.api_name, rest_api_id = %rest_api_id, "REST API created");
        Ok(rest_api_id)
    }

    /// Find the implicit root (`/`) resource of a REST API.
    async fn root_resource_id(&self, rest_api_id: &str) -> Result<String, DeployError> {
        let resources = self
            .apigateway
            .get_resources()
            .rest_api_id(rest_api_id)
            .send()
            .await
            .map_err(aws_sdk_apigateway::Error::from)?;
        resources
            .items()
            .iter()
            .find(|r| r.path() == Some("/"))
            .and_then(|r| r.id())
            .map(ToOwned::to_owned)
            .ok_or(DeployError::MissingField("restApi.rootResourceId"))
    }

    /// Create the `{object}` path-parameter resource under the root.
    async fn create_object_resource(
        &self,
        rest_api_id: &str,
        root_id: &str,
    ) -> Result<String, DeployError> {
        let created = self
            .apigateway
            .create_resource()
            .rest_api_id(rest_api_id)
            .parent_id(root_id)
            .path_part("{object}")
            .send()
            .await
            .map_err(aws_sdk_apigateway::Error::from)?;
        created
            .id()
            .map(ToOwned::to_owned)
            .ok_or(DeployError::MissingField("resource.id"))
    }

    /// Create one method: the method itself, its S3 integration, and both
    /// response tables.
    async fn put_method(
        &self,
        rest_api_id: &str,
        resource_id: &str,
        method: &MethodSpec,
        role_arn: &str,
    ) -> Result<(), DeployError> {
        let mut request = self
            .apigateway
            .put_method()
            .rest_api_id(rest_api_id)
            .resource_id(resource_id)
            .http_method(&method.http_method)
            .authorization_type("NONE");
        for (name, required) in &method.request_parameters {
            request = request.request_parameters(name, *required);
        }
        request.send().await.map_err(aws_sdk_apigateway::Error::from)?;

        let mut integration = self
            .apigateway
            .put_integration()
            .rest_api_id(rest_api_id)
            .resource_id(resource_id)
            .http_method(&method.http_method)
            .r#type(IntegrationType::Aws)
            .integration_http_method(&method.integration.http_method)
            .uri(method.integration.uri(&self.region))
            .credentials(role_arn);
        for (name, mapping) in &method.integration.request_parameters {
            integration = integration.request_parameters(name, mapping);
        }
        integration
            .send()
            .await
            .map_err(aws_sdk_apigateway::Error::from)?;

        for declared in &method.integration.responses.method_responses {
            let mut response = self
                .apigateway
                .put_method_response()
                .rest_api_id(rest_api_id)
                .resource_id(resource_id)
                .http_method(&method.http_method)
                .status_code(&declared.status_code);
            for (header, required) in &declared.response_parameters {
                response = response.response_parameters(header, *required);
            }
            response.send().await.map_err(aws_sdk_apigateway::Error::from)?;
        }

        for tier in &method.integration.responses.integration_responses {
            let mut response = self
                .apigateway
                .put_integration_response()
                .rest_api_id(rest_api_id)
                .resource_id(resource_id)
                .http_method(&method.http_method)
                .status_code(&tier.status_code);
            if let Some(pattern) = &tier.selection_pattern {
                response = response.selection_pattern(pattern);
            }
            for (header, mapping) in &tier.response_parameters {
                response = response.response_parameters(header, mapping);
            }
            response.send().await.map_err(aws_sdk_apigateway::Error::from)?;
        }

        debug!(
            method = %method.http_method,
            path = method.path.as_str(),
            "method created"
        );
        Ok(())
    }

    /// Create the stage with access logging and enable execution logging.
    async fn create_stage(
        &self,
        api: &RestApiSpec,
        rest_api_id: &str,
        deployment_id: &str,
        log_group_arn: &str,
    ) -> Result<(), DeployError> {
        self.apigateway
            .create_stage()
            .rest_api_id(rest_api_id)
            .stage_name(&api.stage.stage_name)
            .deployment_id(deployment_id)
            .send()
            .await
            .map_err(aws_sdk_apigateway::Error::from)?;

        self.apigateway
            .update_stage()
            .rest_api_id(rest_api_id)
            .stage_name(&api.stage.stage_name)
            .patch_operations(
                PatchOperation::builder()
                    .op(Op::Replace)
                    .path("/*/*/logging/loglevel")
                    .value(api.stage.logging_level.as_str())
                    .build(),
            )
            .patch_operations(
                PatchOperation::builder()
                    .op(Op::Replace)
                    .path("/*/*/logging/dataTrace")
                    .value(api.stage.data_trace_enabled.to_string())
                    .build(),
            )
            .patch_operations(
                PatchOperation::builder()
                    .op(Op::Replace)
                    .path("/accessLogSettings/destinationArn")
                    .value(log_group_arn)
                    .build(),
            )
            .patch_operations(
                PatchOperation::builder()
                    .op(Op::Replace)
                    .path("/accessLogSettings/format")
                    .value(ACCESS_LOG_FORMAT)
                    .build(),
            )
            .send()
            .await
            .map_err(aws_sdk_apigateway::Error::from)?;

        Ok(())
    }

    /// Delete the REST API, located by name. An API that no longer exists
    /// counts as deleted.
    pub(crate) async fn delete_rest_api_by_name(&self, api_name: &str) -> Result<(), DeployError> {
        let apis = self
            .apigateway
            .get_rest_apis()
            .limit(500)
            .send()
            .await
            .map_err(aws_sdk_apigateway::Error::from)?;

        let Some(rest_api_id) = apis
            .items()
            .iter()
            .find(|a| a.name() == Some(api_name))
            .and_then(|a| a.id())
            .map(ToOwned::to_owned)
        else {
            return Ok(());
        };

        match self
            .apigateway
            .delete_rest_api()
            .rest_api_id(&rest_api_id)
            .send()
            .await
            .map_err(aws_sdk_apigateway::Error::from)
        {
            Ok(_) | Err(aws_sdk_apigateway::Error::NotFoundException(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

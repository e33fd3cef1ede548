//! The proxy REST API: three methods wired as direct AWS integrations
//! against the storage bucket.

use std::collections::BTreeMap;

use s3gate_core::{AwsRegion, RemovalPolicy};

use crate::responses::ResponseMapping;

/// Access-log line format written to the log group.
pub const ACCESS_LOG_FORMAT: &str = r#"{"requestId":"$context.requestId","ip":"$context.identity.sourceIp","requestTime":"$context.requestTime","httpMethod":"$context.httpMethod","path":"$context.path","status":"$context.status","responseLength":"$context.responseLength"}"#;

/// Where API Gateway terminates requests for this API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndpointType {
    /// Regional endpoint.
    Regional,
    /// CloudFront-backed edge endpoint.
    Edge,
    /// VPC-private endpoint.
    Private,
}

impl EndpointType {
    /// Wire name API Gateway expects.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regional => "REGIONAL",
            Self::Edge => "EDGE",
            Self::Private => "PRIVATE",
        }
    }
}

/// Execution logging level for a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MethodLoggingLevel {
    /// No execution logging.
    Off,
    /// Errors only.
    Error,
    /// Full request/response event logging.
    Info,
}

impl MethodLoggingLevel {
    /// Wire name API Gateway expects.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Error => "ERROR",
            Self::Info => "INFO",
        }
    }
}

/// Deployment stage options.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageOptions {
    /// Stage name (path segment of the invoke URL).
    pub stage_name: String,
    /// Log group receiving access logs.
    pub access_log_group: String,
    /// Execution logging level.
    pub logging_level: MethodLoggingLevel,
    /// Whether full request/response bodies are traced.
    pub data_trace_enabled: bool,
}

/// Which API resource a method hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourcePath {
    /// The API root, `/`.
    Root,
    /// The `/{object}` path-parameter resource.
    Object,
}

impl ResourcePath {
    /// The request path as clients see it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Object => "/{object}",
        }
    }
}

/// A direct AWS integration against the S3 service.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Integration {
    /// HTTP verb of the backend S3 call.
    pub http_method: String,
    /// Backend path template, e.g. `my-bucket/{object}`.
    pub path: String,
    /// Name of the role whose credentials sign the backend call.
    pub credentials_role: String,
    /// `integration.request.*` ← `method.request.*` parameter mappings.
    pub request_parameters: BTreeMap<String, String>,
    /// Integration response tiers.
    pub responses: ResponseMapping,
}

impl S3Integration {
    /// The integration URI for a region, in the
    /// `arn:aws:apigateway:{region}:s3:path/{path}` form.
    #[must_use]
    pub fn uri(&self, region: &AwsRegion) -> String {
        format!("arn:aws:apigateway:{region}:s3:path/{}", self.path)
    }
}

/// One HTTP method of the proxy API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSpec {
    /// Client-facing HTTP verb.
    pub http_method: String,
    /// Which API resource the method hangs off.
    pub path: ResourcePath,
    /// `method.request.*` parameter names with required flags.
    pub request_parameters: BTreeMap<String, bool>,
    /// The backend integration.
    pub integration: S3Integration,
}

/// Mapping forwarding the `{object}` path parameter into the backend call.
fn object_path_mapping() -> BTreeMap<String, String> {
    BTreeMap::from([(
        "integration.request.path.object".to_owned(),
        "method.request.path.object".to_owned(),
    )])
}

impl MethodSpec {
    /// `GET /` — list the bucket's contents.
    #[must_use]
    pub fn list_bucket(bucket_name: &str, role_name: &str) -> Self {
        Self {
            http_method: "GET".to_owned(),
            path: ResourcePath::Root,
            request_parameters: BTreeMap::new(),
            integration: S3Integration {
                http_method: "GET".to_owned(),
                path: bucket_name.to_owned(),
                credentials_role: role_name.to_owned(),
                request_parameters: BTreeMap::new(),
                responses: ResponseMapping::proxy_default(),
            },
        }
    }

    /// `GET /{object}` — fetch an object, path parameter forwarded verbatim.
    #[must_use]
    pub fn get_object(bucket_name: &str, role_name: &str) -> Self {
        Self {
            http_method: "GET".to_owned(),
            path: ResourcePath::Object,
            request_parameters: BTreeMap::from([
                ("method.request.path.object".to_owned(), true),
                ("method.request.header.Accept".to_owned(), false),
            ]),
            integration: S3Integration {
                http_method: "GET".to_owned(),
                path: format!("{bucket_name}/{{object}}"),
                credentials_role: role_name.to_owned(),
                request_parameters: object_path_mapping(),
                responses: ResponseMapping::proxy_default(),
            },
        }
    }

    /// `PUT /{object}` — store an object, any content type accepted.
    #[must_use]
    pub fn put_object(bucket_name: &str, role_name: &str) -> Self {
        Self {
            http_method: "PUT".to_owned(),
            path: ResourcePath::Object,
            request_parameters: BTreeMap::from([
                ("method.request.path.object".to_owned(), true),
                ("method.request.header.Content-Type".to_owned(), false),
            ]),
            integration: S3Integration {
                http_method: "PUT".to_owned(),
                path: format!("{bucket_name}/{{object}}"),
                credentials_role: role_name.to_owned(),
                request_parameters: object_path_mapping(),
                responses: ResponseMapping::proxy_default(),
            },
        }
    }
}

/// The REST API resource group.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestApiSpec {
    /// REST API name.
    pub api_name: String,
    /// Endpoint type; the proxy API is regional.
    pub endpoint_type: EndpointType,
    /// Media types the gateway treats as binary.
    pub binary_media_types: Vec<String>,
    /// Stage options for the single deployed stage.
    pub stage: StageOptions,
    /// The API's methods.
    pub methods: Vec<MethodSpec>,
    /// Lifecycle at stack teardown.
    pub removal_policy: RemovalPolicy,
}

impl RestApiSpec {
    /// Declare the S3 proxy API: regional, `image/jpeg` binary media, INFO
    /// execution logging with data trace, and the three proxy methods.
    #[must_use]
    pub fn s3_proxy(
        api_name: impl Into<String>,
        stage_name: impl Into<String>,
        access_log_group: impl Into<String>,
        bucket_name: &str,
        role_name: &str,
    ) -> Self {
        Self {
            api_name: api_name.into(),
            endpoint_type: EndpointType::Regional,
            binary_media_types: vec!["image/jpeg".to_owned()],
            stage: StageOptions {
                stage_name: stage_name.into(),
                access_log_group: access_log_group.into(),
                logging_level: MethodLoggingLevel::Info,
                data_trace_enabled: true,
            },
            methods: vec![
                MethodSpec::list_bucket(bucket_name, role_name),
                MethodSpec::get_object(bucket_name, role_name),
                MethodSpec::put_object(bucket_name, role_name),
            ],
            removal_policy: RemovalPolicy::Destroy,
        }
    }
}

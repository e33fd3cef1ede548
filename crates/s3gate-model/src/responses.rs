//! The three-tier response mapping shared by every proxy method.
//!
//! On a backend 200 the gateway copies `Date` (as `Timestamp`),
//! `Content-Length`, and `Content-Type` through and stamps the CORS
//! allow-origin header. Backend 4xx and 5xx responses are matched by regex
//! against the backend status line and pass through with only the CORS
//! header set.

use std::collections::BTreeMap;

/// An integration response: how a backend status class maps to a method
/// response.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationResponse {
    /// Status code returned to the client.
    pub status_code: String,
    /// Regex matched against the backend status code; `None` is the default
    /// (success) mapping.
    pub selection_pattern: Option<String>,
    /// `method.response.header.*` ← `integration.response.header.*` (or a
    /// quoted literal) mappings.
    pub response_parameters: BTreeMap<String, String>,
}

/// A method response: which status code and headers the method declares.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodResponse {
    /// Declared status code.
    pub status_code: String,
    /// `method.response.header.*` names with their permission flags.
    pub response_parameters: BTreeMap<String, bool>,
}

/// The paired integration/method response tables for one method.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMapping {
    /// Integration responses, default mapping first.
    pub integration_responses: Vec<IntegrationResponse>,
    /// Declared method responses.
    pub method_responses: Vec<MethodResponse>,
}

/// Prefix a header name into a method response parameter.
fn method_header(name: &str) -> String {
    format!("method.response.header.{name}")
}

/// Prefix a header name into an integration response parameter.
fn integration_header(name: &str) -> String {
    format!("integration.response.header.{name}")
}

impl ResponseMapping {
    /// The shared proxy mapping: 200 with header passthrough and CORS,
    /// 4xx/5xx pattern-matched with CORS only.
    #[must_use]
    pub fn proxy_default() -> Self {
        let ok_parameters = BTreeMap::from([
            (method_header("Timestamp"), integration_header("Date")),
            (
                method_header("Content-Length"),
                integration_header("Content-Length"),
            ),
            (
                method_header("Content-Type"),
                integration_header("Content-Type"),
            ),
            (method_header("Access-Control-Allow-Origin"), "'*'".to_owned()),
        ]);
        let error_parameters =
            BTreeMap::from([(method_header("Access-Control-Allow-Origin"), "'*'".to_owned())]);

        let integration_responses = vec![
            IntegrationResponse {
                status_code: "200".to_owned(),
                selection_pattern: None,
                response_parameters: ok_parameters,
            },
            IntegrationResponse {
                status_code: "400".to_owned(),
                selection_pattern: Some(r"4\d{2}".to_owned()),
                response_parameters: error_parameters.clone(),
            },
            IntegrationResponse {
                status_code: "500".to_owned(),
                selection_pattern: Some(r"5\d{2}".to_owned()),
                response_parameters: error_parameters,
            },
        ];

        let ok_declared = BTreeMap::from([
            (method_header("Timestamp"), true),
            (method_header("Content-Length"), true),
            (method_header("Content-Type"), true),
            (method_header("Access-Control-Allow-Methods"), true),
            (method_header("Access-Control-Allow-Origin"), true),
        ]);
        let error_declared = BTreeMap::from([
            (method_header("Access-Control-Allow-Methods"), true),
            (method_header("Access-Control-Allow-Origin"), true),
        ]);

        let method_responses = vec![
            MethodResponse {
                status_code: "200".to_owned(),
                response_parameters: ok_declared,
            },
            MethodResponse {
                status_code: "400".to_owned(),
                response_parameters: error_declared.clone(),
            },
            MethodResponse {
                status_code: "500".to_owned(),
                response_parameters: error_declared,
            },
        ];

        Self {
            integration_responses,
            method_responses,
        }
    }
}

//! Raw API access commands for direct REST endpoint calls

use anyhow::Context;
use composectl_core::{ApiRequest, ComposeClient, Method};
use serde_json::Value;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::error::{ComposeCtlError, Result as CliResult};
use crate::output::print_value;

/// Parameters for API command execution
pub struct ApiCommandParams<'a> {
    pub method: Method,
    pub path: &'a str,
    pub data: Option<&'a str>,
    pub query: Option<&'a str>,
    pub output_format: OutputFormat,
}

/// Send one raw request with the configured client and print the JSON body
pub async fn handle_api_command(
    client: &ComposeClient,
    params: ApiCommandParams<'_>,
) -> CliResult<()> {
    let request = build_request(params.method, params.path, params.data)?;
    debug!("Raw request: {} {}", request.method, request.path);

    let response = client.execute_json(&request).await?;
    print_value(response, params.output_format, params.query)
}

/// Build a request descriptor from command-line input
pub fn build_request(method: Method, path: &str, data: Option<&str>) -> CliResult<ApiRequest> {
    let normalized_path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    let mut request = ApiRequest::new(method, normalized_path);
    if let Some(body) = data.map(parse_body).transpose()? {
        request = request.with_body(body);
    }
    Ok(request)
}

/// Parse `--data`: inline JSON, or `@path` to read JSON from a file
fn parse_body(data: &str) -> CliResult<Value> {
    if let Some(file_path) = data.strip_prefix('@') {
        let content = std::fs::read_to_string(file_path).map_err(|e| ComposeCtlError::FileError {
            path: file_path.to_string(),
            message: e.to_string(),
        })?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON from file: {}", file_path))
            .map_err(|e| ComposeCtlError::InvalidInput {
                message: format!("{:#}", e),
            })?;
        return Ok(value);
    }

    serde_json::from_str(data).map_err(|e| ComposeCtlError::InvalidInput {
        message: format!("Failed to parse JSON from data parameter: {}", e),
    })
}

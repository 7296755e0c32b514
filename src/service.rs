//! # HTTP Print Service
//!
//! [`PrintService`] implementation for an export-web-map print task.
//!
//! ## Request
//!
//! `POST {service_url}/execute` with form fields:
//!
//! | Field | Value |
//! |-------|-------|
//! | `f` | `json` |
//! | `Web_Map_as_JSON` | [`JobRequest::web_map_json`] |
//! | `Format` | format id |
//! | `Layout_Template` | layout id |
//!
//! ## Response
//!
//! ```text
//! {"results": [{"paramName": "Output_File", "value": {"url": "https://..."}}]}
//! {"error": {"code": 400, "message": "...", "details": [...]}}
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::error::PrintError;
use crate::executor::PrintService;
use crate::request::JobRequest;

/// Default bound on a single render.
pub const DEFAULT_EXECUTE_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    results: Vec<ExecuteResult>,
    #[serde(default)]
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct ExecuteResult {
    #[serde(default)]
    value: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<String>,
}

/// Pull the output file URL out of an execute response body.
pub fn parse_execute_response(bytes: &[u8]) -> Result<String, PrintError> {
    let response: ExecuteResponse = serde_json::from_slice(bytes)
        .map_err(|e| PrintError::Submission(format!("Invalid execute response: {}", e)))?;

    if let Some(err) = response.error {
        let mut message = err.message;
        if !err.details.is_empty() {
            message = format!("{} ({})", message, err.details.join("; "));
        }
        return Err(PrintError::Submission(match err.code {
            Some(code) => format!("service error {}: {}", code, message),
            None => format!("service error: {}", message),
        }));
    }

    response
        .results
        .iter()
        .filter_map(|r| r.value.as_ref())
        .filter_map(|v| v.get("url").and_then(|u| u.as_str()))
        .find(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or_else(|| PrintError::Submission("Execute response has no output URL".to_string()))
}

/// Print service reached over HTTP.
pub struct HttpPrintService {
    client: reqwest::Client,
    execute_url: String,
    timeout: Duration,
}

impl HttpPrintService {
    /// `service_url` is the task URL; `/execute` is appended.
    pub fn new(client: reqwest::Client, service_url: &str) -> Self {
        Self {
            client,
            execute_url: format!("{}/execute", service_url.trim_end_matches('/')),
            timeout: DEFAULT_EXECUTE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl PrintService for HttpPrintService {
    async fn execute(&self, request: &JobRequest) -> Result<String, PrintError> {
        let web_map = request.web_map_json().to_string();
        let form = [
            ("f", "json"),
            ("Web_Map_as_JSON", web_map.as_str()),
            ("Format", request.format.as_str()),
            ("Layout_Template", request.layout.as_str()),
        ];

        tracing::debug!(
            url = %self.execute_url,
            format = %request.format,
            layout = %request.layout,
            "submitting print job"
        );

        let response = self
            .client
            .post(&self.execute_url)
            .form(&form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                PrintError::Submission(format!("Failed to reach {}: {}", self.execute_url, e))
            })?;
        if !response.status().is_success() {
            return Err(PrintError::Submission(format!(
                "Print request failed: HTTP {}",
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PrintError::Submission(format!("Failed to read response: {}", e)))?;

        parse_execute_response(&bytes)
    }
}

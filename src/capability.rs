//! # Service Capabilities
//!
//! One-shot fetch of the layout and format choices a print service offers.
//!
//! The service describes itself with a JSON document listing its task
//! parameters. Only two matter here:
//!
//! | Parameter | Becomes |
//! |-----------|---------|
//! | `Format` | [`Capabilities::formats`] |
//! | `Layout_Template` | [`Capabilities::layouts`] |
//!
//! ## Failure
//!
//! [`CapabilityLoader::load`] never fails. A network error, timeout or
//! unreadable document is logged and yields empty choice lists, so the
//! caller sees "no choices available" rather than an error.

use serde::Deserialize;
use std::time::Duration;

use crate::error::PrintError;
use crate::options::{LayoutTemplate, OutputFormat, PrintOptions};

/// Bounded wait for the capability document.
pub const DEFAULT_CAPABILITY_TIMEOUT: Duration = Duration::from_secs(10);

const FORMAT_PARAM: &str = "Format";
const LAYOUT_PARAM: &str = "Layout_Template";

#[derive(Debug, Deserialize)]
struct ServiceDescription {
    #[serde(default)]
    parameters: Vec<ParameterDescriptor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParameterDescriptor {
    name: String,
    #[serde(default)]
    choice_list: Vec<String>,
}

/// Layout and format choices advertised by the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Capabilities {
    pub layouts: Vec<LayoutTemplate>,
    pub formats: Vec<OutputFormat>,
}

impl Capabilities {
    /// Parse a service description document.
    pub fn from_service_json(bytes: &[u8]) -> Result<Self, PrintError> {
        let description: ServiceDescription = serde_json::from_slice(bytes)
            .map_err(|e| PrintError::Capability(format!("Invalid service description: {}", e)))?;

        let mut caps = Capabilities::default();
        for param in description.parameters {
            match param.name.as_str() {
                FORMAT_PARAM => {
                    caps.formats = param.choice_list.iter().map(|f| OutputFormat::parse(f)).collect();
                }
                LAYOUT_PARAM => {
                    caps.layouts = param.choice_list.into_iter().map(LayoutTemplate::new).collect();
                }
                _ => {}
            }
        }
        Ok(caps)
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty() && self.formats.is_empty()
    }

    /// True if both the layout and the format are among the advertised choices.
    pub fn accepts(&self, options: &PrintOptions) -> bool {
        self.layouts.contains(&options.layout)
            && self
                .formats
                .iter()
                .any(|format| format.matches(options.format.as_str()))
    }
}

/// Fetches [`Capabilities`] from a print service endpoint.
pub struct CapabilityLoader {
    client: reqwest::Client,
    service_url: String,
    timeout: Duration,
}

impl CapabilityLoader {
    pub fn new(client: reqwest::Client, service_url: impl Into<String>) -> Self {
        Self {
            client,
            service_url: service_url.into(),
            timeout: DEFAULT_CAPABILITY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch and parse the service description.
    pub async fn fetch(&self) -> Result<Capabilities, PrintError> {
        let response = self
            .client
            .get(&self.service_url)
            .query(&[("f", "json")])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                PrintError::Capability(format!("Failed to reach {}: {}", self.service_url, e))
            })?;
        if !response.status().is_success() {
            return Err(PrintError::Capability(format!(
                "Failed to load {}: HTTP {}",
                self.service_url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PrintError::Capability(format!("Failed to read response: {}", e)))?;

        Capabilities::from_service_json(&bytes)
    }

    /// Like [`fetch`](Self::fetch), but a failure yields empty choices.
    pub async fn load(&self) -> Capabilities {
        match self.fetch().await {
            Ok(caps) => {
                tracing::info!(
                    layouts = caps.layouts.len(),
                    formats = caps.formats.len(),
                    "loaded print service capabilities"
                );
                caps
            }
            Err(e) => {
                tracing::warn!(error = %e, url = %self.service_url, "no print choices available");
                Capabilities::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::{local_client, serve_once};
    use pretty_assertions::assert_eq;

    const DESCRIPTION: &str = r#"{
        "name": "Export Web Map",
        "parameters": [
            {"name": "Web_Map_as_JSON", "dataType": "GPString"},
            {"name": "Format", "dataType": "GPString",
             "choiceList": ["PDF", "PNG32", "PNG8", "JPG", "GIF", "EPS", "SVG", "SVGZ"]},
            {"name": "Layout_Template", "dataType": "GPString",
             "choiceList": ["A3 Landscape", "A4 Portrait", "MAP_ONLY"]}
        ]
    }"#;

    #[test]
    fn test_parse_choices() {
        let caps = Capabilities::from_service_json(DESCRIPTION.as_bytes()).unwrap();
        assert_eq!(caps.formats.len(), 8);
        assert_eq!(caps.formats[0], OutputFormat::Pdf);
        assert_eq!(caps.formats[1], OutputFormat::Png32);
        assert_eq!(
            caps.layouts,
            vec![
                LayoutTemplate::new("A3 Landscape"),
                LayoutTemplate::new("A4 Portrait"),
                LayoutTemplate::new("MAP_ONLY"),
            ]
        );
    }

    #[test]
    fn test_missing_parameters_gives_empty() {
        let caps = Capabilities::from_service_json(br#"{"name": "x"}"#).unwrap();
        assert!(caps.is_empty());
    }

    #[test]
    fn test_invalid_json_is_capability_error() {
        let err = Capabilities::from_service_json(b"<html>").unwrap_err();
        assert!(matches!(err, PrintError::Capability(_)));
    }

    #[test]
    fn test_accepts() {
        let caps = Capabilities::from_service_json(DESCRIPTION.as_bytes()).unwrap();
        let mut options = PrintOptions {
            layout: LayoutTemplate::new("A4 Portrait"),
            format: OutputFormat::parse("jpg"),
            ..Default::default()
        };
        assert!(caps.accepts(&options));

        options.layout = LayoutTemplate::new("Letter ANSI A Landscape");
        assert!(!caps.accepts(&options));
    }

    #[tokio::test]
    async fn test_load_unreachable_returns_empty() {
        // Port 9 on localhost is not expected to serve HTTP.
        let loader = CapabilityLoader::new(reqwest::Client::new(), "http://127.0.0.1:9/print")
            .with_timeout(Duration::from_millis(500));
        let caps = loader.load().await;
        assert!(caps.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_reads_choice_lists() {
        let (base, server) = serve_once("200 OK", DESCRIPTION).await;
        let loader = CapabilityLoader::new(local_client(), format!("{}/print", base));

        let caps = loader.fetch().await.unwrap();
        assert_eq!(caps.formats.len(), 8);
        assert_eq!(caps.layouts[2], LayoutTemplate::new("MAP_ONLY"));

        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /print?f=json HTTP/1.1"), "{}", raw);
    }

    #[tokio::test]
    async fn test_fetch_http_error_status() {
        let (base, server) = serve_once("404 Not Found", "{}").await;
        let loader = CapabilityLoader::new(local_client(), format!("{}/print", base));

        let err = loader.fetch().await.unwrap_err();
        assert!(matches!(&err, PrintError::Capability(m) if m.contains("404")), "{}", err);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_load_error_status_returns_empty() {
        let (base, server) = serve_once("500 Internal Server Error", "{}").await;
        let loader = CapabilityLoader::new(local_client(), format!("{}/print", base));

        assert!(loader.load().await.is_empty());
        server.await.unwrap();
    }
}

//! # Configuration
//!
//! Settings for talking to one print service, plus the starting values of
//! the print options.
//!
//! ## Example: TOML
//!
//! ```toml
//! service_url = "https://gis.example.com/arcgis/rest/services/Utilities/PrintingTools/GPServer/Export%20Web%20Map%20Task"
//! default_title = "Parcel Map"
//! default_layout = "Letter ANSI A Landscape"
//! default_format = "PDF"
//! default_author = "GIS Office"
//! default_copyright = "County of Example"
//! capability_timeout_secs = 10
//! execute_timeout_secs = 120
//! ```
//!
//! Every field is optional in the file. The service URL must be set by the
//! file or the command line before anything is sent.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::capability::DEFAULT_CAPABILITY_TIMEOUT;
use crate::error::PrintError;
use crate::options::{LayoutTemplate, OutputFormat, PrintOptions};
use crate::service::DEFAULT_EXECUTE_TIMEOUT;

fn default_title() -> String {
    "Map".to_string()
}

fn default_layout() -> String {
    "A4 Landscape".to_string()
}

fn default_format() -> String {
    "PDF".to_string()
}

fn default_capability_timeout() -> u64 {
    DEFAULT_CAPABILITY_TIMEOUT.as_secs()
}

fn default_execute_timeout() -> u64 {
    DEFAULT_EXECUTE_TIMEOUT.as_secs()
}

/// Print service configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PrintConfig {
    /// Print task URL (capabilities are read from here, jobs go to `/execute`).
    #[serde(default)]
    pub service_url: String,
    #[serde(default = "default_title")]
    pub default_title: String,
    #[serde(default = "default_layout")]
    pub default_layout: String,
    #[serde(default = "default_format")]
    pub default_format: String,
    #[serde(default)]
    pub default_author: String,
    #[serde(default)]
    pub default_copyright: String,
    #[serde(default = "default_capability_timeout")]
    pub capability_timeout_secs: u64,
    #[serde(default = "default_execute_timeout")]
    pub execute_timeout_secs: u64,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            service_url: String::new(),
            default_title: default_title(),
            default_layout: default_layout(),
            default_format: default_format(),
            default_author: String::new(),
            default_copyright: String::new(),
            capability_timeout_secs: default_capability_timeout(),
            execute_timeout_secs: default_execute_timeout(),
        }
    }
}

impl PrintConfig {
    /// Load from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PrintError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| PrintError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Check that the config can be used to reach a service.
    pub fn validate(&self) -> Result<(), PrintError> {
        let url = self.service_url.trim();
        if url.is_empty() {
            return Err(PrintError::Config("service_url is not set".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(PrintError::Config(format!(
                "service_url must be an http(s) URL: {}",
                url
            )));
        }
        if self.capability_timeout_secs == 0 || self.execute_timeout_secs == 0 {
            return Err(PrintError::Config("timeouts must be non-zero".to_string()));
        }
        Ok(())
    }

    pub fn capability_timeout(&self) -> Duration {
        Duration::from_secs(self.capability_timeout_secs)
    }

    pub fn execute_timeout(&self) -> Duration {
        Duration::from_secs(self.execute_timeout_secs)
    }

    /// Starting print options.
    pub fn initial_options(&self) -> PrintOptions {
        PrintOptions {
            title: self.default_title.clone(),
            layout: LayoutTemplate::new(self.default_layout.clone()),
            format: OutputFormat::parse(&self.default_format),
            author: self.default_author.clone(),
            copyright: self.default_copyright.clone(),
            overlay_text: None,
        }
    }
}

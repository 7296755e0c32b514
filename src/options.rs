//! # Print Options
//!
//! User-editable settings for the next print job, and the identifier types
//! for the layout and format choices a print service advertises.
//!
//! ## Example
//!
//! ```
//! use mapprint::options::{OutputFormat, PrintOptions};
//!
//! let mut options = PrintOptions::default();
//! options.title = "Parcels".to_string();
//! options.format = OutputFormat::parse("png32");
//!
//! assert_eq!(options.format, OutputFormat::Png32);
//! assert_eq!(options.format.as_str(), "PNG32");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Output format identifier, as advertised by the print service.
///
/// Known identifiers are matched case-insensitively and sent back in the
/// service's uppercase spelling. Unknown ones keep the spelling they came in.
#[derive(Debug, Clone, Default)]
pub enum OutputFormat {
    #[default]
    Pdf,
    Png32,
    Png8,
    Jpg,
    Gif,
    Eps,
    Svg,
    Svgz,
    Aix,
    /// Anything the service offers that this crate has no name for.
    Other(String),
}

impl OutputFormat {
    /// Parse a service format identifier. Never fails.
    pub fn parse(id: &str) -> Self {
        match id.trim().to_ascii_uppercase().as_str() {
            "PDF" => OutputFormat::Pdf,
            "PNG32" => OutputFormat::Png32,
            "PNG8" => OutputFormat::Png8,
            "JPG" => OutputFormat::Jpg,
            "GIF" => OutputFormat::Gif,
            "EPS" => OutputFormat::Eps,
            "SVG" => OutputFormat::Svg,
            "SVGZ" => OutputFormat::Svgz,
            "AIX" => OutputFormat::Aix,
            _ => OutputFormat::Other(id.to_string()),
        }
    }

    /// Canonical identifier string.
    ///
    /// `Other` returns whatever was parsed.
    pub fn as_str(&self) -> &str {
        match self {
            OutputFormat::Pdf => "PDF",
            OutputFormat::Png32 => "PNG32",
            OutputFormat::Png8 => "PNG8",
            OutputFormat::Jpg => "JPG",
            OutputFormat::Gif => "GIF",
            OutputFormat::Eps => "EPS",
            OutputFormat::Svg => "SVG",
            OutputFormat::Svgz => "SVGZ",
            OutputFormat::Aix => "AIX",
            OutputFormat::Other(id) => id,
        }
    }

    /// True if `id` names this format (case-insensitive).
    pub fn matches(&self, id: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(id.trim())
    }
}

impl PartialEq for OutputFormat {
    fn eq(&self, other: &Self) -> bool {
        self.as_str().eq_ignore_ascii_case(other.as_str())
    }
}

impl Eq for OutputFormat {}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OutputFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OutputFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Ok(OutputFormat::parse(&id))
    }
}

/// Layout template identifier (e.g. `"A4 Landscape"`, `"MAP_ONLY"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutTemplate(String);

impl LayoutTemplate {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The map-only layout has no title block.
    pub fn is_map_only(&self) -> bool {
        let id = self.0.trim();
        id.eq_ignore_ascii_case("MAP_ONLY") || id.eq_ignore_ascii_case("map-only")
    }
}

impl Default for LayoutTemplate {
    fn default() -> Self {
        Self::new("A4 Landscape")
    }
}

impl fmt::Display for LayoutTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Settings for the next print job.
///
/// The layout and format should come from the most recently loaded
/// [`Capabilities`](crate::capability::Capabilities); nothing downstream
/// checks this.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrintOptions {
    pub title: String,
    pub layout: LayoutTemplate,
    pub format: OutputFormat,
    pub author: String,
    pub copyright: String,
    /// Extra text elements for the layout, passed through untouched.
    pub overlay_text: Option<serde_json::Value>,
}

impl PrintOptions {
    /// Whether the presentation layer should offer a title field.
    pub fn title_visible(&self) -> bool {
        !self.layout.is_map_only()
    }
}

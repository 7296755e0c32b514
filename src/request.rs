//! # Job Requests
//!
//! A [`JobRequest`] is the immutable description of one print submission.
//! It is built from the current [`PrintOptions`] and a [`ViewContext`] and
//! never changes afterwards.
//!
//! ## Fixed Policy
//!
//! | Setting | Value | Meaning |
//! |---------|-------|---------|
//! | `scale_preserved` | `false` | The service picks the scale for the page |
//! | `attribution_visible` | `false` | No attribution text on the output |
//!
//! ## Example
//!
//! ```
//! use mapprint::options::PrintOptions;
//! use mapprint::request::JobRequest;
//! use mapprint::view::{Extent, SpatialReference, ViewContext};
//!
//! let view = ViewContext::new(
//!     SpatialReference::WEB_MERCATOR,
//!     Extent::parse("0,0,1000,1000").unwrap(),
//! );
//! let request = JobRequest::build(&PrintOptions::default(), view);
//!
//! assert!(!request.scale_preserved);
//! assert_eq!(request.layout_options.title_text, "");
//! ```

use serde::Serialize;
use serde_json::{Value, json};

use crate::options::{LayoutTemplate, OutputFormat, PrintOptions};
use crate::view::{DEFAULT_DPI, ViewContext};

/// Text elements placed on the layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutOptions {
    pub title_text: String,
    pub author_text: String,
    pub copyright_text: String,
    /// Passthrough overlay text.
    pub custom_text_elements: Option<Value>,
}

/// One print submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRequest {
    pub format: OutputFormat,
    pub layout: LayoutTemplate,
    pub scale_preserved: bool,
    pub attribution_visible: bool,
    pub layout_options: LayoutOptions,
    pub view: ViewContext,
}

impl JobRequest {
    /// Build a request from the current options. Pure and total.
    pub fn build(options: &PrintOptions, view: ViewContext) -> Self {
        Self {
            format: options.format.clone(),
            layout: options.layout.clone(),
            scale_preserved: false,
            attribution_visible: false,
            layout_options: LayoutOptions {
                title_text: options.title.clone(),
                author_text: options.author.clone(),
                copyright_text: options.copyright.clone(),
                custom_text_elements: options.overlay_text.clone(),
            },
            view,
        }
    }

    /// Render the web-map document the print service expects.
    ///
    /// The scale is only included when the job preserves scale; otherwise
    /// the service fits the extent to the page.
    pub fn web_map_json(&self) -> Value {
        let view = &self.view;
        let mut map_options = json!({
            "extent": {
                "xmin": view.extent.xmin,
                "ymin": view.extent.ymin,
                "xmax": view.extent.xmax,
                "ymax": view.extent.ymax,
                "spatialReference": { "wkid": view.spatial_reference.wkid },
            },
            "spatialReference": { "wkid": view.spatial_reference.wkid },
            "showAttribution": self.attribution_visible,
        });
        if self.scale_preserved
            && let Some(scale) = view.scale
        {
            map_options["scale"] = json!(scale);
        }

        let mut layout_options = json!({
            "titleText": self.layout_options.title_text,
            "authorText": self.layout_options.author_text,
            "copyrightText": self.layout_options.copyright_text,
        });
        if let Some(custom) = &self.layout_options.custom_text_elements {
            layout_options["customTextElements"] = custom.clone();
        }

        json!({
            "mapOptions": map_options,
            "operationalLayers": view.operational_layers,
            "exportOptions": { "dpi": view.dpi.unwrap_or(DEFAULT_DPI) },
            "layoutOptions": layout_options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Extent, SpatialReference};
    use pretty_assertions::assert_eq;

    fn view() -> ViewContext {
        let mut view = ViewContext::new(
            SpatialReference::WEB_MERCATOR,
            Extent::parse("0,0,100,50").unwrap(),
        );
        view.scale = Some(24000.0);
        view
    }

    fn options() -> PrintOptions {
        PrintOptions {
            title: "Flood Zones".to_string(),
            layout: LayoutTemplate::new("A3 Portrait"),
            format: OutputFormat::Png8,
            author: "GIS Team".to_string(),
            copyright: "(c) County".to_string(),
            overlay_text: Some(json!([{ "parcel": "12-345" }])),
        }
    }

    #[test]
    fn test_build_copies_options() {
        let request = JobRequest::build(&options(), view());
        assert_eq!(request.format, OutputFormat::Png8);
        assert_eq!(request.layout.as_str(), "A3 Portrait");
        assert_eq!(
            request.layout_options,
            LayoutOptions {
                title_text: "Flood Zones".to_string(),
                author_text: "GIS Team".to_string(),
                copyright_text: "(c) County".to_string(),
                custom_text_elements: Some(json!([{ "parcel": "12-345" }])),
            }
        );
        assert_eq!(request.view, view());
    }

    #[test]
    fn test_fixed_policy() {
        let request = JobRequest::build(&options(), view());
        assert!(!request.scale_preserved);
        assert!(!request.attribution_visible);
    }

    #[test]
    fn test_web_map_json_shape() {
        let doc = JobRequest::build(&options(), view()).web_map_json();
        assert_eq!(doc["mapOptions"]["extent"]["xmax"], json!(100.0));
        assert_eq!(doc["mapOptions"]["spatialReference"]["wkid"], json!(102100));
        assert_eq!(doc["mapOptions"]["showAttribution"], json!(false));
        assert_eq!(doc["layoutOptions"]["titleText"], json!("Flood Zones"));
        assert_eq!(
            doc["layoutOptions"]["customTextElements"],
            json!([{ "parcel": "12-345" }])
        );
        assert_eq!(doc["exportOptions"]["dpi"], json!(96));
        assert_eq!(doc["operationalLayers"], json!([]));
    }

    #[test]
    fn test_scale_omitted_when_not_preserved() {
        let doc = JobRequest::build(&options(), view()).web_map_json();
        assert!(doc["mapOptions"].get("scale").is_none());

        let mut request = JobRequest::build(&options(), view());
        request.scale_preserved = true;
        assert_eq!(request.web_map_json()["mapOptions"]["scale"], json!(24000.0));
    }

    #[test]
    fn test_no_overlay_omits_custom_text() {
        let mut opts = options();
        opts.overlay_text = None;
        let doc = JobRequest::build(&opts, view()).web_map_json();
        assert!(doc["layoutOptions"].get("customTextElements").is_none());
    }
}

//! # Map View Collaborators
//!
//! The print core never talks to a map directly. It asks a [`ViewProvider`]
//! for the current [`ViewContext`] and an [`OverlaySource`] for any extra
//! layout text. Both are injected into the session by whoever owns the map.
//!
//! A provider that has no view returns `None`, which the session reports as
//! [`PrintError::NoView`](crate::PrintError::NoView).

use serde::{Deserialize, Serialize};

/// Default export resolution when the view does not specify one.
pub const DEFAULT_DPI: u32 = 96;

/// Spatial reference by well-known id (e.g. 102100 for Web Mercator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialReference {
    pub wkid: u32,
}

impl SpatialReference {
    pub const WEB_MERCATOR: Self = Self { wkid: 102100 };
    pub const WGS84: Self = Self { wkid: 4326 };
}

/// Visible map extent in the view's spatial reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Extent {
    /// Parse `"xmin,ymin,xmax,ymax"`.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [xmin, ymin, xmax, ymax] if xmin < xmax && ymin < ymax => Some(Self {
                xmin: *xmin,
                ymin: *ymin,
                xmax: *xmax,
                ymax: *ymax,
            }),
            _ => None,
        }
    }
}

/// Snapshot of the map view a job should print.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewContext {
    pub spatial_reference: SpatialReference,
    pub extent: Extent,
    /// On-screen scale. Only sent when a job preserves scale.
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub dpi: Option<u32>,
    /// Layer descriptions in the print service's web-map form, passed through.
    #[serde(default)]
    pub operational_layers: Vec<serde_json::Value>,
}

impl ViewContext {
    pub fn new(spatial_reference: SpatialReference, extent: Extent) -> Self {
        Self {
            spatial_reference,
            extent,
            scale: None,
            dpi: None,
            operational_layers: Vec::new(),
        }
    }
}

/// Supplies the current view, if there is one.
pub trait ViewProvider {
    fn current_view(&self) -> Option<ViewContext>;
}

/// Supplies extra layout text for the next job.
pub trait OverlaySource {
    fn overlay_text(&self) -> Option<serde_json::Value>;
}

/// A view that never changes. Used by the CLI and tests.
#[derive(Debug, Clone, Default)]
pub struct FixedView(pub Option<ViewContext>);

impl FixedView {
    pub fn new(view: ViewContext) -> Self {
        Self(Some(view))
    }

    /// A provider with no view loaded.
    pub fn unavailable() -> Self {
        Self(None)
    }
}

impl ViewProvider for FixedView {
    fn current_view(&self) -> Option<ViewContext> {
        self.0.clone()
    }
}

/// Overlay text fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct StaticOverlay(pub Option<serde_json::Value>);

impl OverlaySource for StaticOverlay {
    fn overlay_text(&self) -> Option<serde_json::Value> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extent_parse() {
        let extent = Extent::parse("-10.5, 20, 30, 40.25").unwrap();
        assert_eq!(
            extent,
            Extent {
                xmin: -10.5,
                ymin: 20.0,
                xmax: 30.0,
                ymax: 40.25
            }
        );
    }

    #[test]
    fn test_extent_parse_rejects_bad_input() {
        assert!(Extent::parse("1,2,3").is_none());
        assert!(Extent::parse("1,2,x,4").is_none());
        // inverted
        assert!(Extent::parse("5,0,1,1").is_none());
    }

    #[test]
    fn test_fixed_view_unavailable() {
        assert!(FixedView::unavailable().current_view().is_none());
        let view = ViewContext::new(
            SpatialReference::WGS84,
            Extent::parse("0,0,1,1").unwrap(),
        );
        assert_eq!(FixedView::new(view.clone()).current_view(), Some(view));
    }
}

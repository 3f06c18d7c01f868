//! Track geometry and the sampler port
//!
//! Geometry is the only thing the choreographer knows about the rendered row.
//! It is measured by whatever owns the layout (a browser, a test, the CLI) and
//! handed over through [`GeometrySampler`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One child section of a horizontal track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Stable identifier used for deep links and per-panel configuration
    #[serde(default)]
    pub id: Option<String>,
    /// Distance from the start of the row
    pub offset: f64,
    /// Horizontal extent
    pub width: f64,
    /// Snapping is suspended while progress is inside this panel
    #[serde(default)]
    pub free_scroll: bool,
}

impl Panel {
    pub fn new(offset: f64, width: f64) -> Self {
        Self {
            id: None,
            offset,
            width,
            free_scroll: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn free_scroll(mut self) -> Self {
        self.free_scroll = true;
        self
    }

    /// Trailing edge of the panel
    pub fn end(&self) -> f64 {
        self.offset + self.width
    }
}

/// Measured layout of one horizontal filmstrip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackGeometry {
    /// Children of the row, in layout order
    pub panels: Vec<Panel>,
    /// Full content width of the row
    pub content_width: f64,
    /// Width of the viewport the row is seen through
    pub viewport_width: f64,
    /// Native scroll position at which the track becomes pinned
    #[serde(default)]
    pub scroll_start: f64,
}

impl TrackGeometry {
    pub fn new(panels: Vec<Panel>, content_width: f64, viewport_width: f64) -> Self {
        Self {
            panels,
            content_width,
            viewport_width,
            scroll_start: 0.0,
        }
    }

    /// Lay panel widths out back to back from the row start
    pub fn from_widths<I, S>(widths: I, viewport_width: f64) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut offset = 0.0;
        let panels: Vec<Panel> = widths
            .into_iter()
            .map(|(id, width)| {
                let panel = Panel::new(offset, width).with_id(id);
                offset += width;
                panel
            })
            .collect();

        Self::new(panels, offset, viewport_width)
    }

    /// Distance the row can be translated: `content_width - viewport_width`
    ///
    /// Zero or negative means the content fits and there is nothing to scroll.
    pub fn translate_range(&self) -> f64 {
        self.content_width - self.viewport_width
    }

    /// Whether any horizontal scroll range exists
    pub fn is_scrollable(&self) -> bool {
        self.translate_range() > 0.0
    }

    /// Native scroll distance the pinned track occupies
    pub fn scroll_span(&self) -> f64 {
        self.content_width.max(0.0)
    }

    /// Find a panel by its identifier
    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id.as_deref() == Some(id))
    }

    /// Flag the named panels as free-scroll zones
    ///
    /// Unknown ids are ignored; the geometry may not contain every panel a
    /// page configuration mentions.
    pub fn mark_free_scroll(&mut self, ids: &[String]) {
        for panel in &mut self.panels {
            if let Some(id) = &panel.id {
                if ids.iter().any(|wanted| wanted == id) {
                    panel.free_scroll = true;
                }
            }
        }
    }
}

/// Port for measuring a track's layout
///
/// Implementations may be called any number of times; geometry is only
/// trusted until the next invalidation (resize, late-loading content).
pub trait GeometrySampler {
    fn sample(&mut self) -> TrackGeometry;
}

/// Sampler returning a fixed geometry
#[derive(Debug, Clone, Default)]
pub struct StaticSampler {
    geometry: TrackGeometry,
}

impl StaticSampler {
    pub fn new(geometry: TrackGeometry) -> Self {
        Self { geometry }
    }

    /// Replace the geometry returned by the next sample
    pub fn set(&mut self, geometry: TrackGeometry) {
        self.geometry = geometry;
    }
}

impl GeometrySampler for StaticSampler {
    fn sample(&mut self) -> TrackGeometry {
        self.geometry.clone()
    }
}

/// Width of a row child, either fixed or relative to the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelWidth {
    /// Fixed width in pixels
    Px(f64),
    /// Multiple of the viewport width (`1.0` is a full-screen section)
    Viewports(f64),
}

impl PanelWidth {
    fn resolve(self, viewport_width: f64) -> f64 {
        match self {
            PanelWidth::Px(px) => px,
            PanelWidth::Viewports(n) => n * viewport_width,
        }
    }
}

impl FromStr for PanelWidth {
    type Err = String;

    /// `2.5vw` is viewport-relative; `800px` and bare `800` are pixels
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (number, viewports) = match s.strip_suffix("vw") {
            Some(n) => (n, true),
            None => (s.strip_suffix("px").unwrap_or(s), false),
        };
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| format!("invalid panel width '{}'", s))?;
        if !value.is_finite() || value < 0.0 {
            return Err(format!("panel width must be a non-negative number, got '{}'", s));
        }
        Ok(if viewports {
            PanelWidth::Viewports(value)
        } else {
            PanelWidth::Px(value)
        })
    }
}

/// Sampler for a flex row whose children are sized against the viewport
///
/// Re-sampling after [`RowSampler::set_viewport_width`] reflows every panel,
/// which is what a browser does to `w-screen` / `60vw` sections on resize.
#[derive(Debug, Clone)]
pub struct RowSampler {
    children: Vec<(String, PanelWidth)>,
    viewport_width: f64,
}

impl RowSampler {
    pub fn new(viewport_width: f64) -> Self {
        Self {
            children: Vec::new(),
            viewport_width,
        }
    }

    pub fn push(mut self, id: impl Into<String>, width: PanelWidth) -> Self {
        self.children.push((id.into(), width));
        self
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }
}

impl GeometrySampler for RowSampler {
    fn sample(&mut self) -> TrackGeometry {
        let viewport = self.viewport_width;
        TrackGeometry::from_widths(
            self.children
                .iter()
                .map(|(id, width)| (id.clone(), width.resolve(viewport))),
            viewport,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_widths_lays_out_contiguously() {
        let geo = TrackGeometry::from_widths([("a", 100.0), ("b", 200.0), ("c", 100.0)], 100.0);
        let offsets: Vec<f64> = geo.panels.iter().map(|p| p.offset).collect();
        assert_eq!(offsets, vec![0.0, 100.0, 300.0]);
        assert_eq!(geo.content_width, 400.0);
        assert_eq!(geo.translate_range(), 300.0);
    }

    #[test]
    fn test_empty_row() {
        let mut sampler = RowSampler::new(1280.0);
        let geo = sampler.sample();
        assert!(geo.panels.is_empty());
        assert_eq!(geo.content_width, 0.0);
        assert!(!geo.is_scrollable());
    }

    #[test]
    fn test_row_sampler_reflows_on_resize() {
        let mut sampler = RowSampler::new(1000.0)
            .push("hero", PanelWidth::Viewports(1.0))
            .push("card", PanelWidth::Viewports(0.6))
            .push("fixed", PanelWidth::Px(300.0));

        let before = sampler.sample();
        assert_eq!(before.content_width, 1900.0);

        sampler.set_viewport_width(500.0);
        let after = sampler.sample();
        assert_eq!(after.content_width, 1100.0);
        assert_eq!(after.panel("fixed").map(|p| p.offset), Some(800.0));
    }

    #[test]
    fn test_mark_free_scroll_ignores_unknown_ids() {
        let mut geo = TrackGeometry::from_widths([("a", 10.0), ("process", 30.0)], 10.0);
        geo.mark_free_scroll(&["process".to_string(), "missing".to_string()]);
        assert!(!geo.panels[0].free_scroll);
        assert!(geo.panels[1].free_scroll);
    }

    #[test]
    fn test_parse_panel_width() {
        assert_eq!("2.5vw".parse(), Ok(PanelWidth::Viewports(2.5)));
        assert_eq!("800px".parse(), Ok(PanelWidth::Px(800.0)));
        assert_eq!(" 640 ".parse(), Ok(PanelWidth::Px(640.0)));
        assert!("wide".parse::<PanelWidth>().is_err());
        assert!("-3vw".parse::<PanelWidth>().is_err());
    }
}

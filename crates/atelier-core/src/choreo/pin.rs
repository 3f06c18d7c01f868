//! Nested pins driven by a sub-range of the outer progress
//!
//! A pinned panel moves right by exactly as much as the row moves left while
//! the panel is passing through the viewport, so it reads as stationary.

use super::geometry::TrackGeometry;

/// Sub-range of outer progress over which a secondary transform runs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NestedSpan {
    pub start: f64,
    pub end: f64,
}

impl NestedSpan {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Span during which `panel_id` fills the viewport
    ///
    /// Starts when the panel's left edge meets the viewport's left edge and
    /// ends when its right edge meets the viewport's right edge.
    pub fn for_panel(geometry: &TrackGeometry, panel_id: &str) -> Option<Self> {
        let range = geometry.translate_range();
        if range <= 0.0 {
            return None;
        }
        let panel = geometry.panel(panel_id)?;
        let start = panel.offset / range;
        let end = (panel.end() - geometry.viewport_width) / range;
        Some(Self::new(start, end))
    }

    /// Outer progress renormalized to this span, clamped to `[0, 1]`
    pub fn local(&self, outer: f64) -> f64 {
        let len = self.end - self.start;
        if len <= 0.0 {
            return if outer >= self.start { 1.0 } else { 0.0 };
        }
        ((outer - self.start) / len).clamp(0.0, 1.0)
    }

    pub fn contains(&self, outer: f64) -> bool {
        outer >= self.start && outer <= self.end
    }
}

/// Drives one pinned element's counter-translation
#[derive(Debug, Clone, PartialEq)]
pub struct PinCoordinator {
    span: NestedSpan,
    max_offset: f64,
}

impl PinCoordinator {
    pub fn new(span: NestedSpan, max_offset: f64) -> Self {
        Self {
            span,
            max_offset: max_offset.max(0.0),
        }
    }

    /// Pin for the panel `panel_id` of `geometry`
    ///
    /// The maximum offset is the panel's overflow, `width - viewport`.
    pub fn for_panel(geometry: &TrackGeometry, panel_id: &str) -> Option<Self> {
        let span = NestedSpan::for_panel(geometry, panel_id)?;
        let panel = geometry.panel(panel_id)?;
        Some(Self::new(span, panel.width - geometry.viewport_width))
    }

    pub fn span(&self) -> NestedSpan {
        self.span
    }

    pub fn max_offset(&self) -> f64 {
        self.max_offset
    }

    /// Translation at a local progress value; never leaves `[0, max_offset]`
    pub fn offset_at_local(&self, local: f64) -> f64 {
        local.clamp(0.0, 1.0) * self.max_offset
    }

    /// Translation for the outer track progress
    pub fn offset_at(&self, outer: f64) -> f64 {
        self.offset_at_local(self.span.local(outer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choreo::progress::ProgressMapper;

    const V: f64 = 1000.0;

    fn home() -> TrackGeometry {
        TrackGeometry::from_widths(
            [("hero", V), ("portfolio-section", 3.0 * V), ("footer", V)],
            V,
        )
    }

    #[test]
    fn test_span_for_panel() {
        let span = NestedSpan::for_panel(&home(), "portfolio-section");
        // Range 4V: starts at V/4V, ends at (V + 3V - V)/4V.
        assert_eq!(span, Some(NestedSpan::new(0.25, 0.75)));
    }

    #[test]
    fn test_clamps_outside_local_range() {
        let pin = PinCoordinator::new(NestedSpan::new(0.2, 0.6), 500.0);
        assert_eq!(pin.offset_at_local(-0.5), 0.0);
        assert_eq!(pin.offset_at_local(1.7), 500.0);
        assert_eq!(pin.offset_at(0.0), 0.0);
        assert_eq!(pin.offset_at(1.0), 500.0);
        assert_eq!(pin.offset_at(0.4), 250.0);
    }

    #[test]
    fn test_pinned_panel_stays_in_place() {
        let geo = home();
        let mapper = ProgressMapper::new(&geo);
        let pin = PinCoordinator::for_panel(&geo, "portfolio-section").expect("pin should exist");
        let panel_offset = 1000.0;

        // While inside the span the panel's on-screen x stays at 0.
        for step in 0..=10 {
            let progress = 0.25 + 0.05 * f64::from(step);
            let screen_x = panel_offset + mapper.translate_x(progress) + pin.offset_at(progress);
            assert!(screen_x.abs() < 1e-6, "progress {progress}: {screen_x}");
        }
    }

    #[test]
    fn test_degenerate_span_is_a_step() {
        let span = NestedSpan::new(0.5, 0.5);
        assert_eq!(span.local(0.49), 0.0);
        assert_eq!(span.local(0.5), 1.0);
    }

    #[test]
    fn test_narrow_panel_has_no_offset() {
        let geo = TrackGeometry::from_widths([("a", V), ("b", 0.5 * V), ("c", V)], V);
        let pin = PinCoordinator::for_panel(&geo, "b");
        assert_eq!(pin.map(|p| p.max_offset()), Some(0.0));
    }
}

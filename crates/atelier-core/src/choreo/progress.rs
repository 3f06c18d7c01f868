//! Progress mapping between native scroll, progress, and row translation

use super::geometry::TrackGeometry;

/// Converts between native scroll positions, normalized progress, and the
/// horizontal translation applied to the row
///
/// Borrowing the geometry keeps the mapping tied to the current measurement;
/// there is no cached translate value to go stale after a resize.
#[derive(Debug, Clone, Copy)]
pub struct ProgressMapper<'a> {
    geometry: &'a TrackGeometry,
}

impl<'a> ProgressMapper<'a> {
    pub fn new(geometry: &'a TrackGeometry) -> Self {
        Self { geometry }
    }

    /// Progress for a native scroll position, clamped to `[0, 1]`
    pub fn progress_from_native(&self, native: f64) -> f64 {
        let span = self.geometry.scroll_span();
        if span <= 0.0 {
            return 0.0;
        }
        ((native - self.geometry.scroll_start) / span).clamp(0.0, 1.0)
    }

    /// Row translation for `progress`
    ///
    /// 0 leaves the row in place, 1 aligns the row's trailing edge with the
    /// viewport's trailing edge.
    pub fn translate_x(&self, progress: f64) -> f64 {
        let range = self.geometry.translate_range().max(0.0);
        -(progress * range)
    }

    /// Progress at which the row has scrolled `offset` pixels
    ///
    /// `None` when the track has no translate range.
    pub fn progress_for_offset(&self, offset: f64) -> Option<f64> {
        let range = self.geometry.translate_range();
        if range <= 0.0 {
            return None;
        }
        Some((offset / range).clamp(0.0, 1.0))
    }

    /// Native scroll position that brings `offset` to the viewport's leading edge
    pub fn native_for_offset(&self, offset: f64) -> Option<f64> {
        let progress = self.progress_for_offset(offset)?;
        Some(self.native_for_progress(progress))
    }

    /// Native scroll position for `progress`
    pub fn native_for_progress(&self, progress: f64) -> f64 {
        self.geometry.scroll_start + progress * self.geometry.scroll_span()
    }

    /// Native scroll position for a deep link to panel `id`
    ///
    /// Unknown ids and unscrollable tracks yield `None`; callers simply skip
    /// the jump.
    pub fn native_for_panel(&self, id: &str) -> Option<f64> {
        let panel = self.geometry.panel(id)?;
        self.native_for_offset(panel.offset)
    }
}

/// Panel id named by a URL fragment
///
/// Accepts `"#contact"` or `"contact"`; empty fragments yield `None`.
pub fn fragment_target(fragment: &str) -> Option<&str> {
    let id = fragment.strip_prefix('#').unwrap_or(fragment).trim();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

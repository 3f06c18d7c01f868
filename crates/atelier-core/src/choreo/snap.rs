//! Snap-point calculation and nearest-point resolution
//!
//! Snap points live in normalized progress space. A panel's start maps to
//! `offset / translate_range`, so the last panel start lands at 1.0 exactly
//! when that panel is one viewport wide.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::geometry::TrackGeometry;

/// Upper bound on viewport steps generated inside a single wide panel
const MAX_STEPS_PER_PANEL: usize = 1024;

/// Which snap points a track generates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapMode {
    /// Free scrolling, no snap points are resolved
    Off,
    /// One point per panel start plus the terminal point
    PanelStarts,
    /// Panel starts plus viewport-sized steps through wide panels
    #[default]
    ViewportSteps,
}

/// Snap targets for one track geometry
#[derive(Debug, Clone, PartialEq)]
pub struct SnapSet {
    points: Vec<f64>,
    free_zones: Vec<Range<f64>>,
}

impl SnapSet {
    /// Derive the snap set for `geometry`
    ///
    /// Always returns at least the terminal point at 1.0. Points are sorted
    /// ascending; equal values are kept so every panel owns a point.
    pub fn compute(geometry: &TrackGeometry, mode: SnapMode) -> Self {
        let range = geometry.translate_range();
        let viewport = geometry.viewport_width;
        let scrollable = range > 0.0;

        let normalize = |x: f64| -> f64 {
            if scrollable {
                (x / range).clamp(0.0, 1.0)
            } else {
                0.0
            }
        };

        let mut points = Vec::with_capacity(geometry.panels.len() + 1);
        let mut free_zones = Vec::new();

        for panel in &geometry.panels {
            points.push(normalize(panel.offset));

            if panel.free_scroll {
                if scrollable {
                    free_zones.push(panel.offset / range..panel.end() / range);
                }
                continue;
            }

            if mode != SnapMode::ViewportSteps || !scrollable || viewport <= 0.0 {
                continue;
            }

            if panel.width.is_finite() && panel.width > viewport {
                for k in 1..=MAX_STEPS_PER_PANEL {
                    let step = k as f64 * viewport;
                    if step >= panel.width {
                        break;
                    }
                    let point = (panel.offset + step) / range;
                    if point > 1.0 {
                        break;
                    }
                    points.push(point);
                }
            }
        }

        points.push(1.0);
        // Stable: equal values keep generation order for tie-breaking.
        points.sort_by(|a, b| a.total_cmp(b));

        Self { points, free_zones }
    }

    /// Snap points in ascending order
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether `progress` is inside a free-scroll panel's `[start, end)` span
    pub fn in_free_zone(&self, progress: f64) -> bool {
        self.free_zones.iter().any(|zone| zone.contains(&progress))
    }

    /// Closest snap point to `progress`, ties going to the earlier point
    pub fn nearest(&self, progress: f64) -> f64 {
        let mut best = self.points.first().copied().unwrap_or(1.0);
        for &candidate in self.points.iter().skip(1) {
            if (candidate - progress).abs() < (best - progress).abs() {
                best = candidate;
            }
        }
        best
    }

    /// Where a released gesture should settle
    ///
    /// Inside a free-scroll zone the live progress is returned unchanged.
    pub fn resolve(&self, progress: f64) -> f64 {
        if self.in_free_zone(progress) {
            return progress;
        }
        self.nearest(progress)
    }
}

/// Bounds for the settle animation after a snap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettleTiming {
    /// Shortest settle, in seconds
    pub min_secs: f64,
    /// Longest settle, in seconds
    pub max_secs: f64,
}

impl Default for SettleTiming {
    fn default() -> Self {
        Self {
            min_secs: 0.2,
            max_secs: 0.6,
        }
    }
}

impl SettleTiming {
    /// Duration for travelling `distance` in progress units
    ///
    /// Scales linearly from `min_secs` (no travel) to `max_secs` (the whole
    /// track).
    ///
    /// Non-finite bounds fall back to the defaults and negative bounds count
    /// as zero, so the result is always a valid non-negative duration.
    pub fn duration_secs(&self, distance: f64) -> f64 {
        let bounds = if self.min_secs.is_finite() && self.max_secs.is_finite() {
            *self
        } else {
            Self::default()
        };
        let a = bounds.min_secs.max(0.0);
        let b = bounds.max_secs.max(0.0);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

        let distance = if distance.is_finite() {
            distance.abs()
        } else {
            0.0
        };
        (lo + (hi - lo) * distance).clamp(lo, hi)
    }
}

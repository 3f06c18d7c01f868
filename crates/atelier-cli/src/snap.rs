//! Snap-point report for the `snap` command
//!
//! Runs a page configuration against a measured or described row and lays
//! out what the choreographer would do with it.

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;

use atelier_core::choreo::{
    GeometrySampler, PanelWidth, PinCoordinator, ProgressMapper, RowSampler, SnapMode, SnapSet,
    StaticSampler, TrackConfig, TrackGeometry,
};

/// One resolved snap point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapRow {
    pub progress: f64,
    /// Native scroll position to land on this point
    pub native: f64,
    pub translate_x: f64,
}

/// One configured pin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinRow {
    pub target: String,
    pub panel: String,
    pub start: f64,
    pub end: f64,
    pub max_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapReport {
    pub page: String,
    pub content_width: f64,
    pub viewport_width: f64,
    pub scroll_span: f64,
    pub snaps: Vec<SnapRow>,
    pub free_scroll: Vec<String>,
    pub pins: Vec<PinRow>,
}

impl SnapReport {
    pub fn build(config: &TrackConfig, mut geometry: TrackGeometry) -> Self {
        geometry.mark_free_scroll(&config.free_scroll);
        let snaps = SnapSet::compute(&geometry, config.snap);
        let mapper = ProgressMapper::new(&geometry);

        let snaps = if config.snap == SnapMode::Off {
            Vec::new()
        } else {
            snaps
                .points()
                .iter()
                .map(|&progress| SnapRow {
                    progress,
                    native: mapper.native_for_progress(progress),
                    translate_x: mapper.translate_x(progress),
                })
                .collect()
        };

        let pins = config
            .pins
            .iter()
            .filter_map(|pin| {
                let coordinator = PinCoordinator::for_panel(&geometry, &pin.panel)?;
                let span = coordinator.span();
                Some(PinRow {
                    target: pin.target.clone(),
                    panel: pin.panel.clone(),
                    start: span.start,
                    end: span.end,
                    max_offset: coordinator.max_offset(),
                })
            })
            .collect();

        let free_scroll = geometry
            .panels
            .iter()
            .filter(|p| p.free_scroll)
            .filter_map(|p| p.id.clone())
            .collect();

        Self {
            page: config.name.clone(),
            content_width: geometry.content_width,
            viewport_width: geometry.viewport_width,
            scroll_span: geometry.scroll_span(),
            snaps,
            free_scroll,
            pins,
        }
    }

    pub fn print(&self) {
        println!("Track '{}'", self.page);
        println!(
            "  content {} px, viewport {} px, scroll span {} px",
            self.content_width, self.viewport_width, self.scroll_span
        );
        println!();

        if self.snaps.is_empty() {
            println!("  Snapping off");
        } else {
            println!("  {:>8}  {:>10}  {:>12}", "progress", "scroll", "translateX");
            for row in &self.snaps {
                println!(
                    "  {:>8.4}  {:>10.1}  {:>12.1}",
                    row.progress, row.native, row.translate_x
                );
            }
        }

        if !self.free_scroll.is_empty() {
            println!();
            println!("  Free scroll: {}", self.free_scroll.join(", "));
        }
        for pin in &self.pins {
            println!();
            println!(
                "  Pin {} in {}: progress {:.4}..{:.4}, up to {} px",
                pin.target, pin.panel, pin.start, pin.end, pin.max_offset
            );
        }
    }
}

/// Parse `id=width`, e.g. `hero=1vw` or `card=640px`
pub fn parse_panel_arg(arg: &str) -> Result<(String, PanelWidth)> {
    let (id, width) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected ID=WIDTH, got '{}'", arg))?;
    let id = id.trim();
    if id.is_empty() {
        bail!("panel id is empty in '{}'", arg);
    }
    let width = width.parse::<PanelWidth>().map_err(|e| anyhow!(e))?;
    Ok((id.to_string(), width))
}

/// Sampler for a measured JSON file, or for `--panel` descriptions at a
/// viewport width
pub fn load_sampler(
    geometry_file: Option<&std::path::Path>,
    panels: &[String],
    viewport: f64,
) -> Result<Box<dyn GeometrySampler>> {
    if let Some(path) = geometry_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let geometry: TrackGeometry = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        return Ok(Box::new(StaticSampler::new(geometry)));
    }

    if panels.is_empty() {
        bail!("describe the row with --geometry FILE or one or more --panel ID=WIDTH");
    }
    if viewport <= 0.0 {
        bail!("viewport width must be positive");
    }

    let mut sampler = RowSampler::new(viewport);
    for arg in panels {
        let (id, width) = parse_panel_arg(arg)?;
        sampler = sampler.push(id, width);
    }
    Ok(Box::new(sampler))
}

/// One geometry sample from [`load_sampler`]
pub fn load_geometry(
    geometry_file: Option<&std::path::Path>,
    panels: &[String],
    viewport: f64,
) -> Result<TrackGeometry> {
    let mut sampler = load_sampler(geometry_file, panels, viewport)?;
    Ok(sampler.sample())
}

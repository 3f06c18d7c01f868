//! Per-page track configuration
//!
//! Every horizontal page of the site runs the same choreographer; what varies
//! is captured here. Presets reproduce the pages the site ships with.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::snap::{SettleTiming, SnapMode};

/// Element id of the default translated row
pub const DEFAULT_ROW: &str = "horizontal-wrapper";

/// Element id of the default pinned container
pub const DEFAULT_CONTAINER: &str = "horizontal-container";

/// Names accepted by [`TrackConfig::preset`]
pub const PRESET_NAMES: &[&str] = &["home", "about", "contact", "services", "portfolio"];

/// A pinned element inside one of the track's panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinConfig {
    /// Element to counter-translate
    pub target: String,
    /// Panel whose passage drives the pin
    pub panel: String,
}

/// Configuration of one horizontal-scroll page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    pub name: String,
    /// Element translated horizontally
    pub row: String,
    /// Element pinned while the track scrolls
    pub container: String,
    pub snap: SnapMode,
    /// Panel ids that suspend snapping while progress is inside them
    pub free_scroll: Vec<String>,
    pub pins: Vec<PinConfig>,
    pub settle: SettleTiming,
    /// Quiet period after the last resize before geometry is re-sampled
    pub resize_debounce_ms: u64,
    /// Delay after mount before late layout is re-sampled and deep links apply
    pub layout_settle_ms: u64,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            name: String::from("track"),
            row: DEFAULT_ROW.to_string(),
            container: DEFAULT_CONTAINER.to_string(),
            snap: SnapMode::default(),
            free_scroll: Vec::new(),
            pins: Vec::new(),
            settle: SettleTiming::default(),
            resize_debounce_ms: 150,
            layout_settle_ms: 500,
        }
    }
}

impl TrackConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Landing page: viewport-step snapping, a free-scrolling process
    /// timeline, and the portfolio intro pinned while its cards pass by
    pub fn home() -> Self {
        Self {
            free_scroll: vec!["process-section".to_string()],
            pins: vec![PinConfig {
                target: "portfolio-panel".to_string(),
                panel: "portfolio-section".to_string(),
            }],
            ..Self::named("home")
        }
    }

    /// About page: wide timeline snapped one viewport at a time
    pub fn about() -> Self {
        Self::named("about")
    }

    /// Contact page: viewport-step snapping, entered through deep links
    pub fn contact() -> Self {
        Self::named("contact")
    }

    /// Services page: snaps to section starts only
    pub fn services() -> Self {
        Self {
            snap: SnapMode::PanelStarts,
            ..Self::named("services")
        }
    }

    /// Portfolio page: continuous scroll through project cards
    pub fn portfolio() -> Self {
        Self {
            snap: SnapMode::Off,
            ..Self::named("portfolio")
        }
    }

    /// Look up a built-in page configuration
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "home" => Some(Self::home()),
            "about" => Some(Self::about()),
            "contact" => Some(Self::contact()),
            "services" => Some(Self::services()),
            "portfolio" => Some(Self::portfolio()),
            _ => None,
        }
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn layout_settle(&self) -> Duration {
        Duration::from_millis(self.layout_settle_ms)
    }
}

//! Horizontal-scroll choreography
//!
//! Maps vertical page scroll onto a horizontally translated row of panels:
//! - Geometry sampling behind a port ([`GeometrySampler`])
//! - Snap points from panel geometry, with free-scroll zones
//! - Progress ↔ translation ↔ native scroll mapping, including deep links
//! - Nested pins that hold a panel still while the row moves
//! - The [`Choreographer`] binding all of it to a [`ScrollHost`]
//!
//! Everything except [`Choreographer`] is a pure function of geometry.

mod adapter;
mod config;
mod geometry;
mod pin;
mod progress;
mod snap;

pub use adapter::{Choreographer, ListenerId, PinHandle, ScrollHost, SnapTarget};
pub use config::{PinConfig, TrackConfig, DEFAULT_CONTAINER, DEFAULT_ROW, PRESET_NAMES};
pub use geometry::{GeometrySampler, Panel, PanelWidth, RowSampler, StaticSampler, TrackGeometry};
pub use pin::{NestedSpan, PinCoordinator};
pub use progress::{fragment_target, ProgressMapper};
pub use snap::{SettleTiming, SnapMode, SnapSet};

//! Scroll-trigger adapter and the per-track choreographer
//!
//! [`ScrollHost`] is everything the choreographer needs from the environment
//! that owns scrolling and rendering. The host forwards scroll, gesture-end,
//! and resize events into [`Choreographer`]; the choreographer answers by
//! setting transforms and scroll positions on the host. Time is passed in
//! explicitly so debouncing and deferred deep links are deterministic.

use std::time::{Duration, Instant};

use tracing::debug;

use super::config::TrackConfig;
use super::geometry::{GeometrySampler, TrackGeometry};
use super::pin::PinCoordinator;
use super::progress::{fragment_target, ProgressMapper};
use super::snap::{SnapMode, SnapSet};

/// Handle for a registered scroll or resize listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Handle for a pinned element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinHandle(pub u64);

/// Capabilities the choreographer needs from its scroll/animation engine
pub trait ScrollHost {
    /// Start forwarding native scroll positions to the choreographer
    fn observe_scroll(&mut self) -> ListenerId;
    /// Start forwarding viewport resizes to the choreographer
    fn observe_resize(&mut self) -> ListenerId;
    fn remove_listener(&mut self, id: ListenerId);
    /// Keep `element` fixed while native scrolling advances through `span`
    fn pin(&mut self, element: &str, span: f64) -> PinHandle;
    fn unpin(&mut self, handle: PinHandle);
    /// Apply a horizontal translation outside the normal layout flow
    fn set_translate_x(&mut self, element: &str, x: f64);
    /// Jump the native scroll position
    fn scroll_to(&mut self, native: f64);
}

/// Where a released gesture should settle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub progress: f64,
    /// Native scroll position to animate to
    pub native: f64,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Mounted,
    TornDown,
}

#[derive(Debug)]
struct PendingDeepLink {
    panel: String,
    due: Instant,
}

/// Horizontal-scroll controller for one track
#[derive(Debug)]
pub struct Choreographer<S> {
    config: TrackConfig,
    sampler: S,
    geometry: TrackGeometry,
    snaps: SnapSet,
    pins: Vec<(String, PinCoordinator)>,
    progress: f64,
    listeners: Vec<ListenerId>,
    track_pin: Option<(PinHandle, f64)>,
    resample_due: Option<Instant>,
    deep_link: Option<PendingDeepLink>,
    lifecycle: Lifecycle,
}

impl<S: GeometrySampler> Choreographer<S> {
    pub fn new(config: TrackConfig, sampler: S) -> Self {
        let geometry = TrackGeometry::default();
        let snaps = SnapSet::compute(&geometry, config.snap);
        Self {
            config,
            sampler,
            geometry,
            snaps,
            pins: Vec::new(),
            progress: 0.0,
            listeners: Vec::new(),
            track_pin: None,
            resample_due: None,
            deep_link: None,
            lifecycle: Lifecycle::Idle,
        }
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    pub fn geometry(&self) -> &TrackGeometry {
        &self.geometry
    }

    pub fn snaps(&self) -> &SnapSet {
        &self.snaps
    }

    /// Progress as of the last scroll event
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    pub fn sampler_mut(&mut self) -> &mut S {
        &mut self.sampler
    }

    /// Measure the track, register listeners, and pin the container
    ///
    /// A second geometry pass is scheduled after the layout-settle delay to
    /// pick up late-loading images and fonts. Mounting twice, or after
    /// teardown, does nothing.
    pub fn mount<H: ScrollHost>(&mut self, host: &mut H, now: Instant) {
        if self.lifecycle != Lifecycle::Idle {
            return;
        }
        self.lifecycle = Lifecycle::Mounted;
        self.listeners.push(host.observe_scroll());
        self.listeners.push(host.observe_resize());
        self.resample(host);
        self.resample_due = Some(now + self.config.layout_settle());
        debug!(
            "Mounted track '{}': {} panels, {} snap points",
            self.config.name,
            self.geometry.panels.len(),
            self.snaps.len()
        );
    }

    /// Apply the transforms for a native scroll position
    pub fn on_scroll<H: ScrollHost>(&mut self, native: f64, host: &mut H) -> f64 {
        if !self.is_mounted() {
            return self.progress;
        }
        self.progress = ProgressMapper::new(&self.geometry).progress_from_native(native);
        self.apply_transforms(host);
        self.progress
    }

    /// Resolve where a released gesture should settle
    ///
    /// `None` when snapping is off, the track is not mounted, or the gesture
    /// already rests where it would settle (including anywhere inside a
    /// free-scroll zone).
    pub fn on_gesture_end(&mut self, native: f64) -> Option<SnapTarget> {
        if !self.is_mounted() || self.config.snap == SnapMode::Off {
            return None;
        }
        let mapper = ProgressMapper::new(&self.geometry);
        let progress = mapper.progress_from_native(native);
        let target = self.snaps.resolve(progress);
        if target == progress {
            return None;
        }
        let duration = self.config.settle.duration_secs(target - progress);
        Some(SnapTarget {
            progress: target,
            native: mapper.native_for_progress(target),
            duration: Duration::from_secs_f64(duration),
        })
    }

    /// Note a viewport resize; re-sampling waits for the resize to go quiet
    pub fn on_resize(&mut self, now: Instant) {
        if !self.is_mounted() {
            return;
        }
        self.resample_due = Some(now + self.config.resize_debounce());
    }

    /// Queue a jump to the panel named by a URL fragment
    ///
    /// Applied by [`Choreographer::tick`] once layout has settled. Empty
    /// fragments are ignored.
    pub fn request_deep_link(&mut self, fragment: &str, now: Instant) {
        if !self.is_mounted() {
            return;
        }
        if let Some(panel) = fragment_target(fragment) {
            self.deep_link = Some(PendingDeepLink {
                panel: panel.to_string(),
                due: now + self.config.layout_settle(),
            });
        }
    }

    /// Run deferred work that has come due
    pub fn tick<H: ScrollHost>(&mut self, now: Instant, host: &mut H) {
        if !self.is_mounted() {
            return;
        }

        if self.resample_due.is_some_and(|due| now >= due) {
            self.resample_due = None;
            self.resample(host);
        }

        if self.deep_link.as_ref().is_some_and(|link| now >= link.due) {
            if let Some(link) = self.deep_link.take() {
                self.apply_deep_link(&link.panel, host);
            }
        }
    }

    /// Re-measure immediately, for content changes that affect layout
    pub fn refresh<H: ScrollHost>(&mut self, host: &mut H) {
        if self.is_mounted() {
            self.resample(host);
        }
    }

    /// Release listeners and pins; later events are ignored
    ///
    /// Safe to call more than once.
    pub fn teardown<H: ScrollHost>(&mut self, host: &mut H) {
        if self.lifecycle != Lifecycle::Mounted {
            self.lifecycle = Lifecycle::TornDown;
            return;
        }
        for id in self.listeners.drain(..) {
            host.remove_listener(id);
        }
        if let Some((handle, _)) = self.track_pin.take() {
            host.unpin(handle);
        }
        self.resample_due = None;
        self.deep_link = None;
        self.lifecycle = Lifecycle::TornDown;
        debug!("Tore down track '{}'", self.config.name);
    }

    fn resample<H: ScrollHost>(&mut self, host: &mut H) {
        let mut geometry = self.sampler.sample();
        geometry.mark_free_scroll(&self.config.free_scroll);

        self.snaps = SnapSet::compute(&geometry, self.config.snap);
        self.pins = self
            .config
            .pins
            .iter()
            .filter_map(|pin| {
                let coordinator = PinCoordinator::for_panel(&geometry, &pin.panel);
                if coordinator.is_none() {
                    debug!("Pin panel '{}' not present, skipping", pin.panel);
                }
                coordinator.map(|c| (pin.target.clone(), c))
            })
            .collect();

        let span = geometry.scroll_span();
        match self.track_pin {
            Some((_, current)) if current == span => {}
            previous => {
                if let Some((handle, _)) = previous {
                    host.unpin(handle);
                }
                self.track_pin = Some((host.pin(&self.config.container, span), span));
            }
        }

        self.geometry = geometry;
        self.apply_transforms(host);
    }

    fn apply_transforms<H: ScrollHost>(&self, host: &mut H) {
        let mapper = ProgressMapper::new(&self.geometry);
        host.set_translate_x(&self.config.row, mapper.translate_x(self.progress));
        for (target, pin) in &self.pins {
            host.set_translate_x(target, pin.offset_at(self.progress));
        }
    }

    fn apply_deep_link<H: ScrollHost>(&mut self, panel: &str, host: &mut H) {
        let mapper = ProgressMapper::new(&self.geometry);
        match mapper.native_for_panel(panel) {
            Some(native) => {
                debug!("Deep link to '{}' -> scroll {}", panel, native);
                host.scroll_to(native);
                self.progress = mapper.progress_from_native(native);
                self.apply_transforms(host);
            }
            None => debug!("Deep link target '{}' unavailable", panel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choreo::config::PinConfig;
    use crate::choreo::geometry::{PanelWidth, RowSampler, StaticSampler};

    #[derive(Debug, Clone, PartialEq)]
    enum HostEvent {
        ObserveScroll(ListenerId),
        ObserveResize(ListenerId),
        Remove(ListenerId),
        Pin(String, f64),
        Unpin(PinHandle),
        Translate(String, f64),
        ScrollTo(f64),
    }

    #[derive(Debug, Default)]
    struct RecordingHost {
        next_id: u64,
        events: Vec<HostEvent>,
    }

    impl RecordingHost {
        fn next(&mut self) -> u64 {
            self.next_id += 1;
            self.next_id
        }

        fn count(&self, pred: impl Fn(&HostEvent) -> bool) -> usize {
            self.events.iter().filter(|e| pred(e)).count()
        }

        fn last_translate(&self, element: &str) -> Option<f64> {
            self.events.iter().rev().find_map(|e| match e {
                HostEvent::Translate(el, x) if el == element => Some(*x),
                _ => None,
            })
        }
    }

    impl ScrollHost for RecordingHost {
        fn observe_scroll(&mut self) -> ListenerId {
            let id = ListenerId(self.next());
            self.events.push(HostEvent::ObserveScroll(id));
            id
        }

        fn observe_resize(&mut self) -> ListenerId {
            let id = ListenerId(self.next());
            self.events.push(HostEvent::ObserveResize(id));
            id
        }

        fn remove_listener(&mut self, id: ListenerId) {
            self.events.push(HostEvent::Remove(id));
        }

        fn pin(&mut self, element: &str, span: f64) -> PinHandle {
            self.events.push(HostEvent::Pin(element.to_string(), span));
            PinHandle(self.next())
        }

        fn unpin(&mut self, handle: PinHandle) {
            self.events.push(HostEvent::Unpin(handle));
        }

        fn set_translate_x(&mut self, element: &str, x: f64) {
            self.events.push(HostEvent::Translate(element.to_string(), x));
        }

        fn scroll_to(&mut self, native: f64) {
            self.events.push(HostEvent::ScrollTo(native));
        }
    }

    /// Counts how often geometry is measured
    struct CountingSampler<G> {
        inner: G,
        samples: usize,
    }

    impl<G: GeometrySampler> GeometrySampler for CountingSampler<G> {
        fn sample(&mut self) -> TrackGeometry {
            self.samples += 1;
            self.inner.sample()
        }
    }

    const V: f64 = 1000.0;

    fn home_row() -> RowSampler {
        RowSampler::new(V)
            .push("hero", PanelWidth::Viewports(1.0))
            .push("portfolio-section", PanelWidth::Viewports(3.0))
            .push("process-section", PanelWidth::Viewports(2.0))
            .push("contact", PanelWidth::Viewports(1.0))
            .push("footer-section", PanelWidth::Viewports(1.0))
    }

    fn mounted(
        config: TrackConfig,
    ) -> (Choreographer<CountingSampler<RowSampler>>, RecordingHost, Instant) {
        let sampler = CountingSampler {
            inner: home_row(),
            samples: 0,
        };
        let mut choreo = Choreographer::new(config, sampler);
        let mut host = RecordingHost::default();
        let now = Instant::now();
        choreo.mount(&mut host, now);
        (choreo, host, now)
    }

    #[test]
    fn test_mount_registers_and_pins() {
        let (choreo, host, _) = mounted(TrackConfig::home());
        assert!(choreo.is_mounted());
        assert_eq!(host.count(|e| matches!(e, HostEvent::ObserveScroll(_))), 1);
        assert_eq!(host.count(|e| matches!(e, HostEvent::ObserveResize(_))), 1);
        assert!(host
            .events
            .contains(&HostEvent::Pin("horizontal-container".to_string(), 8.0 * V)));
    }

    #[test]
    fn test_scroll_translates_row_and_pin() {
        let (mut choreo, mut host, _) = mounted(TrackConfig::home());
        // Content 8V, range 7V. Portfolio spans progress [1/7, 3/7].
        let native = 8.0 * V * (2.0 / 7.0);
        let progress = choreo.on_scroll(native, &mut host);
        assert!((progress - 2.0 / 7.0).abs() < 1e-9);

        let row = host.last_translate("horizontal-wrapper").unwrap_or_default();
        assert!((row + 2.0 * V).abs() < 1e-6);
        let pin = host.last_translate("portfolio-panel").unwrap_or_default();
        assert!((pin - V).abs() < 1e-6);
    }

    #[test]
    fn test_gesture_end_snaps() {
        let (mut choreo, _, _) = mounted(TrackConfig::home());
        // Just past the hero: nearest point is the portfolio start at 1/7.
        let native = 8.0 * V * 0.16;
        let target = choreo.on_gesture_end(native).expect("should snap");
        assert!((target.progress - 1.0 / 7.0).abs() < 1e-9);
        assert!((target.native - 8.0 * V / 7.0).abs() < 1e-6);
        assert!(target.duration >= Duration::from_millis(200));
        assert!(target.duration <= Duration::from_millis(600));
    }

    #[test]
    fn test_gesture_end_in_free_zone() {
        let (mut choreo, _, _) = mounted(TrackConfig::home());
        // Process section spans progress [4/7, 6/7).
        let native = 8.0 * V * (5.0 / 7.0);
        assert_eq!(choreo.on_gesture_end(native), None);
    }

    #[test]
    fn test_snap_off_never_snaps() {
        let (mut choreo, _, _) = mounted(TrackConfig::portfolio());
        assert_eq!(choreo.on_gesture_end(1234.0), None);
    }

    #[test]
    fn test_resize_is_coalesced() {
        let (mut choreo, mut host, start) = mounted(TrackConfig::about());
        // Let the post-mount settle pass run first.
        choreo.tick(start + Duration::from_millis(500), &mut host);
        assert_eq!(choreo.sampler_mut().samples, 2);

        let t0 = start + Duration::from_secs(1);
        choreo.sampler_mut().inner.set_viewport_width(800.0);
        choreo.on_resize(t0);
        choreo.on_resize(t0 + Duration::from_millis(50));
        choreo.on_resize(t0 + Duration::from_millis(100));

        choreo.tick(t0 + Duration::from_millis(200), &mut host);
        assert_eq!(choreo.sampler_mut().samples, 2);

        choreo.tick(t0 + Duration::from_millis(260), &mut host);
        assert_eq!(choreo.sampler_mut().samples, 3);
        assert_eq!(choreo.geometry().viewport_width, 800.0);

        // Span changed, so the container was re-pinned.
        assert_eq!(host.count(|e| matches!(e, HostEvent::Unpin(_))), 1);
        assert!(host
            .events
            .contains(&HostEvent::Pin("horizontal-container".to_string(), 8.0 * 800.0)));

        choreo.tick(t0 + Duration::from_secs(5), &mut host);
        assert_eq!(choreo.sampler_mut().samples, 3);
    }

    #[test]
    fn test_deep_link_waits_for_layout() {
        let (mut choreo, mut host, start) = mounted(TrackConfig::contact());
        choreo.request_deep_link("#contact", start);

        choreo.tick(start + Duration::from_millis(100), &mut host);
        assert_eq!(host.count(|e| matches!(e, HostEvent::ScrollTo(_))), 0);

        choreo.tick(start + Duration::from_millis(500), &mut host);
        // Contact at 6V of range 7V, native = 6/7 * 8V.
        let expected = 6.0 / 7.0 * 8.0 * V;
        let jumped = host.events.iter().find_map(|e| match e {
            HostEvent::ScrollTo(n) => Some(*n),
            _ => None,
        });
        assert!(jumped.is_some_and(|n| (n - expected).abs() < 1e-6));
        assert!((choreo.progress() - 6.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_deep_link_to_missing_panel_is_silent() {
        let (mut choreo, mut host, start) = mounted(TrackConfig::contact());
        choreo.request_deep_link("#nowhere", start);
        choreo.tick(start + Duration::from_secs(1), &mut host);
        assert_eq!(host.count(|e| matches!(e, HostEvent::ScrollTo(_))), 0);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let (mut choreo, mut host, start) = mounted(TrackConfig::home());
        choreo.teardown(&mut host);
        choreo.teardown(&mut host);
        assert_eq!(host.count(|e| matches!(e, HostEvent::Remove(_))), 2);
        assert_eq!(host.count(|e| matches!(e, HostEvent::Unpin(_))), 1);

        let before = host.events.len();
        choreo.on_scroll(500.0, &mut host);
        choreo.on_resize(start);
        choreo.tick(start + Duration::from_secs(10), &mut host);
        assert_eq!(host.events.len(), before);
        assert_eq!(choreo.on_gesture_end(500.0), None);

        // Mounting again after teardown is refused.
        choreo.mount(&mut host, start);
        assert!(!choreo.is_mounted());
    }

    #[test]
    fn test_missing_pin_panel_is_skipped() {
        let config = TrackConfig {
            pins: vec![PinConfig {
                target: "ghost".to_string(),
                panel: "not-rendered".to_string(),
            }],
            ..TrackConfig::about()
        };
        let (mut choreo, mut host, _) = mounted(config);
        choreo.on_scroll(1000.0, &mut host);
        assert_eq!(host.last_translate("ghost"), None);
    }

    #[test]
    fn test_gesture_end_at_rest_on_a_point() {
        let (mut choreo, _, _) = mounted(TrackConfig::home());
        // Released on the terminal point: nothing to animate.
        assert_eq!(choreo.on_gesture_end(8.0 * V), None);
        assert_eq!(choreo.on_gesture_end(0.0), None);
    }

    #[test]
    fn test_negative_settle_bound_does_not_panic() {
        let config: TrackConfig =
            toml::from_str("[settle]\nmin_secs = -0.5\nmax_secs = 0.6\n").expect("valid config");
        let sampler = RowSampler::new(V)
            .push("a", PanelWidth::Viewports(1.0))
            .push("b", PanelWidth::Viewports(1.0))
            .push("c", PanelWidth::Viewports(1.0));
        let mut choreo = Choreographer::new(config, sampler);
        let mut host = RecordingHost::default();
        choreo.mount(&mut host, Instant::now());

        // Progress 0.1 of span 3V, nearest point 0.
        let target = choreo.on_gesture_end(300.0).expect("should snap");
        assert_eq!(target.progress, 0.0);
        assert!(target.duration <= Duration::from_millis(600));
    }

    #[test]
    fn test_refresh_picks_up_content_changes() {
        let before = TrackGeometry::from_widths([("a", V), ("b", V), ("c", V)], V);
        let sampler = CountingSampler {
            inner: StaticSampler::new(before),
            samples: 0,
        };
        let mut choreo = Choreographer::new(TrackConfig::about(), sampler);
        let mut host = RecordingHost::default();
        choreo.mount(&mut host, Instant::now());
        assert_eq!(choreo.sampler_mut().samples, 1);

        // Halfway through a range of 2V.
        choreo.on_scroll(1.5 * V, &mut host);
        assert!((choreo.progress() - 0.5).abs() < 1e-9);

        // A late-loading section widens the row to 5V (range 4V).
        let after = TrackGeometry::from_widths([("a", V), ("b", 3.0 * V), ("c", V)], V);
        choreo.sampler_mut().inner.set(after);
        choreo.refresh(&mut host);

        assert_eq!(choreo.sampler_mut().samples, 2);
        assert_eq!(choreo.geometry().content_width, 5.0 * V);
        assert_eq!(host.count(|e| matches!(e, HostEvent::Unpin(_))), 1);
        assert!(host
            .events
            .contains(&HostEvent::Pin("horizontal-container".to_string(), 5.0 * V)));
        let row = host.last_translate("horizontal-wrapper").unwrap_or_default();
        assert!((row + 2.0 * V).abs() < 1e-6);
    }

    #[test]
    fn test_refresh_with_same_span_keeps_pin() {
        let geometry = TrackGeometry::from_widths([("a", V), ("b", V)], V);
        let sampler = CountingSampler {
            inner: StaticSampler::new(geometry),
            samples: 0,
        };
        let mut choreo = Choreographer::new(TrackConfig::about(), sampler);
        let mut host = RecordingHost::default();
        choreo.mount(&mut host, Instant::now());
        choreo.refresh(&mut host);

        assert_eq!(choreo.sampler_mut().samples, 2);
        assert_eq!(host.count(|e| matches!(e, HostEvent::Pin(..))), 1);
        assert_eq!(host.count(|e| matches!(e, HostEvent::Unpin(_))), 0);
    }
}

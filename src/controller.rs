//! The single owner of overlay state.
//!
//! Every host callback lands here, every geometry change goes through
//! [`FloatController::commit`], and nothing else mutates the surface. The
//! controller is driven from one event thread; it never blocks and keeps no
//! background work beyond the polled long-press deadline.

use std::mem;
use std::time::Instant;

use crate::bubble::{BubbleModeController, CapturedStyle};
use crate::config::OverlayConfig;
use crate::error::{OverlayError, OverlayResult};
use crate::focus::FocusController;
use crate::geometry::{Geometry, ScreenBounds};
use crate::gesture::{
    GestureClassifier, GestureContext, GestureSignal, Outcome, PointerEvent, PointerPhase,
};
use crate::store::GeometryStore;
use crate::surface::{DisplayMode, OverlaySurface};

pub struct FloatController<S: OverlaySurface, G: GeometryStore> {
    config: OverlayConfig,
    surface: S,
    store: G,
    geometry: Geometry,
    bounds: Option<ScreenBounds>,
    mode: DisplayMode,
    attached: bool,
    visible: bool,
    gestures: GestureClassifier,
    focus: FocusController,
    bubble: BubbleModeController,
    /// Surface style in effect before the current interaction restyled it.
    style_before_interaction: Option<DisplayMode>,
    signals: Vec<GestureSignal>,
    persistence_failures: usize,
}

impl<S: OverlaySurface, G: GeometryStore> FloatController<S, G> {
    /// Reads the persisted geometry once. A store that cannot be read falls
    /// back to the configured default geometry.
    pub fn new(config: OverlayConfig, surface: S, mut store: G) -> OverlayResult<Self> {
        config.validate()?;
        let mut persistence_failures = 0;
        let loaded = match store.load() {
            Ok(loaded) => loaded,
            Err(err) => {
                let err = OverlayError::from(err);
                tracing::warn!(error = %err, "falling back to default overlay geometry");
                persistence_failures += 1;
                None
            }
        };
        let geometry = loaded
            .unwrap_or(config.default_geometry)
            .clamp_size(config.min_dimension, None);
        Ok(Self {
            surface,
            store,
            geometry,
            bounds: None,
            mode: DisplayMode::Normal,
            attached: false,
            visible: true,
            gestures: GestureClassifier::new(config.long_press_timeout, config.touch_slop),
            focus: FocusController::new(config.opacity),
            bubble: BubbleModeController::new(config.bubble_diameter),
            style_before_interaction: None,
            signals: Vec::new(),
            persistence_failures,
            config,
        })
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn bounds(&self) -> Option<ScreenBounds> {
        self.bounds
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn has_focus(&self) -> bool {
        self.focus.has_focus()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_collapsed(&self) -> bool {
        self.bubble.is_collapsed()
    }

    pub fn captured_style(&self) -> Option<CapturedStyle> {
        self.bubble.captured()
    }

    pub fn long_press_pending(&self) -> bool {
        self.gestures.long_press_pending()
    }

    /// When the host should call [`Self::tick`] next.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.gestures.next_deadline()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn store(&self) -> &G {
        &self.store
    }

    pub fn persistence_failures(&self) -> usize {
        self.persistence_failures
    }

    /// Drains the signals recognized since the last call.
    pub fn take_signals(&mut self) -> Vec<GestureSignal> {
        mem::take(&mut self.signals)
    }

    /// Window geometry as it should be remembered: while collapsed the bubble
    /// position with the size the window will expand back to.
    pub fn persisted_geometry(&self) -> Geometry {
        match self.bubble.captured() {
            Some(captured) if self.bubble.is_collapsed() => self
                .geometry
                .with_size(captured.geometry().width, captured.geometry().height),
            _ => self.geometry,
        }
    }

    /// Attaches to the display. Without bounds the controller keeps the
    /// persisted geometry unclamped, applies no layout, and reports
    /// [`OverlayError::BoundsUnavailable`]; [`Self::on_bounds_changed`]
    /// finishes the job later.
    pub fn on_attach(&mut self, bounds: Option<ScreenBounds>) -> OverlayResult<()> {
        self.attached = true;
        self.visible = true;
        // Detach forgets the bubble without touching the surface.
        if self.mode != DisplayMode::Interacting {
            self.surface.apply_style(self.resting_mode());
        }
        self.focus.apply(self.mode, &mut self.surface);
        self.surface.set_controls_visible(!self.bubble.is_collapsed());
        if self.focus.has_focus() {
            self.surface.show_keyboard();
        }
        tracing::debug!(?bounds, geometry = ?self.geometry, "overlay attached");
        match bounds {
            Some(bounds) => {
                self.on_bounds_changed(bounds);
                Ok(())
            }
            None => {
                tracing::warn!("screen bounds unavailable, deferring layout");
                Err(OverlayError::BoundsUnavailable)
            }
        }
    }

    /// Discards every bit of transient state. Nothing is emitted afterwards
    /// and nothing in flight is persisted.
    pub fn on_detach(&mut self) {
        self.attached = false;
        self.abort_gesture();
        self.geometry = self.persisted_geometry();
        self.bubble.reset();
        self.focus.reset();
        self.mode = DisplayMode::Normal;
        self.signals.clear();
        tracing::debug!("overlay detached");
    }

    /// Host show/hide. Hiding cancels whatever gesture was in progress.
    pub fn set_visible(&mut self, visible: bool) {
        if !visible {
            self.abort_gesture();
        }
        self.visible = visible;
    }

    /// Display size changed (rotation, resize). Re-clamps immediately; the
    /// result is persisted right away unless an interaction is running, in
    /// which case its end commits it.
    pub fn on_bounds_changed(&mut self, bounds: ScreenBounds) {
        self.bounds = Some(bounds);
        if !self.attached {
            return;
        }
        let fitted = self.fit(self.geometry, bounds);
        let changed = fitted != self.geometry;
        self.geometry = fitted;
        self.surface.apply_layout(fitted);
        if changed && !self.gestures.is_interacting() {
            self.persist();
        }
    }

    pub fn on_pointer_event(&mut self, event: &PointerEvent) -> Outcome {
        if !self.attached || !self.visible {
            return Outcome::default();
        }
        if event.phase == PointerPhase::Cancel {
            let claimed = self.gestures.is_interacting();
            self.abort_gesture();
            return Outcome {
                claimed,
                signal: None,
            };
        }
        let ctx = self.gesture_context();
        let outcome = self.gestures.on_pointer_event(event, &ctx);
        if let Some(signal) = outcome.signal {
            self.dispatch(signal);
        }
        outcome
    }

    /// Lets the long-press deadline elapse.
    pub fn tick(&mut self, now: Instant) -> Option<GestureSignal> {
        if !self.attached || !self.visible {
            return None;
        }
        let ctx = self.gesture_context();
        let signal = self.gestures.tick(now, &ctx)?;
        self.dispatch(signal);
        Some(signal)
    }

    /// Minimize or restore. Rejected mid-interaction.
    pub fn request_toggle_bubble(&mut self) -> OverlayResult<DisplayMode> {
        if self.bubble.is_collapsed() {
            self.expand()?;
        } else {
            self.collapse()?;
        }
        Ok(self.mode)
    }

    pub fn collapse(&mut self) -> OverlayResult<()> {
        self.ensure_not_interacting("collapse")?;
        let bubble = self
            .bubble
            .collapse(self.geometry, self.bounds, &mut self.surface)?;
        self.gestures.abort();
        self.focus
            .request_focus(false, DisplayMode::Bubble, &mut self.surface);
        self.surface.hide_keyboard();
        self.set_mode(DisplayMode::Bubble);
        self.commit(bubble);
        Ok(())
    }

    pub fn expand(&mut self) -> OverlayResult<()> {
        self.ensure_not_interacting("expand")?;
        let restored = self.bubble.expand(
            self.geometry,
            self.bounds,
            self.config.min_dimension,
            &mut self.surface,
        )?;
        self.gestures.abort();
        self.set_mode(DisplayMode::Normal);
        self.commit(restored);
        Ok(())
    }

    /// A bubble cannot hold focus, so gaining focus expands it first. A bubble
    /// that is being dragged is dropped where it is before expanding.
    pub fn request_focus(&mut self, focus: bool) -> OverlayResult<()> {
        if focus && self.bubble.is_collapsed() {
            self.finish_interaction();
            self.expand()?;
        }
        self.focus.request_focus(focus, self.mode, &mut self.surface);
        Ok(())
    }

    fn ensure_not_interacting(&self, action: &'static str) -> OverlayResult<()> {
        if self.mode == DisplayMode::Interacting {
            return Err(OverlayError::InvalidStateTransition {
                from: DisplayMode::Interacting,
                action,
            });
        }
        Ok(())
    }

    fn gesture_context(&self) -> GestureContext {
        let controls = if self.bubble.is_collapsed() {
            None
        } else {
            self.surface.controls_region()
        };
        GestureContext {
            mode: self.mode,
            geometry: self.geometry,
            bounds: self.bounds,
            controls,
            min_dimension: self.config.min_dimension,
        }
    }

    fn resting_mode(&self) -> DisplayMode {
        if self.bubble.is_collapsed() {
            DisplayMode::Bubble
        } else {
            DisplayMode::Normal
        }
    }

    fn set_mode(&mut self, mode: DisplayMode) {
        if self.mode != mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "display mode changed");
        }
        self.mode = mode;
        self.focus.refresh_opacity(mode, &mut self.surface);
    }

    fn dispatch(&mut self, signal: GestureSignal) {
        self.signals.push(signal);
        match signal {
            GestureSignal::GeometryChanged(geometry) => {
                self.geometry = geometry;
                self.surface.apply_layout(geometry);
            }
            GestureSignal::LongPressBegin { .. } => {
                if !self.bubble.is_collapsed() {
                    self.style_before_interaction = Some(self.surface.style());
                    self.surface.apply_style(DisplayMode::Interacting);
                    tracing::info!("drag to move, pinch to resize");
                }
                self.set_mode(DisplayMode::Interacting);
            }
            GestureSignal::InteractionEnded => {
                self.end_interaction_style();
                self.set_mode(self.resting_mode());
                self.commit(self.geometry);
            }
            GestureSignal::InsideTap => match self.request_focus(true) {
                Ok(()) => self.surface.show_keyboard(),
                Err(err) => tracing::warn!(error = %err, "inside tap could not focus overlay"),
            },
            GestureSignal::OutsideTap => {
                self.focus
                    .request_focus(false, self.mode, &mut self.surface);
            }
        }
    }

    fn end_interaction_style(&mut self) {
        if let Some(style) = self.style_before_interaction.take() {
            self.surface.apply_style(style);
        }
    }

    /// Rolls an interrupted interaction back to where it started.
    fn abort_gesture(&mut self) {
        let Some(aborted) = self.gestures.abort() else {
            return;
        };
        tracing::debug!(?aborted, "gesture aborted");
        self.end_interaction_style();
        let start = aborted.start_geometry;
        // The screen may have shrunk since the interaction started.
        self.geometry = match self.bounds {
            Some(bounds) => self.fit(start, bounds),
            None => start,
        };
        if self.attached && self.bounds.is_some() {
            self.surface.apply_layout(self.geometry);
        }
        self.set_mode(aborted.resting);
        if self.geometry != start {
            self.persist();
        }
    }

    /// Ends a running interaction where it is, as if the pointer was lifted.
    fn finish_interaction(&mut self) {
        if self.gestures.abort().is_none() {
            return;
        }
        self.signals.push(GestureSignal::InteractionEnded);
        self.end_interaction_style();
        self.set_mode(self.resting_mode());
        self.commit(self.geometry);
    }

    fn fit(&self, geometry: Geometry, bounds: ScreenBounds) -> Geometry {
        if self.bubble.is_collapsed() {
            geometry.clamp_position(bounds)
        } else {
            geometry.clamped(self.config.min_dimension, Some(bounds))
        }
    }

    fn commit(&mut self, geometry: Geometry) {
        self.geometry = geometry;
        if self.attached && self.bounds.is_some() {
            self.surface.apply_layout(geometry);
        }
        self.persist();
    }

    fn persist(&mut self) {
        let geometry = self.persisted_geometry();
        if let Err(err) = self.store.save(geometry) {
            let err = OverlayError::from(err);
            tracing::warn!(error = %err, ?geometry, "keeping overlay geometry in memory only");
            self.persistence_failures += 1;
        }
    }
}

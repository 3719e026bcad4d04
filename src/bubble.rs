//! Minimize/restore between the window and the bubble.
//!
//! Collapsing snapshots the window's geometry and style once; expanding puts
//! the size and style back and drops the snapshot. Position is not restored:
//! the bubble may have been dragged while collapsed and the window opens
//! where the bubble is.

use crate::error::{OverlayError, OverlayResult};
use crate::geometry::{Geometry, ScreenBounds};
use crate::surface::{DisplayMode, OverlaySurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BubbleState {
    #[default]
    Expanded,
    Collapsed,
}

/// Pre-collapse presentation, valid from the first collapse until the next
/// expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedStyle {
    geometry: Geometry,
    style: DisplayMode,
}

impl CapturedStyle {
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn style(&self) -> DisplayMode {
        self.style
    }
}

/// Result of [`BubbleModeController::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleTransition {
    Collapsed(Geometry),
    Expanded(Geometry),
}

#[derive(Debug, Clone)]
pub struct BubbleModeController {
    state: BubbleState,
    captured: Option<CapturedStyle>,
    diameter: i32,
}

impl BubbleModeController {
    pub fn new(diameter: i32) -> Self {
        Self {
            state: BubbleState::Expanded,
            captured: None,
            diameter,
        }
    }

    pub fn state(&self) -> BubbleState {
        self.state
    }

    pub fn is_collapsed(&self) -> bool {
        self.state == BubbleState::Collapsed
    }

    pub fn captured(&self) -> Option<CapturedStyle> {
        self.captured
    }

    /// Applies the bubble presentation and returns the bubble geometry for
    /// the caller to commit. Focus and keyboard are the caller's to drop.
    pub fn collapse<S: OverlaySurface + ?Sized>(
        &mut self,
        geometry: Geometry,
        bounds: Option<ScreenBounds>,
        surface: &mut S,
    ) -> OverlayResult<Geometry> {
        if self.is_collapsed() {
            return Err(OverlayError::InvalidStateTransition {
                from: DisplayMode::Bubble,
                action: "collapse",
            });
        }
        if self.captured.is_none() {
            self.captured = Some(CapturedStyle {
                geometry,
                style: surface.style(),
            });
        }
        let sized = geometry.with_size(self.diameter, self.diameter);
        let bubble = match bounds {
            Some(bounds) => sized.clamp_position(bounds),
            None => sized,
        };
        surface.apply_style(DisplayMode::Bubble);
        surface.set_controls_visible(false);
        self.state = BubbleState::Collapsed;
        tracing::debug!(?bubble, "collapsed to bubble");
        Ok(bubble)
    }

    /// Restores the captured size at the bubble's current position.
    pub fn expand<S: OverlaySurface + ?Sized>(
        &mut self,
        geometry: Geometry,
        bounds: Option<ScreenBounds>,
        min_dimension: i32,
        surface: &mut S,
    ) -> OverlayResult<Geometry> {
        if !self.is_collapsed() {
            return Err(OverlayError::InvalidStateTransition {
                from: DisplayMode::Normal,
                action: "expand",
            });
        }
        let Some(captured) = self.captured.take() else {
            return Err(OverlayError::InvalidStateTransition {
                from: DisplayMode::Bubble,
                action: "expand without a captured style",
            });
        };
        let restored = geometry
            .with_size(captured.geometry.width, captured.geometry.height)
            .clamped(min_dimension, bounds);
        surface.apply_style(captured.style);
        surface.set_controls_visible(true);
        self.state = BubbleState::Expanded;
        tracing::debug!(?restored, "expanded from bubble");
        Ok(restored)
    }

    pub fn toggle<S: OverlaySurface + ?Sized>(
        &mut self,
        geometry: Geometry,
        bounds: Option<ScreenBounds>,
        min_dimension: i32,
        surface: &mut S,
    ) -> OverlayResult<BubbleTransition> {
        match self.state {
            BubbleState::Expanded => self
                .collapse(geometry, bounds, surface)
                .map(BubbleTransition::Collapsed),
            BubbleState::Collapsed => self
                .expand(geometry, bounds, min_dimension, surface)
                .map(BubbleTransition::Expanded),
        }
    }

    /// Forgets the snapshot and returns to the window state without touching
    /// the surface. Used when the overlay is detached.
    pub fn reset(&mut self) {
        self.state = BubbleState::Expanded;
        self.captured = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessSurface;

    fn screen() -> Option<ScreenBounds> {
        ScreenBounds::new(400, 400).ok()
    }

    #[test]
    fn collapse_clamps_bubble_on_screen() {
        let mut bubble = BubbleModeController::new(64);
        let mut surface = HeadlessSurface::new();
        let g = bubble
            .collapse(Geometry::new(380, 390, 300, 200), screen(), &mut surface)
            .expect("collapse");
        assert_eq!(g, Geometry::new(336, 336, 64, 64));
        assert_eq!(surface.style, DisplayMode::Bubble);
        assert!(!surface.controls_visible);
        assert_eq!(
            bubble.captured().map(|c| c.geometry()),
            Some(Geometry::new(380, 390, 300, 200))
        );
    }

    #[test]
    fn second_collapse_is_rejected_and_keeps_capture() {
        let mut bubble = BubbleModeController::new(64);
        let mut surface = HeadlessSurface::new();
        bubble
            .collapse(Geometry::new(10, 10, 300, 200), screen(), &mut surface)
            .expect("collapse");
        let before = bubble.captured();
        let err = bubble.collapse(Geometry::new(10, 10, 64, 64), screen(), &mut surface);
        assert!(matches!(
            err,
            Err(OverlayError::InvalidStateTransition { .. })
        ));
        assert_eq!(bubble.captured(), before);
        assert!(bubble.is_collapsed());
    }

    #[test]
    fn expand_from_expanded_is_rejected() {
        let mut bubble = BubbleModeController::new(64);
        let mut surface = HeadlessSurface::new();
        let err = bubble.expand(Geometry::new(0, 0, 100, 100), screen(), 50, &mut surface);
        assert!(matches!(
            err,
            Err(OverlayError::InvalidStateTransition { .. })
        ));
        assert_eq!(bubble.state(), BubbleState::Expanded);
    }

    #[test]
    fn toggle_round_trip_restores_size_and_style() {
        let mut bubble = BubbleModeController::new(64);
        let mut surface = HeadlessSurface::new();
        let original = Geometry::new(10, 10, 300, 200);
        let BubbleTransition::Collapsed(small) = bubble
            .toggle(original, screen(), 50, &mut surface)
            .expect("collapse")
        else {
            panic!("expected collapse");
        };
        let moved = small.with_origin(50, 60);
        let BubbleTransition::Expanded(restored) = bubble
            .toggle(moved, screen(), 50, &mut surface)
            .expect("expand")
        else {
            panic!("expected expand");
        };
        assert_eq!(restored, Geometry::new(50, 60, 300, 200));
        assert_eq!(surface.style, DisplayMode::Normal);
        assert!(surface.controls_visible);
        assert!(bubble.captured().is_none());
    }
}

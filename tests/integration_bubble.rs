use std::time::{Duration, Instant};

use term_float::{
    BubbleState, DisplayMode, FloatController, Geometry, GestureSignal, HeadlessSurface,
    MemoryStore, OverlayConfig, OverlayError, PointerEvent, ScreenBounds,
};

const TIMEOUT: Duration = Duration::from_millis(500);

type Controller = FloatController<HeadlessSurface, MemoryStore>;

fn attached(geometry: Geometry, width: i32, height: i32, diameter: i32) -> Controller {
    let config = OverlayConfig {
        bubble_diameter: diameter,
        ..OverlayConfig::default()
    };
    let mut c = FloatController::new(
        config,
        HeadlessSurface::new(),
        MemoryStore::with_geometry(geometry),
    )
    .unwrap();
    c.on_attach(ScreenBounds::new(width, height).ok()).unwrap();
    c
}

#[test]
fn collapse_and_expand_round_trip() {
    let original = Geometry::new(10, 10, 300, 200);
    let mut c = attached(original, 400, 400, 64);
    assert_eq!(c.request_toggle_bubble().unwrap(), DisplayMode::Bubble);
    assert_eq!(c.geometry(), Geometry::new(10, 10, 64, 64));
    assert_eq!(c.surface().style, DisplayMode::Bubble);
    assert!(!c.surface().controls_visible);
    assert_eq!(
        c.captured_style().map(|s| s.geometry()),
        Some(original)
    );

    assert_eq!(c.request_toggle_bubble().unwrap(), DisplayMode::Normal);
    assert_eq!(c.geometry(), original);
    assert_eq!(c.surface().style, DisplayMode::Normal);
    assert!(c.surface().controls_visible);
    assert!(c.captured_style().is_none());
    assert_eq!(c.store().geometry(), Some(original));
}

#[test]
fn collapse_near_edge_is_clamped_on_screen() {
    let mut c = attached(Geometry::new(380, 390, 20, 10), 400, 400, 64);
    // Attach already fits the small window on screen.
    assert_eq!(c.geometry(), Geometry::new(350, 350, 50, 50));
    c.collapse().unwrap();
    assert_eq!(c.geometry(), Geometry::new(336, 336, 64, 64));
    assert!(c.geometry().fits(ScreenBounds::new(400, 400).unwrap()));
}

#[test]
fn dragged_bubble_expands_where_it_was_left() {
    let t0 = Instant::now();
    let mut c = attached(Geometry::new(10, 10, 300, 200), 400, 400, 64);
    c.collapse().unwrap();

    c.on_pointer_event(&PointerEvent::down(0, 20, 20, t0));
    assert!(matches!(
        c.tick(t0 + TIMEOUT),
        Some(GestureSignal::LongPressBegin { .. })
    ));
    assert_eq!(c.mode(), DisplayMode::Interacting);
    // The bubble keeps its look while it is moved.
    assert_eq!(c.surface().style, DisplayMode::Bubble);
    c.on_pointer_event(&PointerEvent::moved(0, 500, 500, t0));
    assert_eq!(c.geometry(), Geometry::new(336, 336, 64, 64));
    c.on_pointer_event(&PointerEvent::up(0, 500, 500, t0));
    assert_eq!(c.mode(), DisplayMode::Bubble);
    assert!(c.is_collapsed());
    // While collapsed the store keeps the window size at the bubble position.
    assert_eq!(c.store().geometry(), Some(Geometry::new(336, 336, 300, 200)));

    c.expand().unwrap();
    assert_eq!(c.geometry(), Geometry::new(100, 200, 300, 200));
    assert_eq!(c.mode(), DisplayMode::Normal);
}

#[test]
fn second_collapse_is_rejected_and_keeps_capture() {
    let mut c = attached(Geometry::new(10, 10, 300, 200), 400, 400, 64);
    c.collapse().unwrap();
    let captured = c.captured_style();
    let geometry = c.geometry();

    let err = c.collapse();
    assert!(matches!(
        err,
        Err(OverlayError::InvalidStateTransition { .. })
    ));
    assert_eq!(c.captured_style(), captured);
    assert_eq!(c.geometry(), geometry);
    assert_eq!(c.mode(), DisplayMode::Bubble);
}

#[test]
fn expand_while_expanded_is_rejected() {
    let mut c = attached(Geometry::new(10, 10, 300, 200), 400, 400, 64);
    assert!(matches!(
        c.expand(),
        Err(OverlayError::InvalidStateTransition { .. })
    ));
    assert_eq!(c.mode(), DisplayMode::Normal);
    assert_eq!(c.geometry(), Geometry::new(10, 10, 300, 200));
}

#[test]
fn toggle_is_rejected_while_interacting() {
    let t0 = Instant::now();
    let mut c = attached(Geometry::new(10, 10, 300, 200), 400, 400, 64);
    c.on_pointer_event(&PointerEvent::down(0, 50, 50, t0));
    c.tick(t0 + TIMEOUT);
    assert_eq!(c.mode(), DisplayMode::Interacting);

    let err = c.request_toggle_bubble();
    assert!(matches!(
        err,
        Err(OverlayError::InvalidStateTransition {
            from: DisplayMode::Interacting,
            ..
        })
    ));
    assert_eq!(c.mode(), DisplayMode::Interacting);
    assert!(!c.is_collapsed());
    assert!(c.captured_style().is_none());

    c.on_pointer_event(&PointerEvent::up(0, 50, 50, t0));
    assert_eq!(c.request_toggle_bubble().unwrap(), DisplayMode::Bubble);
}

#[test]
fn bubble_cannot_be_pinched() {
    let t0 = Instant::now();
    let mut c = attached(Geometry::new(10, 10, 300, 200), 400, 400, 64);
    c.collapse().unwrap();
    c.on_pointer_event(&PointerEvent::down(0, 20, 20, t0));
    c.tick(t0 + TIMEOUT);
    c.on_pointer_event(&PointerEvent::down(1, 60, 60, t0));
    c.on_pointer_event(&PointerEvent::moved(1, 200, 200, t0));
    assert_eq!(c.geometry(), Geometry::new(10, 10, 64, 64));
}

#[test]
fn toggles_indefinitely() {
    let mut c = attached(Geometry::new(10, 10, 300, 200), 400, 400, 64);
    for _ in 0..5 {
        c.request_toggle_bubble().unwrap();
        c.request_toggle_bubble().unwrap();
    }
    assert_eq!(c.geometry(), Geometry::new(10, 10, 300, 200));
    assert!(!c.is_collapsed());
}

#[test]
fn bubble_state_follows_toggles() {
    let mut bubble = term_float::BubbleModeController::new(56);
    let mut surface = HeadlessSurface::new();
    assert_eq!(bubble.state(), BubbleState::Expanded);
    bubble
        .toggle(Geometry::new(0, 0, 100, 100), None, 50, &mut surface)
        .unwrap();
    assert_eq!(bubble.state(), BubbleState::Collapsed);
    bubble.reset();
    assert_eq!(bubble.state(), BubbleState::Expanded);
    assert!(bubble.captured().is_none());
}

#[test]
fn detach_while_collapsed_restores_window_presentation() {
    let original = Geometry::new(10, 10, 300, 200);
    let mut c = attached(original, 400, 400, 64);
    c.collapse().unwrap();
    c.on_detach();

    c.on_attach(ScreenBounds::new(400, 400).ok()).unwrap();
    assert_eq!(c.mode(), DisplayMode::Normal);
    assert_eq!(c.surface().style, DisplayMode::Normal);
    assert!(c.surface().controls_visible);
    assert_eq!(c.geometry(), original);

    c.collapse().unwrap();
    assert_eq!(
        c.captured_style().map(|s| s.style()),
        Some(DisplayMode::Normal)
    );
    c.expand().unwrap();
    assert_eq!(c.surface().style, DisplayMode::Normal);
    assert_eq!(c.geometry(), original);
}

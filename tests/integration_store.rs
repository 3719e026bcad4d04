use std::fs;
use std::time::{Duration, Instant};

use term_float::store::STATE_FILE_NAME;
use term_float::{
    DisplayMode, FloatController, Geometry, HeadlessSurface, JsonFileStore, Outcome,
    OverlayConfig, PointerEvent, ScreenBounds,
};

const TIMEOUT: Duration = Duration::from_millis(500);

fn controller(store: JsonFileStore) -> FloatController<HeadlessSurface, JsonFileStore> {
    let mut c = FloatController::new(OverlayConfig::default(), HeadlessSurface::new(), store)
        .unwrap();
    c.on_attach(ScreenBounds::new(800, 600).ok()).unwrap();
    c
}

#[test]
fn geometry_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(STATE_FILE_NAME);
    let t0 = Instant::now();

    let mut c = controller(JsonFileStore::new(&path));
    assert_eq!(c.geometry(), Geometry::new(0, 0, 600, 400));
    // Nothing changed yet, so nothing was written.
    assert!(!path.exists());

    c.on_pointer_event(&PointerEvent::down(0, 50, 50, t0));
    c.tick(t0 + TIMEOUT);
    c.on_pointer_event(&PointerEvent::moved(0, 150, 120, t0));
    c.on_pointer_event(&PointerEvent::up(0, 150, 120, t0));
    assert_eq!(c.geometry(), Geometry::new(100, 70, 600, 400));
    c.on_detach();

    let reopened = controller(JsonFileStore::new(&path));
    assert_eq!(reopened.geometry(), Geometry::new(100, 70, 600, 400));
}

#[test]
fn detach_mid_gesture_emits_nothing_and_persists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(STATE_FILE_NAME);
    let t0 = Instant::now();

    let mut c = controller(JsonFileStore::new(&path));
    c.on_pointer_event(&PointerEvent::down(0, 50, 50, t0));
    c.tick(t0 + TIMEOUT);
    c.on_pointer_event(&PointerEvent::moved(0, 150, 120, t0));
    assert_eq!(c.mode(), DisplayMode::Interacting);

    c.on_detach();
    assert!(c.take_signals().is_empty());
    assert_eq!(c.mode(), DisplayMode::Normal);
    assert_eq!(c.geometry(), Geometry::new(0, 0, 600, 400));
    assert_eq!(
        c.on_pointer_event(&PointerEvent::up(0, 150, 120, t0)),
        Outcome::default()
    );
    assert_eq!(c.tick(t0 + TIMEOUT * 2), None);
    assert!(c.take_signals().is_empty());
    assert!(!path.exists());
}

#[test]
fn detach_cancels_pending_long_press() {
    let dir = tempfile::tempdir().unwrap();
    let t0 = Instant::now();
    let mut c = controller(JsonFileStore::new(dir.path().join(STATE_FILE_NAME)));
    c.on_pointer_event(&PointerEvent::down(0, 50, 50, t0));
    assert!(c.long_press_pending());
    c.on_detach();
    assert!(!c.long_press_pending());

    c.on_attach(ScreenBounds::new(800, 600).ok()).unwrap();
    assert_eq!(c.tick(t0 + TIMEOUT), None);
    assert_eq!(c.mode(), DisplayMode::Normal);
}

#[test]
fn corrupt_file_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(STATE_FILE_NAME);
    fs::write(&path, "not json at all").unwrap();

    let c = controller(JsonFileStore::new(&path));
    assert_eq!(c.persistence_failures(), 1);
    assert_eq!(c.geometry(), OverlayConfig::default().default_geometry);
}

#[test]
fn collapsed_overlay_is_stored_with_window_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(STATE_FILE_NAME);

    let mut c = controller(JsonFileStore::new(&path));
    c.collapse().unwrap();
    c.on_detach();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["window_width"], 600);
    assert_eq!(raw["window_height"], 400);

    // A fresh attach starts expanded at the remembered size.
    let reopened = controller(JsonFileStore::new(&path));
    assert_eq!(reopened.mode(), DisplayMode::Normal);
    assert_eq!(reopened.geometry(), Geometry::new(0, 0, 600, 400));
}

#[test]
fn attach_without_bounds_uses_persisted_geometry_unclamped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(STATE_FILE_NAME);
    fs::write(
        &path,
        r#"{"window_x": 900, "window_y": 10, "window_width": 300, "window_height": 200}"#,
    )
    .unwrap();

    let mut c = FloatController::new(
        OverlayConfig::default(),
        HeadlessSurface::new(),
        JsonFileStore::new(&path),
    )
    .unwrap();
    assert!(c.on_attach(None).is_err());
    assert_eq!(c.geometry(), Geometry::new(900, 10, 300, 200));
    assert_eq!(c.surface().layout, None);

    // No bounds means no long-press either.
    let t0 = Instant::now();
    c.on_pointer_event(&PointerEvent::down(0, 950, 50, t0));
    assert!(!c.long_press_pending());
    c.on_pointer_event(&PointerEvent::up(0, 950, 50, t0));

    c.on_bounds_changed(ScreenBounds::new(800, 600).unwrap());
    assert_eq!(c.geometry(), Geometry::new(500, 10, 300, 200));
    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["window_x"], 500);
}

//! Interaction controller for a floating overlay window: long-press to move,
//! pinch to resize, collapse to a bubble, tap to take or give up focus.
//!
//! [`FloatController`] owns the state machine. Hosts feed it pointer events,
//! ticks and lifecycle calls, and implement [`OverlaySurface`] for whatever
//! actually draws the window. The terminal host in `main.rs` and the
//! `float-replay` tool are the two hosts in this repository.

pub mod bubble;
pub mod config;
pub mod constants;
pub mod controller;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod focus;
pub mod geometry;
pub mod gesture;
pub mod log_buffer;
pub mod state;
pub mod store;
pub mod surface;
pub mod tracing_sub;
pub mod ui;

pub use bubble::{BubbleModeController, BubbleState, BubbleTransition, CapturedStyle};
pub use config::OverlayConfig;
pub use controller::FloatController;
pub use error::{OverlayError, OverlayResult, StoreError};
pub use focus::{FocusController, OpacityPolicy};
pub use geometry::{Geometry, Point, ScreenBounds};
pub use gesture::{
    GestureClassifier, GestureSignal, Outcome, PointerEvent, PointerId, PointerPhase,
};
pub use store::{GeometryStore, JsonFileStore, MemoryStore};
pub use surface::{DisplayMode, HeadlessSurface, OverlaySurface};

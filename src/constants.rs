//! Shared crate-wide constants.
//!
//! These are the defaults behind [`crate::config::OverlayConfig`]. Units are
//! surface pixels for the platform host; the terminal host maps one cell to
//! one pixel and overrides the sizes through its command line.

use std::time::Duration;

/// Smallest width or height a pinch can shrink the overlay to. Keeps the
/// surface from collapsing into something the user can no longer grab.
pub const DEFAULT_MIN_DIMENSION: i32 = 50;

/// Edge length of the minimized bubble.
pub const DEFAULT_BUBBLE_DIAMETER: i32 = 56;

/// How long a pointer must stay down inside the surface before a move/resize
/// interaction starts.
pub const DEFAULT_LONG_PRESS_TIMEOUT: Duration = Duration::from_millis(500);

/// Distance a pointer may wander from its down position before a pending
/// long-press is abandoned.
///
/// Large enough to ignore finger jitter, small enough that a deliberate
/// scroll inside the terminal never turns into a move.
pub const DEFAULT_TOUCH_SLOP: i32 = 8;

/// Overlay opacity while it holds input focus.
pub const ALPHA_FOCUS: f32 = 0.9;

/// Overlay opacity while input passes through to the apps underneath.
pub const ALPHA_NOT_FOCUS: f32 = 0.7;

/// Overlay opacity during a move/resize interaction, regardless of focus.
pub const ALPHA_MOVING: f32 = 0.5;

/// Size used when nothing has been persisted yet.
pub const DEFAULT_WINDOW_WIDTH: i32 = 600;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 400;

/// Only the first two pointers of a sequence take part in gestures.
pub const MAX_TRACKED_POINTERS: usize = 2;

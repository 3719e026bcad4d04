//! Pointer gesture recognition for the overlay.
//!
//! The classifier turns raw pointer events into at most one active
//! interaction at a time:
//!
//! - a press that ends before the long-press timeout is a tap, classified
//!   as inside or outside the surface by its release point;
//! - a press that is held still inside the surface starts a move/resize
//!   interaction (`LongPressBegin`);
//! - while interacting, one pointer drags the surface and two pointers pinch
//!   it. A pinch suppresses the drag until one of its pointers lifts.
//!
//! It never mutates geometry itself. Each recognized step is returned as a
//! [`GestureSignal`] and the owning controller decides what to commit.

pub mod long_press;
pub mod pointer;

use std::time::{Duration, Instant};

pub use long_press::LongPressTimer;
pub use pointer::{PointerEvent, PointerId, PointerPhase, PointerTracker, TrackedPointer};

use crate::geometry::{Geometry, Point, ScreenBounds};
use crate::surface::DisplayMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureSignal {
    /// Per-frame geometry during an interaction. Not a committed change.
    GeometryChanged(Geometry),
    LongPressBegin { origin: Point },
    /// The last pointer of an interaction lifted; the geometry is committed.
    InteractionEnded,
    InsideTap,
    OutsideTap,
}

/// Snapshot of controller state the classifier reads for one event.
#[derive(Debug, Clone, Copy)]
pub struct GestureContext {
    pub mode: DisplayMode,
    pub geometry: Geometry,
    pub bounds: Option<ScreenBounds>,
    /// Visible controls strip; `None` while hidden.
    pub controls: Option<Geometry>,
    pub min_dimension: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    /// The event belongs to a move/resize interaction and must not reach the
    /// terminal content.
    pub claimed: bool,
    pub signal: Option<GestureSignal>,
}

impl Outcome {
    fn pass() -> Self {
        Self::default()
    }

    fn claimed(signal: Option<GestureSignal>) -> Self {
        Self {
            claimed: true,
            signal,
        }
    }

    fn unclaimed(signal: Option<GestureSignal>) -> Self {
        Self {
            claimed: false,
            signal,
        }
    }
}

/// What an aborted interaction leaves behind so the owner can roll back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbortedInteraction {
    pub start_geometry: Geometry,
    pub resting: DisplayMode,
}

/// One pointer sequence, first down to last up.
#[derive(Debug, Clone, Copy)]
struct Press {
    sequence: u64,
    origin: Point,
    /// Started on the controls strip: the sequence is left alone entirely.
    passthrough: bool,
}

#[derive(Debug, Clone, Copy)]
struct DragAnchor {
    pointer: PointerId,
    touch: Point,
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, Copy)]
struct Interaction {
    /// Mode to return to on release.
    resting: DisplayMode,
    start_geometry: Geometry,
    drag: Option<DragAnchor>,
    /// Span of the two pinch pointers at the previous frame.
    pinch: Option<(i32, i32)>,
}

impl Interaction {
    fn allows_pinch(&self) -> bool {
        self.resting != DisplayMode::Bubble
    }
}

#[derive(Debug, Clone)]
pub struct GestureClassifier {
    long_press_timeout: Duration,
    touch_slop: i32,
    pointers: PointerTracker,
    timer: LongPressTimer,
    press: Option<Press>,
    interaction: Option<Interaction>,
    next_sequence: u64,
}

impl GestureClassifier {
    pub fn new(long_press_timeout: Duration, touch_slop: i32) -> Self {
        Self {
            long_press_timeout,
            touch_slop,
            pointers: PointerTracker::new(),
            timer: LongPressTimer::new(),
            press: None,
            interaction: None,
            next_sequence: 0,
        }
    }

    pub fn is_interacting(&self) -> bool {
        self.interaction.is_some()
    }

    pub fn is_pinching(&self) -> bool {
        self.interaction.is_some_and(|i| i.pinch.is_some())
    }

    pub fn long_press_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// When the host should call [`Self::tick`] next, if anything is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub fn on_pointer_event(&mut self, event: &PointerEvent, ctx: &GestureContext) -> Outcome {
        match event.phase {
            PointerPhase::Down => self.on_pointer_down(event, ctx),
            PointerPhase::Move => self.on_pointer_move(event, ctx),
            PointerPhase::Up => self.on_pointer_up(event, ctx),
            // The owner rolls back through `abort`; nothing to classify here.
            PointerPhase::Cancel => Outcome::pass(),
        }
    }

    /// Lets the long-press timer elapse. Returns `LongPressBegin` when it
    /// fires for the current sequence.
    pub fn tick(&mut self, now: Instant, ctx: &GestureContext) -> Option<GestureSignal> {
        let sequence = self.timer.poll(now)?;
        let press = self.press.filter(|p| p.sequence == sequence)?;
        if self.interaction.is_some()
            || press.passthrough
            || ctx.bounds.is_none()
            || !matches!(ctx.mode, DisplayMode::Normal | DisplayMode::Bubble)
        {
            return None;
        }
        let primary = self.pointers.primary()?;
        self.interaction = Some(Interaction {
            resting: ctx.mode,
            start_geometry: ctx.geometry,
            drag: Some(DragAnchor {
                pointer: primary.id,
                touch: primary.position,
                x: ctx.geometry.x,
                y: ctx.geometry.y,
            }),
            pinch: None,
        });
        tracing::debug!(sequence, origin = ?primary.position, "long press began");
        Some(GestureSignal::LongPressBegin {
            origin: primary.position,
        })
    }

    /// Drops every in-flight gesture without emitting anything. Returns the
    /// interaction that was running, if any, so its changes can be undone.
    pub fn abort(&mut self) -> Option<AbortedInteraction> {
        self.timer.cancel();
        self.pointers.clear();
        self.press = None;
        self.interaction.take().map(|i| AbortedInteraction {
            start_geometry: i.start_geometry,
            resting: i.resting,
        })
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &GestureContext) -> Outcome {
        if let Some(interaction) = self.interaction.as_mut() {
            if self.pointers.add(event.pointer, event.position)
                && interaction.allows_pinch()
                && let Some(span) = self.pointers.span()
            {
                interaction.pinch = Some(span);
                interaction.drag = None;
            }
            return Outcome::claimed(None);
        }

        if let Some(press) = self.press {
            if !press.passthrough {
                self.pointers.add(event.pointer, event.position);
                // A second finger means this is not a long press.
                self.timer.cancel();
            }
            return Outcome::pass();
        }

        self.next_sequence = self.next_sequence.wrapping_add(1);
        let sequence = self.next_sequence;
        self.pointers.clear();
        self.pointers.add(event.pointer, event.position);

        let passthrough = ctx.controls.is_some_and(|c| c.contains(event.position));
        self.press = Some(Press {
            sequence,
            origin: event.position,
            passthrough,
        });
        if passthrough {
            return Outcome::pass();
        }

        let inside = ctx.geometry.touches(event.position);
        if inside
            && ctx.bounds.is_some()
            && matches!(ctx.mode, DisplayMode::Normal | DisplayMode::Bubble)
        {
            self.timer.schedule(sequence, event.time, self.long_press_timeout);
        }
        Outcome::pass()
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, ctx: &GestureContext) -> Outcome {
        if !self.pointers.update(event.pointer, event.position) {
            return Outcome {
                claimed: self.interaction.is_some(),
                signal: None,
            };
        }

        let Some(interaction) = self.interaction.as_mut() else {
            if let Some(press) = self.press
                && self.timer.is_pending()
                && press.origin.max_axis_distance(event.position) > self.touch_slop
            {
                self.timer.cancel();
            }
            return Outcome::pass();
        };

        if let Some(previous) = interaction.pinch {
            let Some(span) = self.pointers.span() else {
                return Outcome::claimed(None);
            };
            interaction.pinch = Some(span);
            let width = ctx.geometry.width + (span.0 - previous.0);
            let height = ctx.geometry.height + (span.1 - previous.1);
            let next = ctx
                .geometry
                .with_size(width, height)
                .clamped(ctx.min_dimension, ctx.bounds);
            return Outcome::claimed(
                (next != ctx.geometry).then_some(GestureSignal::GeometryChanged(next)),
            );
        }

        let Some(anchor) = interaction.drag.filter(|a| a.pointer == event.pointer) else {
            return Outcome::claimed(None);
        };
        let x = anchor.x + (event.position.x - anchor.touch.x);
        let y = anchor.y + (event.position.y - anchor.touch.y);
        let moved = ctx.geometry.with_origin(x, y);
        let next = match ctx.bounds {
            Some(bounds) => moved.clamp_position(bounds),
            None => moved,
        };
        let signal = (next != ctx.geometry).then_some(GestureSignal::GeometryChanged(next));
        Outcome::claimed(signal)
    }

    fn on_pointer_up(&mut self, event: &PointerEvent, ctx: &GestureContext) -> Outcome {
        if !self.pointers.contains(event.pointer) {
            return Outcome {
                claimed: self.interaction.is_some(),
                signal: None,
            };
        }
        self.pointers.update(event.pointer, event.position);
        self.pointers.remove(event.pointer);

        if let Some(interaction) = self.interaction.as_mut() {
            let Some(remaining) = self.pointers.primary() else {
                self.interaction = None;
                self.press = None;
                return Outcome::claimed(Some(GestureSignal::InteractionEnded));
            };
            let anchor_lifted = interaction
                .drag
                .is_none_or(|anchor| anchor.pointer == event.pointer);
            if interaction.pinch.take().is_some() || anchor_lifted {
                // Re-anchor on the finger that is left so the surface does
                // not jump to where the first finger went down.
                interaction.drag = Some(DragAnchor {
                    pointer: remaining.id,
                    touch: remaining.position,
                    x: ctx.geometry.x,
                    y: ctx.geometry.y,
                });
            }
            return Outcome::claimed(None);
        }

        let Some(press) = self.press else {
            return Outcome::pass();
        };
        if !self.pointers.is_empty() {
            return Outcome::pass();
        }
        self.press = None;
        self.timer.cancel();
        if press.passthrough || ctx.controls.is_some_and(|c| c.contains(event.position)) {
            return Outcome::pass();
        }
        let signal = if ctx.geometry.touches(event.position) {
            GestureSignal::InsideTap
        } else {
            GestureSignal::OutsideTap
        };
        Outcome::unclaimed(Some(signal))
    }
}

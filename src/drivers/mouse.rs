//! Mouse to pointer translation for the terminal host.
//!
//! A terminal has one pointer. The left button becomes pointer 0; while an
//! interaction allows it, the scroll wheel stands in for a second finger:
//! the first notch puts pointer 1 down next to pointer 0 and each further
//! notch moves it away (wheel up) or back (wheel down), which the gesture
//! classifier reads as a pinch.

use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::geometry::Point;
use crate::gesture::PointerEvent;

const PRIMARY: u32 = 0;
const SYNTHETIC: u32 = 1;

/// Where the synthetic pointer lands relative to pointer 0.
const PINCH_START: (i32, i32) = (4, 2);
/// Span change per wheel notch. Cells are about twice as tall as wide.
const PINCH_STEP: (i32, i32) = (2, 1);

#[derive(Debug, Default, Clone)]
pub struct MouseTranslator {
    primary: Option<Point>,
    synthetic: Option<Point>,
}

impl MouseTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self) -> bool {
        self.primary.is_some()
    }

    pub fn is_pinching(&self) -> bool {
        self.synthetic.is_some()
    }

    /// `pinch_enabled` is whether a resizable interaction is running.
    pub fn translate(
        &mut self,
        mouse: &MouseEvent,
        pinch_enabled: bool,
        time: Instant,
    ) -> Vec<PointerEvent> {
        let at = Point::new(i32::from(mouse.column), i32::from(mouse.row));
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.primary.replace(at).is_some() {
                    // Missed the release; keep the press going.
                    return vec![PointerEvent::moved(PRIMARY, at.x, at.y, time)];
                }
                vec![PointerEvent::down(PRIMARY, at.x, at.y, time)]
            }
            MouseEventKind::Drag(MouseButton::Left) if self.primary.is_some() => {
                self.primary = Some(at);
                vec![PointerEvent::moved(PRIMARY, at.x, at.y, time)]
            }
            MouseEventKind::Up(MouseButton::Left) if self.primary.is_some() => {
                self.primary = None;
                let mut events = Vec::with_capacity(2);
                if let Some(s) = self.synthetic.take() {
                    events.push(PointerEvent::up(SYNTHETIC, s.x, s.y, time));
                }
                events.push(PointerEvent::up(PRIMARY, at.x, at.y, time));
                events
            }
            MouseEventKind::ScrollUp if pinch_enabled => self.pinch(1, time),
            MouseEventKind::ScrollDown if pinch_enabled => self.pinch(-1, time),
            _ => Vec::new(),
        }
    }

    /// The terminal lost focus: whatever is held will never be released.
    pub fn cancel(&mut self, time: Instant) -> Vec<PointerEvent> {
        self.synthetic = None;
        match self.primary.take() {
            Some(_) => vec![PointerEvent::cancel(PRIMARY, time)],
            None => Vec::new(),
        }
    }

    fn pinch(&mut self, direction: i32, time: Instant) -> Vec<PointerEvent> {
        let Some(primary) = self.primary else {
            return Vec::new();
        };
        let mut events = Vec::with_capacity(2);
        let current = match self.synthetic {
            Some(s) => s,
            None => {
                let s = Point::new(primary.x + PINCH_START.0, primary.y + PINCH_START.1);
                events.push(PointerEvent::down(SYNTHETIC, s.x, s.y, time));
                s
            }
        };
        // Never cross pointer 0, or the span would grow again.
        let next = Point::new(
            (current.x + direction * PINCH_STEP.0).max(primary.x + 1),
            (current.y + direction * PINCH_STEP.1).max(primary.y + 1),
        );
        self.synthetic = Some(next);
        if next != current {
            events.push(PointerEvent::moved(SYNTHETIC, next.x, next.y, time));
        }
        events
    }
}

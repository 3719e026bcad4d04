use std::time::Instant;

use crate::constants::MAX_TRACKED_POINTERS;
use crate::geometry::Point;

/// Per-pointer identifier as delivered by the host (finger index, button).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The platform took the pointer stream away mid-sequence.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub pointer: PointerId,
    pub phase: PointerPhase,
    pub position: Point,
    pub time: Instant,
}

impl PointerEvent {
    pub fn new(pointer: PointerId, phase: PointerPhase, position: Point, time: Instant) -> Self {
        Self {
            pointer,
            phase,
            position,
            time,
        }
    }

    pub fn down(pointer: u32, x: i32, y: i32, time: Instant) -> Self {
        Self::new(PointerId(pointer), PointerPhase::Down, Point::new(x, y), time)
    }

    pub fn moved(pointer: u32, x: i32, y: i32, time: Instant) -> Self {
        Self::new(PointerId(pointer), PointerPhase::Move, Point::new(x, y), time)
    }

    pub fn up(pointer: u32, x: i32, y: i32, time: Instant) -> Self {
        Self::new(PointerId(pointer), PointerPhase::Up, Point::new(x, y), time)
    }

    pub fn cancel(pointer: u32, time: Instant) -> Self {
        Self::new(PointerId(pointer), PointerPhase::Cancel, Point::default(), time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedPointer {
    pub id: PointerId,
    pub position: Point,
}

/// The first two pointers of a sequence, in down order. Anything beyond that
/// is not tracked at all.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    pointers: Vec<TrackedPointer>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self {
            pointers: Vec::with_capacity(MAX_TRACKED_POINTERS),
        }
    }

    /// Returns false when the pointer is already tracked or both slots are
    /// taken.
    pub fn add(&mut self, id: PointerId, position: Point) -> bool {
        if self.pointers.len() >= MAX_TRACKED_POINTERS || self.contains(id) {
            return false;
        }
        self.pointers.push(TrackedPointer { id, position });
        true
    }

    pub fn update(&mut self, id: PointerId, position: Point) -> bool {
        match self.pointers.iter_mut().find(|p| p.id == id) {
            Some(pointer) => {
                pointer.position = position;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: PointerId) -> bool {
        let before = self.pointers.len();
        self.pointers.retain(|p| p.id != id);
        self.pointers.len() != before
    }

    pub fn contains(&self, id: PointerId) -> bool {
        self.pointers.iter().any(|p| p.id == id)
    }

    pub fn get(&self, id: PointerId) -> Option<TrackedPointer> {
        self.pointers.iter().find(|p| p.id == id).copied()
    }

    pub fn primary(&self) -> Option<TrackedPointer> {
        self.pointers.first().copied()
    }

    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// Horizontal and vertical distance between the two tracked pointers.
    pub fn span(&self) -> Option<(i32, i32)> {
        match self.pointers.as_slice() {
            [a, b] => Some((
                (a.position.x - b.position.x).abs(),
                (a.position.y - b.position.y).abs(),
            )),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.pointers.clear();
    }
}

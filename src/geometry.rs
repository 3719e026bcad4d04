use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, OverlayResult};

/// Absolute screen position of a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance; cheap and good enough for slop checks.
    pub fn max_axis_distance(self, other: Point) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// Signed overlay origin with its size, in screen pixels.
///
/// This is the unit that gets persisted: four integers, one per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Geometry {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        if self.width <= 0 || self.height <= 0 {
            return false;
        }
        point.x >= self.x
            && point.x < self.x.saturating_add(self.width)
            && point.y >= self.y
            && point.y < self.y.saturating_add(self.height)
    }

    /// Like [`Self::contains`] but the right and bottom edges count as
    /// inside, which is how touches on the surface are classified.
    pub fn touches(&self, point: Point) -> bool {
        if self.width <= 0 || self.height <= 0 {
            return false;
        }
        point.x >= self.x
            && point.x <= self.x.saturating_add(self.width)
            && point.y >= self.y
            && point.y <= self.y.saturating_add(self.height)
    }

    pub fn with_size(self, width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    pub fn with_origin(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }

    /// Keeps the whole surface on screen by moving it, never by resizing it.
    pub fn clamp_position(self, bounds: ScreenBounds) -> Self {
        let max_x = (bounds.width - self.width).max(0);
        let max_y = (bounds.height - self.height).max(0);
        Self {
            x: self.x.clamp(0, max_x),
            y: self.y.clamp(0, max_y),
            ..self
        }
    }

    /// Applies the minimum dimension and, when bounds are known, caps the size
    /// at the screen. The screen wins when it is smaller than the minimum.
    pub fn clamp_size(self, min_dimension: i32, bounds: Option<ScreenBounds>) -> Self {
        let mut width = self.width.max(min_dimension);
        let mut height = self.height.max(min_dimension);
        if let Some(bounds) = bounds {
            width = width.min(bounds.width);
            height = height.min(bounds.height);
        }
        Self {
            width,
            height,
            ..self
        }
    }

    /// Size first, then position, so the origin clamp sees the final size.
    pub fn clamped(self, min_dimension: i32, bounds: Option<ScreenBounds>) -> Self {
        let sized = self.clamp_size(min_dimension, bounds);
        match bounds {
            Some(bounds) => sized.clamp_position(bounds),
            None => sized,
        }
    }

    pub fn fits(&self, bounds: ScreenBounds) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x <= bounds.width - self.width
            && self.y <= bounds.height - self.height
    }
}

/// Usable display size, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenBounds {
    pub width: i32,
    pub height: i32,
}

impl ScreenBounds {
    pub fn new(width: i32, height: i32) -> OverlayResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(OverlayError::BoundsUnavailable);
        }
        Ok(Self { width, height })
    }
}

use std::time::Duration;

use crate::constants::{
    ALPHA_FOCUS, ALPHA_MOVING, ALPHA_NOT_FOCUS, DEFAULT_BUBBLE_DIAMETER, DEFAULT_LONG_PRESS_TIMEOUT,
    DEFAULT_MIN_DIMENSION, DEFAULT_TOUCH_SLOP, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH,
};
use crate::error::{OverlayError, OverlayResult};
use crate::focus::OpacityPolicy;
use crate::geometry::Geometry;

/// Tunables for one overlay controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayConfig {
    pub min_dimension: i32,
    pub bubble_diameter: i32,
    pub long_press_timeout: Duration,
    pub touch_slop: i32,
    pub opacity: OpacityPolicy,
    /// Used when the store has nothing persisted yet.
    pub default_geometry: Geometry,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            min_dimension: DEFAULT_MIN_DIMENSION,
            bubble_diameter: DEFAULT_BUBBLE_DIAMETER,
            long_press_timeout: DEFAULT_LONG_PRESS_TIMEOUT,
            touch_slop: DEFAULT_TOUCH_SLOP,
            opacity: OpacityPolicy {
                focused: ALPHA_FOCUS,
                unfocused: ALPHA_NOT_FOCUS,
                moving: ALPHA_MOVING,
            },
            default_geometry: Geometry::new(0, 0, DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
        }
    }
}

impl OverlayConfig {
    pub fn validate(&self) -> OverlayResult<()> {
        if self.min_dimension < 1 {
            return Err(OverlayError::InvalidConfig(
                "min_dimension must be at least 1".to_string(),
            ));
        }
        if self.bubble_diameter < 1 {
            return Err(OverlayError::InvalidConfig(
                "bubble_diameter must be at least 1".to_string(),
            ));
        }
        if self.long_press_timeout.is_zero() {
            return Err(OverlayError::InvalidConfig(
                "long_press_timeout must be non-zero".to_string(),
            ));
        }
        if self.touch_slop < 0 {
            return Err(OverlayError::InvalidConfig(
                "touch_slop cannot be negative".to_string(),
            ));
        }
        let alphas = [
            self.opacity.focused,
            self.opacity.unfocused,
            self.opacity.moving,
        ];
        if alphas.iter().any(|a| !(0.0..=1.0).contains(a)) {
            return Err(OverlayError::InvalidConfig(
                "opacity levels must be within 0.0..=1.0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = OverlayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_dimension, 50);
        assert_eq!(config.opacity.moving, 0.5);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = OverlayConfig {
            bubble_diameter: 0,
            ..OverlayConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(OverlayError::InvalidConfig(_))
        ));
        config.bubble_diameter = 64;
        config.opacity.focused = 1.5;
        assert!(config.validate().is_err());
    }
}

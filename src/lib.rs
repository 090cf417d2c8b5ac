//! Pushbox - a slope-aware pushable obstacle for 2D puzzle platformers
//!
//! Core modules:
//! - `sim`: Obstacle simulation (slope sensing, velocity governing, push
//!   engagement, force application, orientation alignment) plus a small
//!   headless world to drive it
//! - `config`: Externally settable obstacle configuration

pub mod config;
pub mod sim;

pub use config::{BodySetup, ConfigError, ObstacleConfig, Tint};

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz physics tick)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Length of the downward slope probe
    pub const SLOPE_PROBE_LENGTH: f32 = 1.0;
    /// Surfaces at or below this tilt (degrees) count as flat ground
    pub const FLAT_GROUND_ANGLE: f32 = 5.0;
    /// Slack (degrees) on slope window bounds to absorb `acos` rounding
    pub const SLOPE_ANGLE_EPSILON: f32 = 1e-3;

    /// Input magnitude below which an actor is not pushing
    pub const INTENT_DEAD_ZONE: f32 = 0.1;
    /// Tolerance for the push/contact side comparison
    pub const DIRECTION_TOLERANCE: f32 = 0.1;

    /// Time without a push before idle decay kicks in
    pub const IDLE_DECAY_GRACE: f32 = 0.5;
    /// Speeds at or below this are left alone by idle decay
    pub const IDLE_DECAY_MIN_SPEED: f32 = 0.1;
    /// Velocity multiplier applied per idle-decay step
    pub const IDLE_DECAY_FACTOR: f32 = 0.95;

    /// Mass contribution to push force: `1 + mass * MASS_FORCE_GAIN`
    pub const MASS_FORCE_GAIN: f32 = 0.1;
    /// Slope angle (degrees) that doubles the push force
    pub const SLOPE_FORCE_REFERENCE: f32 = 45.0;

    /// Horizontal speed below which the obstacle levels out
    pub const ROTATION_MIN_SPEED: f32 = 0.1;
    /// Fraction of the slope angle the obstacle tilts toward
    pub const ROTATION_SLOPE_FACTOR: f32 = 0.5;

    /// Blend toward white during the push flash
    pub const FLASH_BLEND: f32 = 0.2;
    /// Duration of the push flash
    pub const FLASH_DURATION: f32 = 0.1;

    /// Gravity (units/s²) before gravity scale is applied
    pub const GRAVITY: f32 = -9.81;
}

/// Sign of a value, treating zero as positive.
///
/// Contact and input comparisons need a side for every value, so zero maps
/// to `1.0` rather than `0.0`.
#[inline]
pub fn sign(value: f32) -> f32 {
    if value >= 0.0 { 1.0 } else { -1.0 }
}

/// Linear interpolation with `t` clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Signed shortest difference `to - from` between two angles, in [-π, π)
#[inline]
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_sign_treats_zero_as_positive() {
        assert_eq!(sign(0.0), 1.0);
        assert_eq!(sign(2.5), 1.0);
        assert_eq!(sign(-0.01), -1.0);
    }

    #[test]
    fn test_lerp_clamps_t() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, -1.0), 0.0);
    }

    #[test]
    fn test_shortest_angle_delta_wraps() {
        let delta = shortest_angle_delta(PI - 0.1, -PI + 0.1);
        assert!((delta - 0.2).abs() < 1e-4);
        let delta = shortest_angle_delta(0.0, -0.5);
        assert!((delta + 0.5).abs() < 1e-6);
    }
}

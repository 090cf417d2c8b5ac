//! Obstacle configuration
//!
//! Every tunable the level designer can touch lives here. Ranged values are
//! clamped on load and by the obstacle's mutators, never rejected.

use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lerp;

/// Valid push force coefficients
pub const PUSH_FORCE_RANGE: RangeInclusive<f32> = 1.0..=20.0;
/// Valid obstacle masses
pub const MASS_RANGE: RangeInclusive<f32> = 0.1..=10.0;
/// Valid slide speed ceilings
pub const MAX_SLIDE_SPEED_RANGE: RangeInclusive<f32> = 0.1..=5.0;
/// Valid drag coefficients
pub const DRAG_RANGE: RangeInclusive<f32> = 0.1..=5.0;
/// Valid rotation interpolation rates
pub const ROTATION_SPEED_RANGE: RangeInclusive<f32> = 0.1..=5.0;
/// Valid slope thresholds (degrees)
pub const MAX_SLOPE_ANGLE_RANGE: RangeInclusive<f32> = 0.0..=45.0;

/// Errors raised while reading or writing a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// RGBA color tint (components 0-1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Tint {
    pub const WHITE: Tint = Tint::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Component-wise blend toward `other`
    pub fn lerp(self, other: Tint, t: f32) -> Tint {
        Tint {
            r: lerp(self.r, other.r, t),
            g: lerp(self.g, other.g, t),
            b: lerp(self.b, other.b, t),
            a: lerp(self.a, other.a, t),
        }
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Obstacle configuration surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    // === Pushing ===
    /// Push strength coefficient
    pub push_force: f32,
    /// Obstacle mass (inertia and force compensation)
    pub mass: f32,
    /// Ceiling on unpushed slide speed while on a slope
    pub max_slide_speed: f32,
    /// Basis for linear and angular damping
    pub drag: f32,

    // === Rotation ===
    /// Tilt with the slope (and unlock rotational physics)
    pub allow_rotation: bool,
    /// Alignment interpolation rate
    pub rotation_speed: f32,
    /// Steepest tilt (degrees) still treated as a slope rather than a cliff
    pub max_slope_angle: f32,

    // === Visual ===
    /// Base tint
    pub tint: Tint,

    // === Debug ===
    /// Log a per-frame summary of slope, mass and speed
    pub show_debug_info: bool,

    /// Frame rate idle decay is normalized to. `None` applies the decay
    /// factor once per frame regardless of frame time.
    pub decay_reference_hz: Option<f32>,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            push_force: 5.0,
            mass: 2.0,
            max_slide_speed: 2.0,
            drag: 2.0,

            allow_rotation: true,
            rotation_speed: 1.0,
            max_slope_angle: 30.0,

            tint: Tint::WHITE,

            show_debug_info: false,

            decay_reference_hz: None,
        }
    }
}

impl ObstacleConfig {
    /// Copy with every ranged value clamped into range
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();
        config.push_force = clamp_logged("push_force", config.push_force, PUSH_FORCE_RANGE);
        config.mass = clamp_logged("mass", config.mass, MASS_RANGE);
        config.max_slide_speed =
            clamp_logged("max_slide_speed", config.max_slide_speed, MAX_SLIDE_SPEED_RANGE);
        config.drag = clamp_logged("drag", config.drag, DRAG_RANGE);
        config.rotation_speed =
            clamp_logged("rotation_speed", config.rotation_speed, ROTATION_SPEED_RANGE);
        config.max_slope_angle =
            clamp_logged("max_slope_angle", config.max_slope_angle, MAX_SLOPE_ANGLE_RANGE);
        config.decay_reference_hz = config.decay_reference_hz.filter(|hz| *hz > 0.0);
        config
    }

    /// Physics body parameters derived from this configuration
    pub fn body_setup(&self) -> BodySetup {
        BodySetup {
            mass: self.mass,
            linear_damping: self.drag * 0.5,
            angular_damping: self.drag * 2.0,
            gravity_scale: 3.0,
            rotation_locked: !self.allow_rotation,
            half_extents: glam::Vec2::splat(0.45),
            friction: 0.8,
            bounciness: 0.1,
        }
    }

    /// Parse from JSON; missing fields take defaults, ranged fields are clamped
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ObstacleConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded obstacle config from {}", path.display());
        Ok(config)
    }

    /// Save as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Obstacle config saved to {}", path.display());
        Ok(())
    }
}

/// Clamp `value` into `range`, warning when it had to move
pub(crate) fn clamp_logged(name: &str, value: f32, range: RangeInclusive<f32>) -> f32 {
    let clamped = if value.is_nan() {
        *range.start()
    } else {
        value.clamp(*range.start(), *range.end())
    };
    if clamped != value {
        log::warn!(
            "{} = {} out of range [{}, {}], clamped to {}",
            name,
            value,
            range.start(),
            range.end(),
            clamped
        );
    }
    clamped
}

/// Rigid body parameters applied to the obstacle's physics body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySetup {
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub gravity_scale: f32,
    pub rotation_locked: bool,
    /// Collider half size (0.9 x 0.9 box)
    pub half_extents: glam::Vec2,
    /// Surface material friction
    pub friction: f32,
    /// Surface material restitution
    pub bounciness: f32,
}

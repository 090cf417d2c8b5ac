//! Orientation alignment
//!
//! While moving on a slope the obstacle leans toward half the slope angle;
//! when it stops it eases back to level. Blending is exponential, never a snap.

use super::slope::SlopeState;
use crate::consts::{ROTATION_MIN_SPEED, ROTATION_SLOPE_FACTOR};
use crate::{shortest_angle_delta, sign};

/// Tilt (degrees) to lean toward for the given horizontal velocity
pub fn target_tilt(slope: SlopeState, velocity_x: f32) -> f32 {
    if velocity_x.abs() > ROTATION_MIN_SPEED {
        -slope.angle * sign(velocity_x) * ROTATION_SLOPE_FACTOR
    } else {
        0.0
    }
}

/// Rotation (radians) after one frame of blending toward the target tilt.
///
/// Blend fraction is `rotation_speed * dt`, clamped to [0, 1], along the
/// shortest arc.
pub fn align_rotation(
    rotation: f32,
    slope: SlopeState,
    velocity_x: f32,
    rotation_speed: f32,
    dt: f32,
) -> f32 {
    let target = target_tilt(slope, velocity_x).to_radians();
    let t = (rotation_speed * dt).clamp(0.0, 1.0);
    crate::normalize_angle(rotation + shortest_angle_delta(rotation, target) * t)
}

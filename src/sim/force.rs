//! Push force
//!
//! Heavier obstacles and steeper ground both scale the push up, so a push
//! feels about the same regardless of mass or grade.

use glam::Vec2;

use super::slope::SlopeState;
use crate::consts::{INTENT_DEAD_ZONE, MASS_FORCE_GAIN, SLOPE_FORCE_REFERENCE};
use crate::sign;

/// Multiplier from ground steepness: `1 + |angle| / 45` on a slope, else 1
pub fn slope_multiplier(slope: SlopeState) -> f32 {
    if slope.on_slope {
        1.0 + slope.angle.abs() / SLOPE_FORCE_REFERENCE
    } else {
        1.0
    }
}

/// Force magnitude for a live push (ignores the dead zone)
pub fn push_magnitude(push_force: f32, mass: f32, slope: SlopeState) -> f32 {
    push_force * (1.0 + mass * MASS_FORCE_GAIN) * slope_multiplier(slope)
}

/// Horizontal force to apply this frame, or `None` inside the dead zone
pub fn push_force(intent: f32, push_force: f32, mass: f32, slope: SlopeState) -> Option<Vec2> {
    if intent.abs() <= INTENT_DEAD_ZONE {
        return None;
    }
    let direction = Vec2::new(sign(intent), 0.0);
    Some(direction * push_magnitude(push_force, mass, slope))
}

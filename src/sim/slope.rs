//! Slope sensing
//!
//! One downward probe per fixed step turns the ground normal under the
//! obstacle into a signed slope angle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::terrain::GroundProbe;
use crate::consts::{FLAT_GROUND_ANGLE, SLOPE_ANGLE_EPSILON, SLOPE_PROBE_LENGTH};
use crate::sign;

/// Ground slope under the obstacle, as of the last fixed step
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SlopeState {
    pub on_slope: bool,
    /// Degrees; positive when the surface rises to the right. Zero whenever
    /// `on_slope` is false.
    pub angle: f32,
}

impl SlopeState {
    pub const FLAT: SlopeState = SlopeState {
        on_slope: false,
        angle: 0.0,
    };

    /// Classify a surface normal against the slope window
    /// `(FLAT_GROUND_ANGLE, max_slope_angle]`
    pub fn from_normal(normal: Vec2, max_slope_angle: f32) -> Self {
        let normal = normal.normalize_or_zero();
        if normal == Vec2::ZERO {
            return Self::FLAT;
        }

        let angle = unsigned_angle_deg(normal, Vec2::Y);
        if angle > FLAT_GROUND_ANGLE + SLOPE_ANGLE_EPSILON
            && angle <= max_slope_angle + SLOPE_ANGLE_EPSILON
        {
            SlopeState {
                on_slope: true,
                angle: angle * sign(Vec2::Y.perp_dot(normal)),
            }
        } else {
            Self::FLAT
        }
    }
}

/// Probe straight down from `origin` and classify what is underneath
pub fn sense_slope<P: GroundProbe + ?Sized>(
    probe: &P,
    origin: Vec2,
    max_slope_angle: f32,
) -> SlopeState {
    match probe.raycast(origin, Vec2::NEG_Y, SLOPE_PROBE_LENGTH) {
        Some(hit) => SlopeState::from_normal(hit.normal, max_slope_angle),
        None => SlopeState::FLAT,
    }
}

/// Angle between two unit vectors in degrees, in [0, 180]
fn unsigned_angle_deg(a: Vec2, b: Vec2) -> f32 {
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}

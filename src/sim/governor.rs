//! Velocity governing
//!
//! Keeps an unattended obstacle from creeping or racing downhill. Runs once
//! per frame: push timer, then idle decay, then the slope slide clamp.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::slope::SlopeState;
use crate::consts::{IDLE_DECAY_FACTOR, IDLE_DECAY_GRACE, IDLE_DECAY_MIN_SPEED};

/// Frame-to-frame governor state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VelocityGovernor {
    /// Time since the obstacle was last engaged
    pub time_since_push: f32,
}

/// Inputs the governor reads each frame
#[derive(Debug, Clone, Copy)]
pub struct GovernorParams {
    pub max_slide_speed: f32,
    /// See [`crate::ObstacleConfig::decay_reference_hz`]
    pub decay_reference_hz: Option<f32>,
}

impl VelocityGovernor {
    /// Run one frame and return the governed velocity
    pub fn update(
        &mut self,
        velocity: Vec2,
        engaged: bool,
        slope: SlopeState,
        params: &GovernorParams,
        dt: f32,
    ) -> Vec2 {
        if engaged {
            self.time_since_push = 0.0;
        } else {
            self.time_since_push += dt;
        }

        let mut velocity = velocity;

        if self.time_since_push > IDLE_DECAY_GRACE && velocity.length() > IDLE_DECAY_MIN_SPEED {
            velocity *= decay_factor(params.decay_reference_hz, dt);
        }

        if !engaged && slope.on_slope && velocity.length() > params.max_slide_speed {
            velocity = velocity.normalize() * params.max_slide_speed;
        }

        velocity
    }

    /// True once the idle grace period has run out
    pub fn is_idle(&self) -> bool {
        self.time_since_push > IDLE_DECAY_GRACE
    }
}

/// Idle-decay multiplier for a frame of length `dt`
fn decay_factor(reference_hz: Option<f32>, dt: f32) -> f32 {
    match reference_hz {
        Some(hz) => IDLE_DECAY_FACTOR.powf(dt * hz),
        None => IDLE_DECAY_FACTOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SLOPE: SlopeState = SlopeState {
        on_slope: true,
        angle: 20.0,
    };

    fn params(max_slide_speed: f32) -> GovernorParams {
        GovernorParams {
            max_slide_speed,
            decay_reference_hz: None,
        }
    }

    #[test]
    fn test_slide_clamp_on_slope() {
        let mut governor = VelocityGovernor::default();
        let v = governor.update(Vec2::new(3.0, 0.0), false, SLOPE, &params(2.0), 0.016);
        assert!((v - Vec2::new(2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_no_clamp_on_flat_ground() {
        let mut governor = VelocityGovernor::default();
        let v = governor.update(Vec2::new(3.0, 0.0), false, SlopeState::FLAT, &params(2.0), 0.016);
        assert_eq!(v, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_no_clamp_while_pushed() {
        let mut governor = VelocityGovernor::default();
        let v = governor.update(Vec2::new(4.0, 1.0), true, SLOPE, &params(2.0), 0.016);
        assert_eq!(v, Vec2::new(4.0, 1.0));
        assert_eq!(governor.time_since_push, 0.0);
    }

    #[test]
    fn test_idle_decay_waits_for_grace_period() {
        let mut governor = VelocityGovernor::default();
        let v = governor.update(Vec2::new(1.0, 0.0), false, SlopeState::FLAT, &params(2.0), 0.4);
        assert_eq!(v, Vec2::new(1.0, 0.0));

        let v = governor.update(v, false, SlopeState::FLAT, &params(2.0), 0.2);
        assert!((v.x - 0.95).abs() < 1e-6);
        assert!(governor.is_idle());
    }

    #[test]
    fn test_idle_decay_ignores_slow_motion() {
        let mut governor = VelocityGovernor {
            time_since_push: 5.0,
        };
        let v = governor.update(Vec2::new(0.05, 0.0), false, SlopeState::FLAT, &params(2.0), 0.016);
        assert_eq!(v, Vec2::new(0.05, 0.0));
    }

    #[test]
    fn test_decay_then_clamp_same_frame() {
        let mut governor = VelocityGovernor {
            time_since_push: 1.0,
        };
        // 4.0 decays to 3.8, then clamps to 2.0
        let v = governor.update(Vec2::new(0.0, -4.0), false, SLOPE, &params(2.0), 0.016);
        assert!((v.length() - 2.0).abs() < 1e-5);
        assert!(v.y < 0.0);
    }

    #[test]
    fn test_normalized_decay_matches_per_frame_at_reference_rate() {
        let mut governor = VelocityGovernor {
            time_since_push: 1.0,
        };
        let params = GovernorParams {
            max_slide_speed: 5.0,
            decay_reference_hz: Some(60.0),
        };
        let v = governor.update(Vec2::new(1.0, 0.0), false, SlopeState::FLAT, &params, 1.0 / 60.0);
        assert!((v.x - 0.95).abs() < 1e-5);

        // Half-length frame decays by the square root
        let v = governor.update(Vec2::new(1.0, 0.0), false, SlopeState::FLAT, &params, 1.0 / 120.0);
        assert!((v.x - 0.95f32.sqrt()).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_slide_clamp_preserves_direction(
            x in -20.0f32..20.0,
            y in -20.0f32..20.0,
            max in 0.1f32..5.0,
        ) {
            let v = Vec2::new(x, y);
            prop_assume!(v.length() > max + 1e-3);

            let mut governor = VelocityGovernor::default();
            let out = governor.update(v, false, SLOPE, &params(max), 0.016);
            prop_assert!((out.length() - max).abs() < 1e-3);
            prop_assert!(out.normalize().dot(v.normalize()) > 0.9999);
        }

        #[test]
        fn prop_no_decay_within_grace_of_push(frames in proptest::collection::vec(0.001f32..0.1, 1..20)) {
            let mut governor = VelocityGovernor::default();
            governor.update(Vec2::X, true, SlopeState::FLAT, &params(5.0), 0.016);

            let mut elapsed = 0.0;
            for dt in frames {
                elapsed += dt;
                let v = governor.update(Vec2::X, false, SlopeState::FLAT, &params(5.0), dt);
                if elapsed <= IDLE_DECAY_GRACE {
                    prop_assert_eq!(v, Vec2::X);
                }
            }
        }
    }
}

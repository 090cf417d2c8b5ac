//! Physics body abstraction
//!
//! The obstacle never talks to a physics engine directly. It reads and writes
//! through [`PhysicsBody`], so any engine (or the bundled [`SimpleBody`]) can
//! host it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::BodySetup;
use crate::consts::GRAVITY;

/// Operations the obstacle needs from its rigid body
pub trait PhysicsBody {
    /// Reference point (center) in world space
    fn position(&self) -> Vec2;

    fn velocity(&self) -> Vec2;

    fn set_velocity(&mut self, velocity: Vec2);

    /// Rotation in radians, counter-clockwise positive
    fn rotation(&self) -> f32;

    fn set_rotation(&mut self, rotation: f32);

    /// Add a continuous force for the current step. Forces accumulate until
    /// the body is next integrated and are then cleared.
    fn apply_force(&mut self, force: Vec2);

    fn set_mass(&mut self, mass: f32);

    fn set_damping(&mut self, linear: f32, angular: f32);

    fn set_gravity_scale(&mut self, scale: f32);

    /// Freeze or release rotational motion
    fn set_rotation_locked(&mut self, locked: bool);

    /// Push every parameter of `setup` into the body
    fn configure(&mut self, setup: &BodySetup) {
        self.set_mass(setup.mass);
        self.set_damping(setup.linear_damping, setup.angular_damping);
        self.set_gravity_scale(setup.gravity_scale);
        self.set_rotation_locked(setup.rotation_locked);
    }
}

/// Minimal rigid body with semi-implicit Euler integration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub angular_vel: f32,
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub gravity_scale: f32,
    pub rotation_locked: bool,
    pub half_extents: Vec2,
    pub friction: f32,
    pub bounciness: f32,
    /// Forces accumulated since the last integration
    #[serde(skip)]
    pub pending_force: Vec2,
}

impl SimpleBody {
    pub fn new(pos: Vec2, setup: &BodySetup) -> Self {
        let mut body = Self {
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            angular_vel: 0.0,
            mass: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            gravity_scale: 1.0,
            rotation_locked: false,
            half_extents: setup.half_extents,
            friction: setup.friction,
            bounciness: setup.bounciness,
            pending_force: Vec2::ZERO,
        };
        body.configure(setup);
        body
    }

    /// Advance one fixed step: gravity, accumulated forces, damping
    pub fn integrate(&mut self, dt: f32) {
        let gravity = Vec2::new(0.0, GRAVITY * self.gravity_scale);
        let accel = gravity + self.pending_force / self.mass;
        self.pending_force = Vec2::ZERO;

        self.vel += accel * dt;
        // Same damping model as common 2D engines: v *= 1 / (1 + c*dt)
        self.vel *= 1.0 / (1.0 + self.linear_damping * dt);
        self.pos += self.vel * dt;

        if self.rotation_locked {
            self.angular_vel = 0.0;
        } else {
            self.angular_vel *= 1.0 / (1.0 + self.angular_damping * dt);
            self.rotation = crate::normalize_angle(self.rotation + self.angular_vel * dt);
        }
    }

    /// Lowest point of the (unrotated) collider
    pub fn bottom(&self) -> f32 {
        self.pos.y - self.half_extents.y
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        (self.pos - self.half_extents, self.pos + self.half_extents)
    }
}

impl PhysicsBody for SimpleBody {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn velocity(&self) -> Vec2 {
        self.vel
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.vel = velocity;
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    fn apply_force(&mut self, force: Vec2) {
        self.pending_force += force;
    }

    fn set_mass(&mut self, mass: f32) {
        self.mass = mass.max(f32::EPSILON);
    }

    fn set_damping(&mut self, linear: f32, angular: f32) {
        self.linear_damping = linear.max(0.0);
        self.angular_damping = angular.max(0.0);
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity_scale = scale;
    }

    fn set_rotation_locked(&mut self, locked: bool) {
        self.rotation_locked = locked;
        if locked {
            self.angular_vel = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ObstacleConfig;

    fn body() -> SimpleBody {
        SimpleBody::new(Vec2::ZERO, &ObstacleConfig::default().body_setup())
    }

    #[test]
    fn test_new_applies_setup() {
        let body = body();
        assert_eq!(body.mass, 2.0);
        assert_eq!(body.linear_damping, 1.0);
        assert_eq!(body.angular_damping, 4.0);
        assert_eq!(body.gravity_scale, 3.0);
        assert!(!body.rotation_locked);
    }

    #[test]
    fn test_force_is_consumed_by_integrate() {
        let mut body = body();
        body.set_gravity_scale(0.0);
        body.set_damping(0.0, 0.0);
        body.apply_force(Vec2::new(4.0, 0.0));
        body.apply_force(Vec2::new(2.0, 0.0));
        body.integrate(0.5);
        // a = 6 / 2 = 3, dv = 1.5
        assert!((body.vel.x - 1.5).abs() < 1e-5);
        assert_eq!(body.pending_force, Vec2::ZERO);

        body.integrate(0.5);
        assert!((body.vel.x - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_gravity_scale_pulls_down() {
        let mut body = body();
        body.set_damping(0.0, 0.0);
        body.integrate(0.1);
        assert!((body.vel.y - GRAVITY * 3.0 * 0.1).abs() < 1e-4);
        assert!(body.pos.y < 0.0);
    }

    #[test]
    fn test_rotation_lock_stops_spin() {
        let mut body = body();
        body.angular_vel = 2.0;
        body.set_rotation_locked(true);
        body.integrate(0.1);
        assert_eq!(body.rotation, 0.0);
        assert_eq!(body.angular_vel, 0.0);
    }
}

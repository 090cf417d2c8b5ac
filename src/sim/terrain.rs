//! Ground geometry and ray probing
//!
//! Terrain is a piecewise-linear polyline ordered by x. It answers downward
//! probes for the slope sensor and keeps [`SimpleBody`] resting on the
//! surface in the headless world.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::SimpleBody;

/// Impact speeds below this settle instead of bouncing
const BOUNCE_THRESHOLD: f32 = 1.0;

/// Result of a successful ray probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Where the ray met the surface
    pub point: Vec2,
    /// Unit surface normal at the hit
    pub normal: Vec2,
    /// Distance travelled along the ray
    pub distance: f32,
}

/// Anything that can answer a ray query against static geometry
pub trait GroundProbe {
    /// Cast a ray; `None` when nothing lies within `max_distance`
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit>;
}

/// Piecewise-linear ground surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    /// Surface vertices, strictly increasing in x
    points: Vec<Vec2>,
}

impl Terrain {
    /// Build from vertices; they are sorted by x and duplicates in x dropped
    pub fn from_points(mut points: Vec<Vec2>) -> Self {
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        points.dedup_by(|a, b| (a.x - b.x).abs() < 1e-6);
        Self { points }
    }

    /// Level ground at height `y` spanning `[x_min, x_max]`
    pub fn flat(y: f32, x_min: f32, x_max: f32) -> Self {
        Self::from_points(vec![Vec2::new(x_min, y), Vec2::new(x_max, y)])
    }

    /// Flat run, then a straight incline of `angle_deg` (positive rises to
    /// the right), then flat again
    pub fn ramp(start_x: f32, length: f32, angle_deg: f32, x_min: f32, x_max: f32) -> Self {
        let rise = length * angle_deg.to_radians().tan();
        let end_x = start_x + length;
        Self::from_points(vec![
            Vec2::new(x_min, 0.0),
            Vec2::new(start_x, 0.0),
            Vec2::new(end_x, rise),
            Vec2::new(x_max, rise),
        ])
    }

    /// Rolling ground with seeded random bumps, `segment_len` apart
    pub fn generate(seed: u64, x_min: f32, x_max: f32, segment_len: f32, max_step: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let segment_len = segment_len.max(0.1);
        let mut points = Vec::new();
        let mut x = x_min;
        let mut y = 0.0;
        while x < x_max {
            points.push(Vec2::new(x, y));
            x += segment_len;
            y += rng.random_range(-max_step..=max_step);
        }
        points.push(Vec2::new(x_max, y));
        log::info!(
            "Generated terrain: seed={}, {} vertices over [{}, {}]",
            seed,
            points.len(),
            x_min,
            x_max
        );
        Self::from_points(points)
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Segment under `x`, if the terrain spans it
    fn segment_at(&self, x: f32) -> Option<(Vec2, Vec2)> {
        self.points
            .windows(2)
            .find(|w| x >= w[0].x && x <= w[1].x)
            .map(|w| (w[0], w[1]))
    }

    /// Surface height at `x`
    pub fn height_at(&self, x: f32) -> Option<f32> {
        let (a, b) = self.segment_at(x)?;
        let t = (x - a.x) / (b.x - a.x);
        Some(a.y + (b.y - a.y) * t)
    }

    /// Upward-facing unit normal at `x`
    pub fn normal_at(&self, x: f32) -> Option<Vec2> {
        let (a, b) = self.segment_at(x)?;
        Some(segment_normal(a, b))
    }

    /// Keep a body on top of the surface: lift it out, cancel the velocity
    /// going into the ground and apply Coulomb friction to the rest
    pub fn resolve(&self, body: &mut SimpleBody) -> bool {
        let (Some(height), Some(normal)) = (self.height_at(body.pos.x), self.normal_at(body.pos.x))
        else {
            return false;
        };

        if body.bottom() > height {
            return false;
        }
        body.pos.y = height + body.half_extents.y;

        let vn = body.vel.dot(normal);
        if vn >= 0.0 {
            return true;
        }

        let tangential = body.vel - normal * vn;
        let normal_impulse = -vn;
        let speed = tangential.length();
        let friction_loss = body.friction * normal_impulse;
        let tangential = if speed <= friction_loss {
            Vec2::ZERO
        } else {
            tangential * ((speed - friction_loss) / speed)
        };

        let bounce = if normal_impulse > BOUNCE_THRESHOLD {
            normal_impulse * body.bounciness
        } else {
            0.0
        };
        body.vel = tangential + normal * bounce;
        true
    }
}

impl GroundProbe for Terrain {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec2::ZERO {
            return None;
        }

        let mut best: Option<RayHit> = None;
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            let edge = b - a;
            let denom = dir.perp_dot(edge);
            if denom.abs() < 1e-8 {
                continue; // Parallel
            }

            let to_a = a - origin;
            let t = to_a.perp_dot(edge) / denom;
            let s = to_a.perp_dot(dir) / denom;
            if !(0.0..=max_distance).contains(&t) || !(0.0..=1.0).contains(&s) {
                continue;
            }

            if best.is_none_or(|hit| t < hit.distance) {
                best = Some(RayHit {
                    point: origin + dir * t,
                    normal: segment_normal(a, b),
                    distance: t,
                });
            }
        }
        best
    }
}

/// Upward normal of a left-to-right segment
fn segment_normal(a: Vec2, b: Vec2) -> Vec2 {
    (b - a).perp().normalize_or_zero()
}

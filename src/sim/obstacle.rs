//! The pushable obstacle
//!
//! Ties slope sensing, velocity governing, push engagement, force
//! application and orientation alignment to one physics body. The host calls
//! [`PushableObstacle::fixed_update`] every physics step,
//! [`PushableObstacle::update`] every frame, and forwards contact events as
//! they arrive.

use glam::Vec2;

use super::body::PhysicsBody;
use super::force;
use super::governor::{GovernorParams, VelocityGovernor};
use super::orient;
use super::push::{ActorId, ActorLookup, Contact, Engagement};
use super::schedule::{Scheduler, TaskId};
use super::slope::{SlopeState, sense_slope};
use super::terrain::GroundProbe;
use crate::config::{self, ObstacleConfig, Tint};
use crate::consts::{FLASH_BLEND, FLASH_DURATION};

/// Deferred work the obstacle schedules for itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleTask {
    /// End of the push flash
    RestoreTint,
}

/// A box that can be shoved around uneven ground
#[derive(Debug)]
pub struct PushableObstacle<B: PhysicsBody> {
    body: B,
    config: ObstacleConfig,
    slope: SlopeState,
    engagement: Engagement,
    governor: VelocityGovernor,
    /// Current display tint (base tint except during a flash)
    tint: Tint,
    flash: Option<TaskId>,
    tasks: Scheduler<ObstacleTask>,
    /// Force applied during the most recent frame
    last_force: Option<Vec2>,
}

impl<B: PhysicsBody> PushableObstacle<B> {
    /// Wrap `body`, clamping `config` and pushing the derived setup into it
    pub fn new(mut body: B, config: ObstacleConfig) -> Self {
        let config = config.sanitized();
        body.configure(&config.body_setup());
        Self {
            body,
            tint: config.tint,
            config,
            slope: SlopeState::FLAT,
            engagement: Engagement::Idle,
            governor: VelocityGovernor::default(),
            flash: None,
            tasks: Scheduler::new(),
            last_force: None,
        }
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn config(&self) -> &ObstacleConfig {
        &self.config
    }

    pub fn slope(&self) -> SlopeState {
        self.slope
    }

    pub fn engagement(&self) -> Engagement {
        self.engagement
    }

    pub fn is_engaged(&self) -> bool {
        self.engagement.is_engaged()
    }

    pub fn tint(&self) -> Tint {
        self.tint
    }

    pub fn time_since_push(&self) -> f32 {
        self.governor.time_since_push
    }

    pub fn last_force(&self) -> Option<Vec2> {
        self.last_force
    }

    /// Fixed physics step: re-sense the ground under the obstacle
    pub fn fixed_update<P: GroundProbe + ?Sized>(&mut self, probe: &P) {
        let slope = sense_slope(probe, self.body.position(), self.config.max_slope_angle);
        if slope.on_slope != self.slope.on_slope {
            if slope.on_slope {
                log::debug!("Obstacle entered slope ({:.1}°)", slope.angle);
            } else {
                log::debug!("Obstacle left slope");
            }
        }
        self.slope = slope;
    }

    /// Contact-begin from the collision system. Returns true if it engaged.
    pub fn on_contact_begin<L: ActorLookup + ?Sized>(&mut self, contact: &Contact, actors: &L) -> bool {
        self.release_stale(actors);
        let intent = actors.intent(contact.actor);
        let engaged = self
            .engagement
            .begin_contact(contact, self.body.position(), intent);
        if engaged {
            self.start_flash();
        }
        engaged
    }

    /// Contact-end from the collision system. Returns true if it released.
    pub fn on_contact_end(&mut self, actor: ActorId) -> bool {
        self.engagement.end_contact(actor)
    }

    /// Per-frame update: governor, push force, rotation, scheduled effects
    pub fn update<L: ActorLookup + ?Sized>(&mut self, dt: f32, actors: &L) -> Option<Vec2> {
        let intent = self.release_stale(actors);

        let engaged = self.engagement.is_engaged();
        let params = GovernorParams {
            max_slide_speed: self.config.max_slide_speed,
            decay_reference_hz: self.config.decay_reference_hz,
        };
        let velocity = self.body.velocity();
        let governed = self
            .governor
            .update(velocity, engaged, self.slope, &params, dt);
        if governed != velocity {
            self.body.set_velocity(governed);
        }

        self.last_force = intent.and_then(|intent| {
            force::push_force(intent, self.config.push_force, self.config.mass, self.slope)
        });
        if let Some(push) = self.last_force {
            log::trace!("Applying push force ({:.2}, {:.2})", push.x, push.y);
            self.body.apply_force(push);
        }

        if self.config.allow_rotation && self.slope.on_slope {
            let rotation = orient::align_rotation(
                self.body.rotation(),
                self.slope,
                self.body.velocity().x,
                self.config.rotation_speed,
                dt,
            );
            self.body.set_rotation(rotation);
        }

        for task in self.tasks.advance(dt) {
            match task {
                ObstacleTask::RestoreTint => {
                    self.tint = self.config.tint;
                    self.flash = None;
                }
            }
        }

        if self.config.show_debug_info {
            log::debug!(
                "Obstacle at ({:.2}, {:.2}): slope {:.1}° (on_slope={}), mass {}, speed {:.2}",
                self.body.position().x,
                self.body.position().y,
                self.slope.angle,
                self.slope.on_slope,
                self.config.mass,
                self.body.velocity().length()
            );
        }

        self.last_force
    }

    /// Set mass (clamped) and propagate it to the body
    pub fn set_mass(&mut self, mass: f32) {
        self.config.mass = config::clamp_logged("mass", mass, config::MASS_RANGE);
        self.body.set_mass(self.config.mass);
    }

    /// Set the push force coefficient (clamped)
    pub fn set_push_force(&mut self, push_force: f32) {
        self.config.push_force =
            config::clamp_logged("push_force", push_force, config::PUSH_FORCE_RANGE);
    }

    /// Enable or disable slope tilting, locking rotation physics to match
    pub fn toggle_rotation(&mut self, allow: bool) {
        self.config.allow_rotation = allow;
        self.body.set_rotation_locked(!allow);
    }

    /// Drop an engagement whose actor was destroyed without a contact-end.
    /// Returns the engaged actor's intent otherwise.
    fn release_stale<L: ActorLookup + ?Sized>(&mut self, actors: &L) -> Option<f32> {
        let id = self.engagement.actor()?;
        let intent = actors.intent(id);
        if intent.is_none() {
            log::warn!("Engaged actor {:?} no longer resolves, releasing push", id);
            self.engagement.release();
        }
        intent
    }

    fn start_flash(&mut self) {
        if let Some(pending) = self.flash.take() {
            self.tasks.cancel(pending);
        }
        self.tint = self.config.tint.lerp(Tint::WHITE, FLASH_BLEND);
        self.flash = Some(self.tasks.schedule(FLASH_DURATION, ObstacleTask::RestoreTint));
    }
}

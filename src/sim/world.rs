//! Headless host world
//!
//! Plays the part of a game engine around one obstacle: a fixed-step physics
//! loop, terrain, a handful of scripted actors, and the collision bookkeeping
//! that turns overlaps into contact-begin/contact-end events.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::Serialize;

use super::body::SimpleBody;
use super::obstacle::PushableObstacle;
use super::push::{ActorId, ActorLookup, ActorTag, Contact, HorizontalIntentSource};
use super::slope::SlopeState;
use super::terrain::Terrain;
use crate::config::{ObstacleConfig, Tint};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Gap at which an actor still counts as touching the obstacle
const CONTACT_SKIN: f32 = 0.02;

/// Longest frame the world will simulate in one go
const MAX_FRAME_DT: f32 = 0.1;

/// A kinematic actor following a timed list of horizontal intents
#[derive(Debug, Clone, Serialize)]
pub struct ScriptedActor {
    pub id: ActorId,
    pub tag: ActorTag,
    pub pos: Vec2,
    pub half_extents: Vec2,
    /// Horizontal speed at full intent
    pub walk_speed: f32,
    /// `(start_time, intent)` pairs, sorted by start time
    keyframes: Vec<(f32, f32)>,
    intent: f32,
}

impl ScriptedActor {
    pub fn new(id: ActorId, tag: ActorTag, pos: Vec2) -> Self {
        Self {
            id,
            tag,
            pos,
            half_extents: Vec2::new(0.3, 0.5),
            walk_speed: 4.0,
            keyframes: Vec::new(),
            intent: 0.0,
        }
    }

    /// Hold `intent` from `start_time` until the next keyframe
    pub fn with_keyframe(mut self, start_time: f32, intent: f32) -> Self {
        self.keyframes.push((start_time, intent.clamp(-1.0, 1.0)));
        self.keyframes.sort_by(|a, b| a.0.total_cmp(&b.0));
        self
    }

    pub fn with_walk_speed(mut self, walk_speed: f32) -> Self {
        self.walk_speed = walk_speed;
        self
    }

    /// Scripted intent at `time`
    pub fn intent_at(&self, time: f32) -> f32 {
        self.keyframes
            .iter()
            .rev()
            .find(|(start, _)| *start <= time)
            .map(|(_, intent)| *intent)
            .unwrap_or(0.0)
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        (self.pos - self.half_extents, self.pos + self.half_extents)
    }

    fn step(&mut self, time: f32, dt: f32, terrain: &Terrain) {
        self.intent = self.intent_at(time);
        self.pos.x += self.intent * self.walk_speed * dt;
        if let Some(height) = terrain.height_at(self.pos.x) {
            self.pos.y = height + self.half_extents.y;
        }
    }
}

impl HorizontalIntentSource for ScriptedActor {
    fn horizontal_intent(&self) -> f32 {
        self.intent
    }
}

impl ActorLookup for [ScriptedActor] {
    fn intent_source(&self, id: ActorId) -> Option<&dyn HorizontalIntentSource> {
        self.iter()
            .find(|a| a.id == id)
            .map(|a| a as &dyn HorizontalIntentSource)
    }
}

/// Serializable summary of the world at one instant
#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub time: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Degrees
    pub rotation: f32,
    pub slope: SlopeState,
    pub engaged_by: Option<ActorId>,
    pub tint: Tint,
    pub actors: Vec<(ActorId, Vec2)>,
}

/// Terrain, one obstacle and its actors
#[derive(Debug)]
pub struct World {
    pub terrain: Terrain,
    pub obstacle: PushableObstacle<SimpleBody>,
    actors: Vec<ScriptedActor>,
    /// Actors currently touching the obstacle
    touching: BTreeSet<ActorId>,
    accumulator: f32,
    time: f32,
    fixed_steps: u64,
}

impl World {
    /// Place an obstacle resting on `terrain` at horizontal position `x`
    pub fn new(terrain: Terrain, config: ObstacleConfig, x: f32) -> Self {
        let config = config.sanitized();
        let setup = config.body_setup();
        let ground = terrain.height_at(x).unwrap_or(0.0);
        let body = SimpleBody::new(Vec2::new(x, ground + setup.half_extents.y), &setup);
        let mut obstacle = PushableObstacle::new(body, config);
        obstacle.fixed_update(&terrain);

        Self {
            terrain,
            obstacle,
            actors: Vec::new(),
            touching: BTreeSet::new(),
            accumulator: 0.0,
            time: 0.0,
            fixed_steps: 0,
        }
    }

    pub fn add_actor(&mut self, mut actor: ScriptedActor) {
        if let Some(height) = self.terrain.height_at(actor.pos.x) {
            actor.pos.y = height + actor.half_extents.y;
        }
        log::info!("Actor {:?} ({}) joined at x={:.2}", actor.id, actor.tag.as_str(), actor.pos.x);
        self.actors.push(actor);
        self.actors.sort_by_key(|a| a.id);
    }

    /// Remove an actor without sending a contact-end, as if it was destroyed
    pub fn destroy_actor(&mut self, id: ActorId) -> Option<ScriptedActor> {
        let index = self.actors.iter().position(|a| a.id == id)?;
        self.touching.remove(&id);
        log::info!("Actor {:?} destroyed", id);
        Some(self.actors.remove(index))
    }

    pub fn actors(&self) -> &[ScriptedActor] {
        &self.actors
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn fixed_steps(&self) -> u64 {
        self.fixed_steps
    }

    /// Advance by one rendered frame of length `frame_dt`
    pub fn advance(&mut self, frame_dt: f32) {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.fixed_step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::warn!("Physics falling behind, dropping {:.3}s", self.accumulator);
            self.accumulator = 0.0;
        }

        self.time += dt;
        for actor in &mut self.actors {
            actor.step(self.time, dt, &self.terrain);
        }
        self.shove_obstacle(dt);
        self.dispatch_contacts();

        self.obstacle.update(dt, self.actors.as_slice());
    }

    /// Advance `seconds` of simulation in frames of `frame_dt`
    pub fn run(&mut self, seconds: f32, frame_dt: f32) {
        if frame_dt.is_nan() || frame_dt <= 0.0 {
            log::warn!("Ignoring run with non-positive frame step {}", frame_dt);
            return;
        }
        let frames = (seconds / frame_dt).round().max(0.0) as u64;
        for _ in 0..frames {
            self.advance(frame_dt);
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let body = self.obstacle.body();
        WorldSnapshot {
            time: self.time,
            position: body.pos,
            velocity: body.vel,
            rotation: body.rotation.to_degrees(),
            slope: self.obstacle.slope(),
            engaged_by: self.obstacle.engagement().actor(),
            tint: self.obstacle.tint(),
            actors: self.actors.iter().map(|a| (a.id, a.pos)).collect(),
        }
    }

    fn fixed_step(&mut self) {
        let body = self.obstacle.body_mut();
        body.integrate(SIM_DT);
        self.terrain.resolve(body);
        self.obstacle.fixed_update(&self.terrain);
        self.fixed_steps += 1;
    }

    /// Kinematic actors walking into the obstacle move it out of their way
    fn shove_obstacle(&mut self, dt: f32) {
        for actor in &self.actors {
            let body = self.obstacle.body_mut();
            let (box_min, box_max) = body.bounds();
            let (actor_min, actor_max) = actor.bounds();
            if actor_max.y <= box_min.y || actor_min.y >= box_max.y {
                continue;
            }

            let actor_vel = actor.intent * actor.walk_speed;
            let shove = if actor.pos.x < body.pos.x {
                (actor_max.x - box_min.x).max(0.0)
            } else {
                (actor_min.x - box_max.x).min(0.0)
            };
            if shove == 0.0 || actor_vel * shove <= 0.0 {
                continue;
            }

            body.pos.x += shove;
            if actor_vel.abs() > body.vel.x.abs() || actor_vel * body.vel.x < 0.0 {
                body.vel.x = actor_vel;
            }
            log::trace!("Actor {:?} shoved obstacle by {:.3} (dt {:.3})", actor.id, shove, dt);
        }
        self.terrain.resolve(self.obstacle.body_mut());
    }

    /// Diff current touches against last frame's and deliver events serially
    fn dispatch_contacts(&mut self) {
        let (box_min, box_max) = self.obstacle.body().bounds();
        let center = self.obstacle.body().pos;

        let mut now_touching = BTreeSet::new();
        let mut begins = Vec::new();
        for actor in &self.actors {
            let (actor_min, actor_max) = actor.bounds();
            let gap_x = (actor_min.x - box_max.x).max(box_min.x - actor_max.x);
            let overlap_y = actor_max.y > box_min.y && actor_min.y < box_max.y;
            if gap_x > CONTACT_SKIN || !overlap_y {
                continue;
            }

            now_touching.insert(actor.id);
            if !self.touching.contains(&actor.id) {
                let face_x = if actor.pos.x >= center.x { box_max.x } else { box_min.x };
                let point = Vec2::new(face_x, actor.pos.y.clamp(box_min.y, box_max.y));
                begins.push(Contact {
                    actor: actor.id,
                    tag: actor.tag.clone(),
                    points: vec![point],
                });
            }
        }

        let ended: Vec<ActorId> = self.touching.difference(&now_touching).copied().collect();
        for id in ended {
            log::debug!("Contact ended: actor {:?}", id);
            self.obstacle.on_contact_end(id);
        }
        for contact in &begins {
            log::debug!("Contact began: actor {:?}", contact.actor);
            if self.obstacle.on_contact_begin(contact, self.actors.as_slice()) {
                log::info!(
                    "Actor {:?} is pushing the obstacle at t={:.2}",
                    contact.actor,
                    self.time
                );
            }
        }
        self.touching = now_touching;
    }
}

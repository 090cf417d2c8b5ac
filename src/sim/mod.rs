//! Obstacle simulation module
//!
//! Update order per frame:
//! - Fixed steps: integrate the body, then sense the slope
//! - Contact events, delivered serially by the host
//! - Frame update: governor, push force, orientation, scheduled effects

pub mod body;
pub mod force;
pub mod governor;
pub mod obstacle;
pub mod orient;
pub mod push;
pub mod schedule;
pub mod slope;
pub mod terrain;
pub mod world;

pub use body::{PhysicsBody, SimpleBody};
pub use force::{push_force, push_magnitude, slope_multiplier};
pub use governor::{GovernorParams, VelocityGovernor};
pub use obstacle::{ObstacleTask, PushableObstacle};
pub use orient::{align_rotation, target_tilt};
pub use push::{
    ActorId, ActorLookup, ActorTag, Contact, Engagement, HorizontalIntentSource,
    pushes_toward_contact,
};
pub use schedule::{Scheduler, TaskId};
pub use slope::{SlopeState, sense_slope};
pub use terrain::{GroundProbe, RayHit, Terrain};
pub use world::{ScriptedActor, World, WorldSnapshot};

//! Push engagement
//!
//! Tracks which single actor, if any, is currently allowed to push the
//! obstacle. Contact-begin engages only when the actor is a recognized pusher
//! and is leaning into the side it touches; contact-end from that same actor
//! releases it.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DIRECTION_TOLERANCE, INTENT_DEAD_ZONE};
use crate::sign;

/// Opaque actor identity. Holding one never keeps the actor alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Category tag carried by contact events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorTag {
    FirePlayer,
    WaterPlayer,
    Other(String),
}

impl ActorTag {
    pub fn as_str(&self) -> &str {
        match self {
            ActorTag::FirePlayer => "FirePlayer",
            ActorTag::WaterPlayer => "WaterPlayer",
            ActorTag::Other(tag) => tag,
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "FirePlayer" => ActorTag::FirePlayer,
            "WaterPlayer" => ActorTag::WaterPlayer,
            other => ActorTag::Other(other.to_string()),
        }
    }

    /// Whether actors with this tag may push obstacles
    pub fn can_push(&self) -> bool {
        matches!(self, ActorTag::FirePlayer | ActorTag::WaterPlayer)
    }
}

/// Anything that reports a horizontal movement intent in [-1, 1]
pub trait HorizontalIntentSource {
    fn horizontal_intent(&self) -> f32;
}

impl HorizontalIntentSource for f32 {
    fn horizontal_intent(&self) -> f32 {
        *self
    }
}

/// Resolves actor ids to live intent sources
pub trait ActorLookup {
    /// `None` when the actor no longer exists or reports no intent
    fn intent_source(&self, id: ActorId) -> Option<&dyn HorizontalIntentSource>;

    /// Clamped intent, or `None` when the actor cannot be resolved
    fn intent(&self, id: ActorId) -> Option<f32> {
        self.intent_source(id)
            .map(|source| source.horizontal_intent().clamp(-1.0, 1.0))
    }
}

impl<A: HorizontalIntentSource> ActorLookup for HashMap<ActorId, A> {
    fn intent_source(&self, id: ActorId) -> Option<&dyn HorizontalIntentSource> {
        self.get(&id).map(|a| a as &dyn HorizontalIntentSource)
    }
}

/// A contact-begin or contact-end notification
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub actor: ActorId,
    pub tag: ActorTag,
    /// Contact points in world space, most significant first
    pub points: Vec<Vec2>,
}

/// Does `intent` push toward the side of `center` that `contact_point` is on?
///
/// The actor must be past the input dead zone, and the sign of its intent
/// must match the sign of `contact_point.x - center.x`.
pub fn pushes_toward_contact(intent: f32, contact_point: Vec2, center: Vec2) -> bool {
    let push_dir = sign(intent);
    let contact_dir = sign(contact_point.x - center.x);
    intent.abs() > INTENT_DEAD_ZONE && (push_dir - contact_dir).abs() < DIRECTION_TOLERANCE
}

/// Engagement state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Engagement {
    #[default]
    Idle,
    Engaged(ActorId),
}

impl Engagement {
    pub fn is_engaged(&self) -> bool {
        matches!(self, Engagement::Engaged(_))
    }

    pub fn actor(&self) -> Option<ActorId> {
        match self {
            Engagement::Engaged(id) => Some(*id),
            Engagement::Idle => None,
        }
    }

    /// Handle a contact-begin. Returns true on an Idle -> Engaged transition.
    ///
    /// `intent` is the actor's current intent, `None` if it exposes none.
    pub fn begin_contact(&mut self, contact: &Contact, center: Vec2, intent: Option<f32>) -> bool {
        if let Engagement::Engaged(current) = *self {
            if current != contact.actor {
                log::trace!(
                    "Ignoring contact from actor {:?}; actor {:?} holds the push",
                    contact.actor,
                    current
                );
            }
            return false;
        }

        if !contact.tag.can_push() {
            return false;
        }

        let Some(&point) = contact.points.first() else {
            return false;
        };

        let intent = intent.unwrap_or(0.0);
        if !pushes_toward_contact(intent, point, center) {
            return false;
        }

        *self = Engagement::Engaged(contact.actor);
        log::debug!(
            "Push engaged by actor {:?} ({}), intent {:.2}",
            contact.actor,
            contact.tag.as_str(),
            intent
        );
        true
    }

    /// Handle a contact-end. Returns true on an Engaged -> Idle transition.
    pub fn end_contact(&mut self, actor: ActorId) -> bool {
        match *self {
            Engagement::Engaged(current) if current == actor => {
                *self = Engagement::Idle;
                log::debug!("Push released by actor {:?}", actor);
                true
            }
            _ => false,
        }
    }

    /// Drop the engagement unconditionally
    pub fn release(&mut self) {
        *self = Engagement::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CENTER: Vec2 = Vec2::ZERO;

    fn contact(id: u32, tag: ActorTag, x: f32) -> Contact {
        Contact {
            actor: ActorId(id),
            tag,
            points: vec![Vec2::new(x, 0.0)],
        }
    }

    #[test]
    fn test_engages_when_leaning_into_contact() {
        let mut engagement = Engagement::default();
        assert!(engagement.begin_contact(&contact(1, ActorTag::FirePlayer, 0.45), CENTER, Some(1.0)));
        assert_eq!(engagement.actor(), Some(ActorId(1)));
    }

    #[test]
    fn test_wrong_direction_does_not_engage() {
        let mut engagement = Engagement::default();
        // Touching the right side but walking right (away)
        assert!(!engagement.begin_contact(&contact(1, ActorTag::WaterPlayer, -0.45), CENTER, Some(1.0)));
        assert!(!engagement.is_engaged());
    }

    #[test]
    fn test_dead_zone_does_not_engage() {
        let mut engagement = Engagement::default();
        assert!(!engagement.begin_contact(&contact(1, ActorTag::FirePlayer, 0.45), CENTER, Some(0.1)));
        assert!(!engagement.begin_contact(&contact(1, ActorTag::FirePlayer, 0.45), CENTER, None));
    }

    #[test]
    fn test_unrecognized_tag_does_not_engage() {
        let mut engagement = Engagement::default();
        let other = ActorTag::Other("Crate".to_string());
        assert!(!engagement.begin_contact(&contact(1, other, 0.45), CENTER, Some(1.0)));
    }

    #[test]
    fn test_contact_without_points_does_not_engage() {
        let mut engagement = Engagement::default();
        let mut c = contact(1, ActorTag::FirePlayer, 0.45);
        c.points.clear();
        assert!(!engagement.begin_contact(&c, CENTER, Some(1.0)));
    }

    #[test]
    fn test_first_engagement_wins() {
        let mut engagement = Engagement::default();
        assert!(engagement.begin_contact(&contact(1, ActorTag::FirePlayer, 0.45), CENTER, Some(1.0)));
        assert!(!engagement.begin_contact(&contact(2, ActorTag::WaterPlayer, -0.45), CENTER, Some(-1.0)));
        assert_eq!(engagement.actor(), Some(ActorId(1)));

        // Contact-end from the bystander changes nothing
        assert!(!engagement.end_contact(ActorId(2)));
        assert_eq!(engagement.actor(), Some(ActorId(1)));
    }

    #[test]
    fn test_end_then_second_actor_can_engage() {
        let mut engagement = Engagement::default();
        engagement.begin_contact(&contact(1, ActorTag::FirePlayer, 0.45), CENTER, Some(1.0));
        assert!(engagement.end_contact(ActorId(1)));
        assert_eq!(engagement, Engagement::Idle);
        assert!(engagement.begin_contact(&contact(2, ActorTag::WaterPlayer, -0.45), CENTER, Some(-1.0)));
        assert_eq!(engagement.actor(), Some(ActorId(2)));
    }

    #[test]
    fn test_contact_at_center_counts_as_right_side() {
        assert!(pushes_toward_contact(0.5, Vec2::ZERO, Vec2::ZERO));
        assert!(!pushes_toward_contact(-0.5, Vec2::ZERO, Vec2::ZERO));
    }

    #[test]
    fn test_lookup_clamps_intent() {
        let mut actors: HashMap<ActorId, f32> = HashMap::new();
        actors.insert(ActorId(7), 3.0);
        assert_eq!(actors.intent(ActorId(7)), Some(1.0));
        assert_eq!(actors.intent(ActorId(8)), None);
    }

    #[test]
    fn test_tag_round_trip_names() {
        assert_eq!(ActorTag::from_tag("FirePlayer"), ActorTag::FirePlayer);
        assert_eq!(ActorTag::from_tag("Box").as_str(), "Box");
        assert!(!ActorTag::from_tag("Box").can_push());
    }

    proptest! {
        #[test]
        fn prop_gate_matches_definition(intent in -1.0f32..1.0, dx in -1.0f32..1.0) {
            let expected = intent.abs() > INTENT_DEAD_ZONE && sign(intent) == sign(dx);
            prop_assert_eq!(pushes_toward_contact(intent, Vec2::new(dx, 0.3), Vec2::ZERO), expected);

            let mut engagement = Engagement::default();
            let c = contact(1, ActorTag::FirePlayer, dx);
            prop_assert_eq!(engagement.begin_contact(&c, CENTER, Some(intent)), expected);
        }
    }
}

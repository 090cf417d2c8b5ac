//! End-to-end push scenarios through the headless world

use std::collections::HashMap;

use glam::Vec2;
use pushbox::ObstacleConfig;
use pushbox::sim::{
    ActorId, ActorTag, Contact, Engagement, PushableObstacle, ScriptedActor, SimpleBody,
    SlopeState, Terrain, World,
};

const FRAME: f32 = 1.0 / 60.0;

fn obstacle_on(terrain: &Terrain, x: f32, config: ObstacleConfig) -> PushableObstacle<SimpleBody> {
    let setup = config.body_setup();
    let y = terrain.height_at(x).unwrap_or(0.0) + setup.half_extents.y;
    let mut obstacle = PushableObstacle::new(SimpleBody::new(Vec2::new(x, y), &setup), config);
    obstacle.fixed_update(terrain);
    obstacle
}

#[test]
fn test_flat_push_scenario_force() {
    let terrain = Terrain::flat(0.0, -10.0, 10.0);
    let mut obstacle = obstacle_on(&terrain, 0.0, ObstacleConfig::default());
    let mut actors = HashMap::new();
    actors.insert(ActorId(1), 1.0f32);

    let contact = Contact {
        actor: ActorId(1),
        tag: ActorTag::FirePlayer,
        points: vec![Vec2::new(0.45, 0.45)],
    };
    assert!(obstacle.on_contact_begin(&contact, &actors));
    let force = obstacle.update(FRAME, &actors).expect("push applied");
    assert!((force - Vec2::new(6.0, 0.0)).length() < 1e-5);

    // Force is per frame: the next frame applies it again
    let again = obstacle.update(FRAME, &actors).expect("push applied");
    assert_eq!(force, again);
}

#[test]
fn test_bystander_takes_over_after_release() {
    let terrain = Terrain::flat(0.0, -10.0, 10.0);
    let mut obstacle = obstacle_on(&terrain, 0.0, ObstacleConfig::default());
    let mut actors = HashMap::new();
    actors.insert(ActorId(1), 1.0f32);
    actors.insert(ActorId(2), -1.0f32);

    let first = Contact {
        actor: ActorId(1),
        tag: ActorTag::FirePlayer,
        points: vec![Vec2::new(0.45, 0.45)],
    };
    let second = Contact {
        actor: ActorId(2),
        tag: ActorTag::WaterPlayer,
        points: vec![Vec2::new(-0.45, 0.45)],
    };

    assert!(obstacle.on_contact_begin(&first, &actors));
    assert!(!obstacle.on_contact_begin(&second, &actors));
    assert!(obstacle.on_contact_end(ActorId(1)));
    assert_eq!(obstacle.engagement(), Engagement::Idle);

    assert!(obstacle.on_contact_begin(&second, &actors));
    let force = obstacle.update(FRAME, &actors).expect("push applied");
    assert!(force.x < 0.0);
}

#[test]
fn test_box_settles_after_push_released() {
    let terrain = Terrain::flat(0.0, -20.0, 20.0);
    let mut world = World::new(terrain, ObstacleConfig::default(), 0.0);
    world.add_actor(
        ScriptedActor::new(ActorId(1), ActorTag::FirePlayer, Vec2::new(-2.0, 0.0))
            .with_keyframe(0.0, 1.0)
            .with_keyframe(1.5, -1.0)
            .with_walk_speed(2.0),
    );
    world.run(1.5, FRAME);
    let pushed_to = world.obstacle.body().pos.x;
    assert!(pushed_to > 0.0);

    world.run(2.0, FRAME);
    let snapshot = world.snapshot();
    assert!(snapshot.velocity.length() < 0.1);
    assert!((snapshot.position.x - pushed_to).abs() < 0.2);
    assert!(world.obstacle.time_since_push() > 0.5);
}

#[test]
fn test_box_tilts_with_ramp_and_levels_out() {
    let config = ObstacleConfig {
        rotation_speed: 5.0,
        ..Default::default()
    };
    let terrain = Terrain::ramp(-20.0, 40.0, 20.0, -30.0, 30.0);
    let mut obstacle = obstacle_on(&terrain, 0.0, config);
    assert!(obstacle.slope().on_slope);

    let actors: HashMap<ActorId, f32> = HashMap::new();
    obstacle.body_mut().vel = Vec2::new(1.0, 0.36);
    for _ in 0..120 {
        obstacle.body_mut().vel = Vec2::new(1.0, 0.36);
        obstacle.update(FRAME, &actors);
    }
    let tilt = obstacle.body().rotation.to_degrees();
    assert!((tilt + 10.0).abs() < 0.5, "tilt {tilt}");

    for _ in 0..240 {
        obstacle.body_mut().vel = Vec2::ZERO;
        obstacle.update(FRAME, &actors);
    }
    assert!(obstacle.body().rotation.to_degrees().abs() < 0.1);
}

#[test]
fn test_snapshot_serializes() {
    let world = World::new(Terrain::flat(0.0, -5.0, 5.0), ObstacleConfig::default(), 0.0);
    let json = serde_json::to_string(&world.snapshot()).expect("serializable");
    assert!(json.contains("\"slope\""));
    let slope: SlopeState = world.obstacle.slope();
    assert!(!slope.on_slope);
}

//! Pushbox headless runner
//!
//! Drives a scripted push scenario through the fixed-step loop and prints the
//! final state as JSON.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use glam::Vec2;

use pushbox::ObstacleConfig;
use pushbox::sim::{ActorId, ActorTag, ScriptedActor, Terrain, World};

/// Simulate a pushable obstacle on uneven ground
#[derive(Debug, Parser)]
#[command(name = "pushbox", version, about)]
struct Args {
    /// Obstacle config (JSON); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated seconds
    #[arg(long, default_value_t = 8.0)]
    seconds: f32,

    /// Frame rate of the variable-rate update
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seed for bumpy generated terrain; a plain ramp is used when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Debug-level logging (RUST_LOG still wins)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(level);
    // Only fails if a logger is already installed
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => match ObstacleConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Could not load {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => ObstacleConfig::default(),
    };

    if args.dump_config {
        match config.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                log::error!("Could not serialize config: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    let terrain = match args.seed {
        Some(seed) => Terrain::generate(seed, -20.0, 20.0, 1.5, 0.4),
        None => Terrain::ramp(2.0, 6.0, 15.0, -20.0, 20.0),
    };

    let mut world = World::new(terrain, config, 0.0);
    world.add_actor(
        ScriptedActor::new(ActorId(1), ActorTag::FirePlayer, Vec2::new(-3.0, 0.0))
            .with_keyframe(0.0, 1.0)
            .with_keyframe(2.5, 0.0)
            .with_walk_speed(2.0),
    );
    world.add_actor(
        ScriptedActor::new(ActorId(2), ActorTag::WaterPlayer, Vec2::new(9.0, 0.0))
            .with_keyframe(3.0, -1.0)
            .with_keyframe(5.5, 1.0)
            .with_walk_speed(2.0),
    );

    let fps = args.fps.max(1);
    let frame_dt = 1.0 / fps as f32;
    let frames = (args.seconds.max(0.0) * fps as f32).round() as u64;
    log::info!("Pushbox running {:.1}s at {} fps", args.seconds, fps);

    for frame in 1..=frames {
        world.advance(frame_dt);
        if frame % u64::from(fps) == 0 {
            let snapshot = world.snapshot();
            log::info!(
                "t={:.1}s box=({:.2}, {:.2}) v={:.2} rot={:.1}° slope={:.1}° engaged_by={:?}",
                snapshot.time,
                snapshot.position.x,
                snapshot.position.y,
                snapshot.velocity.length(),
                snapshot.rotation,
                snapshot.slope.angle,
                snapshot.engaged_by
            );
        }
    }

    match serde_json::to_string_pretty(&world.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Could not serialize snapshot: {}", e);
            process::exit(1);
        }
    }
}

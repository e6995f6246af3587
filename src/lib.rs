#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Sandbox
//!
//! A Minecraft-like voxel sandbox: chunked terrain generated from Perlin noise,
//! greedy-meshed on a background worker pool, culled with a coarse view cone
//! and lit by point lights gathered from neighboring chunks.
//!
//! ## Key Modules
//!
//! * `application_state` - Configuration, input snapshots and the game loop
//! * `core` - Shared-resource wrappers used across threads
//! * `engine_state` - Chunks, meshing, tasks, physics and the world
//! * `error` - Fatal startup errors
//!
//! ## Architecture
//!
//! The crate stops at the renderer boundary. It produces per-chunk vertex
//! buffers, texture layers and draw calls and hands them to a
//! [`ChunkRenderer`](engine_state::rendering::ChunkRenderer). The bundled
//! binary drives a headless renderer that only records statistics.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     std::process::exit(voxel_sandbox::run(std::env::args().nth(1)));
//! }
//! ```

use application_state::{
    config::EngineConfig,
    input_state::{InputTracker, RawKeys},
    Engine,
};
use engine_state::{rendering::HeadlessRenderer, voxels::world::World};
use log::{error, info};

pub mod application_state;
pub mod core;
pub mod engine_state;
pub mod error;

/// Frames simulated by the headless demo.
const DEMO_FRAMES: u64 = 600;

/// Runs the headless demo and returns the process exit code.
///
/// # Arguments
/// * `config_path` - Optional JSON configuration file; defaults are used without one
pub fn run(config_path: Option<String>) -> i32 {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let config = match config_path {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                error!("{err}");
                return 1;
            }
        },
        None => EngineConfig::default(),
    };

    let mut world = match World::load(config) {
        Ok(world) => world,
        Err(err) => {
            error!("{err}");
            return 1;
        }
    };
    world.start_generating();

    let mut engine = Engine::new(world, HeadlessRenderer::new());
    let mut tracker = InputTracker::new();
    engine.run(DEMO_FRAMES, |frame, _| {
        // Look around, then walk forward while occasionally building
        let keys = RawKeys {
            forward: frame >= 120,
            place: frame % 90 == 45,
            destroy: frame % 90 == 0 && frame > 0,
            ..RawKeys::default()
        };
        let mouse = if frame < 120 { (4.0, 0.0) } else { (0.0, 0.0) };
        tracker.snapshot(keys, 0, mouse)
    });

    let (world, renderer) = engine.shutdown();
    info!(
        "Finished: {}, {} uploads, {} draw calls",
        world.stats(),
        renderer.uploads(),
        renderer.total_draws()
    );
    0
}

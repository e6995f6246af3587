//! # Application State Management
//!
//! The outer layer of the sandbox:
//! - Configuration loading
//! - Input snapshots
//! - The fixed-timestep game loop driving a [`World`] and a [`ChunkRenderer`]

pub mod config;
pub mod input_state;

use input_state::InputSnapshot;
use log::info;

use crate::engine_state::{rendering::ChunkRenderer, voxels::world::World};

/// Simulated seconds between two stats log lines.
const STATS_INTERVAL: f32 = 1.0;

/// Upper bound on ticks run for a single frame, so one slow frame does not
/// snowball into ever longer catch-up.
const MAX_TICKS_PER_FRAME: u32 = 8;

/// The game loop: fixed-timestep simulation plus one render per frame.
pub struct Engine<R: ChunkRenderer> {
    world: World,
    renderer: R,
    /// Frame time not yet consumed by a tick
    accumulator: f32,
    /// Total simulated time
    elapsed: f32,
    last_stats: f32,
    frames: u64,
}

impl<R: ChunkRenderer> Engine<R> {
    pub fn new(world: World, renderer: R) -> Self {
        Engine {
            world,
            renderer,
            accumulator: 0.0,
            elapsed: 0.0,
            last_stats: 0.0,
            frames: 0,
        }
    }

    /// Runs one frame that took `frame_time` seconds.
    ///
    /// # Arguments
    /// * `frame_time` - Wall time since the previous frame
    /// * `input` - This frame's input, applied to the first tick only in full
    ///
    /// # Returns
    /// The number of simulation ticks run
    pub fn frame(&mut self, frame_time: f32, input: &InputSnapshot) -> u32 {
        let step = self.world.config().fixed_timestep;
        self.accumulator += frame_time.max(0.0);
        self.world.pump_tasks();

        let mut ticks = 0;
        let mut tick_input = *input;
        while self.accumulator >= step && ticks < MAX_TICKS_PER_FRAME {
            self.world.simulate(step, &tick_input);
            tick_input = tick_input.repeat_tick();
            self.accumulator -= step;
            self.elapsed += step;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator = self.accumulator.min(step);
        }

        self.renderer.begin_frame();
        self.world.render(&mut self.renderer);
        self.frames += 1;

        if self.elapsed - self.last_stats >= STATS_INTERVAL {
            self.last_stats = self.elapsed;
            info!("{}", self.world.stats());
        }
        ticks
    }

    /// Runs `frames` frames of exactly one fixed timestep each.
    ///
    /// `script` produces the input of every frame from the frame number and
    /// the world as it stands before the frame.
    pub fn run<S>(&mut self, frames: u64, mut script: S)
    where
        S: FnMut(u64, &World) -> InputSnapshot,
    {
        let step = self.world.config().fixed_timestep;
        for _ in 0..frames {
            let input = script(self.frames, &self.world);
            self.frame(step, &input);
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Total simulated time in seconds.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Stops the workers and hands back the world and renderer.
    pub fn shutdown(mut self) -> (World, R) {
        self.world.stop_generating();
        (self.world, self.renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::{HeadlessRenderer, TextureAtlas};
    use config::EngineConfig;

    fn engine() -> Engine<HeadlessRenderer> {
        let config = EngineConfig {
            view_distance: 1,
            worker_count: 1,
            ..EngineConfig::default()
        };
        let mut world = World::new(config, TextureAtlas::placeholder(6));
        world.start_generating();
        Engine::new(world, HeadlessRenderer::new())
    }

    #[test]
    fn frame_runs_whole_ticks_only() {
        let mut engine = engine();
        let step = engine.world().config().fixed_timestep;
        assert_eq!(engine.frame(step * 3.5, &InputSnapshot::default()), 3);
        assert_eq!(engine.frame(step * 0.6, &InputSnapshot::default()), 1);
        assert_eq!(engine.frames(), 2);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut engine = engine();
        let step = engine.world().config().fixed_timestep;
        assert_eq!(engine.frame(step * 100.0, &InputSnapshot::default()), MAX_TICKS_PER_FRAME);
        assert!(engine.frame(0.0, &InputSnapshot::default()) <= 1);
    }

    #[test]
    fn run_draws_every_frame() {
        let mut engine = engine();
        engine.world_mut().wait_until_idle();
        let step = engine.world().config().fixed_timestep;
        let mut draws = 0;
        for _ in 0..5 {
            engine.frame(step, &InputSnapshot::default());
            assert_eq!(engine.renderer().frame_draws(), engine.world().viewable().len());
            draws += engine.renderer().frame_draws();
        }
        engine.run(3, |_, _| InputSnapshot::default());

        assert_eq!(engine.frames(), 8);
        assert!(draws > 0);
        let (world, renderer) = engine.shutdown();
        assert!(renderer.total_draws() >= draws);
        assert!(renderer.uploads() <= world.chunk_count());
    }
}

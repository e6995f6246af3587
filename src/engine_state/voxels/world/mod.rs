//! # World Module
//!
//! The `World` owns every chunk, the worker pool that generates and meshes
//! them, the physics world and the player camera.
//!
//! ## Chunk Lifecycle
//!
//! A chunk is created the first time the world needs its coordinate, either
//! from [`World::start_generating`] or when the visibility pass reaches a
//! coordinate with no chunk. Creation inserts it into the map and publishes a
//! generation task whose result chains the first mesh build. Chunks are never
//! evicted; they are all freed together when the world is dropped, after the
//! worker pool has been joined.
//!
//! ## Threading
//!
//! The chunk map, the physics world and the camera are only touched from the
//! thread that owns the `World`. Workers see nothing but the `Arc<Chunk>` their
//! task captured.
//!
//! The rest of the world is split by concern:
//! - `visibility`: the per-frame visible set and light gathering
//! - `editing`: block placement and removal
//! - `movement`: player movement and collision

mod editing;
mod movement;
mod visibility;

use std::{collections::HashMap, fmt, sync::Arc};

use cgmath::{Deg, EuclideanSpace, Point3, Vector3};
use log::{debug, info};

use crate::{
    application_state::{config::EngineConfig, input_state::InputSnapshot},
    core::MtResource,
    engine_state::{
        camera_state::{Camera, Projection},
        physics::{BodyHandle, PhysicsWorld},
        rendering::{ChunkDrawCall, ChunkRenderer, DrawMode, LightArray, TextureAtlas},
        task_management::TaskManager,
        voxels::{
            block::{block_type::BlockType, Block, BlockTypeSize},
            chunk::{Chunk, ChunkPosition},
            tasks::chunk_generation_task::ChunkGenerationTask,
            terrain::TerrainGenerator,
        },
    },
    error::EngineError,
};

const DEFAULT_VIEWPORT: (u32, u32) = (1280, 720);

/// Statistics about the current frame, as shown on the debug panel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldStats {
    pub visible_chunks: usize,
    pub visible_quads: usize,
    pub total_chunks: usize,
    pub ready_chunks: usize,
    pub camera_position: [f32; 3],
    pub selected_block: BlockTypeSize,
}

impl fmt::Display for WorldStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.camera_position;
        write!(
            f,
            "{} / {} chunks visible ({} ready), {} quads, camera ({x:.1}, {y:.1}, {z:.1}), block {}",
            self.visible_chunks,
            self.total_chunks,
            self.ready_chunks,
            self.visible_quads,
            self.selected_block
        )
    }
}

/// Represents the voxel world: chunks, workers, physics and the player.
pub struct World {
    config: EngineConfig,
    atlas: TextureAtlas,
    generator: TerrainGenerator,
    /// Every chunk, keyed by chunk-grid coordinate
    chunks: HashMap<ChunkPosition, Arc<Chunk>>,
    /// Keys of the chunks drawn this frame, recomputed every frame
    viewable: Vec<ChunkPosition>,
    task_manager: TaskManager,
    physics: MtResource<PhysicsWorld>,
    player: BodyHandle,
    camera: Camera,
    projection: Projection,
    /// Chunk currently holding the ground plane
    ground_chunk: Option<ChunkPosition>,
    /// Block type placed by `place_block`
    selected: BlockTypeSize,
    stopped: bool,
}

impl World {
    /// Loads the texture atlas named by `config` and builds a world around it.
    ///
    /// # Errors
    /// Fails if the texture directory cannot be read or holds no usable images.
    pub fn load(config: EngineConfig) -> Result<Self, EngineError> {
        let atlas = TextureAtlas::load_dir(&config.texture_directory)?;
        Ok(Self::new(config, atlas))
    }

    /// Creates a world with no chunks.
    ///
    /// Spawns the worker threads, the physics world and the player body.
    /// Nothing is generated until [`World::start_generating`] or the first
    /// visibility pass.
    pub fn new(config: EngineConfig, atlas: TextureAtlas) -> Self {
        let physics = MtResource::new(PhysicsWorld::new(config.physics.fixed_substep));
        let camera = Camera::new(&config.camera);
        let player = BodyHandle::player(&physics, camera.position.to_vec());
        let projection = Projection::new(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1, Deg(config.camera.fov_degrees));

        info!(
            "Creating world: view distance {}, {} workers, {} texture layers",
            config.view_distance,
            config.worker_count,
            atlas.layer_count()
        );

        World {
            generator: TerrainGenerator::new(config.terrain_seed),
            task_manager: TaskManager::new(config.worker_count),
            chunks: HashMap::new(),
            viewable: Vec::new(),
            physics,
            player,
            camera,
            projection,
            ground_chunk: None,
            selected: 0,
            stopped: false,
            atlas,
            config,
        }
    }

    /// Creates and enqueues every chunk within the view distance of the origin.
    pub fn start_generating(&mut self) {
        let radius = self.config.view_distance;
        let spawned = ChunkPosition::new(0, 0)
            .square(radius)
            .filter(|&position| self.spawn_chunk(position))
            .count();
        info!("Started generating {spawned} chunks");
    }

    /// Creates the chunk at `position` and enqueues its generation.
    ///
    /// Does nothing if a chunk is already mapped there, whatever its state.
    /// Returns whether a chunk was created.
    fn spawn_chunk(&mut self, position: ChunkPosition) -> bool {
        if self.stopped || self.chunks.contains_key(&position) {
            return false;
        }
        let chunk = Arc::new(Chunk::new(position));
        self.chunks.insert(position, chunk.clone());
        self.task_manager
            .publish_task(Box::new(ChunkGenerationTask::new(chunk, self.generator)));
        true
    }

    /// Joins every worker thread. No task runs after this returns.
    ///
    /// Tasks still waiting in the queue are discarded, so their chunks stay
    /// generating. Safe to call more than once. Also runs when the world is
    /// dropped, before any chunk is freed.
    pub fn stop_generating(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.task_manager.shutdown();
        info!("Stopped generating with {} chunks", self.chunks.len());
    }

    /// Hands queued tasks to idle workers and handles finished ones.
    ///
    /// Called once per frame. Never blocks.
    pub fn pump_tasks(&mut self) {
        self.task_manager.process_completed_tasks();
        self.task_manager.process_queued_tasks();
    }

    /// Blocks until every published task, including chained follow-ups, has
    /// finished and its result has been handled.
    pub fn wait_until_idle(&mut self) {
        self.task_manager.wait_idle();
    }

    pub fn is_idle(&self) -> bool {
        self.task_manager.is_idle()
    }

    /// Advances the player by one tick.
    ///
    /// Applies the frame's one-shot actions (place, destroy, add light,
    /// scroll), turns the mouse delta into rotation, resolves movement into a
    /// velocity, steps physics and moves the camera to the player body.
    pub fn simulate(&mut self, dt: f32, input: &InputSnapshot) {
        self.apply_actions(input);

        let (dx, dy) = input.mouse_delta;
        if dx != 0.0 || dy != 0.0 {
            self.camera.rotate(dx, dy);
        }

        self.player_movement(input);

        let substeps = self
            .physics
            .get_mut()
            .step(dt, self.config.physics.max_substeps);
        if let Some(position) = self.player.translation() {
            self.camera.sync_from_body(position);
        }
        debug!("Simulated {dt:.4}s in {substeps} physics substeps");
    }

    fn apply_actions(&mut self, input: &InputSnapshot) {
        if input.scroll != 0 {
            self.scroll_selection(input.scroll);
        }
        if input.place.is_just_pressed() {
            self.place_block();
        }
        if input.destroy.is_just_pressed() {
            self.destroy_block();
        }
        if input.add_light.is_just_pressed() {
            self.add_light_at_camera();
        }
    }

    /// Draws every visible chunk through `renderer`.
    ///
    /// Recomputes the visible set, uploads meshes that finished since the last
    /// frame, gathers each chunk's lights and issues one draw call per chunk.
    /// Finally moves the ground plane under the player.
    pub fn render(&mut self, renderer: &mut dyn ChunkRenderer) {
        self.update_viewable();

        let view_projection = self.projection.calc_matrix() * self.camera.view_matrix();
        let mode = if self.config.wireframe {
            DrawMode::Lines
        } else {
            DrawMode::Triangles
        };

        for &position in &self.viewable {
            let Some(chunk) = self.chunks.get(&position) else {
                continue;
            };

            if let Some(mesh) = chunk.take_pending_mesh() {
                renderer.upload_mesh(position, &mesh);
                chunk.set_uploaded_quads(mesh.quad_count());
            }

            let lights = LightArray::pack(&self.gather_lights(position), &self.config.lighting);
            renderer.draw_chunk(&ChunkDrawCall {
                position,
                model: position.model_matrix(),
                view_projection,
                vertex_count: chunk.uploaded_quads() * 6,
                mode,
                lights: &lights,
                ambient: self.config.lighting.ambient,
            });
        }

        self.sync_ground_plane();
    }

    /// Gives the player's chunk a ground plane and takes it away from the
    /// chunk the player left.
    fn sync_ground_plane(&mut self) {
        let current = self.camera_chunk();
        if self.ground_chunk == Some(current) {
            return;
        }

        if let Some(previous) = self.ground_chunk.take() {
            if let Some(chunk) = self.chunks.get(&previous) {
                chunk.clear_ground_plane();
                debug!("Dropped ground plane of chunk ({}, {})", previous.x, previous.z);
            }
        }

        if let Some(chunk) = self.chunks.get(&current) {
            if !chunk.has_ground_plane() {
                chunk.set_ground_plane(BodyHandle::ground_plane(&self.physics, current));
            }
            self.ground_chunk = Some(current);
        }
    }

    /// Moves the block selection by `dy`, clamped to the atlas layers.
    pub fn scroll_selection(&mut self, dy: i32) {
        let max = self.atlas.layer_count().saturating_sub(1) as i32;
        let next = (self.selected as i32 - dy).clamp(0, max.min(BlockTypeSize::MAX as i32 - 1));
        self.selected = next as BlockTypeSize;
    }

    /// The block `place_block` puts down.
    pub fn selected_block(&self) -> Block {
        Block(self.selected)
    }

    /// Selects a block type directly.
    pub fn select(&mut self, block_type: BlockType) {
        self.selected = Block::new(block_type).0;
    }

    /// The chunk containing the camera.
    pub fn camera_chunk(&self) -> ChunkPosition {
        ChunkPosition::from_world(self.camera.position.x, self.camera.position.z)
    }

    pub fn chunk(&self, position: ChunkPosition) -> Option<&Arc<Chunk>> {
        self.chunks.get(&position)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Moves the camera and the player body to `position`.
    pub fn teleport(&mut self, position: Point3<f32>) {
        self.camera.position = position;
        self.player.set_translation(position.to_vec());
        self.player.set_linear_velocity(Vector3::new(0.0, 0.0, 0.0));
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn physics(&self) -> &MtResource<PhysicsWorld> {
        &self.physics
    }

    pub fn atlas(&self) -> &TextureAtlas {
        &self.atlas
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Chunk position holding the ground plane, if any.
    pub fn ground_chunk(&self) -> Option<ChunkPosition> {
        self.ground_chunk
    }

    /// Resizes the viewport used for the projection matrix.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    /// Current frame statistics.
    pub fn stats(&self) -> WorldStats {
        let visible_quads = self
            .viewable
            .iter()
            .filter_map(|position| self.chunks.get(position))
            .map(|chunk| chunk.uploaded_quads())
            .sum();
        let ready_chunks = self
            .chunks
            .values()
            .filter(|chunk| !chunk.is_generating())
            .count();

        WorldStats {
            visible_chunks: self.viewable.len(),
            visible_quads,
            total_chunks: self.chunks.len(),
            ready_chunks,
            camera_position: self.camera.position.into(),
            selected_block: self.selected,
        }
    }
}

impl Drop for World {
    fn drop(&mut self) {
        self.stop_generating();
    }
}

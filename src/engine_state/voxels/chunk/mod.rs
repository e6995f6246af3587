//! # Chunk Module
//!
//! A chunk is a 16×256×16 column of voxels: the unit of generation, meshing,
//! visibility and lighting.
//!
//! ## Threading
//!
//! Chunks are shared as `Arc<Chunk>` between the main thread and the worker
//! tasks that captured them. Each piece of state has its own guard:
//!
//! * `blocks`: written by terrain generation (worker, before the chunk is
//!   ever visible) and by edits (main thread). A rebuild copies the grid under
//!   the read lock and meshes the copy, so it always sees a fully written grid.
//!   Every write bumps `grid_version` while the write lock is held, so a copy
//!   and the version read with it always agree.
//! * `mesh`: the finished mesh is stored by the worker, then `upload_pending`
//!   is raised with release ordering. The render thread only takes the mesh
//!   after observing the flag. Rebuilds of one chunk may overlap on different
//!   workers; a mesh is only stored if its grid version is newer than the last
//!   one stored, so an older grid never replaces a newer mesh.
//! * `generating`: cleared exactly once, by the worker, after the first mesh.
//! * `lights` and `ground`: main thread only. The locks exist so the chunk
//!   stays `Sync`.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use cgmath::{Matrix4, Vector3};
use log::debug;
use web_time::Instant;

use crate::engine_state::{
    physics::BodyHandle,
    rendering::meshing::{greedy, ChunkMesh},
};

use super::{block::Block, lighting::PointLight, terrain::TerrainGenerator};

mod grid;

pub use grid::BlockGrid;

/// Horizontal extent (x and z) of a chunk in blocks.
pub const CHUNK_WIDTH: usize = 16;
/// Vertical extent (y) of a chunk in blocks.
pub const CHUNK_HEIGHT: usize = 256;
/// The number of blocks in a single horizontal layer.
pub const CHUNK_LAYER_SIZE: usize = CHUNK_WIDTH * CHUNK_WIDTH;
/// The total number of blocks in a chunk.
pub const CHUNK_VOLUME: usize = CHUNK_LAYER_SIZE * CHUNK_HEIGHT;

/// Position of a chunk on the horizontal chunk grid.
///
/// World block `x` belongs to chunk `floor(x / 16)`, so x in [-16, -1] maps to
/// chunk -1 and x in [0, 15] to chunk 0.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPosition {
    pub x: i32,
    pub z: i32,
}

impl ChunkPosition {
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkPosition { x, z }
    }

    /// The chunk containing the integer block column (x, z).
    pub fn from_block(x: i32, z: i32) -> Self {
        ChunkPosition {
            x: x.div_euclid(CHUNK_WIDTH as i32),
            z: z.div_euclid(CHUNK_WIDTH as i32),
        }
    }

    /// The chunk containing the world-space point (x, _, z).
    pub fn from_world(x: f32, z: f32) -> Self {
        Self::from_block(x.floor() as i32, z.floor() as i32)
    }

    /// World-space coordinates of this chunk's (0, 0, 0) corner.
    pub fn world_origin(self) -> Vector3<f32> {
        Vector3::new(
            (self.x * CHUNK_WIDTH as i32) as f32,
            0.0,
            (self.z * CHUNK_WIDTH as i32) as f32,
        )
    }

    /// Model transform handed to the renderer.
    pub fn model_matrix(self) -> Matrix4<f32> {
        Matrix4::from_translation(self.world_origin())
    }

    /// Chebyshev distance on the chunk grid.
    pub fn chebyshev_distance(self, other: ChunkPosition) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// Every position within `radius` (Chebyshev) of this one, row by row.
    pub fn square(self, radius: i32) -> impl Iterator<Item = ChunkPosition> {
        (self.x - radius..=self.x + radius).flat_map(move |x| {
            (self.z - radius..=self.z + radius).map(move |z| ChunkPosition::new(x, z))
        })
    }
}

/// Coordinates of a voxel inside its chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LocalCoords {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl LocalCoords {
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        LocalCoords { x, y, z }
    }
}

/// Splits an integer world block coordinate into its chunk and local voxel.
///
/// Returns `None` above or below the grid.
pub fn split_world_block(x: i32, y: i32, z: i32) -> Option<(ChunkPosition, LocalCoords)> {
    if !(0..CHUNK_HEIGHT as i32).contains(&y) {
        return None;
    }
    let width = CHUNK_WIDTH as i32;
    Some((
        ChunkPosition::from_block(x, z),
        LocalCoords::new(
            x.rem_euclid(width) as usize,
            y as usize,
            z.rem_euclid(width) as usize,
        ),
    ))
}

/// Lifecycle of a chunk's contents.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Allocated, no terrain yet
    Uninitialized = 0,
    /// Terrain generation running on a worker
    Generating = 1,
    /// Greedy meshing running on a worker
    Meshing = 2,
    /// A complete mesh has been produced for the current grid
    Ready = 3,
}

impl ChunkState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ChunkState::Uninitialized,
            1 => ChunkState::Generating,
            2 => ChunkState::Meshing,
            _ => ChunkState::Ready,
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mesh hand-off between rebuild tasks and the render thread.
#[derive(Default)]
struct MeshSlot {
    /// Mesh waiting for upload
    pending: Option<ChunkMesh>,
    /// Grid version of the newest mesh stored so far
    version: Option<u64>,
    /// Rebuilds currently running
    builds: usize,
}

/// One column of terrain plus everything derived from it.
pub struct Chunk {
    position: ChunkPosition,
    blocks: RwLock<BlockGrid>,
    /// Bumped on every grid write
    grid_version: AtomicU64,
    mesh: Mutex<MeshSlot>,
    lights: RwLock<Vec<PointLight>>,
    state: AtomicU8,
    generating: AtomicBool,
    upload_pending: AtomicBool,
    uploaded_quads: AtomicUsize,
    ground: Mutex<Option<BodyHandle>>,
}

impl Chunk {
    /// An empty chunk waiting for generation.
    pub fn new(position: ChunkPosition) -> Self {
        Self::with_grid(position, BlockGrid::new())
    }

    /// A chunk whose grid is already populated. It still counts as generating
    /// until its first [`Chunk::build`].
    pub fn with_grid(position: ChunkPosition, grid: BlockGrid) -> Self {
        Chunk {
            position,
            blocks: RwLock::new(grid),
            grid_version: AtomicU64::new(0),
            mesh: Mutex::new(MeshSlot::default()),
            lights: RwLock::new(Vec::new()),
            state: AtomicU8::new(ChunkState::Uninitialized as u8),
            generating: AtomicBool::new(true),
            upload_pending: AtomicBool::new(false),
            uploaded_quads: AtomicUsize::new(0),
            ground: Mutex::new(None),
        }
    }

    pub fn position(&self) -> ChunkPosition {
        self.position
    }

    pub fn state(&self) -> ChunkState {
        ChunkState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: ChunkState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// `true` until the first mesh has been produced. Never blocks.
    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::Acquire)
    }

    /// Fills the grid from the terrain generator.
    ///
    /// The new grid is built off to the side and swapped in, so the write lock
    /// is only held for the swap.
    pub fn generate(&self, generator: &TerrainGenerator) {
        self.set_state(ChunkState::Generating);
        let start = Instant::now();

        let mut grid = BlockGrid::new();
        generator.fill(self.position, &mut grid);
        {
            let mut blocks = write(&self.blocks);
            *blocks = grid;
            self.grid_version.fetch_add(1, Ordering::AcqRel);
        }

        debug!(
            "Generated chunk ({}, {}) in {:?}",
            self.position.x,
            self.position.z,
            start.elapsed()
        );
    }

    /// Greedy-meshes the current grid and publishes the mesh for upload.
    ///
    /// The mesh is dropped instead if another rebuild already published one
    /// from the same or a newer grid. Returns the number of quads produced.
    pub fn build(&self) -> usize {
        {
            let mut slot = lock(&self.mesh);
            slot.builds += 1;
            self.set_state(ChunkState::Meshing);
        }

        let (snapshot, version) = {
            let blocks = read(&self.blocks);
            (blocks.clone(), self.grid_version.load(Ordering::Acquire))
        };
        let mesh = greedy(&snapshot);
        let quads = mesh.quad_count();

        let mut slot = lock(&self.mesh);
        if slot.version.map_or(true, |published| version > published) {
            slot.pending = Some(mesh);
            slot.version = Some(version);
            self.upload_pending.store(true, Ordering::Release);
        } else {
            debug!(
                "Dropped stale mesh of chunk ({}, {}) at grid version {version}",
                self.position.x, self.position.z
            );
        }

        slot.builds -= 1;
        if slot.builds == 0 {
            self.set_state(ChunkState::Ready);
        }
        self.generating.store(false, Ordering::Release);
        quads
    }

    /// `true` when a mesh is waiting to be uploaded.
    pub fn upload_pending(&self) -> bool {
        self.upload_pending.load(Ordering::Acquire)
    }

    /// Takes the mesh waiting for upload, clearing the pending flag.
    pub fn take_pending_mesh(&self) -> Option<ChunkMesh> {
        if self.upload_pending.swap(false, Ordering::AcqRel) {
            lock(&self.mesh).pending.take()
        } else {
            None
        }
    }

    /// Quads in the mesh most recently uploaded by the render thread.
    pub fn uploaded_quads(&self) -> usize {
        self.uploaded_quads.load(Ordering::Relaxed)
    }

    pub fn set_uploaded_quads(&self, quads: usize) {
        self.uploaded_quads.store(quads, Ordering::Relaxed);
    }

    pub fn block(&self, coords: LocalCoords) -> Block {
        read(&self.blocks).get(coords)
    }

    /// Replaces a block and returns the previous one. Does not remesh.
    pub fn set_block(&self, coords: LocalCoords, block: Block) -> Block {
        let mut blocks = write(&self.blocks);
        self.grid_version.fetch_add(1, Ordering::AcqRel);
        blocks.set(coords, block)
    }

    /// Number of writes the grid has seen.
    pub fn grid_version(&self) -> u64 {
        self.grid_version.load(Ordering::Acquire)
    }

    /// Whether a solid block sits at the local coordinates. Outside the chunk is empty.
    pub fn occupied(&self, x: i32, y: i32, z: i32) -> bool {
        read(&self.blocks).occupied(x, y, z)
    }

    /// A copy of the current grid.
    pub fn grid_snapshot(&self) -> BlockGrid {
        read(&self.blocks).clone()
    }

    pub fn lights(&self) -> Vec<PointLight> {
        read(&self.lights).clone()
    }

    pub fn light_count(&self) -> usize {
        read(&self.lights).len()
    }

    /// Appends this chunk's lights to `out`.
    pub fn extend_lights(&self, out: &mut Vec<PointLight>) {
        out.extend_from_slice(&read(&self.lights));
    }

    pub fn add_light(&self, light: PointLight) {
        write(&self.lights).push(light);
    }

    /// Removes the first light placed at exactly `light`'s position.
    ///
    /// Other lights at the same position stay. Returns whether one was removed.
    pub fn remove_light(&self, light: &PointLight) -> bool {
        let mut lights = write(&self.lights);
        match lights.iter().position(|l| l.position == light.position) {
            Some(index) => {
                lights.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn has_ground_plane(&self) -> bool {
        lock(&self.ground).is_some()
    }

    pub fn set_ground_plane(&self, plane: BodyHandle) {
        *lock(&self.ground) = Some(plane);
    }

    /// Drops the ground plane, unregistering it from the physics world.
    pub fn clear_ground_plane(&self) -> bool {
        lock(&self.ground).take().is_some()
    }
}

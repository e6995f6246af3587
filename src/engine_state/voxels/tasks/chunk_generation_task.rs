//! # Chunk Generation Task
//!
//! Defines the `ChunkGenerationTask` which fills a freshly created chunk with
//! terrain. Its result schedules the chunk's first mesh build, so generation
//! always precedes meshing.

use std::sync::Arc;

use crate::engine_state::{
    rendering::tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask,
    task_management::task::{Task, TaskResult},
    voxels::{chunk::Chunk, terrain::TerrainGenerator},
};

/// A task that generates chunk data asynchronously.
///
/// This task is responsible for:
/// 1. Generating the terrain of the captured chunk
/// 2. Scheduling mesh generation for the chunk
pub struct ChunkGenerationTask {
    /// The chunk to populate. Tasks never touch the world's chunk map.
    chunk: Arc<Chunk>,
    generator: TerrainGenerator,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `chunk` - A freshly created chunk
    /// * `generator` - The world's terrain generator
    ///
    /// # Returns
    /// A new `ChunkGenerationTask` instance
    pub fn new(chunk: Arc<Chunk>, generator: TerrainGenerator) -> Self {
        ChunkGenerationTask { chunk, generator }
    }
}

impl Task for ChunkGenerationTask {
    /// Generates the chunk's terrain.
    ///
    /// # Returns
    /// A boxed `TaskResult` carrying the chunk on to meshing
    fn process(self: Box<Self>) -> Box<dyn TaskResult> {
        self.chunk.generate(&self.generator);
        Box::new(ChunkGenerationTaskResult { chunk: self.chunk })
    }
}

/// The result of a chunk generation task.
pub struct ChunkGenerationTaskResult {
    chunk: Arc<Chunk>,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Schedules the first mesh build of the generated chunk.
    ///
    /// # Returns
    /// A vector with the follow-up mesh generation task
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task>> {
        vec![Box::new(ChunkMeshGenerationTask::new(self.chunk))]
    }
}

//! Task for (re)building a chunk's mesh on a worker thread.
//!
//! Scheduled once after terrain generation and again after every block edit.
//! Two rebuilds of the same chunk may run at once on different workers. Each
//! meshes whatever the grid holds when it starts, and only the mesh of the
//! newer grid is kept.

use std::{sync::Arc, time::Duration};

use log::debug;
use web_time::Instant;

use crate::engine_state::{
    task_management::task::{Task, TaskResult},
    voxels::chunk::{Chunk, ChunkPosition},
};

/// A task that greedy-meshes one chunk.
pub struct ChunkMeshGenerationTask {
    /// The chunk to mesh, captured when the task was published
    chunk: Arc<Chunk>,
}

impl ChunkMeshGenerationTask {
    /// Creates a new chunk mesh generation task.
    ///
    /// # Arguments
    /// * `chunk` - The chunk that needs meshing
    ///
    /// # Returns
    /// A new `ChunkMeshGenerationTask` instance
    pub fn new(chunk: Arc<Chunk>) -> Self {
        ChunkMeshGenerationTask { chunk }
    }
}

impl Task for ChunkMeshGenerationTask {
    /// Builds the mesh and flags it for upload.
    ///
    /// # Returns
    /// A boxed `TaskResult` reporting the quad count and build time
    fn process(self: Box<Self>) -> Box<dyn TaskResult> {
        let start = Instant::now();
        let quads = self.chunk.build();

        Box::new(ChunkMeshGenerationTaskResult {
            position: self.chunk.position(),
            quads,
            elapsed: start.elapsed(),
        })
    }
}

/// The result of a chunk mesh generation task.
pub struct ChunkMeshGenerationTaskResult {
    position: ChunkPosition,
    quads: usize,
    elapsed: Duration,
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    /// Logs the build. The mesh itself is picked up by the render path.
    ///
    /// # Returns
    /// An empty vector (no follow-up tasks)
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task>> {
        debug!(
            "Chunk ({}, {}) meshed into {} quads in {:?}",
            self.position.x, self.position.z, self.quads, self.elapsed
        );
        Vec::new()
    }
}

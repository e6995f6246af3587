//! A renderer that draws nothing and keeps statistics instead.

use std::collections::HashMap;

use log::trace;

use crate::engine_state::voxels::chunk::ChunkPosition;

use super::{
    meshing::ChunkMesh,
    renderer::{ChunkDrawCall, ChunkRenderer},
};

/// Records uploads and draw calls.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    /// Vertex count of the last mesh uploaded per chunk
    meshes: HashMap<ChunkPosition, usize>,
    uploads: usize,
    frame_draws: usize,
    frame_vertices: usize,
    total_draws: usize,
    max_lights: usize,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> usize {
        self.uploads
    }

    pub fn uploaded_chunks(&self) -> usize {
        self.meshes.len()
    }

    pub fn uploaded_vertices(&self, position: ChunkPosition) -> Option<usize> {
        self.meshes.get(&position).copied()
    }

    pub fn frame_draws(&self) -> usize {
        self.frame_draws
    }

    pub fn frame_vertices(&self) -> usize {
        self.frame_vertices
    }

    pub fn total_draws(&self) -> usize {
        self.total_draws
    }

    /// Most lights seen in any single draw call.
    pub fn max_lights(&self) -> usize {
        self.max_lights
    }
}

impl ChunkRenderer for HeadlessRenderer {
    fn begin_frame(&mut self) {
        self.frame_draws = 0;
        self.frame_vertices = 0;
    }

    fn upload_mesh(&mut self, position: ChunkPosition, mesh: &ChunkMesh) {
        trace!(
            "Uploading {} vertices for chunk ({}, {})",
            mesh.vertex_count(),
            position.x,
            position.z
        );
        self.meshes.insert(position, mesh.vertex_count());
        self.uploads += 1;
    }

    fn draw_chunk(&mut self, call: &ChunkDrawCall<'_>) {
        self.frame_draws += 1;
        self.total_draws += 1;
        self.frame_vertices += call.vertex_count;
        self.max_lights = self.max_lights.max(call.lights.len());
    }
}

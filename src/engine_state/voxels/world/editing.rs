//! Block placement and removal.
//!
//! Every successful edit enqueues a rebuild of the edited chunk before it
//! returns, so the rebuild always starts after the edit. Two quick edits may
//! have their rebuilds finish in either order; the chunk keeps the mesh of the
//! newer grid.

use cgmath::{EuclideanSpace, Vector3};
use log::debug;

use crate::engine_state::{
    rendering::tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask,
    voxels::{
        block::{block_type::BlockType, Block},
        chunk::split_world_block,
        lighting::PointLight,
    },
};

use super::World;

/// Distance between samples when marching along the camera's view.
const REACH_STEP: f32 = 0.25;
/// Samples taken by `place_block`, from farthest to nearest (4.0 down to 0.25).
const PLACE_SAMPLES: u32 = 16;
/// Samples taken by `destroy_block`, from nearest to farthest (0.0 up to 4.75).
const DESTROY_SAMPLES: u32 = 20;

/// The light emitted by a lamp occupying the given block.
fn lamp_light(x: i32, y: i32, z: i32) -> PointLight {
    PointLight::at(x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5)
}

fn floor_block(point: Vector3<f32>) -> [i32; 3] {
    [
        point.x.floor() as i32,
        point.y.floor() as i32,
        point.z.floor() as i32,
    ]
}

impl World {
    /// Puts `block` at world block coordinates (x, y, z) and rebuilds the chunk.
    ///
    /// A lamp also registers a light at the block's center; replacing a lamp
    /// removes its light. Returns `false` without doing anything when the
    /// coordinate is outside the vertical range, has no chunk, or its chunk is
    /// still generating.
    pub fn set_block_at(&mut self, x: i32, y: i32, z: i32, block: Block) -> bool {
        let Some((position, local)) = split_world_block(x, y, z) else {
            debug!("Edit at ({x}, {y}, {z}) is outside the world");
            return false;
        };
        let Some(chunk) = self.chunks.get(&position).cloned() else {
            debug!("Edit at ({x}, {y}, {z}) hit no chunk");
            return false;
        };
        if chunk.is_generating() {
            debug!("Edit at ({x}, {y}, {z}) skipped, chunk still generating");
            return false;
        }

        let previous = chunk.set_block(local, block);
        if previous.block_type().is_some_and(BlockType::is_light_source) {
            chunk.remove_light(&lamp_light(x, y, z));
        }
        if block.block_type().is_some_and(BlockType::is_light_source) {
            chunk.add_light(lamp_light(x, y, z));
        }

        self.task_manager
            .publish_task(Box::new(ChunkMeshGenerationTask::new(chunk)));
        true
    }

    /// Clears the block at world block coordinates (x, y, z).
    ///
    /// Returns the removed block, or `None` if there was nothing to remove or
    /// the edit was skipped.
    pub fn remove_block_at(&mut self, x: i32, y: i32, z: i32) -> Option<Block> {
        let block = self.block_at(x, y, z)?;
        if block.is_air() {
            return None;
        }
        self.set_block_at(x, y, z, Block::AIR).then_some(block)
    }

    /// The block at world block coordinates, if a chunk is mapped there.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        let (position, local) = split_world_block(x, y, z)?;
        self.chunks.get(&position).map(|chunk| chunk.block(local))
    }

    /// Places the selected block in the farthest air cell within reach.
    ///
    /// Marches back from 4 blocks along the view direction toward the camera.
    /// Returns the coordinates of the placed block.
    pub fn place_block(&mut self) -> Option<[i32; 3]> {
        let origin = self.camera.position.to_vec();
        let front = self.camera.front;
        let block = self.selected_block();

        for step in (1..=PLACE_SAMPLES).rev() {
            let [x, y, z] = floor_block(origin + front * (step as f32 * REACH_STEP));
            if self.block_at(x, y, z).is_some_and(Block::is_air) {
                return self.set_block_at(x, y, z, block).then_some([x, y, z]);
            }
        }
        None
    }

    /// Removes the nearest destructible block within reach.
    ///
    /// Marches out from the camera along the view direction. Bedrock is
    /// skipped over, not treated as a stop. Returns the coordinates and the
    /// removed block.
    pub fn destroy_block(&mut self) -> Option<([i32; 3], Block)> {
        let origin = self.camera.position.to_vec();
        let front = self.camera.front;

        for step in 0..DESTROY_SAMPLES {
            let [x, y, z] = floor_block(origin + front * (step as f32 * REACH_STEP));
            let Some(block) = self.block_at(x, y, z) else {
                continue;
            };
            let destructible = block
                .block_type()
                .map_or(true, BlockType::is_destructible);
            if block.is_solid() && destructible {
                return self.remove_block_at(x, y, z).map(|removed| ([x, y, z], removed));
            }
        }
        None
    }

    /// Adds a free-standing light at the camera to the camera's chunk.
    pub fn add_light_at_camera(&mut self) -> bool {
        let Some(chunk) = self.chunks.get(&self.camera_chunk()) else {
            return false;
        };
        let p = self.camera.position;
        chunk.add_light(PointLight::at(p.x, p.y, p.z));
        true
    }
}

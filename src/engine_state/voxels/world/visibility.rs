//! Per-frame visible set and light gathering.

use cgmath::{EuclideanSpace, InnerSpace, Rad, Vector3};

use crate::engine_state::voxels::{
    chunk::{ChunkPosition, CHUNK_HEIGHT, CHUNK_WIDTH},
    lighting::PointLight,
};

use super::World;

/// Chebyshev radius of neighboring chunks whose lights reach a chunk.
pub const LIGHT_RADIUS: i32 = 2;

/// Altitude below which the view cone keeps its widest factor.
const CONE_BASE_ALTITUDE: f32 = 50.0;
/// Smallest multiplier applied to the field of view.
const MIN_CONE_FACTOR: f32 = 1.5;

impl World {
    /// Half-angle multiplier of the visibility cone at the camera's altitude.
    ///
    /// `max((y - 50) / 50, 1.5)`: constant near the ground, growing with
    /// altitude so a high camera looking at the horizon still keeps the
    /// ground below it.
    pub fn cone_factor(&self) -> f32 {
        ((self.camera.position.y - CONE_BASE_ALTITUDE) / CONE_BASE_ALTITUDE).max(MIN_CONE_FACTOR)
    }

    /// Whether `point` lies inside the camera's coarse view cone.
    ///
    /// Compares the angle between the direction to the point and the camera's
    /// horizontal forward vector with the scaled field of view.
    pub fn point_viewable(&self, point: Vector3<f32>) -> bool {
        let offset = point - self.camera.position.to_vec();
        if offset.magnitude2() <= f32::EPSILON {
            return true;
        }

        let cos = offset.normalize().dot(self.camera.horizontal_front()).clamp(-1.0, 1.0);
        let angle = cos.acos();
        angle <= self.cone_factor() * Rad::from(self.camera.fov).0
    }

    /// Whether any of the chunk's sample points is inside the view cone.
    ///
    /// Samples the four ground-level corners and the mid-height point above
    /// the chunk's origin corner.
    pub fn chunk_viewable(&self, position: ChunkPosition) -> bool {
        let origin = position.world_origin();
        let w = CHUNK_WIDTH as f32;
        [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(w, 0.0, 0.0),
            Vector3::new(0.0, 0.0, w),
            Vector3::new(w, 0.0, w),
            Vector3::new(0.0, CHUNK_HEIGHT as f32 / 2.0, 0.0),
        ]
        .into_iter()
        .any(|sample| self.point_viewable(origin + sample))
    }

    /// Recomputes the visible chunk list.
    ///
    /// Walks every coordinate within the view distance of the camera's chunk.
    /// Mapped chunks are visible when they finished generating and pass the
    /// cone test. Unmapped coordinates get a new chunk, which becomes
    /// eligible on a later frame.
    pub fn update_viewable(&mut self) {
        let center = self.camera_chunk();
        let mut viewable = std::mem::take(&mut self.viewable);
        viewable.clear();

        for position in center.square(self.config.view_distance) {
            match self.chunks.get(&position) {
                Some(chunk) => {
                    if !chunk.is_generating() && self.chunk_viewable(position) {
                        viewable.push(position);
                    }
                }
                None => {
                    self.spawn_chunk(position);
                }
            }
        }

        self.viewable = viewable;
    }

    /// Chunks drawn by the latest visibility pass.
    pub fn viewable(&self) -> &[ChunkPosition] {
        &self.viewable
    }

    /// Lights affecting the chunk at `position`.
    ///
    /// The chunk's own lights come first, then those of every mapped chunk
    /// within [`LIGHT_RADIUS`], then the sentinel. The list is not capped here;
    /// packing for the renderer drops anything past its capacity.
    pub fn gather_lights(&self, position: ChunkPosition) -> Vec<PointLight> {
        let mut lights = Vec::new();
        if let Some(chunk) = self.chunks.get(&position) {
            chunk.extend_lights(&mut lights);
        }

        for neighbor in position.square(LIGHT_RADIUS) {
            if neighbor == position {
                continue;
            }
            if let Some(chunk) = self.chunks.get(&neighbor) {
                chunk.extend_lights(&mut lights);
            }
        }

        lights.push(PointLight::sentinel());
        lights
    }
}

//! # Rendering Contract
//!
//! What the world hands to whatever actually draws the chunks. Per chunk per
//! frame that is a model transform, the vertex count of the uploaded mesh, a
//! primitive mode and a packed light array. Meshes are uploaded once, the first
//! time a chunk is drawn after a (re)build finishes.

use cgmath::Matrix4;

use crate::engine_state::voxels::{
    chunk::ChunkPosition,
    lighting::{LightingParams, PointLight},
};

use super::meshing::ChunkMesh;

/// Capacity of the shader's light array. Extra lights are dropped.
pub const MAX_LIGHTS: usize = 32;

/// Diffuse color given to the end-of-list sentinel.
const SENTINEL_DIFFUSE: f32 = 0.5;

/// Primitive topology used for a chunk's vertex buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum DrawMode {
    #[default]
    Triangles,
    /// Debug wireframe
    Lines,
}

/// One entry of the shader's light array.
///
/// Every field is a `vec4` so the layout matches std140 without padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// `w = 0` marks the sentinel
    pub position: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// Constant, linear, quadratic, unused
    pub attenuation: [f32; 4],
    /// Spotlight direction in xyz
    pub spot_direction: [f32; 4],
    /// Cutoff in degrees, exponent, unused, unused
    pub spot: [f32; 4],
}

impl LightUniform {
    pub fn new(light: &PointLight, params: &LightingParams) -> Self {
        let diffuse = if light.is_sentinel() {
            SENTINEL_DIFFUSE
        } else {
            params.diffuse
        };
        let [dx, dy, dz] = params.spot_direction;
        LightUniform {
            position: light.position.into(),
            diffuse: [diffuse, diffuse, diffuse, 1.0],
            specular: [params.specular, params.specular, params.specular, 1.0],
            attenuation: [
                params.constant_attenuation,
                params.linear_attenuation,
                params.quadratic_attenuation,
                0.0,
            ],
            spot_direction: [dx, dy, dz, 0.0],
            spot: [params.spot_cutoff_degrees, params.spot_exponent, 0.0, 0.0],
        }
    }
}

/// The fixed-size light uniform block.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightArray {
    pub lights: [LightUniform; MAX_LIGHTS],
    /// Number of populated entries
    pub count: u32,
    _padding: [u32; 3],
}

impl LightArray {
    /// Packs up to [`MAX_LIGHTS`] lights in order. The rest are dropped.
    pub fn pack(lights: &[PointLight], params: &LightingParams) -> Self {
        let mut array: LightArray = bytemuck::Zeroable::zeroed();
        for (slot, light) in array.lights.iter_mut().zip(lights) {
            *slot = LightUniform::new(light, params);
        }
        array.count = lights.len().min(MAX_LIGHTS) as u32;
        array
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The populated entries.
    pub fn as_slice(&self) -> &[LightUniform] {
        &self.lights[..self.len()]
    }
}

/// Everything needed to draw one chunk this frame.
#[derive(Debug)]
pub struct ChunkDrawCall<'a> {
    pub position: ChunkPosition,
    /// Translation by the chunk's world origin
    pub model: Matrix4<f32>,
    /// Camera projection times view
    pub view_projection: Matrix4<f32>,
    /// Vertices in the chunk's uploaded mesh
    pub vertex_count: usize,
    pub mode: DrawMode,
    pub lights: &'a LightArray,
    pub ambient: f32,
}

/// The external rendering collaborator.
pub trait ChunkRenderer {
    /// Called once per frame before the first draw.
    fn begin_frame(&mut self) {}

    /// Replaces the GPU-side mesh of the chunk at `position`.
    fn upload_mesh(&mut self, position: ChunkPosition, mesh: &ChunkMesh);

    /// Draws a chunk whose mesh was uploaded earlier.
    fn draw_chunk(&mut self, call: &ChunkDrawCall<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_truncates_at_capacity() {
        let params = LightingParams::default();
        let lights: Vec<_> = (0..40).map(|i| PointLight::at(i as f32, 0.0, 0.0)).collect();
        let array = LightArray::pack(&lights, &params);
        assert_eq!(array.len(), MAX_LIGHTS);
        assert_eq!(array.as_slice()[31].position, [31.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn sentinel_gets_fixed_grey() {
        let params = LightingParams {
            diffuse: 0.9,
            ..LightingParams::default()
        };
        let array = LightArray::pack(&[PointLight::at(1.0, 2.0, 3.0), PointLight::sentinel()], &params);
        assert_eq!(array.len(), 2);
        assert_eq!(array.lights[0].diffuse, [0.9, 0.9, 0.9, 1.0]);
        assert_eq!(array.lights[1].diffuse, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(array.lights[1].position[3], 0.0);
    }

    #[test]
    fn uniform_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 96);
        assert_eq!(
            std::mem::size_of::<LightArray>(),
            96 * MAX_LIGHTS + 16
        );
    }
}

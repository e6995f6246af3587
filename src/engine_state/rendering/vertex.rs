//! Vertex format shared by the mesher and the rendering collaborator.

use cgmath::Vector3;

/// A single corner of a chunk quad, in chunk-local space.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Texture: u, v, layer as 3x f32 (12 bytes)
/// - Normal: 3x f32 (12 bytes)
///
/// Total size: 36 bytes. Drawn as a flat triangle list with no index buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position relative to the chunk origin
    pub position: [f32; 3],
    /// UV coordinates in voxel units plus the texture-array layer
    pub tex: [f32; 3],
    /// Outward face normal
    pub normal: [f32; 3],
}

impl Vertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `position` - Corner position in chunk-local space
    /// * `uv` - Texture coordinates; they repeat once per voxel
    /// * `layer` - Texture-array layer, the block's type byte
    /// * `normal` - Outward normal of the face the corner belongs to
    pub fn new(position: Vector3<f32>, uv: [f32; 2], layer: u32, normal: Vector3<f32>) -> Self {
        Vertex {
            position: position.into(),
            tex: [uv[0], uv[1], layer as f32],
            normal: normal.into(),
        }
    }

    pub fn position(&self) -> Vector3<f32> {
        Vector3::from(self.position)
    }
}

//! Mesh output of the greedy mesher.

use cgmath::Vector3;

use crate::engine_state::{
    rendering::Vertex,
    voxels::block::{block_side::BlockSide, Block},
};

/// One merged rectangle of same-type faces.
///
/// The rectangle covers `width` voxels along the direction's second in-plane
/// axis and `height` voxels along the first, starting at `origin`. For a face
/// perpendicular to axis `d0`, those are `(d0 + 2) % 3` and `(d0 + 1) % 3`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Quad {
    pub side: BlockSide,
    /// Lowest voxel covered by the quad
    pub origin: [usize; 3],
    pub width: usize,
    pub height: usize,
    pub block: Block,
}

impl Quad {
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Every voxel whose `side` face this quad covers.
    pub fn voxels(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let d0 = self.side.axis();
        let d1 = (d0 + 1) % 3;
        let d2 = (d0 + 2) % 3;
        (0..self.height).flat_map(move |h| {
            (0..self.width).map(move |w| {
                let mut voxel = self.origin;
                voxel[d1] += h;
                voxel[d2] += w;
                voxel
            })
        })
    }
}

/// A chunk's renderable geometry: six vertices per quad, no index buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    pub vertices: Vec<Vertex>,
    pub quads: Vec<Quad>,
}

impl ChunkMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Total number of unit faces covered.
    pub fn covered_area(&self) -> usize {
        self.quads.iter().map(Quad::area).sum()
    }

    /// Quads per direction, indexed by [`BlockSide`] discriminant.
    pub fn quads_per_side(&self) -> [usize; 6] {
        let mut counts = [0; 6];
        for quad in &self.quads {
            counts[quad.side as usize] += 1;
        }
        counts
    }

    /// Appends a quad given its four corners.
    ///
    /// The corners must satisfy `c3 = c1 + c2 - c0`. Triangles are
    /// `(c0, c1, c2)` and `(c2, c1, c3)`, so both share the winding of the
    /// corner order.
    pub(super) fn push_quad(&mut self, quad: Quad, corners: [Vector3<f32>; 4], extent: [f32; 2]) {
        const UV: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        const TRIANGLES: [usize; 6] = [0, 1, 2, 2, 1, 3];

        let normal = quad.side.normal();
        let layer = quad.block.texture_layer();
        self.vertices.extend(TRIANGLES.iter().map(|&i| {
            Vertex::new(
                corners[i],
                [UV[i][0] * extent[0], UV[i][1] * extent[1]],
                layer,
                normal,
            )
        }));
        self.quads.push(quad);
    }
}

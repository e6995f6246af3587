//! Greedy meshing for voxel chunks.
//!
//! For each of the six face directions the grid is swept one slice at a time
//! along the direction's axis. Every slice becomes a 2D mask holding the block
//! of each exposed face (solid voxel whose neighbor in the sweep direction is
//! air or outside the chunk). The mask is then consumed row by row: a run is
//! grown along the row while the block type matches, then grown down while
//! every cell of the next row matches the whole run. Each rectangle becomes one
//! quad and its cells are cleared from the mask.
//!
//! Neighboring chunks are never consulted, so faces on the chunk boundary are
//! always emitted.

use cgmath::Vector3;
use log::debug;
use web_time::Instant;

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, Block},
    chunk::{BlockGrid, CHUNK_HEIGHT, CHUNK_WIDTH},
};

use super::mesh::{ChunkMesh, Quad};

const DIMENSIONS: [usize; 3] = [CHUNK_WIDTH, CHUNK_HEIGHT, CHUNK_WIDTH];

/// Corner order of a quad for each direction, as (width, height) factors.
///
/// Chosen so the corners run counter-clockwise when the face is seen from
/// outside the voxel. Indexed by [`BlockSide`] discriminant.
const CORNERS: [[(f32, f32); 4]; 6] = [
    // -X
    [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)],
    // -Y
    [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)],
    // -Z
    [(0.0, 1.0), (0.0, 0.0), (1.0, 1.0), (1.0, 0.0)],
    // +X
    [(1.0, 0.0), (0.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
    // +Y
    [(0.0, 1.0), (1.0, 1.0), (0.0, 0.0), (1.0, 0.0)],
    // +Z
    [(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)],
];

/// The two in-plane axes for a face perpendicular to `d0`.
///
/// Mask rows run along `d1`, columns along `d2`.
fn plane_axes(d0: usize) -> (usize, usize) {
    ((d0 + 1) % 3, (d0 + 2) % 3)
}

/// Builds the merged-quad mesh of a block grid.
///
/// Deterministic: the same grid always yields the same quads in the same order.
pub fn greedy(grid: &BlockGrid) -> ChunkMesh {
    let start = Instant::now();
    let mut mesh = ChunkMesh::new();
    let mut mask = vec![Block::AIR; CHUNK_WIDTH * CHUNK_HEIGHT];

    for side in BlockSide::all() {
        let d0 = side.axis();
        let (d1, d2) = plane_axes(d0);
        let (rows, cols) = (DIMENSIONS[d1], DIMENSIONS[d2]);
        let mask = &mut mask[..rows * cols];

        for layer in 0..DIMENSIONS[d0] {
            if fill_mask(grid, side, layer, cols, mask) {
                merge_mask(mask, rows, cols, side, layer, &mut mesh);
            }
        }
    }

    debug!(
        "Greedy meshed {} quads ({} vertices) in {:?}",
        mesh.quad_count(),
        mesh.vertex_count(),
        start.elapsed()
    );
    mesh
}

/// Writes the exposed faces of one slice into `mask`.
///
/// Returns `false` if the slice has no exposed faces.
fn fill_mask(grid: &BlockGrid, side: BlockSide, layer: usize, cols: usize, mask: &mut [Block]) -> bool {
    let d0 = side.axis();
    let (d1, d2) = plane_axes(d0);
    let mut any = false;

    for (i, cell) in mask.iter_mut().enumerate() {
        let mut voxel = [0i32; 3];
        voxel[d0] = layer as i32;
        voxel[d1] = (i / cols) as i32;
        voxel[d2] = (i % cols) as i32;

        let block = grid.get_or_air(voxel[0], voxel[1], voxel[2]);
        let mut neighbor = voxel;
        neighbor[d0] += side.step();

        *cell = if block.is_solid() && !grid.occupied(neighbor[0], neighbor[1], neighbor[2]) {
            any = true;
            block
        } else {
            Block::AIR
        };
    }
    any
}

/// Consumes `mask` into maximal rectangles, emitting one quad each.
fn merge_mask(
    mask: &mut [Block],
    rows: usize,
    cols: usize,
    side: BlockSide,
    layer: usize,
    mesh: &mut ChunkMesh,
) {
    let d0 = side.axis();
    let (d1, d2) = plane_axes(d0);

    for row in 0..rows {
        let mut col = 0;
        while col < cols {
            let block = mask[row * cols + col];
            if block.is_air() {
                col += 1;
                continue;
            }

            let mut width = 1;
            while col + width < cols && mask[row * cols + col + width] == block {
                width += 1;
            }

            let mut height = 1;
            while row + height < rows {
                let start = (row + height) * cols + col;
                if mask[start..start + width].iter().any(|&b| b != block) {
                    break;
                }
                height += 1;
            }

            for r in row..row + height {
                mask[r * cols + col..r * cols + col + width].fill(Block::AIR);
            }

            let mut origin = [0; 3];
            origin[d0] = layer;
            origin[d1] = row;
            origin[d2] = col;
            emit_quad(
                mesh,
                Quad {
                    side,
                    origin,
                    width,
                    height,
                    block,
                },
            );

            col += width;
        }
    }
}

fn emit_quad(mesh: &mut ChunkMesh, quad: Quad) {
    let d0 = quad.side.axis();
    let (d1, d2) = plane_axes(d0);

    let mut base = Vector3::new(
        quad.origin[0] as f32,
        quad.origin[1] as f32,
        quad.origin[2] as f32,
    );
    if quad.side.is_positive() {
        base[d0] += 1.0;
    }

    let mut w = Vector3::new(0.0, 0.0, 0.0);
    w[d2] = quad.width as f32;
    let mut h = Vector3::new(0.0, 0.0, 0.0);
    h[d1] = quad.height as f32;

    let table = CORNERS[quad.side as usize];
    let corners = table.map(|(fw, fh)| base + w * fw + h * fh);

    // u runs along the first edge (corner 0 to corner 1)
    let extent = if table[0].0 != table[1].0 {
        [quad.width as f32, quad.height as f32]
    } else {
        [quad.height as f32, quad.width as f32]
    };

    mesh.push_quad(quad, corners, extent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{block::block_type::BlockType, chunk::LocalCoords};
    use cgmath::InnerSpace;

    fn stone() -> Block {
        Block::new(BlockType::STONE)
    }

    #[test]
    fn empty_grid_has_no_quads() {
        let mesh = greedy(&BlockGrid::new());
        assert!(mesh.is_empty());
        assert!(mesh.vertices.is_empty());
    }

    #[test]
    fn isolated_voxel_has_six_unit_quads() {
        let mut grid = BlockGrid::new();
        grid.set(LocalCoords::new(5, 40, 9), stone());
        let mesh = greedy(&grid);

        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(mesh.quads_per_side(), [1; 6]);
        assert!(mesh.quads.iter().all(|q| q.area() == 1 && q.origin == [5, 40, 9]));
        assert_eq!(mesh.vertex_count(), 36);
    }

    #[test]
    fn flat_floor_merges_into_one_top_quad() {
        let mut grid = BlockGrid::new();
        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_WIDTH {
                grid.set(LocalCoords::new(x, 0, z), stone());
            }
        }
        let mesh = greedy(&grid);

        assert_eq!(mesh.quads_per_side(), [1; 6]);
        let top = mesh
            .quads
            .iter()
            .find(|q| q.side == BlockSide::TOP)
            .unwrap();
        assert_eq!(top.area(), CHUNK_WIDTH * CHUNK_WIDTH);
        assert!(mesh
            .vertices
            .iter()
            .filter(|v| v.normal == [0.0, 1.0, 0.0])
            .all(|v| v.position[1] == 1.0));
    }

    #[test]
    fn different_types_do_not_merge() {
        let mut grid = BlockGrid::new();
        grid.set(LocalCoords::new(0, 0, 0), stone());
        grid.set(LocalCoords::new(1, 0, 0), Block::new(BlockType::DIRT));
        let mesh = greedy(&grid);

        let tops: Vec<_> = mesh.quads.iter().filter(|q| q.side == BlockSide::TOP).collect();
        assert_eq!(tops.len(), 2);
        // The shared x face is hidden on both sides
        assert_eq!(mesh.quad_count(), 10);
    }

    #[test]
    fn interior_cavity_adds_six_unit_faces() {
        let mut grid = BlockGrid::filled(stone());
        grid.set(LocalCoords::new(8, 100, 8), Block::AIR);
        let mesh = greedy(&grid);

        let unit_quads = mesh.quads.iter().filter(|q| q.area() == 1).count();
        assert_eq!(unit_quads, 6);
        assert_eq!(mesh.quad_count(), 12);

        let shell = 4 * CHUNK_WIDTH * CHUNK_HEIGHT + 2 * CHUNK_WIDTH * CHUNK_WIDTH;
        assert_eq!(mesh.covered_area(), shell + 6);
    }

    #[test]
    fn meshing_is_deterministic() {
        let mut grid = BlockGrid::new();
        for (i, (x, y, z)) in [(0, 0, 0), (1, 0, 0), (1, 1, 0), (3, 7, 15), (15, 255, 15)]
            .into_iter()
            .enumerate()
        {
            grid.set(LocalCoords::new(x, y, z), Block(i as u8 % 2));
        }
        let a = greedy(&grid);
        let b = greedy(&grid);
        assert_eq!(a, b);
        assert_eq!(a.covered_area(), b.covered_area());
        assert_eq!(a.quads_per_side(), b.quads_per_side());
    }

    #[test]
    fn triangles_face_outward() {
        let mut grid = BlockGrid::new();
        grid.set(LocalCoords::new(2, 3, 4), stone());
        grid.set(LocalCoords::new(2, 4, 4), stone());
        grid.set(LocalCoords::new(3, 3, 4), stone());
        let mesh = greedy(&grid);

        for triangle in mesh.vertices.chunks(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|v| v.position());
            let facing = (b - a).cross(c - a).normalize();
            let normal = Vector3::from(triangle[0].normal);
            assert!(facing.dot(normal) > 0.99, "{facing:?} vs {normal:?}");
        }
    }

    #[test]
    fn uvs_tile_once_per_voxel() {
        let mut grid = BlockGrid::new();
        for y in 0..3 {
            grid.set(LocalCoords::new(0, y, 0), stone());
        }
        let mesh = greedy(&grid);

        let left: Vec<_> = mesh
            .vertices
            .iter()
            .filter(|v| v.normal == [-1.0, 0.0, 0.0])
            .collect();
        let max_u = left.iter().map(|v| v.tex[0]).fold(0.0, f32::max);
        let max_v = left.iter().map(|v| v.tex[1]).fold(0.0, f32::max);
        assert_eq!(max_u * max_v, 3.0);
        assert!(left.iter().all(|v| v.tex[2] == stone().texture_layer() as f32));
    }
}

//! Dense per-chunk block storage.

use crate::engine_state::voxels::block::Block;

use super::{LocalCoords, CHUNK_HEIGHT, CHUNK_VOLUME, CHUNK_WIDTH};

/// A fully allocated 16×256×16 array of blocks.
///
/// Stored y-major (`x + z·16 + y·256`) so one horizontal layer is contiguous.
#[derive(Clone, PartialEq, Eq)]
pub struct BlockGrid {
    blocks: Box<[Block]>,
}

impl BlockGrid {
    /// A grid of nothing but air.
    pub fn new() -> Self {
        Self::filled(Block::AIR)
    }

    /// A grid where every voxel is `block`.
    pub fn filled(block: Block) -> Self {
        BlockGrid {
            blocks: vec![block; CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    #[inline]
    fn index(x: usize, y: usize, z: usize) -> usize {
        x + CHUNK_WIDTH * (z + CHUNK_WIDTH * y)
    }

    /// `true` when (x, y, z) lies inside the grid.
    #[inline]
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_WIDTH as i32).contains(&x)
            && (0..CHUNK_HEIGHT as i32).contains(&y)
            && (0..CHUNK_WIDTH as i32).contains(&z)
    }

    /// # Panics
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn get(&self, coords: LocalCoords) -> Block {
        self.blocks[Self::index(coords.x, coords.y, coords.z)]
    }

    /// Replaces the block at `coords` and returns the previous one.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, coords: LocalCoords, block: Block) -> Block {
        std::mem::replace(&mut self.blocks[Self::index(coords.x, coords.y, coords.z)], block)
    }

    /// The block at signed coordinates, or air outside the grid.
    #[inline]
    pub fn get_or_air(&self, x: i32, y: i32, z: i32) -> Block {
        if Self::in_bounds(x, y, z) {
            self.blocks[Self::index(x as usize, y as usize, z as usize)]
        } else {
            Block::AIR
        }
    }

    /// Whether a solid block sits at the signed coordinates. Out of bounds is empty.
    #[inline]
    pub fn occupied(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_or_air(x, y, z).is_solid()
    }

    /// Number of non-air voxels.
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_solid()).count()
    }
}

impl Default for BlockGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BlockGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockGrid")
            .field("solid", &self.solid_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_reads_as_air() {
        let grid = BlockGrid::filled(Block(3));
        assert!(grid.occupied(0, 0, 0));
        assert!(grid.occupied(15, 255, 15));
        assert!(!grid.occupied(-1, 0, 0));
        assert!(!grid.occupied(0, 256, 0));
        assert!(!grid.occupied(0, 0, 16));
    }

    #[test]
    fn set_returns_previous_block() {
        let mut grid = BlockGrid::new();
        let coords = LocalCoords::new(4, 200, 9);
        assert_eq!(grid.set(coords, Block(2)), Block::AIR);
        assert_eq!(grid.set(coords, Block(5)), Block(2));
        assert_eq!(grid.get(coords), Block(5));
        assert_eq!(grid.solid_count(), 1);
    }
}

//! # Terrain Generation
//!
//! Height-field terrain from 3D Perlin noise. Each column samples the noise
//! once at `y = 0`, turns the sample into a surface height and stacks block
//! layers underneath it. Generation is a pure function of the chunk position
//! and the seed, so regenerating a chunk always yields the same grid.

use noise::{NoiseFn, Perlin};

use super::{
    block::{block_type::BlockType, Block},
    chunk::{BlockGrid, ChunkPosition, LocalCoords, CHUNK_HEIGHT, CHUNK_WIDTH},
};

/// Surfaces above this height are capped with snow over dirt instead of grass.
pub const SNOW_LINE: i32 = 93;

/// Horizontal scale applied to chunk-space coordinates before sampling noise.
const NOISE_SCALE: f64 = 8.0;

/// Deterministic procedural terrain.
#[derive(Clone, Copy, Debug)]
pub struct TerrainGenerator {
    perlin: Perlin,
}

impl TerrainGenerator {
    pub fn new(seed: u32) -> Self {
        TerrainGenerator {
            perlin: Perlin::new(seed),
        }
    }

    /// Surface height of the column at local (x, z) in the given chunk.
    ///
    /// Always within `0..CHUNK_HEIGHT`.
    pub fn column_height(&self, position: ChunkPosition, x: usize, z: usize) -> i32 {
        let fx = position.x as f64 + x as f64 / CHUNK_WIDTH as f64;
        let fz = position.z as f64 + z as f64 / CHUNK_WIDTH as f64;
        let sample = self.perlin.get([fx / NOISE_SCALE, 0.0, fz / NOISE_SCALE]);

        let half = CHUNK_HEIGHT as f64 / 2.0;
        ((sample * half + half) as i32).clamp(0, CHUNK_HEIGHT as i32 - 1)
    }

    /// Fills `grid` with the terrain of the chunk at `position`.
    ///
    /// Voxels above the surface are left untouched.
    pub fn fill(&self, position: ChunkPosition, grid: &mut BlockGrid) {
        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_WIDTH {
                let height = self.column_height(position, x, z);
                for y in 0..=height {
                    let block = layer_block(y, height);
                    if block.is_solid() {
                        grid.set(LocalCoords::new(x, y as usize, z), block);
                    }
                }
            }
        }
    }
}

/// The block at height `y` in a column whose surface is at `height`.
///
/// Later rules win over earlier ones, so a very low column is capped with
/// grass even where the stone or bedrock rule also matched.
pub fn layer_block(y: i32, height: i32) -> Block {
    let mut block = Block::AIR;

    if y == 0 {
        block = Block::new(BlockType::BEDROCK);
    } else if y <= height - 5 {
        block = Block::new(BlockType::STONE);
    }

    if height > SNOW_LINE {
        if y >= height - 4 && y < height {
            block = Block::new(BlockType::DIRT);
        } else if y == height {
            block = Block::new(BlockType::SNOW);
        }
    } else if y >= height - 4 {
        block = Block::new(BlockType::GRASS);
    }

    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowland_column_layers() {
        let h = 60;
        assert_eq!(layer_block(0, h), Block::new(BlockType::BEDROCK));
        assert_eq!(layer_block(1, h), Block::new(BlockType::STONE));
        assert_eq!(layer_block(h - 5, h), Block::new(BlockType::STONE));
        for y in h - 4..=h {
            assert_eq!(layer_block(y, h), Block::new(BlockType::GRASS));
        }
    }

    #[test]
    fn peak_column_is_snow_capped() {
        let h = 120;
        assert_eq!(layer_block(h - 5, h), Block::new(BlockType::STONE));
        for y in h - 4..h {
            assert_eq!(layer_block(y, h), Block::new(BlockType::DIRT));
        }
        assert_eq!(layer_block(h, h), Block::new(BlockType::SNOW));
    }

    #[test]
    fn shallow_column_grass_overrides_bedrock() {
        assert_eq!(layer_block(0, 2), Block::new(BlockType::GRASS));
        assert_eq!(layer_block(0, 10), Block::new(BlockType::BEDROCK));
    }

    #[test]
    fn generation_is_deterministic() {
        let generator = TerrainGenerator::new(7);
        let position = ChunkPosition::new(-3, 5);
        let mut a = BlockGrid::new();
        let mut b = BlockGrid::new();
        generator.fill(position, &mut a);
        generator.fill(position, &mut b);
        assert!(a == b);
    }

    #[test]
    fn surface_matches_column_height() {
        let generator = TerrainGenerator::new(0);
        let position = ChunkPosition::new(1, 2);
        let mut grid = BlockGrid::new();
        generator.fill(position, &mut grid);

        for (x, z) in [(0, 0), (7, 3), (15, 15)] {
            let h = generator.column_height(position, x, z);
            assert!(grid.occupied(x as i32, h, z as i32));
            assert!(!grid.occupied(x as i32, h + 1, z as i32));
        }
    }
}

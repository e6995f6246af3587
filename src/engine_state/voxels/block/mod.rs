//! # Block Module
//!
//! Block data for the voxel world: the one-byte per-voxel tag, the named block
//! types and the six face directions.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// A single voxel: one byte naming its texture layer, or [`Block::AIR`].
///
/// The byte is passed through to the renderer unchanged as the atlas layer
/// index. Values with no matching layer are not rejected.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Block(pub BlockTypeSize);

impl Block {
    /// The empty voxel.
    pub const AIR: Block = Block(BlockTypeSize::MAX);

    /// Creates a block of the given named type.
    pub const fn new(block_type: BlockType) -> Self {
        Block(block_type as BlockTypeSize)
    }

    pub fn is_air(self) -> bool {
        self == Block::AIR
    }

    pub fn is_solid(self) -> bool {
        !self.is_air()
    }

    /// Texture-array layer sampled for this block's faces.
    pub fn texture_layer(self) -> u32 {
        self.0 as u32
    }

    /// The named type, if this byte corresponds to one.
    pub fn block_type(self) -> Option<BlockType> {
        BlockType::from_int(self.0)
    }
}

impl Default for Block {
    fn default() -> Self {
        Block::AIR
    }
}

impl From<BlockType> for Block {
    fn from(block_type: BlockType) -> Self {
        Block::new(block_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_is_the_sentinel_byte() {
        assert_eq!(Block::AIR.0, 255);
        assert!(Block::AIR.is_air());
        assert!(Block::default().is_air());
        assert!(Block::new(BlockType::SNOW).is_solid());
        assert_eq!(Block::AIR.block_type(), None);
        assert_eq!(Block(3).block_type(), Some(BlockType::STONE));
    }
}

//! # Block Type Module
//!
//! Named block types. The discriminant of each variant is its texture layer,
//! so the files in the texture directory must sort into this order.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates the block types the terrain generator and the editor know about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Caps peaks above the snow line.
    SNOW = 0,
    /// The band just below a snow cap.
    DIRT = 1,
    /// Surface band of lowland columns.
    GRASS = 2,
    /// Subsurface filler.
    STONE = 3,
    /// The floor at y = 0. Cannot be destroyed.
    BEDROCK = 4,
    /// Emits a point light at its center while placed.
    LAMP = 5,
}

impl BlockType {
    /// Converts a raw block byte to a named type, if one exists.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        FromPrimitive::from_u8(btype)
    }

    pub fn is_light_source(self) -> bool {
        self == BlockType::LAMP
    }

    pub fn is_destructible(self) -> bool {
        self != BlockType::BEDROCK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_follow_texture_layers() {
        assert_eq!(BlockType::from_int(0), Some(BlockType::SNOW));
        assert_eq!(BlockType::from_int(5), Some(BlockType::LAMP));
        assert_eq!(BlockType::from_int(6), None);
        assert!(BlockType::LAMP.is_light_source());
        assert!(!BlockType::BEDROCK.is_destructible());
    }
}

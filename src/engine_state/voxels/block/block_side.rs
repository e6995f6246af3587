//! # Block Side Module
//!
//! The six face directions of a voxel, in the order the greedy mesher sweeps
//! them: the three negative directions first, then the three positive ones.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminant is the mesher's sweep index. `index % 3` is the axis the
/// face is perpendicular to (0 = X, 1 = Y, 2 = Z).
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The left face (facing negative X)
    LEFT = 0,

    /// The bottom face (facing negative Y)
    BOTTOM = 1,

    /// The back face (facing negative Z)
    BACK = 2,

    /// The right face (facing positive X)
    RIGHT = 3,

    /// The top face (facing positive Y)
    TOP = 4,

    /// The front face (facing positive Z)
    FRONT = 5,
}

impl BlockSide {
    /// All six faces in sweep order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::LEFT,
            BlockSide::BOTTOM,
            BlockSide::BACK,
            BlockSide::RIGHT,
            BlockSide::TOP,
            BlockSide::FRONT,
        ]
    }

    /// The axis this face is perpendicular to (0 = X, 1 = Y, 2 = Z).
    pub fn axis(self) -> usize {
        self as usize % 3
    }

    /// `true` for the faces pointing along +X, +Y or +Z.
    pub fn is_positive(self) -> bool {
        self as usize >= 3
    }

    /// Step to the neighboring voxel this face looks at: -1 or +1 along `axis()`.
    pub fn step(self) -> i32 {
        if self.is_positive() {
            1
        } else {
            -1
        }
    }

    /// The outward unit normal of this face.
    pub fn normal(self) -> Vector3<f32> {
        let mut normal = [0.0; 3];
        normal[self.axis()] = self.step() as f32;
        Vector3::from(normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normals_point_outward() {
        assert_eq!(BlockSide::LEFT.normal(), Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(BlockSide::BOTTOM.normal(), Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(BlockSide::BACK.normal(), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(BlockSide::RIGHT.normal(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(BlockSide::TOP.normal(), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(BlockSide::FRONT.normal(), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn sweep_order_alternates_axes() {
        let axes: Vec<usize> = BlockSide::all().iter().map(|s| s.axis()).collect();
        assert_eq!(axes, vec![0, 1, 2, 0, 1, 2]);
    }
}

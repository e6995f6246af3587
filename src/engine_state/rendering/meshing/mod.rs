//! # Chunk Meshing
//!
//! Converts a chunk's block grid into the flat vertex list the renderer draws.
//! [`greedy`] does the work; [`ChunkMesh`] holds the result until the render
//! thread uploads it.

mod greedy;
mod mesh;

pub use greedy::greedy;
pub use mesh::{ChunkMesh, Quad};

//! Rendering side of the voxel engine.
//!
//! This crate does not talk to a GPU. It produces meshes, textures and
//! per-chunk draw calls and hands them to a [`ChunkRenderer`]. The
//! [`HeadlessRenderer`] implementation only collects statistics.

mod headless;
pub mod meshing;
pub mod renderer;
pub mod tasks;
pub mod texture;
mod vertex;

pub use headless::HeadlessRenderer;
pub use renderer::{ChunkDrawCall, ChunkRenderer, DrawMode, LightArray, LightUniform, MAX_LIGHTS};
pub use texture::{TextureAtlas, TextureLayer};
pub use vertex::Vertex;

//! # Voxel World
//!
//! Block data, chunks, terrain and the world that ties them together.
//!
//! ## Architecture
//!
//! * **Block**: one-byte voxel tags and the six face directions
//! * **Chunk**: a dense 16×256×16 grid plus its mesh, lights and ground plane
//! * **Terrain**: deterministic Perlin height fields
//! * **Lighting**: point lights placed by lamps or by hand
//! * **World**: the chunk map, visibility, edits and player movement
//! * **Tasks**: background generation feeding background meshing
//!
//! ## Data Flow
//!
//! 1. The world decides which chunk coordinates it needs around the camera
//! 2. Missing chunks are created and their generation is enqueued
//! 3. Generation chains a mesh build; edits enqueue rebuilds
//! 4. The render pass uploads finished meshes and draws the visible set

pub mod block;
pub mod chunk;
pub mod lighting;
pub mod tasks;
pub mod terrain;
pub mod world;

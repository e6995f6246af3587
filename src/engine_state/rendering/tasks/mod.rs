//! Background tasks for the rendering system.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: Greedy-meshes a chunk and publishes the mesh for upload

pub mod chunk_mesh_generation_task;

//! # Engine State Module
//!
//! The simulation side of the sandbox.
//!
//! ## Key Components
//!
//! * `camera_state` - The player camera and projection
//! * `physics` - The rigid-body world holding the player and ground planes
//! * `rendering` - Meshing, textures and the renderer contract
//! * `task_management` - The background worker pool
//! * `voxels` - Blocks, chunks, terrain and the world

pub mod camera_state;
pub mod physics;
pub mod rendering;
pub mod task_management;
pub mod voxels;

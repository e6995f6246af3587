//! # Voxel Task System
//!
//! Tasks related to voxel world generation. They run on the worker pool so
//! that generating terrain never stalls a frame.

pub mod chunk_generation_task;

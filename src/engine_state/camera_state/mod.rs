//! # Camera State Management
//!
//! The player camera and its projection. Input arrives as an
//! [`InputSnapshot`](crate::application_state::input_state::InputSnapshot)
//! once per frame; the world turns it into movement.

pub mod camera;

pub use camera::{Camera, Projection};

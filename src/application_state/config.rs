//! # Engine Configuration
//!
//! All tunables for a sandbox session. Every field has a default, so a config
//! file only needs to name what it overrides:
//!
//! ```json
//! { "view_distance": 4, "worker_count": 2, "camera": { "fov_degrees": 75.0 } }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{engine_state::voxels::lighting::LightingParams, error::EngineError};

/// Top level configuration for the engine and its world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chebyshev radius, in chunks, of the generated and considered area around the player
    pub view_distance: i32,
    /// Number of background worker threads used for generation and meshing
    pub worker_count: usize,
    /// Directory holding one image per block type, loaded in lexicographic order
    pub texture_directory: String,
    /// Seed handed to the terrain noise function
    pub terrain_seed: u32,
    /// Draw chunks as line lists instead of triangle lists
    pub wireframe: bool,
    /// Player camera defaults
    pub camera: CameraConfig,
    /// Light colors and attenuation shared by every point light
    pub lighting: LightingParams,
    /// Rigid-body stepping parameters
    pub physics: PhysicsConfig,
    /// Length of one game-loop tick in seconds
    pub fixed_timestep: f32,
}

/// Initial camera placement and movement tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub pitch_degrees: f32,
    pub yaw_degrees: f32,
    /// Movement speed in blocks per second
    pub speed: f32,
    pub spawn: [f32; 3],
    /// Degrees of rotation per pixel of mouse movement
    pub mouse_sensitivity: f32,
}

/// Parameters forwarded to the physics collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Upper bound on internal substeps per `step` call
    pub max_substeps: u32,
    /// Length of one internal substep in seconds
    pub fixed_substep: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            view_distance: 8,
            worker_count: 4,
            texture_directory: "data/textures".to_string(),
            terrain_seed: 0,
            wireframe: false,
            camera: CameraConfig::default(),
            lighting: LightingParams::default(),
            physics: PhysicsConfig::default(),
            fixed_timestep: 1.0 / 60.0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            pitch_degrees: -45.0,
            yaw_degrees: 225.0,
            speed: 5.0,
            spawn: [8.0, 125.0, 8.0],
            mouse_sensitivity: 0.1,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            max_substeps: 100,
            fixed_substep: 1.0 / 60.0,
        }
    }
}

impl EngineConfig {
    /// Reads a JSON configuration file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| EngineError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.view_distance, 8);
        assert_eq!(config.physics.max_substeps, 100);
    }

    #[test]
    fn nested_fields_override_individually() {
        let config =
            EngineConfig::from_json(r#"{ "view_distance": 3, "camera": { "speed": 9.0 } }"#)
                .unwrap();
        assert_eq!(config.view_distance, 3);
        assert_eq!(config.camera.speed, 9.0);
        assert_eq!(config.camera.fov_degrees, 60.0);
    }

    #[test]
    fn missing_file_is_a_config_io_error() {
        let err = EngineConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, EngineError::ConfigIo { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = std::env::temp_dir().join(format!(
            "voxel-sandbox-bad-config-{}.json",
            std::process::id()
        ));
        fs::write(&path, "{ view_distance: ").unwrap();
        let err = EngineConfig::load(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, EngineError::ConfigParse { .. }));
    }
}

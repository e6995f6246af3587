//! Startup errors.
//!
//! Only fatal conditions live here: a world that cannot load its textures or its
//! configuration is not constructed. Everything that happens after startup
//! (light overflow, out-of-range selections, edits that miss every chunk) is a
//! silent no-op and never produces an `EngineError`.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Fatal errors raised while constructing the engine or its world.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The texture directory could not be listed.
    #[error("failed to read texture directory {}", .path.display())]
    TextureDirectory {
        /// Directory that was being listed
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The texture directory was readable but held no decodable images.
    #[error("no usable textures found in {}", .0.display())]
    NoTextures(PathBuf),

    /// The configuration file could not be read.
    #[error("failed to read config file {}", .path.display())]
    ConfigIo {
        /// Path of the configuration file
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid JSON for `EngineConfig`.
    #[error("malformed config file {}", .path.display())]
    ConfigParse {
        /// Path of the configuration file
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

//! # Terrain Texture Atlas
//!
//! One RGBA8 layer per block type, loaded from a directory of image files.
//! Files are taken in lexicographic order of their names and a block's type
//! byte is its layer index, so `00_snow.png` must sort before `01_dirt.png`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};

use crate::error::EngineError;

/// A single decoded texture layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureLayer {
    /// File name the layer was decoded from
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 pixels
    pub rgba: Vec<u8>,
}

/// The texture-array contents handed to the rendering collaborator.
#[derive(Clone, Debug, Default)]
pub struct TextureAtlas {
    layers: Vec<TextureLayer>,
}

impl TextureAtlas {
    /// Loads every decodable image in `directory`.
    ///
    /// Files that fail to decode are skipped with a warning and do not take up
    /// a layer index.
    ///
    /// # Errors
    /// Returns [`EngineError::TextureDirectory`] if the directory cannot be
    /// listed and [`EngineError::NoTextures`] if nothing in it decodes.
    pub fn load_dir(directory: impl AsRef<Path>) -> Result<Self, EngineError> {
        let directory = directory.as_ref();
        let entries = fs::read_dir(directory).map_err(|source| EngineError::TextureDirectory {
            path: directory.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut layers = Vec::with_capacity(paths.len());
        for path in paths {
            match image::open(&path) {
                Ok(decoded) => {
                    let rgba = decoded.to_rgba8();
                    let (width, height) = rgba.dimensions();
                    layers.push(TextureLayer {
                        name: path
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_default(),
                        width,
                        height,
                        rgba: rgba.into_raw(),
                    });
                }
                Err(err) => warn!("Skipping texture {}: {err}", path.display()),
            }
        }

        if layers.is_empty() {
            return Err(EngineError::NoTextures(directory.to_path_buf()));
        }

        info!("Loaded {} texture layers from {}", layers.len(), directory.display());
        Ok(TextureAtlas { layers })
    }

    /// Builds an atlas from already decoded layers.
    pub fn from_layers(layers: Vec<TextureLayer>) -> Self {
        TextureAtlas { layers }
    }

    /// A stand-in atlas of `count` single-pixel layers.
    pub fn placeholder(count: usize) -> Self {
        let layers = (0..count)
            .map(|i| TextureLayer {
                name: format!("placeholder_{i}"),
                width: 1,
                height: 1,
                rgba: vec![255; 4],
            })
            .collect();
        TextureAtlas { layers }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[TextureLayer] {
        &self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "voxel-sandbox-{name}-{}-{}",
            std::process::id(),
            fastrand::u32(..)
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_png(path: &Path, color: [u8; 4]) {
        image::RgbaImage::from_pixel(2, 2, image::Rgba(color))
            .save(path)
            .unwrap();
    }

    #[test]
    fn layers_follow_file_name_order() {
        let dir = scratch_dir("order");
        write_png(&dir.join("b.png"), [0, 255, 0, 255]);
        write_png(&dir.join("a.png"), [255, 0, 0, 255]);
        fs::write(dir.join("aa_broken.png"), b"not an image").unwrap();

        let atlas = TextureAtlas::load_dir(&dir).unwrap();
        let names: Vec<_> = atlas.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["a.png", "b.png"]);
        assert_eq!(atlas.layers()[0].rgba[..4], [255, 0, 0, 255]);
        assert_eq!(atlas.layers()[1].width, 2);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn empty_directory_is_fatal() {
        let dir = scratch_dir("empty");
        assert!(matches!(
            TextureAtlas::load_dir(&dir),
            Err(EngineError::NoTextures(_))
        ));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = std::env::temp_dir().join("voxel-sandbox-does-not-exist-7f3a");
        assert!(matches!(
            TextureAtlas::load_dir(dir),
            Err(EngineError::TextureDirectory { .. })
        ));
    }
}

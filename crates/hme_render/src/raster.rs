//! CPU-side image loading and resampling.
//!
//! Rasters are decoded once at startup and then uploaded as textures; nothing
//! reads pixel data after that.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbaImage;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{label} is {width}x{height}, larger than the GPU limit of {max}")]
    TooLarge {
        label: String,
        width: u32,
        height: u32,
        max: u32,
    },
}

pub fn load_raster(path: &Path) -> Result<RgbaImage, AssetError> {
    let bytes = fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "Decoded {} ({}x{})",
        path.display(),
        decoded.width(),
        decoded.height()
    );
    Ok(decoded.to_rgba8())
}

/// Resamples to exactly `width` x `height` (each at least 1) with nearest
/// filtering, so small pixel-art sprites stay crisp.
pub fn scale_raster(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    imageops::resize(src, width.max(1), height.max(1), FilterType::Nearest)
}

pub fn check_texture_size(label: &str, width: u32, height: u32, max: u32) -> Result<(), AssetError> {
    if width > max || height > max {
        return Err(AssetError::TooLarge {
            label: label.to_string(),
            width,
            height,
            max,
        });
    }
    Ok(())
}

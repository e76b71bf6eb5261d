//! Startup asset loading. Required rasters fail the whole startup; music only
//! ever produces a warning.

use std::path::{Path, PathBuf};

use glam::{IVec2, UVec2};
use hme_audio::MusicLoop;
use hme_core::MapGeometry;
use hme_render::{load_raster, scale_raster, AssetError, GpuError};
use image::RgbaImage;

const BACKGROUND_PATH: &str = "assets/map-part1.jpg";
const PLAYER_SPRITE_PATH: &str = "assets/chest.png";
const MUSIC_PATH: &str = "assets/kakariko-village.mp3";

#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub background: PathBuf,
    pub player_sprite: PathBuf,
    pub music: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            background: PathBuf::from(BACKGROUND_PATH),
            player_sprite: PathBuf::from(PLAYER_SPRITE_PATH),
            music: PathBuf::from(MUSIC_PATH),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
    #[error("failed to load background image: {0}")]
    Background(#[source] AssetError),
    #[error("failed to load player sprite: {0}")]
    PlayerSprite(#[source] AssetError),
}

/// Decoded rasters and the sizes derived from them. Everything here is
/// loaded before a window exists.
pub struct RequiredAssets {
    pub background: RgbaImage,
    pub player_sprite: RgbaImage,
    pub geometry: MapGeometry,
}

/// Loads the map and the player sprite, deriving tile and player sizes from
/// the map dimensions and the requested window size.
pub fn load_required(paths: &AssetPaths, window: UVec2) -> Result<RequiredAssets, StartupError> {
    let background = load_background(&paths.background)?;
    let map_size = IVec2::new(background.width() as i32, background.height() as i32);
    let geometry = MapGeometry::from_map(map_size, window);
    log::info!(
        "Map {}x{}, tile {}x{}, player {}x{}",
        geometry.map_size.x,
        geometry.map_size.y,
        geometry.tile.x,
        geometry.tile.y,
        geometry.player_size.x,
        geometry.player_size.y
    );

    let player_sprite = load_player_sprite(&paths.player_sprite, geometry.player_size)?;
    Ok(RequiredAssets {
        background,
        player_sprite,
        geometry,
    })
}

pub fn load_background(path: &Path) -> Result<RgbaImage, StartupError> {
    load_raster(path).map_err(StartupError::Background)
}

/// Loads the player sprite and resamples it to the on-screen player size.
pub fn load_player_sprite(path: &Path, player_size: IVec2) -> Result<RgbaImage, StartupError> {
    let original = load_raster(path).map_err(StartupError::PlayerSprite)?;
    let (width, height) = (player_size.x.max(1) as u32, player_size.y.max(1) as u32);
    log::info!(
        "Player sprite {}x{} scaled to {}x{}",
        original.width(),
        original.height(),
        width,
        height
    );
    Ok(scale_raster(&original, width, height))
}

/// Starts the looping track, or logs why audio stays disabled.
pub fn start_music(path: &Path) -> Option<MusicLoop> {
    match MusicLoop::open(path) {
        Ok(music) => Some(music),
        Err(err) => {
            log::warn!("{err}; continuing without audio");
            None
        }
    }
}

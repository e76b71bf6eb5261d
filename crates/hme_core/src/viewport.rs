//! Viewport sizing and the draw-time transform.
//!
//! The viewport is a `tile`-sized window into the background image. At draw
//! time it is scaled uniformly so it *covers* the screen (one axis may
//! overflow and get cropped symmetrically, never letterboxed). Every world
//! position goes through the same `scale` + `offset`, so the map and the
//! sprites drawn on it can never drift apart.

use glam::{DVec2, IVec2, UVec2};

/// Preferred viewport edge length in background pixels.
pub const TARGET_TILE_SIZE: i32 = 512;

/// Splits the map into a grid of roughly `target`-sized cells and returns the
/// size of one cell. Non-positive results fall back to the full dimension.
pub fn derive_tile_size(map_size: IVec2, target: i32) -> IVec2 {
    IVec2::new(
        derive_tile_edge(map_size.x, target),
        derive_tile_edge(map_size.y, target),
    )
}

fn derive_tile_edge(map_edge: i32, target: i32) -> i32 {
    let target = target.max(1);
    let cells = ((map_edge + target - 1) / target).max(1);
    let edge = map_edge / cells;
    if edge <= 0 {
        map_edge
    } else {
        edge
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTransform {
    pub scale: f64,
    pub offset: DVec2,
}

impl DrawTransform {
    pub fn compute(tile: IVec2, screen: UVec2) -> Self {
        let tile = tile.max(IVec2::ONE).as_dvec2();
        let screen = screen.as_dvec2();
        let scale = (screen.x / tile.x).max(screen.y / tile.y);
        let offset = (screen - tile * scale) / 2.0;
        Self { scale, offset }
    }

    /// Screen position of the background image's top-left corner.
    pub fn background_origin(&self, viewport: IVec2) -> DVec2 {
        -viewport.as_dvec2() * self.scale + self.offset
    }

    /// Maps a point in background pixels to screen pixels.
    pub fn world_to_screen(&self, world: DVec2, viewport: IVec2) -> DVec2 {
        (world - viewport.as_dvec2()) * self.scale + self.offset
    }
}

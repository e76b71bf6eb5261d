//! Drop shadow under the player: a translucent rectangle with its four
//! corners punched out to read as an ellipse.

use glam::{DVec2, IVec2};

/// Alpha written to every pixel of the shadow before corners are cleared.
pub const SHADOW_FILL_ALPHA: u8 = 100;
/// Extra opacity applied when the shadow is drawn.
pub const SHADOW_DRAW_ALPHA: f32 = 0.9;

const SHADOW_WIDTH_FRACTION: f64 = 0.8;
const SHADOW_HEIGHT_FRACTION: f64 = 0.3;
/// Vertical distance from the player's top edge, in player heights.
const SHADOW_DROP: f64 = 2.1;

/// Single-channel coverage buffer, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaMask {
    pub width: u32,
    pub height: u32,
    pub alpha: Vec<u8>,
}

impl AlphaMask {
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.alpha[(y * self.width + x) as usize]
    }

    fn clear(&mut self, x: i64, y: i64) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.alpha[index] = 0;
    }

    /// Black RGBA pixels carrying the mask as alpha.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.alpha.iter().flat_map(|&a| [0, 0, 0, a]).collect()
    }
}

/// Fills a `width` x `height` mask with `fill_alpha`, then clears every corner
/// pixel outside a circle of `corner_radius` centred `corner_radius` pixels in
/// from both edges.
pub fn generate_rounded_rect_mask(
    width: u32,
    height: u32,
    corner_radius: u32,
    fill_alpha: u8,
) -> AlphaMask {
    let mut mask = AlphaMask {
        width,
        height,
        alpha: vec![fill_alpha; width as usize * height as usize],
    };

    let r = i64::from(corner_radius);
    let (w, h) = (i64::from(width), i64::from(height));
    for x in 0..r {
        for y in 0..r {
            let dx = x - r;
            let dy = y - r;
            if dx * dx + dy * dy > r * r {
                mask.clear(x, y);
                mask.clear(w - 1 - x, y);
                mask.clear(x, h - 1 - y);
                mask.clear(w - 1 - x, h - 1 - y);
            }
        }
    }
    mask
}

/// Size and placement of the player's shadow, derived from the player size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowSpec {
    pub size: IVec2,
    pub corner_radius: u32,
}

impl ShadowSpec {
    pub fn for_player(player_size: IVec2) -> Self {
        let player = player_size.as_dvec2();
        let size = IVec2::new(
            (player.x * SHADOW_WIDTH_FRACTION) as i32,
            (player.y * SHADOW_HEIGHT_FRACTION) as i32,
        );
        Self {
            size,
            corner_radius: (size.y / 2).max(0) as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0 || self.size.y <= 0
    }

    pub fn mask(&self) -> AlphaMask {
        generate_rounded_rect_mask(
            self.size.x.max(0) as u32,
            self.size.y.max(0) as u32,
            self.corner_radius,
            SHADOW_FILL_ALPHA,
        )
    }

    /// Offset of the shadow's top-left from the player's top-left, in
    /// background pixels: centred horizontally, dropped below the sprite.
    pub fn offset(&self, player_size: IVec2) -> DVec2 {
        DVec2::new(
            f64::from(player_size.x - self.size.x) / 2.0,
            f64::from(player_size.y) * SHADOW_DROP,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_cleared_center_filled() {
        let mask = generate_rounded_rect_mask(18, 6, 3, 100);
        assert_eq!(mask.alpha.len(), 18 * 6);
        for &(x, y) in &[(0, 0), (17, 0), (0, 5), (17, 5)] {
            assert_eq!(mask.get(x, y), 0, "corner ({x}, {y})");
        }
        assert_eq!(mask.get(9, 3), 100);
        assert_eq!(mask.get(9, 0), 100);
        // With r = h / 2 the outermost column is cut away entirely.
        assert_eq!(mask.get(0, 3), 0);
        assert_eq!(mask.get(1, 0), 0);
        assert_eq!(mask.get(1, 2), 100);
    }

    #[test]
    fn corner_cut_follows_circle() {
        let mask = generate_rounded_rect_mask(20, 20, 4, 255);
        // (x-4)^2 + (y-4)^2 > 16 is cleared, on the circle stays.
        assert_eq!(mask.get(0, 1), 0);
        assert_eq!(mask.get(0, 4), 255);
        assert_eq!(mask.get(1, 1), 0);
        assert_eq!(mask.get(2, 1), 255);
        assert_eq!(mask.get(19, 18), 0);
    }

    #[test]
    fn mask_is_mirror_symmetric() {
        let mask = generate_rounded_rect_mask(15, 9, 4, 80);
        for y in 0..9 {
            for x in 0..15 {
                assert_eq!(mask.get(x, y), mask.get(14 - x, y));
                assert_eq!(mask.get(x, y), mask.get(x, 8 - y));
            }
        }
    }

    #[test]
    fn zero_radius_leaves_rectangle() {
        let mask = generate_rounded_rect_mask(4, 3, 0, 100);
        assert!(mask.alpha.iter().all(|&a| a == 100));
    }

    #[test]
    fn radius_larger_than_mask_does_not_panic() {
        let mask = generate_rounded_rect_mask(3, 2, 5, 100);
        assert_eq!(mask.alpha.len(), 6);
        assert_eq!(mask.get(0, 0), 0);
    }

    #[test]
    fn empty_mask() {
        let mask = generate_rounded_rect_mask(0, 0, 0, 100);
        assert!(mask.alpha.is_empty());
        assert!(mask.to_rgba().is_empty());
    }

    #[test]
    fn rgba_is_black_with_mask_alpha() {
        let mask = generate_rounded_rect_mask(2, 1, 0, 100);
        assert_eq!(mask.to_rgba(), vec![0, 0, 0, 100, 0, 0, 0, 100]);
    }

    #[test]
    fn spec_for_default_player() {
        let spec = ShadowSpec::for_player(IVec2::new(23, 23));
        assert_eq!(spec.size, IVec2::new(18, 6));
        assert_eq!(spec.corner_radius, 3);
        let offset = spec.offset(IVec2::new(23, 23));
        assert!((offset.x - 2.5).abs() < 1e-9);
        assert!((offset.y - 48.3).abs() < 1e-9);
    }

    #[test]
    fn tiny_player_has_no_shadow() {
        assert!(ShadowSpec::for_player(IVec2::new(1, 1)).is_empty());
        assert!(!ShadowSpec::for_player(IVec2::new(23, 23)).is_empty());
    }
}

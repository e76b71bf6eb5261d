use glam::DVec2;

/// Images the renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageId {
    Background,
    Shadow,
    Player,
}

impl ImageId {
    pub fn label(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Shadow => "shadow",
            Self::Player => "player",
        }
    }
}

/// One textured quad in screen pixels, origin at the top-left of the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub image: ImageId,
    pub position: DVec2,
    pub size: DVec2,
    pub alpha: f32,
}

impl DrawCommand {
    pub fn opaque(image: ImageId, position: DVec2, size: DVec2) -> Self {
        Self {
            image,
            position,
            size,
            alpha: 1.0,
        }
    }

    /// Screen-space rectangle covered by the quad, as (min, max).
    pub fn bounds(&self) -> (DVec2, DVec2) {
        (self.position, self.position + self.size)
    }
}

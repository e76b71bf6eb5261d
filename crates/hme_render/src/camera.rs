use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Pixel-space projection: (0, 0) is the surface's top-left corner, y grows
/// downward, one unit is one physical pixel. World-to-screen mapping happens
/// on the CPU, so this camera never moves.
pub struct ScreenCamera {
    pub viewport: (u32, u32),
}

impl ScreenCamera {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            viewport: (viewport_width, viewport_height),
        }
    }

    fn projection(&self) -> Mat4 {
        let width = self.viewport.0.max(1) as f32;
        let height = self.viewport.1.max(1) as f32;
        Mat4::orthographic_rh(0.0, width, height, 0.0, -1.0, 1.0)
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.projection().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec4};

    fn screen_to_clip(camera: &ScreenCamera, point: Vec2) -> Vec2 {
        let view_proj = Mat4::from_cols_array_2d(&camera.build_uniform().view_proj);
        let clip = view_proj * Vec4::new(point.x, point.y, 0.0, 1.0);
        Vec2::new(clip.x, clip.y)
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn top_left_maps_to_clip_top_left() {
        let camera = ScreenCamera::new(1024, 768);
        assert!(close(screen_to_clip(&camera, Vec2::ZERO), Vec2::new(-1.0, 1.0)));
    }

    #[test]
    fn bottom_right_maps_to_clip_bottom_right() {
        let camera = ScreenCamera::new(1024, 768);
        let clip = screen_to_clip(&camera, Vec2::new(1024.0, 768.0));
        assert!(close(clip, Vec2::new(1.0, -1.0)));
    }

    #[test]
    fn center_maps_to_origin() {
        let camera = ScreenCamera::new(800, 600);
        assert!(close(screen_to_clip(&camera, Vec2::new(400.0, 300.0)), Vec2::ZERO));
    }

    #[test]
    fn zero_viewport_stays_finite() {
        let camera = ScreenCamera::new(0, 0);
        let uniform = camera.build_uniform();
        assert!(uniform.view_proj.iter().flatten().all(|v| v.is_finite()));
    }
}

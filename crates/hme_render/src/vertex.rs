#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    /// Screen pixels, origin top-left.
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    /// Multiplied with the texel; alpha carries per-draw opacity.
    pub color: [f32; 4],
}

impl SpriteVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2, // tex_coords
        2 => Float32x4, // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Four corners of an axis-aligned quad, clockwise from top-left, sampling
    /// the whole texture.
    pub fn quad(min: [f32; 2], max: [f32; 2], color: [f32; 4]) -> [SpriteVertex; 4] {
        [
            SpriteVertex {
                position: [min[0], min[1]],
                tex_coords: [0.0, 0.0],
                color,
            },
            SpriteVertex {
                position: [max[0], min[1]],
                tex_coords: [1.0, 0.0],
                color,
            },
            SpriteVertex {
                position: [max[0], max[1]],
                tex_coords: [1.0, 1.0],
                color,
            },
            SpriteVertex {
                position: [min[0], max[1]],
                tex_coords: [0.0, 1.0],
                color,
            },
        ]
    }
}

/// Index pattern for one quad starting at `base`.
pub fn quad_indices(base: u32) -> [u32; 6] {
    [base, base + 1, base + 2, base, base + 2, base + 3]
}

//! Turns the frame's draw list into one vertex/index stream plus the draw
//! calls that index into it.

use hme_core::{DrawCommand, ImageId};
use hme_render::vertex::quad_indices;
use hme_render::SpriteVertex;

/// A contiguous run of indices sampling the same texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub image: ImageId,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Debug, Default)]
pub struct SpriteMesh {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
}

pub fn build_mesh(commands: &[DrawCommand]) -> SpriteMesh {
    let mut mesh = SpriteMesh {
        vertices: Vec::with_capacity(commands.len() * 4),
        indices: Vec::with_capacity(commands.len() * 6),
        draw_calls: Vec::with_capacity(commands.len()),
    };

    for command in commands {
        let (min, max) = command.bounds();
        let color = [1.0, 1.0, 1.0, command.alpha];
        let base_index = mesh.vertices.len() as u32;
        mesh.vertices.extend(SpriteVertex::quad(
            [min.x as f32, min.y as f32],
            [max.x as f32, max.y as f32],
            color,
        ));

        let draw_start = mesh.indices.len() as u32;
        mesh.indices.extend_from_slice(&quad_indices(base_index));
        push_draw_call(&mut mesh.draw_calls, command.image, draw_start, 6);
    }

    mesh
}

/// Appends a draw call, merging with the previous one when the image matches
/// and the indices are contiguous.
fn push_draw_call(draw_calls: &mut Vec<DrawCall>, image: ImageId, index_start: u32, index_count: u32) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if last.image == image && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        image,
        index_start,
        index_count,
    });
}

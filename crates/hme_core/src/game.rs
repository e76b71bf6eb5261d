use glam::UVec2;

use crate::draw::DrawCommand;
use crate::input::InputState;

/// Callbacks the frame loop drives. `update` runs once per fixed tick,
/// `draw` once per presented frame, `layout` whenever the surface size is
/// needed.
pub trait Game {
    fn update(&mut self, input: &InputState);

    /// Appends this frame's draw list, back to front.
    fn draw(&self, screen: UVec2, commands: &mut Vec<DrawCommand>);

    /// Logical screen size for a given window size.
    fn layout(&self, outside: UVec2) -> UVec2 {
        outside
    }
}

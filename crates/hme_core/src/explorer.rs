//! The map explorer: one player walking over one background image.

use glam::UVec2;

use crate::draw::{DrawCommand, ImageId};
use crate::game::Game;
use crate::input::{FrameInput, InputState};
use crate::shadow::{ShadowSpec, SHADOW_DRAW_ALPHA};
use crate::viewport::DrawTransform;
use crate::world::{MapGeometry, WorldState};

pub struct Explorer {
    geometry: MapGeometry,
    shadow: ShadowSpec,
    state: WorldState,
}

impl Explorer {
    pub fn new(geometry: MapGeometry) -> Self {
        Self {
            geometry,
            shadow: ShadowSpec::for_player(geometry.player_size),
            state: WorldState::spawn(&geometry),
        }
    }

    pub fn geometry(&self) -> &MapGeometry {
        &self.geometry
    }

    pub fn shadow(&self) -> &ShadowSpec {
        &self.shadow
    }

    pub fn state(&self) -> WorldState {
        self.state
    }

    pub fn step(&mut self, input: &FrameInput) {
        self.state = self.state.update(input, &self.geometry);
    }

    pub fn transform(&self, screen: UVec2) -> DrawTransform {
        DrawTransform::compute(self.geometry.tile, screen)
    }
}

impl Game for Explorer {
    fn update(&mut self, input: &InputState) {
        self.step(&FrameInput::from_state(input));
    }

    fn draw(&self, screen: UVec2, commands: &mut Vec<DrawCommand>) {
        let transform = self.transform(screen);
        let scale = transform.scale;
        let viewport = self.state.viewport;

        commands.push(DrawCommand::opaque(
            ImageId::Background,
            transform.background_origin(viewport),
            self.geometry.map_size.as_dvec2() * scale,
        ));

        let player_size = self.geometry.player_size;
        let player_screen = transform.world_to_screen(self.state.player, viewport);

        if !self.shadow.is_empty() {
            commands.push(DrawCommand {
                image: ImageId::Shadow,
                position: player_screen + self.shadow.offset(player_size) * scale,
                size: self.shadow.size.as_dvec2() * scale,
                alpha: SHADOW_DRAW_ALPHA,
            });
        }

        commands.push(DrawCommand::opaque(
            ImageId::Player,
            player_screen,
            player_size.as_dvec2() * scale,
        ));
    }
}

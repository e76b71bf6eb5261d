//! F3 debug overlay drawn with egui on top of the map.
//!
//! egui_wgpu needs a `RenderPass<'static>`, so one frame is split into:
//!
//!   1. `prepare()` runs the UI and tessellates it
//!   2. `upload()` pushes textures and buffers through the encoder
//!   3. `paint()` draws into a second pass created with `forget_lifetime()`
//!   4. `cleanup()` frees textures egui dropped
//!
//! Window events always reach egui, even while hidden, so toggling the
//! overlay mid-drag does not leave it with stale pointer state.

use hme_core::time::TimeState;
use winit::window::Window;

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub player: (f64, f64),
    pub viewport: (i32, i32),
    pub tile: (i32, i32),
    pub map: (i32, i32),
    pub screen: (u32, u32),
    /// Viewport-to-screen scale this frame
    pub scale: f64,
    pub draw_commands: u32,
    pub texture_memory_mb: f32,
    /// e.g. "Audio: playing (looped 2x)"
    pub audio_label: String,
    pub paused: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayActions {
    pub toggle_pause: bool,
    /// Advance exactly one tick while paused
    pub single_step: bool,
}

pub struct DebugOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub visible: bool,
}

impl DebugOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        self.visible && response.consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Debug overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        time: &TimeState,
        stats: &OverlayStats,
    ) -> (
        Vec<egui::ClippedPrimitive>,
        egui::TexturesDelta,
        OverlayActions,
    ) {
        let mut actions = OverlayActions::default();
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if !self.visible {
                return;
            }
            egui::Window::new("Map Explorer")
                .default_pos([10.0, 10.0])
                .show(ctx, |ui| {
                    ui.label(format!("FPS: {:.1}", time.smoothed_fps));
                    ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
                    ui.label(format!("Ticks this frame: {}", time.ticks_this_frame));
                    ui.label(format!("Total ticks: {}", time.tick_count));

                    ui.separator();
                    ui.label(format!(
                        "Player: ({:.1}, {:.1})",
                        stats.player.0, stats.player.1
                    ));
                    ui.label(format!(
                        "Viewport: ({}, {})",
                        stats.viewport.0, stats.viewport.1
                    ));
                    ui.label(format!("Tile: {}x{}", stats.tile.0, stats.tile.1));
                    ui.label(format!("Map: {}x{}", stats.map.0, stats.map.1));
                    ui.label(format!(
                        "Screen: {}x{} @ {:.3}x",
                        stats.screen.0, stats.screen.1, stats.scale
                    ));
                    ui.label(format!("Draw commands: {}", stats.draw_commands));
                    ui.label(format!("Textures: {:.1} MB", stats.texture_memory_mb));
                    ui.label(&stats.audio_label);

                    ui.separator();
                    ui.horizontal(|ui| {
                        let pause_label = if stats.paused { "Resume" } else { "Pause" };
                        if ui.button(pause_label).clicked() {
                            actions.toggle_pause = true;
                        }
                        if stats.paused && ui.button("Step").clicked() {
                            actions.single_step = true;
                        }
                    });
                    if stats.paused {
                        ui.label("\u{23f8} PAUSED");
                    }
                });
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta, actions)
    }

    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

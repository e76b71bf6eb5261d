//! Hyrule Map Explorer -- main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. Everything happens in
//! `RedrawRequested` on a fixed-timestep model (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. hotkeys (Escape, F3) -- read once per frame
//!   3. `run_fixed_ticks` -- poll the music loop, advance the explorer unless paused
//!   4. `Game::draw` -> `build_mesh` -> one textured quad per command
//!   5. upload camera uniform, issue draw calls, composite egui overlay
//!
//! Startup loads the map before opening the window, then derives every size
//! from it and the requested window size. Missing or oversized images abort
//! startup; missing audio does not.

mod assets;
mod batch;
#[cfg(test)]
mod replay;

use std::collections::HashMap;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use glam::UVec2;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use assets::{load_required, start_music, AssetPaths, RequiredAssets, StartupError};
use batch::{build_mesh, DrawCall};
use hme_audio::{status_label, MusicLoop};
use hme_core::input::{Hotkeys, InputState, Key};
use hme_core::time::{run_fixed_ticks, PauseState, TimeState};
use hme_core::{DrawCommand, Explorer, Game, ImageId};
use hme_devtools::{DebugOverlay, OverlayStats};
use hme_platform::{create_window, PlatformConfig};
use hme_render::{GpuContext, ScreenCamera, SpritePipeline, SpriteVertex, Texture};

struct GpuSpriteTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// Everything that needs a live window. Built in `ApplicationHandler::resumed`.
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    camera: ScreenCamera,
    sprite_pipeline: SpritePipeline,
    debug_overlay: DebugOverlay,

    explorer: Explorer,
    music: Option<MusicLoop>,
    pause: PauseState,
    textures: HashMap<ImageId, GpuSpriteTexture>,

    // Rebuilt on the CPU every frame, then streamed into these buffers.
    // Buffers grow (power-of-two) but never shrink.
    draw_commands: Vec<DrawCommand>,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    draw_calls: Vec<DrawCall>,
}

impl EngineState {
    fn new(
        window: Arc<Window>,
        assets: RequiredAssets,
        music_path: &Path,
    ) -> Result<Self, StartupError> {
        let gpu = GpuContext::new(window.clone())?;
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let debug_overlay = DebugOverlay::new(&gpu.device, gpu.surface_format, &window);

        let max_dimension = gpu.max_texture_dimension();
        let background_texture = Texture::from_image(
            &gpu.device,
            &gpu.queue,
            &assets.background,
            max_dimension,
            ImageId::Background.label(),
        )
        .map_err(StartupError::Background)?;
        let player_texture = Texture::from_image(
            &gpu.device,
            &gpu.queue,
            &assets.player_sprite,
            max_dimension,
            ImageId::Player.label(),
        )
        .map_err(StartupError::PlayerSprite)?;

        let explorer = Explorer::new(assets.geometry);

        let mut textures = HashMap::new();
        textures.insert(
            ImageId::Background,
            upload_texture(&gpu.device, &sprite_pipeline, background_texture),
        );
        textures.insert(
            ImageId::Player,
            upload_texture(&gpu.device, &sprite_pipeline, player_texture),
        );
        let shadow = explorer.shadow();
        if shadow.is_empty() {
            log::debug!("Player too small for a shadow");
        } else {
            let mask = shadow.mask();
            let shadow_texture = Texture::from_rgba8(
                &gpu.device,
                &gpu.queue,
                &mask.to_rgba(),
                mask.width,
                mask.height,
                ImageId::Shadow.label(),
            );
            textures.insert(
                ImageId::Shadow,
                upload_texture(&gpu.device, &sprite_pipeline, shadow_texture),
            );
        }

        let music = start_music(music_path);

        let camera = ScreenCamera::new(gpu.size.0, gpu.size.1);
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let mut state = Self {
            window,
            gpu,
            time: TimeState::new(),
            input: InputState::new(),
            camera,
            sprite_pipeline,
            debug_overlay,
            explorer,
            music,
            pause: PauseState::default(),
            textures,
            draw_commands: Vec::with_capacity(3),
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            draw_calls: Vec::new(),
        };
        // Background + shadow + player.
        state.ensure_mesh_capacity(12, 18);
        Ok(state)
    }

    fn screen_size(&self) -> UVec2 {
        self.explorer
            .layout(UVec2::new(self.gpu.size.0, self.gpu.size.1))
    }

    fn rebuild_mesh(&mut self) {
        self.draw_commands.clear();
        let screen = self.screen_size();
        self.explorer.draw(screen, &mut self.draw_commands);

        let mesh = build_mesh(&self.draw_commands);
        self.ensure_mesh_capacity(mesh.vertices.len(), mesh.indices.len());
        if !mesh.vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&mesh.vertices));
        }
        if !mesh.indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&mesh.indices));
        }
        self.draw_calls = mesh.draw_calls;
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    fn texture_memory_mb(&self) -> f32 {
        let bytes: usize = self
            .textures
            .values()
            .map(|t| t.texture.byte_size())
            .sum();
        bytes as f32 / (1024.0 * 1024.0)
    }

    fn overlay_stats(&self) -> OverlayStats {
        let world = self.explorer.state();
        let geometry = self.explorer.geometry();
        let screen = self.screen_size();
        OverlayStats {
            player: (world.player.x, world.player.y),
            viewport: (world.viewport.x, world.viewport.y),
            tile: (geometry.tile.x, geometry.tile.y),
            map: (geometry.map_size.x, geometry.map_size.y),
            screen: (screen.x, screen.y),
            scale: self.explorer.transform(screen).scale,
            draw_commands: self.draw_commands.len() as u32,
            texture_memory_mb: self.texture_memory_mb(),
            audio_label: status_label(self.music.as_ref()),
            paused: self.pause.paused,
        }
    }

    /// Runs every tick owed by the accumulator. Returns false when the app
    /// should exit.
    fn run_ticks(&mut self) -> bool {
        self.time.begin_frame();

        let hotkeys = Hotkeys::read(&self.input);
        if hotkeys.exit {
            log::info!("Escape pressed, exiting.");
            return false;
        }
        if hotkeys.toggle_overlay {
            self.debug_overlay.toggle();
        }

        let music = &mut self.music;
        let explorer = &mut self.explorer;
        let input = &self.input;
        run_fixed_ticks(
            &mut self.time,
            &mut self.pause,
            || {
                if let Some(music) = music.as_mut() {
                    music.keep_playing();
                }
            },
            || explorer.update(input),
        );
        true
    }

    fn render(&mut self) {
        self.rebuild_mesh();

        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera.build_uniform()]),
        );

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let stats = self.overlay_stats();
        let (egui_primitives, egui_textures_delta, overlay_actions) =
            self.debug_overlay.prepare(&self.window, &self.time, &stats);

        if overlay_actions.toggle_pause {
            self.pause.toggle();
        }
        if overlay_actions.single_step {
            self.pause.request_step();
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Map Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for draw in &self.draw_calls {
                let Some(texture) = self.textures.get(&draw.image) else {
                    log::trace!("No texture for {}, skipping", draw.image.label());
                    continue;
                };
                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                render_pass.draw_indexed(
                    draw.index_start..(draw.index_start + draw.index_count),
                    0,
                    0..1,
                );
            }
        }

        self.debug_overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.debug_overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.debug_overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

struct App {
    config: PlatformConfig,
    paths: AssetPaths,
    state: Option<EngineState>,
    startup_failed: bool,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            paths: AssetPaths::default(),
            state: None,
            startup_failed: false,
        }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<EngineState, StartupError> {
        // Sizes come from the requested window, not the first surface size,
        // so a fast resize during startup cannot change the geometry.
        let requested = UVec2::new(self.config.width, self.config.height);
        let assets = load_required(&self.paths, requested)?;

        let window = create_window(event_loop, &self.config)?;
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        EngineState::new(window, assets, &self.paths.music)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.startup_failed {
            return;
        }
        match self.start(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("{err}");
                self.startup_failed = true;
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.camera.viewport = (w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(false) => {
                state.input.release_all();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(key) = map_key(key_code) {
                        apply_key_event(&mut state.input, key, event.state, egui_consumed);
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                if !state.run_ticks() {
                    event_loop.exit();
                    return;
                }
                state.render();
                state.input.end_frame();
            }

            _ => {}
        }
    }
}

fn upload_texture(
    device: &wgpu::Device,
    pipeline: &SpritePipeline,
    texture: Texture,
) -> GpuSpriteTexture {
    let bind_group = pipeline.create_texture_bind_group(device, &texture);
    GpuSpriteTexture {
        texture,
        bind_group,
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Map Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Map Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        _ => None,
    }
}

/// Presses the overlay consumed never reach the game. Releases always do,
/// so a key held while the overlay grabbed focus cannot stick.
fn apply_key_event(input: &mut InputState, key: Key, state: ElementState, egui_consumed: bool) {
    match state {
        ElementState::Pressed if !egui_consumed => input.key_down(key),
        ElementState::Pressed => {}
        ElementState::Released => input.key_up(key),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Hyrule Map Explorer starting...");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
        return ExitCode::FAILURE;
    }
    if app.startup_failed {
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

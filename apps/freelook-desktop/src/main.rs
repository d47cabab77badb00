use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use freelook_common::{DemoConfig, Direction, FramePacer, FrameStats, IntentPolicy};
use freelook_input::{Action, HeldDirections};
use freelook_kernel::{FreeLookCamera, Scene};
use freelook_render::{Frame, Projection};
use freelook_render_wgpu::WgpuRenderer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "freelook-desktop", about = "Animated cubes under a free-look camera")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frame rate cap
    #[arg(long)]
    fps: Option<u32>,

    /// Mouse sensitivity in degrees per pixel
    #[arg(long)]
    sensitivity: Option<f32>,

    /// Movement key handling: first_match or combined
    #[arg(long)]
    policy: Option<IntentPolicy>,
}

impl Cli {
    fn into_config(self) -> Result<DemoConfig> {
        let mut config = DemoConfig::load_or_default(self.config.as_deref())
            .context("failed to load configuration")?;
        if let Some(fps) = self.fps {
            config.target_fps = fps;
        }
        if let Some(sensitivity) = self.sensitivity {
            config.sensitivity = sensitivity;
        }
        if let Some(policy) = self.policy {
            config.intent_policy = policy;
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

/// Map a physical key to an action. Only presses of non-movement keys produce
/// actions; movement keys report both edges.
fn key_action(key: KeyCode, pressed: bool) -> Option<Action> {
    let movement = match key {
        KeyCode::KeyW => Some(Direction::Forward),
        KeyCode::KeyS => Some(Direction::Backward),
        KeyCode::KeyA => Some(Direction::Left),
        KeyCode::KeyD => Some(Direction::Right),
        _ => None,
    };
    if let Some(dir) = movement {
        return Some(if pressed {
            Action::Press(dir)
        } else {
            Action::Release(dir)
        });
    }
    if !pressed {
        return None;
    }
    match key {
        KeyCode::Escape => Some(Action::Quit),
        KeyCode::F1 => Some(Action::ToggleHud),
        _ => None,
    }
}

/// Application state. The camera lives here and is handed explicitly to
/// both the key polling and the pointer handler.
struct AppState {
    config: DemoConfig,
    camera: FreeLookCamera,
    scene: Scene,
    projection: Projection,
    held: HeldDirections,
    pacer: FramePacer,
    frame_stats: FrameStats,
    show_hud: bool,
}

impl AppState {
    fn new(config: DemoConfig) -> Self {
        let mut camera = FreeLookCamera::default();
        camera.sensitivity = config.sensitivity;
        Self {
            camera,
            scene: Scene::from_config(&config),
            projection: Projection::from_config(&config),
            held: HeldDirections::new(),
            pacer: FramePacer::new(config.target_fps),
            frame_stats: FrameStats::new(120),
            show_hud: false,
            config,
        }
    }

    /// Apply one action. Returns `true` when the application should exit.
    fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Press(dir) => self.held.press(dir),
            Action::Release(dir) => self.held.release(dir),
            Action::Look { x, y } => self.camera.update_orientation(x, y),
            Action::ResetLook => self.camera.reset_cursor(),
            Action::ToggleHud => self.show_hud = !self.show_hud,
            Action::Quit => return true,
        }
        false
    }

    /// Advance the camera by one frame of held movement.
    fn update(&mut self, dt: f32) {
        let intents = self.held.resolve(self.config.intent_policy);
        if !intents.is_empty() {
            self.camera
                .navigate_many(&intents, dt * self.config.move_speed);
        }
    }

    fn capture(&self, time: f32) -> Frame {
        Frame::capture(&self.camera, &self.projection, &self.scene, time)
    }

    fn draw_hud(&self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }

        egui::Window::new("freelook")
            .default_width(240.0)
            .show(ctx, |ui| {
                let eye = self.camera.eye();
                let dir = self.camera.direction();
                ui.label(format!("Eye: ({:.2}, {:.2}, {:.2})", eye.x, eye.y, eye.z));
                ui.label(format!("Direction: ({:.2}, {:.2}, {:.2})", dir.x, dir.y, dir.z));
                ui.label(format!(
                    "Yaw: {:.1}  Pitch: {:.1}",
                    self.camera.yaw(),
                    self.camera.pitch()
                ));
                ui.separator();
                ui.label(format!("Instances: {}", self.scene.len()));
                ui.label(format!(
                    "Frame: {:.2} ms ({:.0} fps)",
                    self.frame_stats.mean_ms(),
                    self.frame_stats.fps()
                ));
                ui.label(format!("Movement: {:?}", self.config.intent_policy));
                ui.separator();
                ui.small("F1: Toggle HUD | Mouse: Look | WASD: Move | Esc: Quit");
            });
    }
}

/// GPU resources created once the window exists.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(config: DemoConfig) -> Self {
        Self {
            state: AppState::new(config),
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title(self.state.config.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.state.config.width,
                self.state.config.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("freelook_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state.projection.resize(size.width, size.height);

        let renderer = WgpuRenderer::new(
            &device,
            surface_format,
            size.width,
            size.height,
            self.state.config.clear_color,
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Gpu {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn redraw(&mut self) {
        let frame_start = Instant::now();
        let dt = self.state.pacer.begin_frame();
        self.state.update(dt);
        self.state.frame_stats.push(dt);

        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame = self.state.capture(self.state.pacer.elapsed());
        gpu.renderer.render(&gpu.device, &gpu.queue, &view, &frame);

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_hud(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
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
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        self.state.pacer.sleep_remaining(frame_start);
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("startup failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                // The camera never saw this motion; restart tracking from the next sample.
                if matches!(event, WindowEvent::CursorMoved { .. }) {
                    self.state.apply(Action::ResetLook);
                }
                return;
            }
        }

        let action = match event {
            WindowEvent::CloseRequested => Some(Action::Quit),
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.config.width = new_size.width.max(1);
                    gpu.config.height = new_size.height.max(1);
                    gpu.surface.configure(&gpu.device, &gpu.config);
                    gpu.renderer
                        .resize(&gpu.device, gpu.config.width, gpu.config.height);
                }
                self.state.projection.resize(new_size.width, new_size.height);
                None
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => key_action(key, key_state == ElementState::Pressed),
            WindowEvent::CursorMoved { position, .. } => Some(Action::Look {
                x: position.x as f32,
                y: position.y as f32,
            }),
            WindowEvent::CursorEntered { .. } | WindowEvent::CursorLeft { .. } => {
                Some(Action::ResetLook)
            }
            WindowEvent::Focused(false) => {
                self.state.held.clear();
                None
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                None
            }
            _ => None,
        };

        if let Some(action) = action {
            if self.state.apply(action) {
                tracing::info!("exit requested");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = cli.into_config()?;
    tracing::info!(
        fps = config.target_fps,
        instances = config.positions.len(),
        policy = ?config.intent_policy,
        "freelook-desktop starting"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn movement_keys_report_both_edges() {
        assert_eq!(
            key_action(KeyCode::KeyW, true),
            Some(Action::Press(Direction::Forward))
        );
        assert_eq!(
            key_action(KeyCode::KeyA, false),
            Some(Action::Release(Direction::Left))
        );
        assert_eq!(key_action(KeyCode::Escape, true), Some(Action::Quit));
        assert_eq!(key_action(KeyCode::Escape, false), None);
        assert_eq!(key_action(KeyCode::KeyQ, true), None);
    }

    #[test]
    fn held_forward_moves_camera() {
        let mut state = AppState::new(DemoConfig::default());
        assert!(!state.apply(Action::Press(Direction::Forward)));
        state.update(1.0);
        assert!(state.camera.eye().abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-5));

        state.apply(Action::Release(Direction::Forward));
        state.update(1.0);
        assert!(state.camera.eye().abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-5));
    }

    #[test]
    fn first_match_ignores_second_key() {
        let mut state = AppState::new(DemoConfig::default());
        state.apply(Action::Press(Direction::Forward));
        state.apply(Action::Press(Direction::Left));
        state.update(1.0);
        assert!(state.camera.eye().abs_diff_eq(Vec3::new(-1.0, 0.0, 3.0), 1e-5));
    }

    #[test]
    fn combined_policy_moves_diagonally() {
        let config = DemoConfig {
            intent_policy: IntentPolicy::Combined,
            ..DemoConfig::default()
        };
        let mut state = AppState::new(config);
        state.apply(Action::Press(Direction::Forward));
        state.apply(Action::Press(Direction::Left));
        state.update(1.0);
        assert!(state.camera.eye().abs_diff_eq(Vec3::new(-1.0, 0.0, 2.0), 1e-5));
    }

    #[test]
    fn look_actions_drive_orientation() {
        let mut state = AppState::new(DemoConfig::default());
        state.apply(Action::Look { x: 400.0, y: 300.0 });
        state.apply(Action::Look { x: 450.0, y: 300.0 });
        assert!((state.camera.yaw() - 5.0).abs() < 1e-5);

        state.apply(Action::ResetLook);
        state.apply(Action::Look { x: 0.0, y: 0.0 });
        assert!((state.camera.yaw() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn motion_hidden_by_hud_does_not_jump_camera() {
        let mut state = AppState::new(DemoConfig::default());
        state.apply(Action::Look { x: 100.0, y: 100.0 });
        state.apply(Action::Look { x: 110.0, y: 100.0 });
        assert!((state.camera.yaw() - 1.0).abs() < 1e-5);

        // Pointer dragged across the HUD: events swallowed, tracking reset.
        state.apply(Action::ResetLook);
        state.apply(Action::Look { x: 600.0, y: 400.0 });
        assert!((state.camera.yaw() - 1.0).abs() < 1e-5);
        assert_eq!(state.camera.pitch(), 0.0);

        state.apply(Action::Look { x: 610.0, y: 400.0 });
        assert!((state.camera.yaw() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn quit_and_hud_toggle() {
        let mut state = AppState::new(DemoConfig::default());
        assert!(!state.apply(Action::ToggleHud));
        assert!(state.show_hud);
        assert!(state.apply(Action::Quit));
    }

    #[test]
    fn capture_uses_scene_and_camera() {
        let state = AppState::new(DemoConfig::default());
        let frame = state.capture(0.0);
        assert_eq!(frame.instances.len(), 10);
        assert_eq!(frame.view, state.camera.view_matrix());
    }
}

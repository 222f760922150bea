mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::{Quat, Vec2, Vec3};
use lego::{FrameClock, FrameDriver, Lego, LegoConfig, Mount, ensure_graphics};
use lego_common::{Color, Transform};
use lego_debug::{DebugPanel, Options};
use lego_input::{Gesture, PointerButton, PointerState};
use lego_render_wgpu::{RenderStatus, WgpuProbe, WgpuRenderer};
use lego_scene::{Geometry, Mesh, Node};
use lego_tools::SceneInspector;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Pixels of touchpad scroll per wheel line.
const PIXELS_PER_LINE: f32 = 50.0;

#[derive(Parser)]
#[command(name = "lego-desktop", about = "Lego scene composer desktop host")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Stack a few bricks on the ground and give them a debug folder.
fn build_demo(lego: &mut Lego<WgpuRenderer>) {
    let colors = [0xd01012, 0x0055bf, 0xf2cd37, 0x237841];
    let mut bricks = Vec::new();
    for (i, hex) in colors.into_iter().enumerate() {
        let x = (i as f32 - 1.5) * 2.5;
        let id = lego.scene_mut().add(Node::mesh(
            format!("brick {i}"),
            Mesh::new(Geometry::cuboid(2.0, 1.2, 1.0), Color::from_hex(hex)),
            Transform::from_position(Vec3::new(x, 0.6, 0.0)),
        ));
        bricks.push(id);
    }

    let lights: Vec<_> = lego.scene().light_ids().collect();
    for id in lights {
        lego.bind_light(id);
    }

    let Some(binder) = lego.debug() else {
        return;
    };
    // A packed hex number in the color field keeps its number shape.
    let params = binder.add(
        "Bricks",
        &Options::new()
            .with("spin", 0.01)
            .with("lift", 0.6)
            .with("color", f64::from(0xd01012)),
    );
    let mut angle = 0.0_f32;
    lego.on_frame(move |scene| {
        angle += params.number("spin").unwrap_or(0.0);
        let lift = params.number("lift").unwrap_or(0.6);
        let color = params.color("color");
        for (i, id) in bricks.iter().enumerate() {
            let Some(node) = scene.get_mut(*id) else {
                continue;
            };
            node.transform.position.y = lift;
            node.transform.rotation = Quat::from_rotation_y(angle);
            if let (0, Some(color), Some(mesh)) = (i, color, node.as_mesh_mut()) {
                mesh.color = color;
            }
        }
    });
}

/// Window, GPU handles and the composed scene.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    lego: Lego<WgpuRenderer>,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    config: LegoConfig,
    panel: DebugPanel,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    pointer: PointerState,
    cursor: Option<Vec2>,
    clock: FrameClock,
}

impl GpuApp {
    fn new(config: LegoConfig) -> Self {
        Self {
            config,
            panel: DebugPanel::new(),
            gpu: None,
            egui_ctx: EguiContext::default(),
            pointer: PointerState::new(),
            cursor: None,
            clock: FrameClock::default(),
        }
    }

    fn init(&self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title("Lego")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }));
        let probe = WgpuProbe::from_adapter(adapter.as_ref());
        ensure_graphics(&probe)?;
        let adapter = adapter.context("adapter request returned nothing")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("lego_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;
        let (device, queue) = (Arc::new(device), Arc::new(queue));

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(
            device.clone(),
            queue.clone(),
            format,
            (config.width, config.height),
            &self.config.renderer.grid,
        );
        let mut lego = Lego::with_panel(
            Some(Mount::container("window", config.width, config.height)),
            &self.config,
            &probe,
            renderer,
            self.panel.clone(),
        )?;
        build_demo(&mut lego);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

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
            lego,
            egui_winit,
            egui_renderer,
        })
    }

    fn gesture(&mut self, gesture: Option<Gesture>) {
        if let (Some(gesture), Some(gpu)) = (gesture, &mut self.gpu) {
            gpu.lego.handle_gesture(gesture);
        }
    }

    fn redraw(&mut self) {
        let dt = self.clock.tick();
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let frame = match gpu.surface.get_current_texture() {
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
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.lego
            .renderer_mut()
            .set_target(frame.texture.create_view(&Default::default()));
        if gpu.lego.advance(dt) == RenderStatus::NoTarget {
            tracing::warn!("frame rendered without a target");
        }

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let summary = SceneInspector::summary(gpu.lego.scene());
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if let Some(panel) = gpu.lego.panel() {
                ui::draw_panel(ctx, panel);
            }
            if let Some(stats) = gpu.lego.stats() {
                ui::draw_stats(ctx, stats, &summary);
            }
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

        frame.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init(event_loop) {
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
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.config.width = new_size.width.max(1);
                    gpu.config.height = new_size.height.max(1);
                    gpu.surface.configure(&gpu.device, &gpu.config);
                    gpu.lego.resize(gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::Focused(false) => self.pointer.clear(),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.pointer.set_modifier(modifiers.state().shift_key());
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key {
                KeyCode::F1 => self.panel.toggle(),
                KeyCode::KeyR => self.gesture(Some(Gesture::Reset)),
                KeyCode::Escape => event_loop.exit(),
                _ => {}
            },
            WindowEvent::MouseInput { button, state, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    MouseButton::Middle => PointerButton::Middle,
                    _ => return,
                };
                self.pointer
                    .set_button(button, state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                if let Some(last) = self.cursor.replace(position) {
                    let gesture = self.pointer.motion(position - last);
                    self.gesture(gesture);
                }
            }
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                let gesture = self.pointer.scroll(lines);
                self.gesture(gesture);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
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

    tracing::info!("lego-desktop starting");

    let config = match &cli.config {
        Some(path) => LegoConfig::from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => LegoConfig::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}

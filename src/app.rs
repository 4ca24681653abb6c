// src/app.rs

use std::time::Duration;

use log::{debug, info};
use thiserror::Error;
use winit::{event::WindowEvent, window::Window};

use koch_snowflake::config::{AnimationSettings, StyleConfig};
use koch_snowflake::containment::contains;
use koch_snowflake::geometry::Polygon;
use koch_snowflake::subdivision::subdivide_with;
use koch_snowflake::{Presenter, SnowflakeDriver};

use crate::engine_lib::camera::Camera2D;
use crate::engine_lib::controller::{AnimationController, ControlAction};
use crate::rendering_lib::renderer::Renderer;
use crate::rendering_lib::shader::WGSL_SHADER_SOURCE;
use crate::ui::{build_ui, HudInfo};

const FRAMING_MARGIN: f32 = 0.08;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Snowflake(#[from] koch_snowflake::Error),

    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("No suitable graphics adapter found")]
    NoAdapter,

    #[error("Failed to acquire device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

/// Uploads each presented stage to the GPU and records it for the overlay.
struct GpuPresenter<'a> {
    renderer: &'a mut Renderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    hud: &'a mut HudInfo,
}

impl Presenter for GpuPresenter<'_> {
    fn present(&mut self, polygon: &Polygon, iteration: usize) {
        self.renderer.upload_polygon(self.device, self.queue, polygon);
        self.hud.record(polygon, iteration);
    }
}

fn to_wgpu_color(c: [f32; 4]) -> wgpu::Color {
    wgpu::Color { r: c[0] as f64, g: c[1] as f64, b: c[2] as f64, a: c[3] as f64 }
}

pub struct SnowflakeApp {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    renderer: Renderer,
    driver: SnowflakeDriver,
    camera: Camera2D,
    controller: AnimationController,
    style: StyleConfig,
    hud: HudInfo,
    interval: Duration,
    since_last_step: Duration,
    exit_requested: bool,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl SnowflakeApp {
    pub async fn new(
        window: std::sync::Arc<Window>,
        settings: AnimationSettings,
        style: StyleConfig,
    ) -> Result<Self, AppError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(AppError::NoAdapter)?;
        info!("Using adapter: {}", adapter.get_info().name);
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps.formats.iter().copied()
            .find(|f| f.is_srgb()).unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let mut renderer = Renderer::new(&device, config.format, WGSL_SHADER_SOURCE);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(), egui::ViewportId::ROOT, &window,
            Some(window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &device, config.format, None, 1,
        );

        // Frame the seed together with its first stage so the view does not
        // jump as the outline grows.
        let first_stage = subdivide_with(&settings.seed, settings.bulge);
        let framing = settings.seed.bounds().union(&first_stage.bounds());
        let camera = Camera2D::framing(&framing, FRAMING_MARGIN);

        let mut driver = SnowflakeDriver::with_bulge(
            settings.seed,
            settings.max_iterations,
            settings.bulge,
        )?;
        let mut hud = HudInfo::new(settings.max_iterations);
        driver.step(&mut GpuPresenter {
            renderer: &mut renderer,
            device: &device,
            queue: &queue,
            hud: &mut hud,
        });

        Ok(Self {
            surface, device, queue, config, size,
            renderer, driver, camera,
            controller: AnimationController::new(),
            style,
            hud,
            interval: settings.interval,
            since_last_step: Duration::ZERO,
            exit_requested: false,
            egui_ctx, egui_state, egui_renderer,
        })
    }

    pub fn get_size(&self) -> winit::dpi::PhysicalSize<u32> { self.size }

    pub fn exit_requested(&self) -> bool { self.exit_requested }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Presents the next stage once per interval unless paused.
    pub fn update(&mut self, dt: f32) {
        if self.hud.paused {
            return;
        }
        self.since_last_step += Duration::from_secs_f32(dt.max(0.0));
        if self.since_last_step >= self.interval {
            // Slow stages do not queue up catch-up steps.
            self.since_last_step = Duration::ZERO;
            self.advance();
        }
    }

    fn advance(&mut self) {
        self.driver.step(&mut GpuPresenter {
            renderer: &mut self.renderer,
            device: &self.device,
            queue: &self.queue,
            hud: &mut self.hud,
        });
    }

    fn apply_action(&mut self, action: ControlAction) {
        match action {
            ControlAction::TogglePause => self.set_paused(!self.hud.paused),
            ControlAction::StepOnce => {
                self.set_paused(true);
                self.advance();
            }
            ControlAction::Restart => {
                self.driver.reset();
                self.since_last_step = Duration::ZERO;
                self.advance();
            }
            ControlAction::Quit => self.exit_requested = true,
            ControlAction::ClickAt { x, y } => {
                let world = self.camera.screen_to_world(
                    x, y, self.size.width as f32, self.size.height as f32,
                );
                let hit = self
                    .driver
                    .current()
                    .map(|frame| contains(&frame.polygon, &world))
                    .unwrap_or(false);
                debug!("Click at ({:.3}, {:.3}) hit={}", world.x, world.y, hit);
                if hit {
                    self.set_paused(!self.hud.paused);
                }
            }
        }
    }

    fn set_paused(&mut self, paused: bool) {
        if self.hud.paused != paused {
            info!("{}", if paused { "Paused" } else { "Resumed" });
        }
        self.hud.paused = paused;
        self.since_last_step = Duration::ZERO;
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let output_texture = self.surface.get_current_texture()?;
        let view = output_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Main Command Encoder"),
        });

        let view_proj = self.camera.view_proj(self.size.width as f32, self.size.height as f32);
        self.renderer.render(
            &self.queue, &mut encoder, &view, view_proj,
            self.style.line_color,
            to_wgpu_color(self.style.clear_color),
        );

        let raw_input = self.egui_state.take_egui_input(window);
        let hud = &self.hud;
        let full_output = self.egui_ctx.run(raw_input, |ctx| { build_ui(ctx, hud); });
        self.egui_state.handle_platform_output(window, full_output.platform_output);
        let tris = self.egui_ctx.tessellate(full_output.shapes, self.egui_ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };
        self.egui_renderer.update_buffers(&self.device, &self.queue, &mut encoder, &tris, &screen_descriptor);
        {
            let mut gui_render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GUI Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view, resolve_target: None,
                    ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
                })],
                depth_stencil_attachment: None, occlusion_query_set: None, timestamp_writes: None,
            });
            self.egui_renderer.render(&mut gui_render_pass, &tris, &screen_descriptor);
        }
        for tex_id in &full_output.textures_delta.free { self.egui_renderer.free_texture(tex_id); }

        self.queue.submit(std::iter::once(encoder.finish()));
        output_texture.present();
        Ok(())
    }

    /// Returns true when the event was consumed by the overlay or the
    /// animation controls.
    pub fn handle_window_event(&mut self, event: &WindowEvent, window: &Window) -> bool {
        if self.egui_state.on_window_event(window, event).consumed { return true; }
        if let Some(action) = self.controller.handle_window_event(event) {
            self.apply_action(action);
            return true;
        }
        false
    }
}

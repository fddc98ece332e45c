use anyhow::{Context, Result};
use clap::Parser;
use diorama_assets::AssetError;
use diorama_common::{LoadedModel, Rgb};
use diorama_input::{Action, PointerButton, PointerTracker};
use diorama_kernel::{Diorama, DioramaConfig, FirefliesUniforms, SurfaceSize, SystemClock};
use diorama_render::{FrameLoop, Renderer, TextRenderer};
use diorama_render_wgpu::WgpuRenderer;
use diorama_tools::{DebugEdit, DebugOption, DebugPanel, DebugValues};
use egui::Context as EguiContext;
use glam::Vec2;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "diorama-desktop", about = "Portal diorama viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding baked.jpg and portal.glb
    #[arg(long, default_value = "./static")]
    assets_dir: PathBuf,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of fireflies (overrides the config file)
    #[arg(long)]
    fireflies: Option<usize>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 720)]
    height: u32,
}

enum UserEvent {
    AssetsLoaded(Result<LoadedModel, AssetError>),
}

/// Load the asset directory off the event loop thread and post the result back.
fn spawn_asset_loader(dir: PathBuf, proxy: EventLoopProxy<UserEvent>) -> Result<()> {
    std::thread::Builder::new()
        .name("asset-loader".into())
        .spawn(move || {
            let result = diorama_assets::load_portal_assets(&dir);
            if proxy.send_event(UserEvent::AssetsLoaded(result)).is_err() {
                tracing::debug!("event loop closed before assets finished loading");
            }
        })
        .context("spawning asset loader")?;
    Ok(())
}

fn surface_size(window: &Window) -> SurfaceSize {
    let scale = window.scale_factor();
    let logical: LogicalSize<u32> = window.inner_size().to_logical(scale);
    SurfaceSize::new(logical.width, logical.height, scale)
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Pixel deltas (touchpads) are converted at 100 pixels per line.
fn wheel_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(position) => (position.y / 100.0) as f32,
    }
}

/// Pointer events reduced to what the tracker needs.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PointerInput {
    Button { button: PointerButton, pressed: bool },
    Moved(Vec2),
    Left,
    Wheel(f32),
}

fn pointer_input(event: &WindowEvent, scale_factor: f64) -> Option<PointerInput> {
    match event {
        WindowEvent::MouseInput { state, button, .. } => Some(PointerInput::Button {
            button: pointer_button(*button)?,
            pressed: *state == ElementState::Pressed,
        }),
        WindowEvent::CursorMoved { position, .. } => {
            let position = position.to_logical::<f32>(scale_factor);
            Some(PointerInput::Moved(Vec2::new(position.x, position.y)))
        }
        WindowEvent::CursorLeft { .. } => Some(PointerInput::Left),
        WindowEvent::MouseWheel { delta, .. } => Some(PointerInput::Wheel(wheel_lines(*delta))),
        _ => None,
    }
}

/// Feed one pointer event to the tracker.
///
/// Events the panel consumed still release buttons and update the cursor
/// position, so a drag that ends over the panel does not stay latched. They
/// never start a drag and never yield an action.
fn route_pointer(
    pointer: &mut PointerTracker,
    input: PointerInput,
    consumed: bool,
) -> Option<Action> {
    let action = match input {
        PointerInput::Button { button, pressed: true } => {
            if !consumed {
                pointer.press(button);
            }
            None
        }
        PointerInput::Button { button, pressed: false } => {
            pointer.release(button);
            None
        }
        PointerInput::Moved(position) => pointer.moved(position),
        PointerInput::Left => {
            pointer.left();
            None
        }
        PointerInput::Wheel(lines) => pointer.wheel(lines),
    };
    action.filter(|_| !consumed)
}

fn color_edit(ui: &mut egui::Ui, color: Rgb) -> Option<Rgb> {
    let mut rgb = color.to_rgb8();
    ui.color_edit_button_srgb(&mut rgb)
        .changed()
        .then(|| Rgb::from_rgb8(rgb))
}

fn option_row(ui: &mut egui::Ui, option: DebugOption, values: &DebugValues) -> Option<DebugEdit> {
    ui.horizontal(|ui| {
        let edit = match option {
            DebugOption::PortalColorStart => {
                color_edit(ui, values.portal_color_start).map(DebugEdit::PortalColorStart)
            }
            DebugOption::PortalColorEnd => {
                color_edit(ui, values.portal_color_end).map(DebugEdit::PortalColorEnd)
            }
            DebugOption::ClearColor => color_edit(ui, values.clear_color).map(DebugEdit::ClearColor),
            DebugOption::PointSize => {
                let mut size = values.point_size;
                let range = option.range().unwrap_or(
                    FirefliesUniforms::MIN_POINT_SIZE..=FirefliesUniforms::MAX_POINT_SIZE,
                );
                ui.add(egui::Slider::new(&mut size, range).step_by(1.0))
                    .changed()
                    .then_some(DebugEdit::PointSize(size))
            }
        };
        ui.label(option.label());
        edit
    })
    .inner
}

/// Edits made here reach the uniforms immediately and show up on the next frame.
fn draw_panel(ctx: &EguiContext, panel: &mut DebugPanel, diorama: &mut Diorama) {
    if !panel.is_visible() {
        return;
    }

    let values = *panel.values();
    let mut edits = Vec::new();
    egui::Window::new("Debug")
        .default_width(DebugPanel::WIDTH)
        .resizable(false)
        .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
        .show(ctx, |ui| {
            for option in DebugOption::ALL {
                edits.extend(option_row(ui, option, &values));
            }
            ui.separator();
            ui.small("F1: Toggle panel | F2: Dump frame state");
        });

    for edit in edits {
        panel.apply(edit, diorama);
    }
}

/// Draws one diorama frame onto the acquired surface texture.
struct SurfaceFrame<'a> {
    renderer: &'a mut WgpuRenderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    view: &'a wgpu::TextureView,
}

impl Renderer for SurfaceFrame<'_> {
    type Output = ();

    fn render(&mut self, diorama: &Diorama) {
        self.renderer.render(self.device, self.queue, self.view, diorama);
    }
}

struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(window: Arc<Window>, diorama: &Diorama, egui_ctx: &EguiContext) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("diorama_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("creating device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        // Colors are display-encoded already; prefer a surface that stores them as-is.
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
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

        let renderer = WgpuRenderer::new(&device, &queue, surface_format, diorama);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            ?surface_format,
            "GPU initialized"
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>, diorama: &Diorama) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, diorama.viewport().drawing_buffer_size());
    }
}

struct App {
    diorama: Diorama,
    frame_loop: FrameLoop<SystemClock>,
    panel: DebugPanel,
    pointer: PointerTracker,
    initial_size: LogicalSize<u32>,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl App {
    fn new(config: &DioramaConfig, initial_size: LogicalSize<u32>) -> Self {
        let diorama = Diorama::new(
            config,
            SurfaceSize::new(initial_size.width, initial_size.height, 1.0),
            &mut rand::thread_rng(),
        );
        Self {
            diorama,
            frame_loop: FrameLoop::new(SystemClock::start()),
            panel: DebugPanel::new(DebugValues::from_config(config)),
            pointer: PointerTracker::new(),
            initial_size,
            window: None,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::F1 => self.panel.toggle(),
            KeyCode::F2 => {
                let dump = TextRenderer::new().render(&self.diorama);
                tracing::info!("frame state\n{dump}");
            }
            _ => {}
        }
    }

    fn redraw(&mut self) {
        let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                window.request_redraw();
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

        self.frame_loop.tick(
            &mut self.diorama,
            &mut SurfaceFrame {
                renderer: &mut gpu.renderer,
                device: &gpu.device,
                queue: &gpu.queue,
                view: &view,
            },
        );

        let raw_input = gpu.egui_winit.take_egui_input(window);
        let panel = &mut self.panel;
        let diorama = &mut self.diorama;
        let full_output = self
            .egui_ctx
            .run(raw_input, |ctx| draw_panel(ctx, panel, diorama));
        gpu.egui_winit
            .handle_platform_output(window, full_output.platform_output);

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
        // The next frame schedules itself.
        window.request_redraw();
    }
}

impl ApplicationHandler<UserEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Portal")
            .with_inner_size(self.initial_size);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        self.diorama.resize(surface_size(&window));
        match Gpu::new(window.clone(), &self.diorama, &self.egui_ctx) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("failed to initialize GPU: {e:#}");
                event_loop.exit();
                return;
            }
        }
        window.request_redraw();
        self.window = Some(window);
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::AssetsLoaded(Ok(model)) => {
                let report = self.diorama.attach_loaded_nodes(model);
                tracing::info!(
                    attached = report.attached,
                    missing = ?report.missing,
                    "assets loaded"
                );
            }
            UserEvent::AssetsLoaded(Err(e)) => {
                tracing::error!("failed to load assets: {e}");
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        let consumed = match &mut self.gpu {
            Some(gpu) => gpu.egui_winit.on_window_event(&window, &event).consumed,
            None => false,
        };

        if let Some(input) = pointer_input(&event, window.scale_factor()) {
            if let Some(action) = route_pointer(&mut self.pointer, input, consumed) {
                self.diorama.handle_action(action);
            }
            return;
        }
        if consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.diorama.resize(surface_size(&window));
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size, &self.diorama);
                }
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                self.diorama.resize(surface_size(&window));
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
            } => {
                self.handle_key(key);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("diorama-desktop starting");

    let mut config = match &cli.config {
        Some(path) => DioramaConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DioramaConfig::default(),
    };
    if let Some(count) = cli.fireflies {
        config.fireflies_count = count;
    }

    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    spawn_asset_loader(cli.assets_dir, event_loop.create_proxy())?;

    let mut app = App::new(&config, LogicalSize::new(cli.width, cli.height));
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn mouse_buttons_map_to_pointer_buttons() {
        assert_eq!(pointer_button(MouseButton::Left), Some(PointerButton::Primary));
        assert_eq!(pointer_button(MouseButton::Right), Some(PointerButton::Secondary));
        assert_eq!(pointer_button(MouseButton::Middle), Some(PointerButton::Middle));
        assert_eq!(pointer_button(MouseButton::Back), None);
    }

    #[test]
    fn wheel_deltas_become_lines() {
        assert_eq!(wheel_lines(MouseScrollDelta::LineDelta(0.0, 2.0)), 2.0);
        assert_eq!(
            wheel_lines(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -50.0))),
            -0.5
        );
    }

    fn press(button: PointerButton) -> PointerInput {
        PointerInput::Button { button, pressed: true }
    }

    fn release(button: PointerButton) -> PointerInput {
        PointerInput::Button { button, pressed: false }
    }

    #[test]
    fn release_over_panel_ends_the_drag() {
        let mut pointer = PointerTracker::new();
        route_pointer(&mut pointer, PointerInput::Moved(Vec2::ZERO), false);
        route_pointer(&mut pointer, press(PointerButton::Primary), false);
        assert_eq!(
            route_pointer(&mut pointer, PointerInput::Moved(Vec2::new(50.0, 0.0)), false),
            Some(Action::Orbit(Vec2::new(50.0, 0.0)))
        );

        route_pointer(&mut pointer, release(PointerButton::Primary), true);
        assert_eq!(pointer.dragging(), None);
        assert_eq!(
            route_pointer(&mut pointer, PointerInput::Moved(Vec2::new(120.0, 0.0)), false),
            None
        );
    }

    #[test]
    fn moves_over_panel_keep_the_cursor_current() {
        let mut pointer = PointerTracker::new();
        route_pointer(&mut pointer, PointerInput::Moved(Vec2::ZERO), false);
        route_pointer(&mut pointer, press(PointerButton::Secondary), false);

        assert_eq!(
            route_pointer(&mut pointer, PointerInput::Moved(Vec2::new(300.0, 0.0)), true),
            None
        );
        assert_eq!(
            route_pointer(&mut pointer, PointerInput::Moved(Vec2::new(310.0, 0.0)), false),
            Some(Action::Pan(Vec2::new(10.0, 0.0)))
        );
    }

    #[test]
    fn panel_clicks_and_scrolls_do_not_reach_the_camera() {
        let mut pointer = PointerTracker::new();
        route_pointer(&mut pointer, press(PointerButton::Primary), true);
        assert_eq!(pointer.dragging(), None);
        assert_eq!(route_pointer(&mut pointer, PointerInput::Wheel(1.0), true), None);
        assert_eq!(
            route_pointer(&mut pointer, PointerInput::Wheel(1.0), false),
            Some(Action::Zoom(1.0))
        );

        route_pointer(&mut pointer, press(PointerButton::Middle), false);
        route_pointer(&mut pointer, PointerInput::Left, true);
        assert_eq!(pointer.dragging(), None);
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["diorama-desktop"]);
        assert_eq!(cli.assets_dir, PathBuf::from("./static"));
        assert_eq!((cli.width, cli.height), (1280, 720));
        assert!(cli.fireflies.is_none());

        let cli = Cli::parse_from(["diorama-desktop", "--fireflies", "5", "-v"]);
        assert_eq!(cli.fireflies, Some(5));
        assert!(cli.verbose);
    }
}

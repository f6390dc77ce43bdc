//! Sound Meter - real-time microphone volume, frequency and sound source meter
//!
//! One analysis pass runs per redraw; the window keeps redrawing while open.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use soundmeter::audio::CpalBackend;
use soundmeter::cli::Args;
use soundmeter::install::DeferredInstall;
use soundmeter::meter::MeterController;
use soundmeter::params::{MeterConfig, RenderConfig};
use soundmeter::rendering::RenderSystem;
use soundmeter::ui::{self, MeterView, Panels, UiAction};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    egui_ctx: egui::Context,
    egui_state: Option<egui_winit::State>,

    // Meter
    meter: MeterController<CpalBackend>,
    install: DeferredInstall,
    panels: Panels,

    // Configuration
    render_config: RenderConfig,

    /// Failure during window/GPU setup, reported after the event loop exits
    init_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: MeterConfig) -> Self {
        let meter = MeterController::new(
            CpalBackend::new(config.capture),
            config.analysis,
            config.language,
        );

        let egui_ctx = egui::Context::default();
        egui_ctx.set_visuals(egui::Visuals::light());

        Self {
            window: None,
            render_system: None,
            egui_ctx,
            egui_state: None,
            meter,
            install: DeferredInstall::default(),
            panels: Panels::default(),
            render_config: config.render,
            init_error: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(self.meter.translations().title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("Failed to create window")?,
        );

        let render_system =
            pollster::block_on(RenderSystem::new(Arc::clone(&window), &self.render_config))
                .context("Failed to initialize renderer")?;

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.egui_state = Some(egui_state);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        if let Err(e) = self.init_window(event_loop) {
            error!("{:#}", e);
            self.init_error = Some(e);
            event_loop.exit();
            return;
        }

        info!("Sound meter is running, press ESC to quit");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_state), Some(window)) = (self.egui_state.as_mut(), self.window.as_ref()) {
            let response = egui_state.on_window_event(window, &event);
            if response.repaint {
                window.request_redraw();
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.meter.stop();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                self.meter.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

impl App {
    /// Run one analysis pass and render a single frame
    fn render_frame(&mut self) {
        let (Some(window), Some(render_system), Some(egui_state)) = (
            self.window.as_ref(),
            self.render_system.as_mut(),
            self.egui_state.as_mut(),
        ) else {
            return;
        };

        self.meter.tick();

        let raw_input = egui_state.take_egui_input(window);
        let view = MeterView {
            state: self.meter.state(),
            install_available: self.install.is_available(),
        };
        let panels = &mut self.panels;
        let mut actions = Vec::new();
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            actions = ui::draw(ctx, &view, panels);
        });

        egui_state.handle_platform_output(window, full_output.platform_output);
        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        match render_system.render(
            &paint_jobs,
            &full_output.textures_delta,
            full_output.pixels_per_point,
        ) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
            }
            Err(e) => error!("Render error: {:?}", e),
        }

        for action in actions {
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: UiAction) {
        match action {
            UiAction::ToggleRecording => {
                let was_recording = self.meter.is_recording();
                let outcome = self.meter.toggle();
                self.panels.record_toggled(was_recording, &outcome);
            }
            UiAction::SetLanguage(language) => {
                info!("Language: {:?}", language);
                self.meter.set_language(language);
                if let Some(window) = &self.window {
                    window.set_title(self.meter.translations().title);
                }
            }
            UiAction::Install => {
                self.install.install();
            }
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = args
        .resolve_config()
        .context("Failed to load configuration")?;

    info!("Sound Meter v{}", env!("CARGO_PKG_VERSION"));

    let mut app = App::new(config);
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.run_app(&mut app).context("Event loop failed")?;

    match app.init_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

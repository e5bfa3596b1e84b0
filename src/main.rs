//! Ripple tank - two coherent sources, one interfering surface
//!
//! Adjust the sources live and watch the nodal lines move.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use ripple_tank::bridge::LogBridge;
use ripple_tank::camera::OrbitCamera;
use ripple_tank::cli::Args;
use ripple_tank::params::{OrbitParams, ParameterField, RenderConfig, WaveParameters};
use ripple_tank::rendering::{RenderSystem, ViewerBridge};
use ripple_tank::simulation::{SimulationLoop, WallTimer};
use ripple_tank::surface::RippleTank;

const CONTROLS: &str = "\
Controls:
  Space        start / stop
  Arrows       orbit camera
  + / -        zoom
  Q / A        frequency
  W / S        wavelength
  E / D        amplitude 1
  R / F        amplitude 2
  T / G        phase offset
  Y / H        source separation
  Esc          quit";

/// Main application state
struct App {
    window: Option<Arc<Window>>,
    sim: SimulationLoop<WallTimer, ViewerBridge>,
    camera: OrbitCamera,
}

impl App {
    fn new(sim: SimulationLoop<WallTimer, ViewerBridge>, camera: OrbitCamera) -> Self {
        Self {
            window: None,
            sim,
            camera,
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        match key {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::Space => self.sim.toggle(),
            KeyCode::ArrowLeft => self.camera.orbit(-1.0, 0.0),
            KeyCode::ArrowRight => self.camera.orbit(1.0, 0.0),
            KeyCode::ArrowUp => self.camera.orbit(0.0, 1.0),
            KeyCode::ArrowDown => self.camera.orbit(0.0, -1.0),
            KeyCode::Equal | KeyCode::NumpadAdd => self.camera.zoom(1),
            KeyCode::Minus | KeyCode::NumpadSubtract => self.camera.zoom(-1),
            _ => {
                if let Some((field, direction)) = parameter_key(key) {
                    let queue = self.sim.parameters();
                    let params = self.sim.tank().params();
                    let current = queue.latest(field).unwrap_or_else(|| params.get(field));
                    let range = field.range(params);
                    let value = (current + direction * nudge(field, params))
                        .clamp(*range.start(), *range.end());
                    queue.push(field, value);
                }
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let view_proj = self.camera.view_proj(self.sim.bridge().config());

        match self.sim.bridge().draw(view_proj) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.sim.bridge_mut().reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => warn!("Render error: {:?}", e),
        }
    }
}

/// Key pairs that raise / lower one parameter
fn parameter_key(key: KeyCode) -> Option<(ParameterField, f64)> {
    let binding = match key {
        KeyCode::KeyQ => (ParameterField::Frequency, 1.0),
        KeyCode::KeyA => (ParameterField::Frequency, -1.0),
        KeyCode::KeyW => (ParameterField::Wavelength, 1.0),
        KeyCode::KeyS => (ParameterField::Wavelength, -1.0),
        KeyCode::KeyE => (ParameterField::Amplitude1, 1.0),
        KeyCode::KeyD => (ParameterField::Amplitude1, -1.0),
        KeyCode::KeyR => (ParameterField::Amplitude2, 1.0),
        KeyCode::KeyF => (ParameterField::Amplitude2, -1.0),
        KeyCode::KeyT => (ParameterField::PhaseOffset, 1.0),
        KeyCode::KeyG => (ParameterField::PhaseOffset, -1.0),
        KeyCode::KeyY => (ParameterField::SourceSeparation, 1.0),
        KeyCode::KeyH => (ParameterField::SourceSeparation, -1.0),
        _ => return None,
    };
    Some(binding)
}

/// Increment for one key press
fn nudge(field: ParameterField, params: &WaveParameters) -> f64 {
    match field {
        ParameterField::Frequency => 0.25,
        ParameterField::Wavelength => 10.0,
        ParameterField::Amplitude1 | ParameterField::Amplitude2 => 1.0,
        ParameterField::PhaseOffset => field.step(params).unwrap_or(1.0),
        ParameterField::SourceSeparation => 10.0,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let config = self.sim.bridge().config();
        let window_attributes = Window::default_attributes()
            .with_title("Ripple Tank - Two-Source Interference")
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window_width,
                config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let render_system = match pollster::block_on(RenderSystem::new(Arc::clone(&window))) {
            Ok(render_system) => render_system,
            Err(e) => {
                error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let bridge = self.sim.bridge_mut();
        bridge.attach(render_system);
        bridge.resize(size.width, size.height);

        self.window = Some(window);
        self.sim.start();

        info!("Ripple tank is running\n{}", CONTROLS);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.sim.bridge_mut().resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key),
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.sim.poll() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }

        match self.sim.next_deadline() {
            Some(wait) => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + wait));
            }
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let params = args.wave_parameters();
    let domain = args.surface_domain();
    let loop_config = args.loop_config();

    info!(
        "f = {} Hz, λ = {}, a1 = {}, a2 = {}, φ = {}, d = {}",
        params.frequency_hz(),
        params.wavelength(),
        params.amplitude1(),
        params.amplitude2(),
        params.phase_offset(),
        params.source_separation()
    );

    let tank =
        RippleTank::new(params, domain, &loop_config).context("Failed to build ripple tank")?;

    if args.headless {
        let bridge = LogBridge::new(args.report_every);
        let mut sim = SimulationLoop::new(tank, bridge, WallTimer::new(), &loop_config);
        sim.run_for(args.ticks);
        info!(
            "Headless run finished: {} ticks, {} skipped, t = {:.4} s",
            sim.ticks(),
            sim.skipped(),
            sim.tank().time()
        );
        return Ok(());
    }

    let bridge = ViewerBridge::new(RenderConfig::default(), &domain);
    let sim = SimulationLoop::new(tank, bridge, WallTimer::new(), &loop_config);
    let mut app = App::new(sim, OrbitCamera::new(OrbitParams::default()));

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop
        .run_app(&mut app)
        .context("Event loop terminated with an error")?;

    Ok(())
}

//! Chimney smoke scene.
//!
//! A chimney emits a bounded plume of smoke particles that rise, widen and
//! drift on a noise-driven flow. G starts the smoke, H stops it, R clears it.

mod config;
mod events;
mod headless;
mod sinks;
mod state;

use std::sync::Arc;

use anyhow::Result;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use config::AppConfig;
use renderer::SmokeRenderer;
use state::SceneState;

struct App {
    config: AppConfig,
    state: Option<SceneState<SmokeRenderer>>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title(self.config.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window_width,
                    self.config.window_height,
                ));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let sink = match pollster::block_on(SmokeRenderer::new(
                window.clone(),
                self.config.smoke.capacity,
                &self.config.title,
            )) {
                Ok(r) => r,
                Err(e) => {
                    log::error!("Failed to initialize renderer: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match SceneState::new(&self.config, sink) {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize scene: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load();

    if config.headless {
        headless::run(&config)?;
        return Ok(());
    }

    println!("Chimney Smoke");
    println!("  G      - Start smoke");
    println!("  H      - Stop smoke");
    println!("  R      - Clear smoke");
    println!("  Escape - Quit");

    log::info!("Starting chimney smoke scene");

    let event_loop = EventLoop::new()?;
    // Redraw continuously; the smoke moves every frame.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}

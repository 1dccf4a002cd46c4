//! Window event handling for the windowed scene.

use renderer::SmokeRenderer;
use winit::event::WindowEvent;

use crate::state::SceneState;

impl SceneState<SmokeRenderer> {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.sink.resize(size);
                self.camera.set_aspect(size.width, size.height);
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let winit::keyboard::PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);
                }
                false
            }
            WindowEvent::Focused(false) => {
                // Keys released while unfocused never reach us.
                self.input = input::InputState::new();
                false
            }
            WindowEvent::RedrawRequested => {
                let stats = self.frame();
                if stats.admitted > 0 || stats.retired > 0 {
                    log::trace!("{:?}", stats);
                }
                self.sink.window.request_redraw();
                false
            }
            _ => false,
        }
    }
}

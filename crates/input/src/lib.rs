//! Keyboard input for the smoke scene.
//!
//! The scene only reacts to key *edges*: G switches the smoke on, H switches it
//! off, R clears the plume and Escape quits. Holding a key does nothing after
//! the frame it went down.

use std::collections::HashSet;

/// Manages keyboard state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,
}

/// Scene-level actions derived from this frame's key edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    SmokeOn,
    SmokeOff,
    ResetSmoke,
    Quit,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call once per frame after the commands were read.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                // Key repeat arrives as more Pressed events; only the first counts.
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Check if smoke-on was pressed (G).
    pub fn is_smoke_on_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyG)
    }

    /// Check if smoke-off was pressed (H).
    pub fn is_smoke_off_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyH)
    }

    /// Check if reset was pressed (R).
    pub fn is_reset_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyR)
    }

    /// Check if quit was pressed (Escape).
    pub fn is_quit_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Escape)
    }

    /// Commands triggered this frame, in a fixed order. When G and H land in
    /// the same frame, H wins because it is applied last.
    pub fn commands(&self) -> Vec<SceneCommand> {
        let mut commands = Vec::new();
        if self.is_smoke_on_pressed() {
            commands.push(SceneCommand::SmokeOn);
        }
        if self.is_smoke_off_pressed() {
            commands.push(SceneCommand::SmokeOff);
        }
        if self.is_reset_pressed() {
            commands.push(SceneCommand::ResetSmoke);
        }
        if self.is_quit_pressed() {
            commands.push(SceneCommand::Quit);
        }
        commands
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_reported_once() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyG, ElementState::Pressed);
        assert_eq!(input.commands(), vec![SceneCommand::SmokeOn]);

        input.begin_frame();
        // Auto-repeat while held.
        input.process_keyboard(KeyCode::KeyG, ElementState::Pressed);
        assert!(input.is_key_held(KeyCode::KeyG));
        assert!(input.commands().is_empty());
    }

    #[test]
    fn release_then_press_fires_again() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyH, ElementState::Pressed);
        input.begin_frame();
        input.process_keyboard(KeyCode::KeyH, ElementState::Released);
        assert!(input.is_key_released(KeyCode::KeyH));
        input.begin_frame();
        input.process_keyboard(KeyCode::KeyH, ElementState::Pressed);
        assert_eq!(input.commands(), vec![SceneCommand::SmokeOff]);
    }

    #[test]
    fn off_is_applied_after_on_in_the_same_frame() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyH, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyG, ElementState::Pressed);
        assert_eq!(
            input.commands(),
            vec![SceneCommand::SmokeOn, SceneCommand::SmokeOff]
        );
    }

    #[test]
    fn unrelated_keys_produce_no_commands() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        assert!(input.commands().is_empty());
        input.process_keyboard(KeyCode::Escape, ElementState::Pressed);
        assert_eq!(input.commands(), vec![SceneCommand::Quit]);
    }
}

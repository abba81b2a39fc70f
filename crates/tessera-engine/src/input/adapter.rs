use crate::engine::CommandSender;
use crate::message::Command;

use super::{Key, KeyState};

/// Distance moved per key press or button press, in logical pixels.
pub const DEFAULT_STEP: f32 = 10.0;

/// Turns key-down events into move commands for the render engine.
#[derive(Debug, Clone)]
pub struct InputAdapter {
    renderer: CommandSender,
    step: f32,
}

impl InputAdapter {
    pub fn new(renderer: CommandSender) -> Self {
        Self::with_step(renderer, DEFAULT_STEP)
    }

    pub fn with_step(renderer: CommandSender, step: f32) -> Self {
        Self { renderer, step }
    }

    /// Handles one key event. Returns `true` if a command was posted.
    ///
    /// Key repeats arrive as further `Pressed` events and move again.
    pub fn on_key(&self, key: Key, state: KeyState) -> bool {
        if state != KeyState::Pressed {
            return false;
        }
        let Some(direction) = key.direction() else {
            return false;
        };

        self.renderer.post(Command::new(direction, self.step));
        true
    }
}

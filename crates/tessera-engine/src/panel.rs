//! GUI-toolkit caller adapter.
//!
//! A control panel with four direction buttons. It may exist without a
//! renderer bound, in which case presses do nothing. The panel can be driven
//! line by line from a text stream (one button name per line), which is how
//! the studio runs it on its own thread.

use std::io::BufRead;
use std::str::FromStr;

use thiserror::Error;

use crate::engine::CommandSender;
use crate::input::DEFAULT_STEP;
use crate::message::{Command, Direction};

/// Direction buttons of the control panel.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PanelButton {
    Up,
    Down,
    Left,
    Right,
}

impl PanelButton {
    pub fn direction(self) -> Direction {
        match self {
            PanelButton::Up => Direction::Up,
            PanelButton::Down => Direction::Down,
            PanelButton::Left => Direction::Left,
            PanelButton::Right => Direction::Right,
        }
    }
}

/// Text that names no panel button.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("unknown button {0:?} (expected up, down, left or right)")]
pub struct UnknownButton(pub String);

impl FromStr for PanelButton {
    type Err = UnknownButton;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(PanelButton::Up),
            "down" | "d" => Ok(PanelButton::Down),
            "left" | "l" => Ok(PanelButton::Left),
            "right" | "r" => Ok(PanelButton::Right),
            other => Err(UnknownButton(other.to_string())),
        }
    }
}

/// Control panel holding an optional renderer.
#[derive(Debug, Clone, Default)]
pub struct ControlPanel {
    renderer: Option<CommandSender>,
}

/// Why [`ControlPanel::run_lines`] returned.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PanelExit {
    /// The input stream ended.
    EndOfInput,
    /// A `quit` line was read.
    Quit,
}

impl ControlPanel {
    pub fn unbound() -> Self {
        Self { renderer: None }
    }

    pub fn bound(renderer: CommandSender) -> Self {
        Self {
            renderer: Some(renderer),
        }
    }

    pub fn bind(&mut self, renderer: CommandSender) {
        self.renderer = Some(renderer);
    }

    pub fn is_bound(&self) -> bool {
        self.renderer.is_some()
    }

    /// Handles a button press. Returns `true` if a command was posted.
    pub fn press(&self, button: PanelButton) -> bool {
        let Some(renderer) = self.renderer.as_ref() else {
            log::debug!("{button:?} pressed with no renderer bound");
            return false;
        };
        renderer.post(Command::new(button.direction(), DEFAULT_STEP));
        true
    }

    /// Presses one button per input line until `quit` or end of input.
    ///
    /// Blank lines are skipped; unknown names are reported and skipped.
    pub fn run_lines<R: BufRead>(&self, reader: R) -> std::io::Result<PanelExit> {
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("q") {
                return Ok(PanelExit::Quit);
            }
            match line.parse::<PanelButton>() {
                Ok(button) => {
                    self.press(button);
                }
                Err(err) => log::warn!("control panel: {err}"),
            }
        }
        Ok(PanelExit::EndOfInput)
    }
}

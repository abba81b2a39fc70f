//! Input-loop caller adapter.
//!
//! Public API is platform-agnostic and does not expose winit types. The window
//! runtime translates platform key events into [`Key`]s.

mod adapter;
mod types;

pub use adapter::{InputAdapter, DEFAULT_STEP};
pub use types::{Key, KeyState};

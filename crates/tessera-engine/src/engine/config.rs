use std::num::NonZeroUsize;
use std::time::Duration;

/// Render engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Edge length of the quad in logical pixels.
    pub quad_size: f32,

    /// Maximum number of commands applied per frame.
    ///
    /// `None` drains the inbound queue to empty every frame. A flood of
    /// commands then delays the next draw; `Some(n)` caps the work per frame
    /// and leaves the rest for later frames. A cap of zero would never apply
    /// anything, so it is not representable.
    pub drain_limit: Option<NonZeroUsize>,

    /// How long `RenderEngine::spawn` waits for the backend to come up.
    ///
    /// `None` waits forever.
    pub ready_timeout: Option<Duration>,

    /// Name of the render thread.
    pub thread_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quad_size: 100.0,
            drain_limit: None,
            ready_timeout: Some(Duration::from_secs(5)),
            thread_name: "tessera-render".to_string(),
        }
    }
}

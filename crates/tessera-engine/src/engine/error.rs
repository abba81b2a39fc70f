use std::time::Duration;

use thiserror::Error;

/// Failures surfaced by [`RenderEngine::spawn`](super::RenderEngine::spawn).
#[derive(Error, Debug)]
pub enum EngineError {
    /// The OS refused to start the render thread.
    #[error("failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The backend (context, surface, device) could not be created.
    #[error("render backend initialization failed: {0}")]
    Backend(String),

    /// The backend did not report ready in time. The render thread is detached.
    #[error("render thread not ready after {0:?}")]
    ReadyTimeout(Duration),

    /// The render thread panicked before reporting ready.
    #[error("render thread panicked during startup")]
    WorkerPanicked,
}

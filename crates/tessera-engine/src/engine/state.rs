use std::fmt;

/// Lifecycle of a render engine.
///
/// `Uninitialized → Initializing → Running → Stopping → Stopped`, with
/// `Failed` reachable from `Initializing` (backend creation failed or timed
/// out) and from `Running` (fatal draw error).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EngineState {
    Uninitialized,
    Initializing,
    Running,
    Stopping,
    Stopped,
    Failed,
}

impl EngineState {
    /// True while the worker has not yet reported the handshake outcome.
    #[inline]
    pub fn is_starting(self) -> bool {
        matches!(self, EngineState::Uninitialized | EngineState::Initializing)
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, EngineState::Stopped | EngineState::Failed)
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Initializing => "initializing",
            EngineState::Running => "running",
            EngineState::Stopping => "stopping",
            EngineState::Stopped => "stopped",
            EngineState::Failed => "failed",
        };
        f.write_str(s)
    }
}

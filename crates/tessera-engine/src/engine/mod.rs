//! Render engine: a dedicated render thread fed by a command queue.
//!
//! Thread discipline:
//! - the backend and the [`ViewState`] live on the render thread only
//! - callers talk to it through the inbound command queue ([`CommandSender`])
//! - it talks back through the outbound [`HostBridge`]
//!
//! Startup is two-phase: [`RenderEngine::spawn`] starts the thread, then waits
//! (with an optional timeout) until the thread reports that its backend
//! exists. Shutdown is cooperative: [`RenderEngine::stop`] clears a flag that
//! the thread checks once per frame, then joins it.

mod config;
mod error;
mod shared;
mod state;
mod view;
mod worker;

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::backend::BackendFactory;
use crate::bridge::{HostBridge, WakeSignal};
use crate::message::Command;

use shared::Shared;

pub use config::EngineConfig;
pub use error::EngineError;
pub use state::EngineState;
pub use view::{SurfaceBounds, ViewState};

/// Handle to a running render thread.
///
/// Dropping the handle stops the thread.
pub struct RenderEngine {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<ViewState>>,
}

impl RenderEngine {
    /// Starts the render thread and waits until its backend is ready.
    ///
    /// `factory` runs on the render thread. On success the engine is
    /// `Running` and accepts commands. On failure the thread has either exited
    /// (backend error) or been detached with its stop flag raised (timeout).
    pub fn spawn<W>(
        config: EngineConfig,
        factory: BackendFactory,
        bridge: Arc<HostBridge<W>>,
    ) -> Result<Self, EngineError>
    where
        W: WakeSignal + 'static,
    {
        let shared = Arc::new(Shared::new());
        shared.mark_initializing();

        let ready_timeout = config.ready_timeout;
        let worker = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name(config.thread_name.clone())
                .spawn(move || worker::run(shared, bridge, config, factory))?
        };

        match shared.wait_started(ready_timeout) {
            EngineState::Running | EngineState::Stopping | EngineState::Stopped => {
                log::info!("render engine ready");
                Ok(Self {
                    shared,
                    worker: Some(worker),
                })
            }
            EngineState::Failed => {
                let reason = shared.failure().unwrap_or_default();
                match worker.join() {
                    Ok(_) => Err(EngineError::Backend(reason)),
                    Err(_) => Err(EngineError::WorkerPanicked),
                }
            }
            EngineState::Uninitialized | EngineState::Initializing => {
                // The backend is stuck. Give up on it without blocking: the
                // thread is detached and exits at its next stop-flag check.
                let timeout = ready_timeout.unwrap_or_default();
                shared.mark_failed(format!("not ready after {timeout:?}"));
                log::error!("render thread not ready after {timeout:?}; detaching it");
                drop(worker);
                Err(EngineError::ReadyTimeout(timeout))
            }
        }
    }

    /// Queues `cmd` for the render thread. Never blocks.
    ///
    /// Dropped silently once the engine is stopping, stopped or failed.
    pub fn post_command(&self, cmd: Command) {
        post(&self.shared, cmd);
    }

    /// Cloneable handle for posting commands from other threads.
    pub fn sender(&self) -> CommandSender {
        CommandSender {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn state(&self) -> EngineState {
        self.shared.state()
    }

    /// Reason the engine entered [`EngineState::Failed`], if it did.
    pub fn failure(&self) -> Option<String> {
        self.shared.failure()
    }

    /// Stops the render thread and waits for it to exit.
    ///
    /// Returns the final view on the first call and `None` afterwards.
    /// Commands still queued when the thread observes the flag are dropped.
    pub fn stop(&mut self) -> Option<ViewState> {
        let worker = self.worker.take()?;
        self.shared.request_stop();

        match worker.join() {
            Ok(view) => {
                log::info!("render engine stopped ({})", self.shared.state());
                Some(view)
            }
            Err(_) => {
                log::error!("render thread panicked");
                self.shared.mark_failed("render thread panicked".to_string());
                None
            }
        }
    }
}

impl Drop for RenderEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for RenderEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderEngine")
            .field("state", &self.state())
            .field("joined", &self.worker.is_none())
            .finish()
    }
}

/// Posts commands to a render engine from any thread.
///
/// Holding a sender does not keep the render thread alive; once the engine
/// stops, posts are no-ops.
#[derive(Clone)]
pub struct CommandSender {
    shared: Arc<Shared>,
}

impl CommandSender {
    /// Queues `cmd` for the render thread. Never blocks.
    pub fn post(&self, cmd: Command) {
        post(&self.shared, cmd);
    }

    /// True while the engine is running and posts will be applied.
    pub fn is_accepting(&self) -> bool {
        self.shared.accepting()
    }
}

impl fmt::Debug for CommandSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSender")
            .field("accepting", &self.is_accepting())
            .finish()
    }
}

fn post(shared: &Shared, cmd: Command) {
    if !shared.accepting() {
        log::trace!("render engine not accepting; dropped {cmd:?}");
        return;
    }
    shared.inbound.push(cmd);
}

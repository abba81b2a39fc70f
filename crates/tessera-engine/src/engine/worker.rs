use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::backend::BackendFactory;
use crate::bridge::{HostBridge, WakeSignal};
use crate::message::{Command, Notification};
use crate::queue::ConcurrentQueue;

use super::shared::Shared;
use super::{EngineConfig, SurfaceBounds, ViewState};

/// Outcome of one drain pass.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub(crate) struct DrainStats {
    pub popped: usize,
    pub applied: usize,
}

/// Pops commands (all of them, or at most `limit`), applies them to `view`
/// and reports one notification per applied command.
pub(crate) fn drain_commands<F>(
    inbound: &ConcurrentQueue<Command>,
    view: &mut ViewState,
    bounds: SurfaceBounds,
    limit: Option<NonZeroUsize>,
    mut notify: F,
) -> DrainStats
where
    F: FnMut(Notification),
{
    let mut stats = DrainStats::default();

    while limit.is_none_or(|max| stats.popped < max.get()) {
        let Some(cmd) = inbound.try_pop() else { break };
        stats.popped += 1;

        if view.apply(&cmd, bounds) {
            stats.applied += 1;
            notify(Notification::log(cmd.direction.log_text()));
        } else {
            log::warn!("discarding invalid command {cmd:?}");
        }
    }

    stats
}

/// Marks the engine failed if the render thread unwinds.
struct PanicGuard<'a> {
    shared: &'a Shared,
}

impl Drop for PanicGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.shared.mark_failed("render thread panicked".to_string());
        }
    }
}

/// Body of the render thread.
///
/// Creates the backend, completes the handshake, then busy-polls: drain
/// inbound commands, draw, repeat. Only the backend's present (vsync) throttles
/// the loop. Returns the final view.
pub(crate) fn run<W>(
    shared: Arc<Shared>,
    bridge: Arc<HostBridge<W>>,
    config: EngineConfig,
    factory: BackendFactory,
) -> ViewState
where
    W: WakeSignal,
{
    let _guard = PanicGuard { shared: &shared };
    let mut view = ViewState::default();

    let mut backend = match factory() {
        Ok(backend) => backend,
        Err(err) => {
            log::error!("render backend creation failed: {err:#}");
            shared.mark_failed(format!("{err:#}"));
            return view;
        }
    };

    if !shared.mark_running() {
        log::warn!("render backend came up after startup was abandoned; exiting");
        return view;
    }
    log::info!("render thread running");

    let mut frames: u64 = 0;
    let mut applied: u64 = 0;

    while shared.keep_running() {
        let (width, height) = backend.surface_size();
        let bounds = SurfaceBounds::new(width, height, config.quad_size);
        view.clamp_to(bounds);

        let stats = drain_commands(
            &shared.inbound,
            &mut view,
            bounds,
            config.drain_limit,
            |n| bridge.post(n),
        );
        applied += stats.applied as u64;

        if let Err(err) = backend.draw(&view, config.quad_size) {
            log::error!("render backend draw failed: {err:#}");
            shared.mark_failed(format!("{err:#}"));
            break;
        }
        frames = frames.wrapping_add(1);
    }

    drop(backend);
    shared.mark_stopped();
    log::info!(
        "render thread exiting: {frames} frames, {applied} commands applied, view ({}, {})",
        view.x,
        view.y
    );

    view
}

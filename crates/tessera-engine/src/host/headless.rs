use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::backend::{HeadlessBackend, HeadlessConfig};
use crate::bridge::{ChannelWake, HostBridge, WakeSignal};
use crate::engine::{CommandSender, EngineConfig, RenderEngine, ViewState};
use crate::logging::LogSink;

use super::ShutdownHandle;

/// Summary of a headless run.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessReport {
    pub final_view: Option<ViewState>,
    pub notifications: u64,
    pub frames: u64,
}

/// Runs the engine on a [`HeadlessBackend`] with a channel-woken host loop.
///
/// `on_ready` is called once the engine is running, with a sender for
/// callers and a handle that ends the loop. The loop blocks until woken,
/// drains all notifications into `sink`, and repeats until shutdown is
/// requested; it then stops the engine and drains what is left.
pub fn run_headless<T, F>(
    config: HeadlessConfig,
    engine_config: EngineConfig,
    mut sink: LogSink<T>,
    on_ready: F,
) -> Result<HeadlessReport>
where
    T: Write,
    F: FnOnce(CommandSender, ShutdownHandle),
{
    let (wake, wake_rx) = ChannelWake::new();
    let bridge = Arc::new(HostBridge::new(wake));
    let (factory, probe) = HeadlessBackend::factory(config);

    let mut engine = RenderEngine::spawn(engine_config, factory, Arc::clone(&bridge))
        .context("failed to start render engine")?;

    let stop_requested = Arc::new(AtomicBool::new(false));
    let shutdown = {
        let stop_requested = Arc::clone(&stop_requested);
        let bridge = Arc::clone(&bridge);
        ShutdownHandle::new(move || {
            stop_requested.store(true, Ordering::Release);
            // Reuse the wake channel so the blocked loop sees the request.
            bridge.waker().wake();
        })
    };

    on_ready(engine.sender(), shutdown);

    while wake_rx.wait() {
        bridge.drain(|n| sink.emit(&n));
        if stop_requested.load(Ordering::Acquire) {
            break;
        }
    }

    let final_view = engine.stop();
    bridge.drain(|n| sink.emit(&n));
    log::info!("headless host finished after {} frames", probe.frames());

    Ok(HeadlessReport {
        final_view,
        notifications: sink.written(),
        frames: probe.frames(),
    })
}

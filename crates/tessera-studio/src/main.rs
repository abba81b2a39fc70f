use std::io;
use std::thread;

use anyhow::{Context, Result};
use tessera_engine::backend::HeadlessConfig;
use tessera_engine::device::GpuInit;
use tessera_engine::engine::{CommandSender, EngineConfig};
use tessera_engine::host::{run_headless, Runtime, RuntimeConfig, ShutdownHandle};
use tessera_engine::logging::{init_logging, LogSink, LoggingConfig};
use tessera_engine::panel::{ControlPanel, PanelExit};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    println!();
    println!("  tessera: arrow keys move the quad, Escape closes the window");
    println!("  control panel: type up/down/left/right (or u/d/l/r), quit to exit");
    println!();

    let engine_config = EngineConfig::default();

    if std::env::var_os("TESSERA_HEADLESS").is_some() {
        let report = run_headless(
            HeadlessConfig::default(),
            engine_config,
            LogSink::stderr(),
            |sender, shutdown| start_panel(sender, shutdown, true),
        )?;
        log::info!(
            "headless run done: {} moves logged, {} frames, final view {:?}",
            report.notifications,
            report.frames,
            report.final_view
        );
        return Ok(());
    }

    Runtime::run(
        RuntimeConfig::default(),
        GpuInit::default(),
        engine_config,
        |sender, shutdown| start_panel(sender, shutdown, false),
    )
}

/// Runs the terminal control panel on its own thread.
///
/// `quit` always ends the host. End of input only does so when there is no
/// window left to close.
fn start_panel(sender: CommandSender, shutdown: ShutdownHandle, exit_on_eof: bool) {
    let on_spawn_error = shutdown.clone();
    let spawned = thread::Builder::new()
        .name("tessera-panel".to_string())
        .spawn(move || {
            let panel = ControlPanel::bound(sender);
            match panel.run_lines(io::stdin().lock()) {
                Ok(PanelExit::Quit) => shutdown.request(),
                Ok(PanelExit::EndOfInput) if exit_on_eof => shutdown.request(),
                Ok(PanelExit::EndOfInput) => log::debug!("control panel input closed"),
                Err(err) => {
                    log::error!("control panel failed: {err}");
                    if exit_on_eof {
                        shutdown.request();
                    }
                }
            }
        })
        .context("failed to spawn control panel thread");

    if let Err(err) = spawned {
        log::error!("{err:#}");
        if exit_on_eof {
            on_spawn_error.request();
        }
    }
}

use std::io::Write;
use std::sync::Once;

/// Logger setup for the studio and tests.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter directives, e.g. `"tessera_engine=debug"`.
    /// Falls back to `RUST_LOG`, then to `info` with wgpu internals at `warn`.
    pub filter: Option<String>,

    /// Prefix each record with the emitting thread's name. Render-thread and
    /// host-thread lines interleave, so this is on by default.
    pub thread_names: bool,

    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            thread_names: true,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder
                    .filter_level(log::LevelFilter::Info)
                    .filter_module("wgpu_core", log::LevelFilter::Warn)
                    .filter_module("wgpu_hal", log::LevelFilter::Warn);
            }
        }

        if config.thread_names {
            builder.format(|buf, record| {
                let thread = std::thread::current();
                writeln!(
                    buf,
                    "[{:<5} {} {}] {}",
                    record.level(),
                    thread.name().unwrap_or("unnamed"),
                    record.target(),
                    record.args()
                )
            });
        }

        builder.write_style(config.write_style);

        // A test harness may have installed its own logger already.
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}

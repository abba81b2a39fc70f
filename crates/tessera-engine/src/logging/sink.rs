use std::io::{self, Write};

use crate::message::{Notification, NotificationKind};

/// Writes drained notifications as newline-terminated text lines.
pub struct LogSink<T: Write> {
    out: T,
    written: u64,
}

impl LogSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<T: Write> LogSink<T> {
    pub fn new(out: T) -> Self {
        Self { out, written: 0 }
    }

    /// Writes one notification and flushes.
    pub fn write(&mut self, notification: &Notification) -> io::Result<()> {
        match notification.kind {
            NotificationKind::Log => {
                writeln!(self.out, "{}", notification.text)?;
                self.out.flush()?;
                self.written += 1;
            }
        }
        Ok(())
    }

    /// Like [`write`](Self::write) but reports I/O failures through `log`
    /// instead of returning them; used from event handlers that cannot fail.
    pub fn emit(&mut self, notification: &Notification) {
        if let Err(err) = self.write(notification) {
            log::warn!("failed to write notification: {err}");
        }
    }

    /// Number of lines written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> T {
        self.out
    }
}

//! Host event loops.
//!
//! A host owns the render engine, receives the bridge's wake signal in its
//! own event loop and drains notifications into a [`LogSink`](crate::logging::LogSink)
//! after every wake. Two hosts exist:
//! - [`Runtime`]: winit window + wgpu backend, woken through an event-loop proxy
//! - [`run_headless`]: no display, woken through a channel

mod headless;
mod runtime;
mod shutdown;

pub use headless::{run_headless, HeadlessReport};
pub use runtime::{HostEvent, Runtime, RuntimeConfig};
pub use shutdown::ShutdownHandle;

//! GPU context for the render thread.
//!
//! [`GpuSurface`] is created on the event-loop thread, since it queries the
//! window's native handles. It then moves into the backend factory, where
//! [`Gpu`] opens the device on the render thread. From then on the render
//! thread learns about the window only through [`SurfaceMetrics`].

mod gpu;
mod init;
mod metrics;
mod surface;

pub use gpu::{Gpu, GpuFrame, GpuSurface};
pub use init::GpuInit;
pub use metrics::{Metrics, SurfaceMetrics};
pub use surface::SurfaceErrorAction;

//! Tessera engine crate.
//!
//! A render thread owns the GPU context and a single movable quad. Other
//! threads steer it by posting [`message::Command`]s; the render thread
//! reports every applied move back to the host event loop as a
//! [`message::Notification`] through the [`bridge::HostBridge`].

pub mod backend;
pub mod bridge;
pub mod engine;
pub mod host;
pub mod message;
pub mod queue;

pub mod device;
pub mod input;
pub mod logging;
pub mod panel;
pub mod render;

pub mod coords;
pub mod paint;

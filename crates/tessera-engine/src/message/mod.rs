//! Messages exchanged between caller threads, the render thread and the host loop.
//!
//! Both directions carry small, immutable values that are copied into a queue
//! and destroyed on consumption:
//! - [`Command`]: caller → render thread
//! - [`Notification`]: render thread → host event loop

mod command;
mod notification;

pub use command::{Command, Direction};
pub use notification::{LogText, Notification, NotificationKind, LOG_TEXT_CAPACITY};

//! Cross-thread dispatch for the Opal desktop shell.
//!
//! Two pieces live here:
//! - [`UiQueue`] / [`UiHandle`]: a FIFO of closures owned by the single UI
//!   thread. Any thread may post; only the owning thread drains.
//! - [`submit`] / [`AsyncOperation`]: runs work on a disposable background
//!   thread and delivers its outcome exactly once, through the UI queue.
//!
//! Nothing here shares mutable state across threads. Every hand-off is a
//! message into the UI thread's channel.

mod error;
mod operation;
mod queue;
#[cfg(test)]
mod testing;

pub use error::{DispatchError, OperationError};
pub use operation::{AsyncOperation, submit};
pub use queue::{UiHandle, UiQueue, UiTask};

use std::any::Any;

/// Prefix of the name given to every background operation thread.
pub const OPERATION_THREAD_PREFIX: &str = "opal-op-";

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".into()
    }
}

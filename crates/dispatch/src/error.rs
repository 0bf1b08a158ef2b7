//! Error types for UI dispatch and background operations.

/// Errors produced when posting to the UI queue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The owning [`UiQueue`](crate::UiQueue) has been dropped.
    #[error("UI queue is closed")]
    Closed,
}

/// Failure outcome of a background operation.
///
/// `Failed` displays exactly as the underlying error so callers can show
/// the original message to the user.
#[derive(Debug, thiserror::Error)]
pub enum OperationError<E> {
    #[error("{0}")]
    Failed(E),

    #[error("operation panicked: {0}")]
    Panicked(String),

    #[error("failed to start background thread: {0}")]
    Spawn(#[source] std::io::Error),
}

impl<E> OperationError<E> {
    /// Returns the error produced by the work itself, if that is what failed.
    pub fn as_failed(&self) -> Option<&E> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

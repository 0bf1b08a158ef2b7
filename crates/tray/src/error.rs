//! Error types for the tray subsystem.

use std::path::PathBuf;

/// Errors surfaced to the caller of
/// [`TrayIconController::show`](crate::TrayIconController::show).
///
/// All of them mean the icon resource could not be acquired.
#[derive(Debug, thiserror::Error)]
pub enum TrayError {
    #[error("failed to read tray icon {}: {source}", path.display())]
    IconIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode tray icon: {0}")]
    IconDecode(#[from] image::ImageError),

    #[error("invalid tray icon size {width}x{height}")]
    InvalidIconSize { width: u32, height: u32 },
}

/// The OS refused to add an icon to the notification area.
///
/// Logged and absorbed by the controller; a later `show` retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("tray icon registration rejected: {reason}")]
pub struct RegistrationError {
    pub reason: String,
}

impl RegistrationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

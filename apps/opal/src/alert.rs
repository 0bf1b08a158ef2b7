//! User-facing error alerts.

/// Presents an error to the user. Called on the UI thread.
pub trait AlertPresenter: Send + Sync {
    fn show_error(&self, title: &str, message: &str);
}

/// Alerts written to the log, for hosts without a dialog layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlerts;

impl AlertPresenter for LogAlerts {
    fn show_error(&self, title: &str, message: &str) {
        tracing::error!(title, message, "alert");
    }
}

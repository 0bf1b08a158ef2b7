//! Host-side handling of tray actions.

use std::sync::atomic::{AtomicBool, Ordering};

use opal_dispatch::UiHandle;
use opal_tray::TrayIconListener;

use crate::about::AboutActions;

/// Reacts to tray actions on the UI thread.
pub struct ShellListener {
    ui: UiHandle,
    about: AboutActions,
    window_visible: AtomicBool,
}

impl ShellListener {
    pub fn new(ui: UiHandle, about: AboutActions) -> Self {
        Self {
            ui,
            about,
            window_visible: AtomicBool::new(true),
        }
    }

    /// Whether the main window is currently shown.
    pub fn is_window_visible(&self) -> bool {
        self.window_visible.load(Ordering::Relaxed)
    }
}

impl TrayIconListener for ShellListener {
    fn on_show_hide(&self) {
        debug_assert!(self.ui.is_ui_thread());
        let visible = !self.window_visible.fetch_xor(true, Ordering::Relaxed);
        tracing::info!(visible, "main window toggled");
    }

    fn on_settings(&self) {
        debug_assert!(self.ui.is_ui_thread());
        tracing::info!(path = %crate::config::config_path().display(), "settings requested");
    }

    fn on_about(&self) {
        debug_assert!(self.ui.is_ui_thread());
        self.about.show();
    }

    fn on_exit(&self) {
        debug_assert!(self.ui.is_ui_thread());
        tracing::info!("exit requested via tray");
        if self.ui.quit().is_err() {
            tracing::warn!("UI queue already closed");
        }
    }
}

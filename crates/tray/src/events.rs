//! Routing of tray events onto the UI thread.

use std::fmt;
use std::sync::Arc;

use opal_dispatch::UiHandle;

use crate::DOUBLE_CLICK_COUNT;
use crate::menu::MenuAction;

/// Application-level sink for tray events.
///
/// Every method is called on the UI thread, at most once per user gesture.
pub trait TrayIconListener: Send + Sync {
    fn on_show_hide(&self);
    fn on_settings(&self);
    fn on_about(&self);
    fn on_exit(&self);
}

/// Entry point for a backend delivering OS events.
///
/// Safe to call from any thread; nothing runs until the UI thread drains
/// its queue.
#[derive(Clone)]
pub struct TrayEvents {
    ui: UiHandle,
    listener: Arc<dyn TrayIconListener>,
}

impl TrayEvents {
    pub fn new(ui: UiHandle, listener: Arc<dyn TrayIconListener>) -> Self {
        Self { ui, listener }
    }

    /// A menu entry was clicked.
    pub fn menu_clicked(&self, action: MenuAction) {
        tracing::debug!(?action, "tray menu clicked");
        self.dispatch(action);
    }

    /// The icon itself was clicked `click_count` times within the OS
    /// double-click window.
    ///
    /// Only a double click is routed; single clicks are left to the OS,
    /// which opens the popup menu.
    pub fn mouse_clicked(&self, click_count: u32) {
        if click_count == DOUBLE_CLICK_COUNT {
            tracing::debug!("tray icon double-clicked");
            self.dispatch(MenuAction::ShowHide);
        }
    }

    fn dispatch(&self, action: MenuAction) {
        let listener = Arc::clone(&self.listener);
        let posted = self.ui.post(move || match action {
            MenuAction::ShowHide => listener.on_show_hide(),
            MenuAction::Settings => listener.on_settings(),
            MenuAction::About => listener.on_about(),
            MenuAction::Exit => listener.on_exit(),
        });
        if posted.is_err() {
            tracing::warn!(?action, "UI queue closed, tray event dropped");
        }
    }
}

impl fmt::Debug for TrayEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrayEvents")
            .field("ui", &self.ui)
            .finish_non_exhaustive()
    }
}

//! Win32 notification-area backend built on `tray-icon`.
//!
//! `tray-icon` raises menu and icon events from its window procedure. The
//! global handlers installed here look up which controller icon an event
//! belongs to and hand it to that icon's [`TrayEvents`], which marshals it
//! onto the UI queue. The window procedure only runs while the UI thread
//! pumps messages, see [`TrayPlatform::pump`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem as NativeMenuItem, PredefinedMenuItem};
use tray_icon::{
    Icon, MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent,
    TrayIconId as NativeId,
};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, MSG, PM_REMOVE, PeekMessageW, TranslateMessage,
};

use crate::error::RegistrationError;
use crate::events::TrayEvents;
use crate::icon::IconSize;
use crate::menu::MenuAction;
use crate::platform::{TrayIconHandle, TrayIconId, TrayPlatform};

/// Small icon size of the Windows notification area.
const WINDOWS_ICON_SIZE: IconSize = IconSize::new(16, 16);

#[derive(Default)]
struct Routes {
    menu: HashMap<MenuId, (TrayIconId, TrayEvents, MenuAction)>,
    icons: HashMap<NativeId, TrayEvents>,
}

/// Native Windows tray.
pub struct NativeTray {
    icons: HashMap<TrayIconId, (NativeId, TrayIcon)>,
    routes: Arc<Mutex<Routes>>,
}

impl NativeTray {
    /// Installs the global `tray-icon` event handlers.
    ///
    /// Must be called on the UI thread, and at most once per process.
    pub fn new() -> Self {
        let routes = Arc::new(Mutex::new(Routes::default()));

        MenuEvent::set_event_handler(Some({
            let routes = Arc::clone(&routes);
            move |event: MenuEvent| {
                let target = routes
                    .lock()
                    .ok()
                    .and_then(|r| r.menu.get(&event.id).map(|(_, ev, a)| (ev.clone(), *a)));
                if let Some((events, action)) = target {
                    events.menu_clicked(action);
                }
            }
        }));

        TrayIconEvent::set_event_handler(Some({
            let routes = Arc::clone(&routes);
            move |event: TrayIconEvent| {
                let (id, clicks) = match event {
                    TrayIconEvent::DoubleClick {
                        id,
                        button: MouseButton::Left,
                        ..
                    } => (id, 2),
                    TrayIconEvent::Click {
                        id,
                        button: MouseButton::Left,
                        button_state: MouseButtonState::Up,
                        ..
                    } => (id, 1),
                    _ => return,
                };
                let target = routes.lock().ok().and_then(|r| r.icons.get(&id).cloned());
                if let Some(events) = target {
                    events.mouse_clicked(clicks);
                }
            }
        }));

        Self {
            icons: HashMap::new(),
            routes,
        }
    }

    fn build(
        &self,
        handle: &TrayIconHandle,
    ) -> Result<(NativeId, TrayIcon, Vec<(MenuId, MenuAction)>), RegistrationError> {
        let menu = Menu::new();
        let mut actions = Vec::new();

        for item in handle.menu().items() {
            match item.action {
                Some(action) => {
                    let entry = NativeMenuItem::new(&item.label, item.enabled, None);
                    menu.append(&entry)
                        .map_err(|e| RegistrationError::new(e.to_string()))?;
                    actions.push((entry.id().clone(), action));
                }
                None => {
                    menu.append(&PredefinedMenuItem::separator())
                        .map_err(|e| RegistrationError::new(e.to_string()))?;
                }
            }
        }

        let image = handle.image();
        let icon = Icon::from_rgba(image.as_raw().clone(), image.width(), image.height())
            .map_err(|e| RegistrationError::new(e.to_string()))?;

        let native_id = NativeId::new(format!("opal-{}", handle.id().get()));
        let tray = TrayIconBuilder::new()
            .with_id(native_id.clone())
            .with_menu(Box::new(menu))
            .with_tooltip(handle.tooltip())
            .with_icon(icon)
            .build()
            .map_err(|e| RegistrationError::new(e.to_string()))?;

        Ok((native_id, tray, actions))
    }
}

impl TrayPlatform for NativeTray {
    fn is_supported(&self) -> bool {
        true
    }

    fn preferred_icon_size(&self) -> IconSize {
        WINDOWS_ICON_SIZE
    }

    fn registered(&self) -> Vec<TrayIconId> {
        self.icons.keys().copied().collect()
    }

    fn add(&mut self, handle: &TrayIconHandle) -> Result<(), RegistrationError> {
        let (native_id, tray, actions) = self.build(handle)?;

        let mut routes = self
            .routes
            .lock()
            .map_err(|_| RegistrationError::new("tray routing table poisoned"))?;
        for (menu_id, action) in actions {
            routes
                .menu
                .insert(menu_id, (handle.id(), handle.events().clone(), action));
        }
        routes.icons.insert(native_id.clone(), handle.events().clone());
        drop(routes);

        self.icons.insert(handle.id(), (native_id, tray));
        tracing::debug!(id = handle.id().get(), "native tray icon added");
        Ok(())
    }

    fn remove(&mut self, id: TrayIconId) {
        // Dropping the TrayIcon deletes it from the notification area.
        let Some((native_id, _tray)) = self.icons.remove(&id) else {
            return;
        };
        if let Ok(mut routes) = self.routes.lock() {
            routes.icons.remove(&native_id);
            routes.menu.retain(|_, (owner, _, _)| *owner != id);
        }
        tracing::debug!(id = id.get(), "native tray icon removed");
    }

    fn pump(&mut self) {
        // SAFETY: MSG is plain data and a null window handle selects every
        // window owned by this thread.
        unsafe {
            let mut msg: MSG = std::mem::zeroed();
            while PeekMessageW(&mut msg, std::ptr::null_mut(), 0, 0, PM_REMOVE) != 0 {
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }
}

impl Default for NativeTray {
    fn default() -> Self {
        Self::new()
    }
}

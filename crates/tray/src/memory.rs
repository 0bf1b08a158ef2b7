//! In-process tray registry.
//!
//! Behaves like a notification area without touching the OS: icons are
//! kept in a list, registration can be made to fail, and tests can raise
//! menu and mouse events from any thread through [`MemoryTray::events`].

use crate::error::RegistrationError;
use crate::events::TrayEvents;
use crate::icon::IconSize;
use crate::platform::{TrayIconHandle, TrayIconId, TrayPlatform};

/// Default icon size reported by [`MemoryTray`].
pub const MEMORY_ICON_SIZE: IconSize = IconSize::new(16, 16);

#[derive(Debug)]
struct Registered {
    id: TrayIconId,
    tooltip: String,
    events: TrayEvents,
}

/// Tray backend that lives entirely in memory.
#[derive(Debug)]
pub struct MemoryTray {
    supported: bool,
    icon_size: IconSize,
    icons: Vec<Registered>,
    pending_rejections: usize,
    add_attempts: usize,
}

impl MemoryTray {
    /// A working tray with 16x16 icons.
    pub fn new() -> Self {
        Self {
            supported: true,
            icon_size: MEMORY_ICON_SIZE,
            icons: Vec::new(),
            pending_rejections: 0,
            add_attempts: 0,
        }
    }

    /// A system without a tray.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    /// Overrides the preferred icon size.
    pub fn with_icon_size(mut self, size: IconSize) -> Self {
        self.icon_size = size;
        self
    }

    /// Makes the next `count` calls to `add` fail.
    pub fn reject_next(&mut self, count: usize) {
        self.pending_rejections = count;
    }

    /// Number of icons currently in the tray.
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Total calls to `add`, including rejected ones.
    pub fn add_attempts(&self) -> usize {
        self.add_attempts
    }

    /// Tooltip of a registered icon.
    pub fn tooltip(&self, id: TrayIconId) -> Option<&str> {
        self.find(id).map(|r| r.tooltip.as_str())
    }

    /// Event sink of a registered icon, for raising OS events.
    pub fn events(&self, id: TrayIconId) -> Option<TrayEvents> {
        self.find(id).map(|r| r.events.clone())
    }

    fn find(&self, id: TrayIconId) -> Option<&Registered> {
        self.icons.iter().find(|r| r.id == id)
    }
}

impl Default for MemoryTray {
    fn default() -> Self {
        Self::new()
    }
}

impl TrayPlatform for MemoryTray {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn preferred_icon_size(&self) -> IconSize {
        self.icon_size
    }

    fn registered(&self) -> Vec<TrayIconId> {
        self.icons.iter().map(|r| r.id).collect()
    }

    fn add(&mut self, handle: &TrayIconHandle) -> Result<(), RegistrationError> {
        self.add_attempts += 1;
        if !self.supported {
            return Err(RegistrationError::new("no system tray"));
        }
        if self.pending_rejections > 0 {
            self.pending_rejections -= 1;
            return Err(RegistrationError::new("tray rejected the icon"));
        }

        self.icons.push(Registered {
            id: handle.id(),
            tooltip: handle.tooltip().to_string(),
            events: handle.events().clone(),
        });
        Ok(())
    }

    fn remove(&mut self, id: TrayIconId) {
        self.icons.retain(|r| r.id != id);
    }
}

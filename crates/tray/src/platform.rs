//! Platform tray surface and the icon handle it registers.

use std::sync::atomic::{AtomicU64, Ordering};

use image::RgbaImage;

use crate::error::RegistrationError;
use crate::events::TrayEvents;
use crate::icon::IconSize;
use crate::menu::MenuDefinition;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one built tray icon. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrayIconId(u64);

impl TrayIconId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// A fully built tray icon: scaled image, tooltip, menu and event routing.
#[derive(Debug)]
pub struct TrayIconHandle {
    id: TrayIconId,
    image: RgbaImage,
    tooltip: String,
    menu: MenuDefinition,
    events: TrayEvents,
}

impl TrayIconHandle {
    pub(crate) fn new(
        image: RgbaImage,
        tooltip: String,
        menu: MenuDefinition,
        events: TrayEvents,
    ) -> Self {
        Self {
            id: TrayIconId::next(),
            image,
            tooltip,
            menu,
            events,
        }
    }

    pub fn id(&self) -> TrayIconId {
        self.id
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn menu(&self) -> &MenuDefinition {
        &self.menu
    }

    /// Event sink a backend hands OS events to.
    pub fn events(&self) -> &TrayEvents {
        &self.events
    }
}

/// OS notification-area operations used by the controller.
///
/// All calls are synchronous and made from the UI thread.
pub trait TrayPlatform {
    /// Whether this system has a tray at all.
    fn is_supported(&self) -> bool;

    /// Icon dimensions the tray prefers.
    fn preferred_icon_size(&self) -> IconSize;

    /// Icons currently present in the tray.
    fn registered(&self) -> Vec<TrayIconId>;

    /// Puts `handle` in the tray and starts routing its events.
    fn add(&mut self, handle: &TrayIconHandle) -> Result<(), RegistrationError>;

    /// Takes the icon out of the tray. Unknown ids are ignored.
    fn remove(&mut self, id: TrayIconId);

    /// Processes pending OS messages, for backends that must be pumped on
    /// the UI thread.
    fn pump(&mut self) {}
}

//! System tray icon for the Opal desktop shell.
//!
//! [`TrayIconController`] owns at most one tray icon and drives it through
//! a [`TrayPlatform`] backend. Events raised by the backend, on whatever
//! thread the OS uses, are marshaled through the UI queue before reaching
//! the application's [`TrayIconListener`].
//!
//! # Backends
//! - [`MemoryTray`]: in-process registry, used by tests and headless hosts
//! - `NativeTray` (feature `native`, Windows): Win32 notification area via
//!   `tray-icon`

mod controller;
mod error;
mod events;
mod icon;
mod memory;
mod menu;
#[cfg(all(feature = "native", windows))]
mod native;
mod platform;

pub use controller::TrayIconController;
pub use error::{RegistrationError, TrayError};
pub use events::{TrayEvents, TrayIconListener};
pub use icon::{DEFAULT_ICON, IconSize, IconSource, load_icon};
pub use memory::{MEMORY_ICON_SIZE, MemoryTray};
pub use menu::{LabelProvider, MenuAction, MenuDefinition, MenuItem};
#[cfg(all(feature = "native", windows))]
pub use native::NativeTray;
pub use platform::{TrayIconHandle, TrayIconId, TrayPlatform};

/// Translation key for the tray tooltip.
pub const TOOLTIP_KEY: &str = "Tooltip";

/// Click count on the icon that toggles the main window.
pub const DOUBLE_CLICK_COUNT: u32 = 2;

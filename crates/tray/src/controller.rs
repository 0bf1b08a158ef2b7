//! Tray icon lifecycle.
//!
//! Two observable states: no icon, or an icon handle that is (normally)
//! registered with the platform. `show` builds lazily and registers at
//! most once; `hide` unregisters and discards, so the next `show` rebuilds
//! from scratch.

use std::sync::Arc;

use opal_dispatch::UiHandle;

use crate::TOOLTIP_KEY;
use crate::error::TrayError;
use crate::events::{TrayEvents, TrayIconListener};
use crate::icon::{IconSource, load_icon};
use crate::menu::{LabelProvider, MenuDefinition};
use crate::platform::{TrayIconHandle, TrayPlatform};

/// Owns one tray icon on a given platform. Lives on the UI thread.
pub struct TrayIconController<P: TrayPlatform> {
    platform: P,
    labels: Box<dyn LabelProvider>,
    listener: Arc<dyn TrayIconListener>,
    ui: UiHandle,
    icon: IconSource,
    handle: Option<TrayIconHandle>,
}

impl<P: TrayPlatform> TrayIconController<P> {
    pub fn new(
        platform: P,
        labels: impl LabelProvider + 'static,
        listener: Arc<dyn TrayIconListener>,
        ui: UiHandle,
    ) -> Self {
        Self {
            platform,
            labels: Box::new(labels),
            listener,
            ui,
            icon: IconSource::default(),
            handle: None,
        }
    }

    /// Uses `icon` instead of the bundled image for icons built from now on.
    pub fn with_icon(mut self, icon: IconSource) -> Self {
        self.icon = icon;
        self
    }

    /// Builds the icon handle if there is none.
    ///
    /// Without a system tray this logs a warning and leaves the controller
    /// without a handle. An existing handle is kept as is.
    pub fn create(&mut self) -> Result<(), TrayError> {
        if self.handle.is_some() {
            return Ok(());
        }

        tracing::info!("creating tray icon");
        if !self.platform.is_supported() {
            tracing::warn!("system tray is not supported");
            return Ok(());
        }

        let size = self.platform.preferred_icon_size();
        let image = load_icon(&self.icon, size)?;
        let menu = MenuDefinition::build(self.labels.as_ref());
        let tooltip = self.labels.label(TOOLTIP_KEY);
        let events = TrayEvents::new(self.ui.clone(), Arc::clone(&self.listener));

        let handle = TrayIconHandle::new(image, tooltip, menu, events);
        tracing::debug!(id = handle.id().get(), width = size.width, height = size.height, "tray icon built");
        self.handle = Some(handle);
        Ok(())
    }

    /// Makes the tray icon visible.
    ///
    /// Only an icon resource failure is returned. A missing tray is a
    /// logged no-op; an OS rejection is logged and retried on the next call.
    pub fn show(&mut self) -> Result<(), TrayError> {
        tracing::info!("displaying tray icon");
        if self.handle.is_none() {
            self.create()?;
        }
        let Some(handle) = self.handle.as_ref() else {
            return Ok(());
        };

        if self.platform.registered().contains(&handle.id()) {
            tracing::debug!(id = handle.id().get(), "tray icon already registered");
            return Ok(());
        }

        if let Err(e) = self.platform.add(handle) {
            tracing::error!(error = %e, "tray icon could not be added");
        }
        Ok(())
    }

    /// Removes the tray icon and discards its handle.
    pub fn hide(&mut self) {
        tracing::info!("hiding tray icon");
        let Some(handle) = self.handle.take() else {
            tracing::debug!("no tray icon to hide");
            return;
        };
        self.platform.remove(handle.id());
    }

    /// Current handle, if one has been built.
    pub fn handle(&self) -> Option<&TrayIconHandle> {
        self.handle.as_ref()
    }

    /// Whether the current handle is in the platform's tray right now.
    pub fn is_registered(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|h| self.platform.registered().contains(&h.id()))
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryTray;
    use crate::icon::IconSize;
    use opal_dispatch::UiQueue;
    use std::borrow::Cow;
    use std::collections::HashMap;

    struct Silent;

    impl TrayIconListener for Silent {
        fn on_show_hide(&self) {}
        fn on_settings(&self) {}
        fn on_about(&self) {}
        fn on_exit(&self) {}
    }

    fn controller(queue: &UiQueue, tray: MemoryTray) -> TrayIconController<MemoryTray> {
        let labels: HashMap<String, String> =
            [("Tooltip".to_string(), "Opal".to_string())].into();
        TrayIconController::new(tray, labels, Arc::new(Silent), queue.handle())
    }

    #[test]
    fn show_builds_and_registers() {
        let queue = UiQueue::new();
        let mut c = controller(&queue, MemoryTray::new());

        c.show().unwrap();
        assert!(c.is_registered());
        assert_eq!(c.platform().len(), 1);

        let handle = c.handle().unwrap();
        assert_eq!(handle.tooltip(), "Opal");
        assert_eq!(handle.menu().entries().count(), 4);
    }

    #[test]
    fn icon_is_scaled_to_preferred_size() {
        let queue = UiQueue::new();
        let tray = MemoryTray::new().with_icon_size(IconSize::new(24, 20));
        let mut c = controller(&queue, tray);

        c.show().unwrap();
        assert_eq!(c.handle().unwrap().image().dimensions(), (24, 20));
    }

    #[test]
    fn repeated_show_registers_once() {
        let queue = UiQueue::new();
        let mut c = controller(&queue, MemoryTray::new());

        c.show().unwrap();
        c.show().unwrap();
        c.show().unwrap();
        assert_eq!(c.platform().len(), 1);
        assert_eq!(c.platform().add_attempts(), 1);
    }

    #[test]
    fn hide_without_icon_is_noop() {
        let queue = UiQueue::new();
        let mut c = controller(&queue, MemoryTray::new());

        c.hide();
        assert!(c.handle().is_none());
        assert!(c.platform().is_empty());
    }

    #[test]
    fn hide_unregisters_and_discards() {
        let queue = UiQueue::new();
        let mut c = controller(&queue, MemoryTray::new());

        c.show().unwrap();
        c.hide();
        assert!(c.handle().is_none());
        assert!(c.platform().is_empty());
        assert!(!c.is_registered());
    }

    #[test]
    fn show_after_hide_builds_new_handle() {
        let queue = UiQueue::new();
        let mut c = controller(&queue, MemoryTray::new());

        c.show().unwrap();
        let first = c.handle().unwrap().id();
        c.hide();
        c.show().unwrap();
        let second = c.handle().unwrap().id();

        assert_ne!(first, second);
        assert_eq!(c.platform().registered(), vec![second]);
    }

    #[test]
    fn unsupported_tray_is_degraded_noop() {
        let queue = UiQueue::new();
        let mut c = controller(&queue, MemoryTray::unsupported());

        c.show().unwrap();
        assert!(c.handle().is_none());
        assert_eq!(c.platform().add_attempts(), 0);
    }

    #[test]
    fn bad_icon_is_reported_from_show() {
        let queue = UiQueue::new();
        let mut c = controller(&queue, MemoryTray::new())
            .with_icon(IconSource::Bytes(Cow::Owned(vec![0, 1, 2, 3])));

        let err = c.show().unwrap_err();
        assert!(matches!(err, TrayError::IconDecode(_)));
        assert!(c.handle().is_none());
        assert!(c.platform().is_empty());
    }

    #[test]
    fn rejected_registration_keeps_handle_for_retry() {
        let queue = UiQueue::new();
        let mut tray = MemoryTray::new();
        tray.reject_next(1);
        let mut c = controller(&queue, tray);

        c.show().unwrap();
        assert!(!c.is_registered());
        let kept = c.handle().unwrap().id();

        c.show().unwrap();
        assert!(c.is_registered());
        assert_eq!(c.handle().unwrap().id(), kept);
        assert_eq!(c.platform().add_attempts(), 2);
    }

    #[test]
    fn explicit_create_then_show_reuses_handle() {
        let queue = UiQueue::new();
        let mut c = controller(&queue, MemoryTray::new());

        c.create().unwrap();
        let built = c.handle().unwrap().id();
        assert!(c.platform().is_empty());

        c.create().unwrap();
        c.show().unwrap();
        assert_eq!(c.platform().registered(), vec![built]);
    }
}

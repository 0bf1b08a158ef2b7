//! Application orchestrator: wires the shell components together.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use opal_dispatch::{UiHandle, UiQueue};
use opal_tray::{IconSource, LabelProvider, TrayIconController, TrayPlatform};

use crate::about::AboutActions;
use crate::alert::{AlertPresenter, LogAlerts};
use crate::config::Config;
use crate::i18n::Translations;
use crate::listener::ShellListener;
use crate::opener::SystemOpener;

/// How long the UI loop waits for tasks before pumping the tray backend.
const PUMP_INTERVAL: Duration = Duration::from_millis(16);

/// Runs the shell on the calling thread until exit is requested.
pub fn run(config: Config) -> anyhow::Result<()> {
    let queue = UiQueue::new();
    let ui = queue.handle();

    let labels = Arc::new(Translations::load(&config.language)?);
    tracing::info!(language = labels.language(), "translations loaded");

    let alerts: Arc<dyn AlertPresenter> = Arc::new(LogAlerts);
    let about = AboutActions::new(
        ui.clone(),
        labels.clone(),
        Arc::clone(&alerts),
        Arc::new(SystemOpener),
        PathBuf::from(&config.license_path),
        config.website_url.clone(),
    );
    let listener = Arc::new(ShellListener::new(ui.clone(), about));

    watch_ctrl_c(ui.clone())?;

    let mut tray = TrayIconController::new(platform(), labels.clone(), listener, ui);
    if let Some(icon) = &config.icon_path {
        tray = tray.with_icon(IconSource::File(PathBuf::from(icon)));
    }

    if config.tray_enabled {
        if let Err(e) = tray.show() {
            tracing::error!(error = %e, "tray icon unavailable");
            alerts.show_error(&labels.label("TrayIconError"), &e.to_string());
        }
    }
    if !tray.is_registered() {
        tracing::info!("running without a tray icon, press Ctrl-C to exit");
    }

    run_ui_loop(&queue, &mut tray);

    tray.hide();
    Ok(())
}

/// Drains the UI queue, letting the tray backend process OS messages
/// between batches.
pub fn run_ui_loop<P: TrayPlatform>(queue: &UiQueue, tray: &mut TrayIconController<P>) {
    tracing::debug!("UI loop started");
    while !queue.is_quit_requested() {
        queue.run_for(PUMP_INTERVAL);
        tray.platform_mut().pump();
    }
    tracing::debug!("UI loop stopped");
}

/// Posts a quit request to the UI loop on Ctrl-C.
fn watch_ctrl_c(ui: UiHandle) -> anyhow::Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    std::thread::Builder::new()
        .name("opal-signals".into())
        .spawn(move || {
            rt.block_on(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        tracing::info!("SIGINT received, shutting down");
                        let _ = ui.quit();
                    }
                    Err(e) => tracing::warn!(error = %e, "cannot listen for Ctrl-C"),
                }
            });
        })?;
    Ok(())
}

#[cfg(all(feature = "native", windows))]
fn platform() -> opal_tray::NativeTray {
    opal_tray::NativeTray::new()
}

/// Without a native backend the shell runs in the degraded no-tray mode.
#[cfg(not(all(feature = "native", windows)))]
fn platform() -> opal_tray::MemoryTray {
    opal_tray::MemoryTray::unsupported()
}

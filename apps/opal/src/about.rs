//! Behaviour behind the about window.
//!
//! Opening the license or the website blocks on the desktop launcher, so
//! both run as background operations. Their outcome comes back on the UI
//! thread, where success is logged and failure raises an alert.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use opal_dispatch::{UiHandle, submit};
use opal_tray::LabelProvider;
use opal_update::Version;
use url::Url;

use crate::alert::AlertPresenter;
use crate::opener::Opener;

/// License text shipped inside the binary.
pub const LICENSE_TEXT: &str = include_str!("../assets/LICENSE.txt");

/// Errors raised while opening a file or URL.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Actions offered by the about window.
pub struct AboutActions {
    ui: UiHandle,
    labels: Arc<dyn LabelProvider + Send + Sync>,
    alerts: Arc<dyn AlertPresenter>,
    opener: Arc<dyn Opener>,
    license_path: PathBuf,
    website_url: String,
}

impl AboutActions {
    pub fn new(
        ui: UiHandle,
        labels: Arc<dyn LabelProvider + Send + Sync>,
        alerts: Arc<dyn AlertPresenter>,
        opener: Arc<dyn Opener>,
        license_path: impl Into<PathBuf>,
        website_url: impl Into<String>,
    ) -> Self {
        Self {
            ui,
            labels,
            alerts,
            opener,
            license_path: license_path.into(),
            website_url: website_url.into(),
        }
    }

    /// One-line description shown in the about window.
    pub fn summary(&self) -> String {
        let version = env!("CARGO_PKG_VERSION")
            .parse::<Version>()
            .unwrap_or_default();
        format!("Opal {version} - {}", self.website_url)
    }

    /// Logs the about window contents.
    pub fn show(&self) {
        tracing::info!(
            summary = %self.summary(),
            license = %self.license_path.display(),
            "about window"
        );
    }

    /// Extracts the bundled license if needed and opens it.
    pub fn open_license(&self) {
        tracing::info!("attempting to open the license file");
        let path = self.license_path.clone();
        let opener = Arc::clone(&self.opener);
        self.run(
            "license",
            move || {
                extract_license(&path, LICENSE_TEXT)?;
                opener.open_path(&path)?;
                Ok(())
            },
            "opened the license file",
            "LicenseFileError",
        );
    }

    /// Opens the project website in the default browser.
    pub fn open_website(&self) {
        tracing::info!(url = %self.website_url, "opening the website");
        self.open_url(self.website_url.clone());
    }

    /// Opens an existing file with its default application.
    pub fn open_file(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let opener = Arc::clone(&self.opener);
        self.run(
            "file",
            move || opener.open_path(&path).map_err(OpenError::from),
            "opened the file",
            "FileError",
        );
    }

    /// Opens `url` in the default browser.
    pub fn open_url(&self, url: String) {
        let opener = Arc::clone(&self.opener);
        self.run(
            "website",
            move || {
                let parsed = Url::parse(&url).map_err(|source| OpenError::InvalidUrl {
                    url: url.clone(),
                    source,
                })?;
                opener.open_url(&parsed)?;
                Ok(())
            },
            "opened the website",
            "WebsiteError",
        );
    }

    fn run<W>(&self, name: &'static str, work: W, success: &'static str, error_key: &'static str)
    where
        W: FnOnce() -> Result<(), OpenError> + Send + 'static,
    {
        let labels = Arc::clone(&self.labels);
        let alerts = Arc::clone(&self.alerts);
        submit(&self.ui, name, work, move |result| match result {
            Ok(()) => tracing::info!(operation = name, "{success}"),
            Err(e) => {
                tracing::error!(operation = name, error = %e, "background operation failed");
                alerts.show_error(&labels.label(error_key), &e.to_string());
            }
        });
    }
}

/// Writes `text` to `path` unless the file already exists.
fn extract_license(path: &Path, text: &str) -> io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)?;
    tracing::debug!(path = %path.display(), "license extracted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use opal_dispatch::UiQueue;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::thread::{self, ThreadId};
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct RecordingOpener {
        paths: Mutex<Vec<PathBuf>>,
        urls: Mutex<Vec<String>>,
        threads: Mutex<Vec<ThreadId>>,
    }

    impl Opener for RecordingOpener {
        fn open_path(&self, path: &Path) -> io::Result<()> {
            self.threads.lock().unwrap().push(thread::current().id());
            std::fs::metadata(path)?;
            self.paths.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }

        fn open_url(&self, url: &Url) -> io::Result<()> {
            self.threads.lock().unwrap().push(thread::current().id());
            self.urls.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingAlerts {
        shown: Mutex<Vec<(String, String, ThreadId)>>,
    }

    impl AlertPresenter for RecordingAlerts {
        fn show_error(&self, title: &str, message: &str) {
            self.shown.lock().unwrap().push((
                title.to_string(),
                message.to_string(),
                thread::current().id(),
            ));
        }
    }

    struct Fixture {
        queue: UiQueue,
        opener: Arc<RecordingOpener>,
        alerts: Arc<RecordingAlerts>,
        about: AboutActions,
        _tmp: tempfile::TempDir,
        license: PathBuf,
    }

    fn fixture(url: &str) -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let license = tmp.path().join("docs").join("license.txt");
        let queue = UiQueue::new();
        let opener = Arc::new(RecordingOpener::default());
        let alerts = Arc::new(RecordingAlerts::default());
        let labels: HashMap<String, String> = [
            ("LicenseFileError".to_string(), "License failed".to_string()),
            ("FileError".to_string(), "File failed".to_string()),
            ("WebsiteError".to_string(), "Website failed".to_string()),
        ]
        .into();
        let about = AboutActions::new(
            queue.handle(),
            Arc::new(labels),
            alerts.clone(),
            opener.clone(),
            license.clone(),
            url,
        );
        Fixture {
            queue,
            opener,
            alerts,
            about,
            _tmp: tmp,
            license,
        }
    }

    fn pump_until(queue: &UiQueue, done: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done() && Instant::now() < deadline {
            queue.run_for(Duration::from_millis(20));
        }
    }

    /// Runs `f` with a fmt subscriber writing into a buffer; returns the log text.
    fn capture_logs(f: impl FnOnce()) -> String {
        #[derive(Clone, Default)]
        struct Buffer(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Buffer {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[test]
    fn missing_file_alerts_with_io_message() {
        let f = fixture("https://codedead.com");
        let missing = f.license.with_file_name("missing.txt");
        let expected = std::fs::metadata(&missing).unwrap_err().to_string();

        f.about.open_file(&missing);
        pump_until(&f.queue, || !f.alerts.shown.lock().unwrap().is_empty());
        f.queue.run_for(Duration::from_millis(50));

        let shown = f.alerts.shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].0, "File failed");
        assert_eq!(shown[0].1, expected);
        assert_eq!(shown[0].2, f.queue.ui_thread());
        assert!(f.opener.paths.lock().unwrap().is_empty());
    }

    #[test]
    fn website_opens_once_and_logs_success() {
        let f = fixture("https://codedead.com");

        let logs = capture_logs(|| {
            f.about.open_website();
            pump_until(&f.queue, || !f.opener.urls.lock().unwrap().is_empty());
            // The completion is posted right after the opener returns.
            f.queue.run_for(Duration::from_millis(500));
        });

        assert_eq!(*f.opener.urls.lock().unwrap(), vec!["https://codedead.com/"]);
        assert!(f.alerts.shown.lock().unwrap().is_empty());
        assert_eq!(logs.matches("opened the website").count(), 1);
    }

    #[test]
    fn invalid_url_alerts_with_parse_error() {
        let f = fixture("not a url");

        f.about.open_website();
        pump_until(&f.queue, || !f.alerts.shown.lock().unwrap().is_empty());

        let shown = f.alerts.shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].0, "Website failed");
        assert!(shown[0].1.contains("not a url"));
        assert!(f.opener.urls.lock().unwrap().is_empty());
    }

    #[test]
    fn license_is_extracted_then_opened() {
        let f = fixture("https://codedead.com");
        assert!(!f.license.exists());

        f.about.open_license();
        pump_until(&f.queue, || !f.opener.paths.lock().unwrap().is_empty());
        f.queue.run_for(Duration::from_millis(50));

        assert_eq!(std::fs::read_to_string(&f.license).unwrap(), LICENSE_TEXT);
        assert_eq!(*f.opener.paths.lock().unwrap(), vec![f.license.clone()]);
        assert!(f.alerts.shown.lock().unwrap().is_empty());
    }

    #[test]
    fn existing_license_is_not_overwritten() {
        let f = fixture("https://codedead.com");
        std::fs::create_dir_all(f.license.parent().unwrap()).unwrap();
        std::fs::write(&f.license, "custom").unwrap();

        f.about.open_license();
        pump_until(&f.queue, || !f.opener.paths.lock().unwrap().is_empty());

        assert_eq!(std::fs::read_to_string(&f.license).unwrap(), "custom");
    }

    #[test]
    fn opener_runs_off_the_ui_thread() {
        let f = fixture("https://codedead.com");

        f.about.open_website();
        pump_until(&f.queue, || !f.opener.threads.lock().unwrap().is_empty());

        let threads = f.opener.threads.lock().unwrap();
        assert_eq!(threads.len(), 1);
        assert_ne!(threads[0], f.queue.ui_thread());
    }

    #[test]
    fn summary_mentions_version_and_site() {
        let f = fixture("https://codedead.com");
        let summary = f.about.summary();
        assert!(summary.starts_with("Opal 0.1.0.0"));
        assert!(summary.ends_with("https://codedead.com"));
    }
}

//! Shell configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/opal/opal.toml`
//! - Windows: `%APPDATA%/opal/opal.toml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Shell configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// UI language code (`en`, `nl`).
    #[serde(default = "default_language")]
    pub language: String,

    /// Show the tray icon on start.
    #[serde(default = "default_true")]
    pub tray_enabled: bool,

    /// Website opened from the about window.
    #[serde(default = "default_website_url")]
    pub website_url: String,

    /// Where the bundled license is extracted before opening it.
    #[serde(default = "default_license_path")]
    pub license_path: String,

    /// Replaces the bundled tray icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<String>,
}

fn default_language() -> String {
    "en".into()
}

fn default_true() -> bool {
    true
}

fn default_website_url() -> String {
    "https://codedead.com".into()
}

fn default_license_path() -> String {
    config_dir().join("license.txt").to_string_lossy().into_owned()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            tray_enabled: default_true(),
            website_url: default_website_url(),
            license_path: default_license_path(),
            icon_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path())
    }

    /// Loads configuration from `path`, writing the defaults there if the
    /// file does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            tracing::info!(path = %path.display(), "default configuration created");
            Ok(config)
        }
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // Restrict permissions on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

/// Returns the platform-specific configuration directory.
pub fn config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("opal")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home).join(".config").join("opal")
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("opal.toml")
}

//! Handing files and URLs to the desktop environment.

use std::io;
use std::path::Path;

use url::Url;

/// Opens things with the user's default applications.
///
/// Implementations block; call them from a background operation.
pub trait Opener: Send + Sync {
    fn open_path(&self, path: &Path) -> io::Result<()>;
    fn open_url(&self, url: &Url) -> io::Result<()>;
}

/// Opener backed by the platform launcher (`xdg-open`, `open`, `start`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl Opener for SystemOpener {
    fn open_path(&self, path: &Path) -> io::Result<()> {
        // The launcher does not reliably report missing files.
        std::fs::metadata(path)?;
        open::that(path)
    }

    fn open_url(&self, url: &Url) -> io::Result<()> {
        open::that(url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_fails_before_launching() {
        let tmp = tempfile::tempdir().unwrap();
        let err = SystemOpener
            .open_path(&tmp.path().join("absent.txt"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}

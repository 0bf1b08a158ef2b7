//! Tray icon image loading.

use std::borrow::Cow;
use std::path::PathBuf;

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::error::TrayError;

/// Icon bundled with the crate (64x64 PNG).
pub const DEFAULT_ICON: &[u8] = include_bytes!("../assets/opal.png");

/// Pixel dimensions of a tray icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSize {
    pub width: u32,
    pub height: u32,
}

impl IconSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Where the icon image comes from.
#[derive(Debug, Clone)]
pub enum IconSource {
    /// Encoded image bytes.
    Bytes(Cow<'static, [u8]>),
    /// Image file on disk.
    File(PathBuf),
}

impl Default for IconSource {
    fn default() -> Self {
        IconSource::Bytes(Cow::Borrowed(DEFAULT_ICON))
    }
}

/// Decodes the icon and scales it to `size` with a smooth filter.
pub fn load_icon(source: &IconSource, size: IconSize) -> Result<RgbaImage, TrayError> {
    if size.width == 0 || size.height == 0 {
        return Err(TrayError::InvalidIconSize {
            width: size.width,
            height: size.height,
        });
    }

    let decoded = match source {
        IconSource::Bytes(bytes) => image::load_from_memory(bytes)?,
        IconSource::File(path) => {
            let bytes = std::fs::read(path).map_err(|source| TrayError::IconIo {
                path: path.clone(),
                source,
            })?;
            image::load_from_memory(&bytes)?
        }
    };

    let rgba = decoded.into_rgba8();
    if rgba.dimensions() == (size.width, size.height) {
        return Ok(rgba);
    }

    tracing::debug!(
        from_width = rgba.width(),
        from_height = rgba.height(),
        to_width = size.width,
        to_height = size.height,
        "scaling tray icon"
    );
    Ok(imageops::resize(&rgba, size.width, size.height, FilterType::Lanczos3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_icon_scales_to_requested_size() {
        let img = load_icon(&IconSource::default(), IconSize::new(16, 16)).unwrap();
        assert_eq!(img.dimensions(), (16, 16));
    }

    #[test]
    fn bundled_icon_kept_at_native_size() {
        let img = load_icon(&IconSource::default(), IconSize::new(64, 64)).unwrap();
        assert_eq!(img.dimensions(), (64, 64));
    }

    #[test]
    fn corrupt_bytes_fail_to_decode() {
        let source = IconSource::Bytes(Cow::Owned(b"not a png".to_vec()));
        let err = load_icon(&source, IconSize::new(16, 16)).unwrap_err();
        assert!(matches!(err, TrayError::IconDecode(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nope.png");
        let err = load_icon(&IconSource::File(path.clone()), IconSize::new(16, 16)).unwrap_err();

        match err {
            TrayError::IconIo { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn icon_file_on_disk_loads() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("icon.png");
        std::fs::write(&path, DEFAULT_ICON).unwrap();

        let img = load_icon(&IconSource::File(path), IconSize::new(24, 24)).unwrap();
        assert_eq!(img.dimensions(), (24, 24));
    }

    #[test]
    fn zero_size_rejected() {
        let err = load_icon(&IconSource::default(), IconSize::new(0, 16)).unwrap_err();
        assert!(matches!(
            err,
            TrayError::InvalidIconSize {
                width: 0,
                height: 16
            }
        ));
    }
}

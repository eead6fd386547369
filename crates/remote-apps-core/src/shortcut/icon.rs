//! Icon lookup and normalization.
//!
//! An `Icon=` reference is resolved to a source image, then resampled into a
//! fixed 48x48 PNG:
//! - `*.png` references are used as-is
//! - bare names are looked up in the icon theme tree, 48 pixel variants only
//! - paths with another extension fall back to a sibling `.png`

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::IconConfig;
use crate::error::{RemoteAppsError, Result};

/// Resolves icon references against an icon theme tree.
#[derive(Debug, Clone)]
pub struct IconResolver {
    /// Root of the themed icon tree (`/usr/share/icons`).
    theme_root: PathBuf,
}

impl Default for IconResolver {
    fn default() -> Self {
        Self::new(IconConfig::THEME_ROOT)
    }
}

impl IconResolver {
    /// Create a new resolver searching the given theme root.
    pub fn new(theme_root: impl AsRef<Path>) -> Self {
        Self {
            theme_root: theme_root.as_ref().to_path_buf(),
        }
    }

    /// Get the theme root.
    pub fn theme_root(&self) -> &Path {
        &self.theme_root
    }

    /// Resolve a reference to a normalized 48x48 PNG.
    pub fn resolve(&self, reference: &str) -> Result<Vec<u8>> {
        let source = self.locate(reference)?;
        debug!("Resolved icon {} to {:?}", reference, source);
        normalize_icon(&source)
    }

    /// Find the source image file for a reference.
    pub fn locate(&self, reference: &str) -> Result<PathBuf> {
        let path = Path::new(reference);
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());

        match extension.as_deref() {
            Some(IconConfig::PORTABLE_EXTENSION) => Ok(path.to_path_buf()),
            // Reverse-DNS icon names ("org.gnome.Foo") have a dot but no
            // directory, so they are themed names too.
            None => self.find_themed(reference),
            Some(_) if path.parent().map_or(true, |p| p.as_os_str().is_empty()) => {
                self.find_themed(reference)
            }
            Some(_) => {
                let sibling = path.with_extension(IconConfig::PORTABLE_EXTENSION);
                if sibling.is_file() {
                    Ok(sibling)
                } else {
                    Err(RemoteAppsError::IconNotFound {
                        reference: reference.to_string(),
                    })
                }
            }
        }
    }

    /// Search `<root>/*/*/*/<name>.png` for a 48 pixel variant.
    fn find_themed(&self, name: &str) -> Result<PathBuf> {
        let file_name = format!("{}.{}", name, IconConfig::PORTABLE_EXTENSION);

        WalkDir::new(&self.theme_root)
            .min_depth(IconConfig::THEME_DEPTH)
            .max_depth(IconConfig::THEME_DEPTH)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy() == file_name)
            .map(|entry| entry.into_path())
            .find(|candidate| self.is_preferred_size(candidate))
            .ok_or_else(|| RemoteAppsError::IconNotFound {
                reference: name.to_string(),
            })
    }

    /// Whether a themed candidate is a 48 pixel variant.
    ///
    /// Only the part below the theme root is inspected, with a leading `/`
    /// so a top-level `48` directory still matches.
    fn is_preferred_size(&self, candidate: &Path) -> bool {
        let relative = candidate
            .strip_prefix(&self.theme_root)
            .unwrap_or(candidate);
        let relative = format!("/{}", relative.to_string_lossy());
        IconConfig::SIZE_MARKERS
            .iter()
            .any(|marker| relative.contains(marker))
    }
}

/// Decode an image file and stretch it onto a 48x48 canvas with bilinear
/// filtering, returning PNG bytes.
pub fn normalize_icon(source: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(source).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => RemoteAppsError::IconNotFound {
            reference: source.display().to_string(),
        },
        _ => RemoteAppsError::io_with_path(e, source),
    })?;

    let decoded = image::load_from_memory(&bytes).map_err(|e| RemoteAppsError::IconDecode {
        path: source.to_path_buf(),
        message: e.to_string(),
    })?;

    let resized = imageops::resize(
        &decoded.to_rgba8(),
        IconConfig::SIZE,
        IconConfig::SIZE,
        FilterType::Triangle,
    );

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(resized)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| RemoteAppsError::Other(format!("encode icon {:?}: {}", source, e)))?;

    Ok(png)
}

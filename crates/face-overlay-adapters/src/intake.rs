//! Filesystem intake for user-selected images.

use std::path::Path;

use anyhow::{Context, Result};
use face_overlay_core::LoadedImage;
use tracing::warn;

/// Extensions the file-picker hint covers. Advisory only - files with other
/// extensions still get a decode attempt, mirroring a non-enforcing
/// `accept` filter.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif", "tif", "tiff"];

/// Checks if a path carries a known image extension.
#[must_use]
pub fn is_image_candidate(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

/// Reads a user-selected file into a displayable image.
///
/// The raw bytes become the data-URL image source; the pixels are decoded
/// once, up front, so detection always operates on fully decoded data.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its contents are not a
/// decodable image.
pub fn load_image(path: impl AsRef<Path>) -> Result<LoadedImage> {
    let path = path.as_ref();

    if !is_image_candidate(path) {
        warn!("Unrecognized image extension: {}", path.display());
    }

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    LoadedImage::from_encoded(path.to_string_lossy().into_owned(), &bytes)
}

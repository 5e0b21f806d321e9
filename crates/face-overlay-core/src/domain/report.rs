//! Loaded images and per-image overlay reports.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::GenericImageView;
use serde::{Deserialize, Serialize};

use crate::overlay::RenderPlan;

/// Complete overlay outcome for a single image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayReport {
    /// Path of the source image.
    pub path: String,
    /// Timestamp of the run (RFC 3339).
    pub timestamp: String,
    /// Pixel dimensions of the decoded image, if one was loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<ImageDimensions>,
    /// What the display surface shows for this image.
    pub overlay: RenderPlan,
}

/// Pixel dimensions of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Creates dimensions from a width and height.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A user-selected image ready for display and detection.
///
/// Carries the displayable data-URL source alongside the decoded pixels the
/// detection engine operates on.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Path the image was selected from.
    pub path: String,
    /// Data URL of the original encoded bytes.
    pub source: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Decoded image data.
    pub image: image::DynamicImage,
}

impl LoadedImage {
    /// Builds a loaded image from the original encoded bytes.
    ///
    /// The data-URL source preserves the bytes exactly as read; the decoded
    /// pixels are what detection runs against.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a recognized image format or
    /// fail to decode.
    pub fn from_encoded(path: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let path = path.into();

        let format = image::guess_format(bytes)
            .with_context(|| format!("Unrecognized image data: {path}"))?;
        let image = image::load_from_memory(bytes)
            .with_context(|| format!("Failed to decode image: {path}"))?;
        let (width, height) = image.dimensions();

        let source = format!(
            "data:{};base64,{}",
            format.to_mime_type(),
            STANDARD.encode(bytes)
        );

        Ok(Self {
            path,
            source,
            width,
            height,
            image,
        })
    }

    /// Builds a loaded image from already-decoded pixels.
    ///
    /// The data-URL source is produced by re-encoding the pixels as PNG.
    /// Intended for synthetic images in tests.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn from_image(path: impl Into<String>, image: image::DynamicImage) -> Result<Self> {
        let path = path.into();

        let mut bytes = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .with_context(|| format!("Failed to encode image: {path}"))?;
        let (width, height) = image.dimensions();

        let source = format!("data:image/png;base64,{}", STANDARD.encode(&bytes));

        Ok(Self {
            path,
            source,
            width,
            height,
            image,
        })
    }

    /// Returns the pixel dimensions of the decoded image.
    #[must_use]
    pub const fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_image_builds_png_data_url() {
        let img = image::DynamicImage::new_rgb8(16, 8);
        let loaded = LoadedImage::from_image("synthetic://test", img).expect("encode");

        assert_eq!(loaded.width, 16);
        assert_eq!(loaded.height, 8);
        assert!(loaded.source.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_from_encoded_round_trips_dimensions() {
        let img = image::DynamicImage::new_rgb8(12, 34);
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode");

        let loaded = LoadedImage::from_encoded("test.png", &bytes).expect("decode");
        assert_eq!(loaded.dimensions(), ImageDimensions::new(12, 34));
        assert!(loaded.source.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_from_encoded_rejects_garbage() {
        let result = LoadedImage::from_encoded("bogus.bin", b"not an image");
        assert!(result.is_err());
    }
}

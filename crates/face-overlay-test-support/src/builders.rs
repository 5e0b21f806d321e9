//! Synthetic image builders for testing.

use face_overlay_core::{LoadedImage, RelativeBox};
use image::{DynamicImage, Rgb, RgbImage};

/// Builder for creating synthetic test images.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    /// Creates a portrait-like image: light background with a dark
    /// face-sized patch covering the center half of the frame.
    ///
    /// Returns the image together with the patch's relative box,
    /// `{left: 0.25, top: 0.25, width: 0.5, height: 0.5}`.
    #[must_use]
    pub fn portrait_fixture() -> (LoadedImage, RelativeBox) {
        let (width, height) = (256u32, 256u32);
        let region = RelativeBox::new(0.25, 0.25, 0.5, 0.5);

        let img = RgbImage::from_fn(width, height, |x, y| {
            let in_patch = x >= width / 4 && x < width * 3 / 4 && y >= height / 4 && y < height * 3 / 4;
            if in_patch {
                Rgb([96, 72, 60])
            } else {
                Rgb([220, 220, 220])
            }
        });

        (
            Self::loaded("synthetic://portrait", DynamicImage::ImageRgb8(img)),
            region,
        )
    }

    /// Creates a uniform RGB image.
    #[must_use]
    pub fn uniform(width: u32, height: u32, value: u8) -> LoadedImage {
        let img = RgbImage::from_pixel(width, height, Rgb([value, value, value]));
        Self::loaded("synthetic://uniform", DynamicImage::ImageRgb8(img))
    }

    /// Creates a tiny 2x2 image (minimal processable size).
    #[must_use]
    pub fn tiny() -> LoadedImage {
        Self::loaded("synthetic://2x2", DynamicImage::new_rgb8(2, 2))
    }

    /// Creates a saveable image with enough texture to survive any encoder.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            let r = ((x * 255) / width.max(1)) as u8;
            let g = ((y * 255) / height.max(1)) as u8;
            Rgb([r, g, 128])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[allow(clippy::expect_used)]
    fn loaded(path: &str, image: DynamicImage) -> LoadedImage {
        LoadedImage::from_image(path, image).expect("synthetic image encodes as PNG")
    }
}

//! SeetaFace detection backend.
//!
//! Wraps the `rustface` engine behind the core `FaceDetector` port. The
//! engine scans a grayscale buffer and reports pixel-space boxes; those are
//! normalized to the image's relative coordinate space here, so callers
//! never see pixel coordinates.

// Allow common image-math patterns
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

use std::path::Path;

use anyhow::{Context, Result};
use face_overlay_core::{
    Detection, DetectorOptions, DetectorProfile, FaceDetector, RelativeBox,
};
use tracing::debug;

use crate::models;

/// Sliding-window scan parameters for one detector profile.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScanParams {
    min_face_size: u32,
    score_thresh: f64,
    pyramid_scale_factor: f32,
    slide_window_step: (u32, u32),
}

/// Maps a profile to the engine's scan parameters.
const fn scan_params(profile: DetectorProfile) -> ScanParams {
    match profile {
        DetectorProfile::Fast => ScanParams {
            min_face_size: 40,
            score_thresh: 2.0,
            pyramid_scale_factor: 0.7,
            slide_window_step: (8, 8),
        },
        DetectorProfile::Standard => ScanParams {
            min_face_size: 20,
            score_thresh: 2.0,
            pyramid_scale_factor: 0.8,
            slide_window_step: (4, 4),
        },
    }
}

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// Holds the parsed face-locator model; a fresh engine instance is created
/// per call from a clone of the model, since the engine itself is not
/// shareable across threads.
pub struct SeetaFaceDetector {
    model: rustface::Model,
}

impl SeetaFaceDetector {
    /// Loads the face-locator bundle from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// SeetaFace model.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read model file: {}", path.display()))?;
        let model = rustface::read_model(std::io::Cursor::new(bytes)).map_err(|e| {
            anyhow::anyhow!("Failed to parse face-locator model {}: {e}", path.display())
        })?;

        Ok(Self { model })
    }

    /// Loads the face-locator bundle from the configured models directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundle is missing or unreadable.
    pub fn from_models_dir() -> Result<Self> {
        let path = models::model_path(models::FACE_LOCATOR)
            .ok_or_else(|| anyhow::anyhow!("Unknown model configuration"))?;
        Self::from_file(path)
    }
}

impl FaceDetector for SeetaFaceDetector {
    fn detect_faces(
        &self,
        image: &image::DynamicImage,
        options: &DetectorOptions,
    ) -> Result<Vec<Detection>> {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            anyhow::bail!("Image has zero dimensions");
        }

        let params = scan_params(options.profile);
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(params.min_face_size);
        detector.set_score_thresh(params.score_thresh);
        detector.set_pyramid_scale_factor(params.pyramid_scale_factor);
        detector.set_slide_window_step(params.slide_window_step.0, params.slide_window_step.1);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));
        debug!(
            faces = faces.len(),
            profile = ?options.profile,
            "seetaface scan complete"
        );

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                let region = to_relative(
                    bbox.x(),
                    bbox.y(),
                    bbox.width(),
                    bbox.height(),
                    width,
                    height,
                );
                Detection::new(region, face.score() as f32)
            })
            .collect())
    }
}

/// Normalizes a pixel-space box to fractions of the image dimensions.
fn to_relative(x: i32, y: i32, w: u32, h: u32, image_width: u32, image_height: u32) -> RelativeBox {
    let iw = image_width as f32;
    let ih = image_height as f32;
    RelativeBox::new(
        x as f32 / iw,
        y as f32 / ih,
        w as f32 / iw,
        h as f32 / ih,
    )
}

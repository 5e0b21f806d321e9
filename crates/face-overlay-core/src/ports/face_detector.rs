//! Face detection port - the external capability boundary.
//!
//! The detection algorithm (network architecture, weight format, non-max
//! suppression) is supplied by an external engine. Anything that can return
//! relative face boxes through this trait is substitutable.

use crate::domain::Detection;

/// Named configuration variants of the detection engine, trading accuracy
/// for speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetectorProfile {
    /// Low-latency scan with a coarse sliding window.
    #[default]
    Fast,
    /// Denser scan; slower, catches smaller faces.
    Standard,
}

/// Options for a single detection run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectorOptions {
    /// Engine profile to run with.
    pub profile: DetectorProfile,
}

/// Pluggable face detection engine.
pub trait FaceDetector: Send + Sync {
    /// Detects all faces in a decoded image.
    ///
    /// Returns one detection per face, each with a bounding region in the
    /// image's own relative coordinate space. An empty result means no
    /// faces were found and is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails.
    fn detect_faces(
        &self,
        image: &image::DynamicImage,
        options: &DetectorOptions,
    ) -> anyhow::Result<Vec<Detection>>;
}

//! Event-driven session state.
//!
//! Models the display surface's control flow as an explicit state machine:
//! model-bundle readiness, the currently selected image, and the outcome of
//! the latest detection attempt. All transitions happen on the caller's
//! thread; asynchronous completions are delivered as events tagged with a
//! request number, and completions for anything but the latest request are
//! discarded so only the most recent selection's result is ever shown.

use tracing::{debug, error, info, warn};

use crate::domain::{Detection, LoadedImage};
use crate::ports::DetectorOptions;

/// User-visible message when the inference call fails.
const DETECTION_FAILED_MESSAGE: &str = "Face detection failed. Check the logs for details.";

/// Readiness of the model bundles.
///
/// Starts `Loading` and transitions at most once; `Ready` never reverts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelPhase {
    /// Bundles are still being fetched or verified.
    Loading,
    /// Both bundles loaded; detection may run.
    Ready,
    /// A bundle failed to load; detection will never run this session.
    Failed(String),
}

/// Outcome of the most recent detection attempt.
///
/// Replaced atomically per attempt, so an error never coexists with boxes
/// from an earlier run.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionState {
    /// No attempt has run yet.
    Idle,
    /// An attempt is in flight.
    Pending {
        /// Request number of the in-flight attempt.
        request: u64,
    },
    /// The last attempt succeeded. An empty list means no faces were found,
    /// which is a valid outcome, not an error.
    Ready(Vec<Detection>),
    /// The last attempt failed.
    Failed {
        /// Generic user-visible message.
        message: String,
    },
}

/// One display surface's worth of state.
pub struct Session {
    options: DetectorOptions,
    models: ModelPhase,
    image: Option<LoadedImage>,
    detection: DetectionState,
    last_request: u64,
}

impl Session {
    /// Creates a session with models loading and nothing selected.
    #[must_use]
    pub const fn new(options: DetectorOptions) -> Self {
        Self {
            options,
            models: ModelPhase::Loading,
            image: None,
            detection: DetectionState::Idle,
            last_request: 0,
        }
    }

    /// Returns the model readiness phase.
    #[must_use]
    pub const fn models(&self) -> &ModelPhase {
        &self.models
    }

    /// Returns the currently selected image, if any.
    #[must_use]
    pub const fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    /// Returns the current displayed image source (data URL), if any.
    #[must_use]
    pub fn image_source(&self) -> Option<&str> {
        self.image.as_ref().map(|image| image.source.as_str())
    }

    /// Returns the outcome of the latest detection attempt.
    #[must_use]
    pub const fn detection(&self) -> &DetectionState {
        &self.detection
    }

    /// Returns the options every detection attempt runs with.
    #[must_use]
    pub const fn detector_options(&self) -> &DetectorOptions {
        &self.options
    }

    /// Marks both model bundles as loaded.
    ///
    /// Only meaningful while still `Loading`; later calls are ignored, so
    /// readiness never reverts.
    pub fn models_ready(&mut self) {
        if matches!(self.models, ModelPhase::Loading) {
            info!("model bundles loaded");
            self.models = ModelPhase::Ready;
        } else {
            debug!(phase = ?self.models, "ignoring readiness transition");
        }
    }

    /// Marks model loading as failed with a user-visible message.
    pub fn models_failed(&mut self, message: impl Into<String>) {
        if matches!(self.models, ModelPhase::Loading) {
            let message = message.into();
            warn!("model loading failed: {message}");
            self.models = ModelPhase::Failed(message);
        } else {
            debug!(phase = ?self.models, "ignoring failure transition");
        }
    }

    /// Replaces the displayed image wholesale.
    ///
    /// Previous detection results stay until the next attempt completes;
    /// the request sequence guarantees the final state reflects the latest
    /// selection.
    pub fn select_image(&mut self, image: LoadedImage) {
        debug!(path = %image.path, "image selected");
        self.image = Some(image);
    }

    /// Fires when the selected image has fully decoded.
    ///
    /// Returns the request number of the detection attempt to run, or
    /// `None` when the attempt is skipped: no image is selected, or the
    /// models are not ready. Skipped attempts are never retried; the user
    /// must re-trigger by selecting again.
    #[must_use]
    pub fn image_loaded(&mut self) -> Option<u64> {
        let Some(image) = self.image.as_ref() else {
            warn!("image load event with no image selected");
            return None;
        };

        match &self.models {
            ModelPhase::Ready => {}
            ModelPhase::Loading => {
                warn!(path = %image.path, "models not loaded yet, skipping detection");
                return None;
            }
            ModelPhase::Failed(_) => {
                warn!(path = %image.path, "models unavailable, skipping detection");
                return None;
            }
        }

        self.last_request += 1;
        self.detection = DetectionState::Pending {
            request: self.last_request,
        };
        Some(self.last_request)
    }

    /// Applies a detection completion.
    ///
    /// Completions for any request other than the latest issued are
    /// discarded. On success the detection set replaces the previous one
    /// entirely; on failure the cause is logged and a generic message is
    /// surfaced in place of any boxes.
    pub fn finish_detection(&mut self, request: u64, outcome: anyhow::Result<Vec<Detection>>) {
        if request != self.last_request {
            debug!(
                request,
                latest = self.last_request,
                "discarding stale detection result"
            );
            return;
        }

        match outcome {
            Ok(detections) => {
                debug!(faces = detections.len(), "detection completed");
                self.detection = DetectionState::Ready(detections);
            }
            Err(e) => {
                error!("face detection failed: {e:#}");
                self.detection = DetectionState::Failed {
                    message: DETECTION_FAILED_MESSAGE.to_string(),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RelativeBox;

    fn test_image(path: &str) -> LoadedImage {
        let img = image::DynamicImage::new_rgb8(64, 64);
        LoadedImage::from_image(path, img).expect("synthetic image encodes")
    }

    fn detection(left: f32) -> Detection {
        Detection::new(RelativeBox::new(left, 0.2, 0.3, 0.4), 0.9)
    }

    #[test]
    fn test_no_detection_before_models_ready() {
        let mut session = Session::new(DetectorOptions::default());
        session.select_image(test_image("a.png"));

        assert_eq!(session.image_loaded(), None);
        assert_eq!(*session.detection(), DetectionState::Idle);
    }

    #[test]
    fn test_skipped_attempt_is_not_retried_on_readiness() {
        let mut session = Session::new(DetectorOptions::default());
        session.select_image(test_image("a.png"));
        assert_eq!(session.image_loaded(), None);

        // Readiness arriving later does not resurrect the skipped attempt.
        session.models_ready();
        assert_eq!(*session.detection(), DetectionState::Idle);
    }

    #[test]
    fn test_no_detection_without_image() {
        let mut session = Session::new(DetectorOptions::default());
        session.models_ready();
        assert_eq!(session.image_loaded(), None);
    }

    #[test]
    fn test_no_detection_after_model_failure() {
        let mut session = Session::new(DetectorOptions::default());
        session.models_failed("bundles missing");
        session.select_image(test_image("a.png"));

        assert_eq!(session.image_loaded(), None);
    }

    #[test]
    fn test_readiness_never_reverts() {
        let mut session = Session::new(DetectorOptions::default());
        session.models_ready();
        session.models_failed("too late");

        assert_eq!(*session.models(), ModelPhase::Ready);
    }

    #[test]
    fn test_successful_detection_replaces_state() {
        let mut session = Session::new(DetectorOptions::default());
        session.models_ready();
        session.select_image(test_image("a.png"));

        let request = session.image_loaded().expect("models ready");
        session.finish_detection(request, Ok(vec![detection(0.1)]));

        match session.detection() {
            DetectionState::Ready(detections) => assert_eq!(detections.len(), 1),
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_detection_is_valid() {
        let mut session = Session::new(DetectorOptions::default());
        session.models_ready();
        session.select_image(test_image("a.png"));

        let request = session.image_loaded().expect("models ready");
        session.finish_detection(request, Ok(vec![]));

        assert_eq!(*session.detection(), DetectionState::Ready(vec![]));
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut session = Session::new(DetectorOptions::default());
        session.models_ready();

        session.select_image(test_image("a.png"));
        let first = session.image_loaded().expect("first request");

        session.select_image(test_image("b.png"));
        let second = session.image_loaded().expect("second request");

        // Second image's result lands first; the first resolves late.
        session.finish_detection(second, Ok(vec![detection(0.5)]));
        session.finish_detection(first, Ok(vec![detection(0.1)]));

        match session.detection() {
            DetectionState::Ready(detections) => {
                assert_eq!(detections.len(), 1);
                assert_eq!(detections[0].region.left, 0.5);
            }
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_replaces_previous_boxes() {
        let mut session = Session::new(DetectorOptions::default());
        session.models_ready();
        session.select_image(test_image("a.png"));

        let request = session.image_loaded().expect("first request");
        session.finish_detection(request, Ok(vec![detection(0.1)]));

        session.select_image(test_image("b.png"));
        let request = session.image_loaded().expect("second request");
        session.finish_detection(request, Err(anyhow::anyhow!("engine exploded")));

        match session.detection() {
            DetectionState::Failed { message } => {
                assert!(!message.is_empty());
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_image_source_is_replaced_wholesale() {
        let mut session = Session::new(DetectorOptions::default());
        session.select_image(test_image("a.png"));
        let first = session.image_source().map(str::to_owned);

        let other = image::DynamicImage::new_rgb8(32, 16);
        session.select_image(LoadedImage::from_image("b.png", other).expect("encodes"));

        assert_eq!(session.image().map(|i| i.path.as_str()), Some("b.png"));
        assert_ne!(session.image_source().map(str::to_owned), first);
    }
}

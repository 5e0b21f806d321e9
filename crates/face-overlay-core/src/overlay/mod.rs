//! Overlay rendering - a pure projection of session state.
//!
//! The render plan is what a display surface draws: a loading placeholder
//! until both an image and the models are in place, an explicit failure
//! notice when the bundles could not load, or the image view with
//! percentage-positioned rectangles for each detected face.

use serde::{Deserialize, Serialize};

use crate::domain::OverlayRect;
use crate::session::{DetectionState, ModelPhase, Session};

/// What the display surface should show for the current session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RenderPlan {
    /// Models are still loading, or no image has been chosen yet.
    Loading,
    /// Model bundles could not be loaded; detection will never run.
    ModelsFailed {
        /// User-visible failure message.
        message: String,
    },
    /// The image with its overlay rectangles.
    View {
        /// One rectangle per detected face, positioned above the image.
        rects: Vec<OverlayRect>,
        /// Failure message from the latest attempt, if it failed.
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

/// Projects the current session state into a render plan.
#[must_use]
pub fn render(session: &Session) -> RenderPlan {
    if let ModelPhase::Failed(message) = session.models() {
        return RenderPlan::ModelsFailed {
            message: message.clone(),
        };
    }

    if session.image().is_none() || *session.models() != ModelPhase::Ready {
        return RenderPlan::Loading;
    }

    match session.detection() {
        DetectionState::Idle | DetectionState::Pending { .. } => RenderPlan::View {
            rects: Vec::new(),
            error: None,
        },
        DetectionState::Ready(detections) => RenderPlan::View {
            rects: detections
                .iter()
                .map(|detection| OverlayRect::from_region(&detection.region))
                .collect(),
            error: None,
        },
        DetectionState::Failed { message } => RenderPlan::View {
            rects: Vec::new(),
            error: Some(message.clone()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Detection, LoadedImage, RelativeBox};
    use crate::ports::DetectorOptions;

    fn test_image() -> LoadedImage {
        let img = image::DynamicImage::new_rgb8(64, 64);
        LoadedImage::from_image("test.png", img).expect("synthetic image encodes")
    }

    #[test]
    fn test_loading_until_image_and_models() {
        let mut session = Session::new(DetectorOptions::default());
        assert_eq!(render(&session), RenderPlan::Loading);

        // Image alone is not enough.
        session.select_image(test_image());
        assert_eq!(render(&session), RenderPlan::Loading);

        // Ready models with no image is not enough either.
        let mut other = Session::new(DetectorOptions::default());
        other.models_ready();
        assert_eq!(render(&other), RenderPlan::Loading);
    }

    #[test]
    fn test_models_failed_is_surfaced() {
        let mut session = Session::new(DetectorOptions::default());
        session.models_failed("bundles missing");

        match render(&session) {
            RenderPlan::ModelsFailed { message } => assert_eq!(message, "bundles missing"),
            other => panic!("expected ModelsFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_view_with_no_detections_has_no_rects() {
        let mut session = Session::new(DetectorOptions::default());
        session.models_ready();
        session.select_image(test_image());

        let request = session.image_loaded().expect("models ready");
        session.finish_detection(request, Ok(vec![]));

        assert_eq!(
            render(&session),
            RenderPlan::View {
                rects: vec![],
                error: None
            }
        );
    }

    #[test]
    fn test_view_maps_detection_to_percentages() {
        let mut session = Session::new(DetectorOptions::default());
        session.models_ready();
        session.select_image(test_image());

        let request = session.image_loaded().expect("models ready");
        let region = RelativeBox::new(0.25, 0.25, 0.5, 0.5);
        session.finish_detection(request, Ok(vec![Detection::new(region, 0.95)]));

        match render(&session) {
            RenderPlan::View { rects, error } => {
                assert_eq!(error, None);
                assert_eq!(rects.len(), 1);
                assert_eq!(rects[0].left, "25.00%");
                assert_eq!(rects[0].top, "25.00%");
                assert_eq!(rects[0].width, "50.00%");
                assert_eq!(rects[0].height, "50.00%");
            }
            other => panic!("expected View, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_attempt_shows_error_without_rects() {
        let mut session = Session::new(DetectorOptions::default());
        session.models_ready();
        session.select_image(test_image());

        let request = session.image_loaded().expect("models ready");
        session.finish_detection(request, Ok(vec![Detection::new(
            RelativeBox::new(0.1, 0.1, 0.2, 0.2),
            0.9,
        )]));

        // A later failing attempt replaces the boxes with the error.
        let request = session.image_loaded().expect("models ready");
        session.finish_detection(request, Err(anyhow::anyhow!("engine exploded")));

        match render(&session) {
            RenderPlan::View { rects, error } => {
                assert!(rects.is_empty());
                assert!(error.is_some());
            }
            other => panic!("expected View, got {other:?}"),
        }
    }

    #[test]
    fn test_render_plan_serializes_with_state_tag() {
        let plan = RenderPlan::View {
            rects: vec![OverlayRect::from_region(&RelativeBox::new(0.1, 0.2, 0.3, 0.4))],
            error: None,
        };
        let json = serde_json::to_value(&plan).expect("serialize");

        assert_eq!(json["state"], "view");
        assert_eq!(json["rects"][0]["left"], "10.00%");
        assert!(json.get("error").is_none());
    }
}

//! Face Overlay Core - Domain logic and session state
//!
//! This crate contains the core domain types, the detector port, the
//! event-driven session state machine, and the overlay renderer that maps
//! detected face regions to percentage-positioned rectangles.

pub mod domain;
pub mod overlay;
pub mod ports;
pub mod session;

pub use domain::{
    Detection, ImageDimensions, LoadedImage, OverlayRect, OverlayReport, RelativeBox,
};
pub use overlay::RenderPlan;
pub use ports::{
    DetectorOptions, DetectorProfile, FaceDetector, ProgressEvent, ProgressSink, ReportOutput,
};
pub use session::{DetectionState, ModelPhase, Session};

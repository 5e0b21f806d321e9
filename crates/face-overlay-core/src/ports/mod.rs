//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the domain core and external
//! adapters, including the face detection capability itself.

mod face_detector;
mod progress;
mod report_output;

pub use face_detector::{DetectorOptions, DetectorProfile, FaceDetector};
pub use progress::{ProgressEvent, ProgressSink};
pub use report_output::ReportOutput;

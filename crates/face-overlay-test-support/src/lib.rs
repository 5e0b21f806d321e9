//! Test support utilities for face-overlay.
//!
//! Provides a scripted stand-in for the detection capability, mocks for the
//! progress and output ports, and synthetic image builders.
//!
//! # Example
//!
//! ```
//! use face_overlay_test_support::{ScriptedDetector, SyntheticImageBuilder};
//!
//! // A fixture image with a face patch at a known relative box
//! let (image, region) = SyntheticImageBuilder::portrait_fixture();
//!
//! // A detector that reports exactly that box
//! let detector = ScriptedDetector::new();
//! detector.push_success(vec![face_overlay_core::Detection::new(region, 0.99)]);
//! ```

mod builders;
mod mocks;

pub use builders::SyntheticImageBuilder;
pub use mocks::{MockProgressSink, MockReportOutput, ScriptedDetector};

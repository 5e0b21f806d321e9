//! Face Overlay Adapters - External adapters for face-overlay.
//!
//! This crate provides adapters for:
//! - Filesystem image intake (file to data URL plus decoded pixels)
//! - Model bundle downloading and caching
//! - The SeetaFace detection backend

pub mod detector;
pub mod intake;
pub mod models;

pub use detector::SeetaFaceDetector;
pub use intake::load_image;
pub use models::{model_path, models_dir, set_models_dir};

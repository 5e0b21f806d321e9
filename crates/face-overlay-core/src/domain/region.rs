//! Detection regions and their rendered overlay form.

use serde::{Deserialize, Serialize};

/// A face bounding region in normalized image coordinates.
///
/// All fields are fractions (0.0 to 1.0) of the source image's own
/// width/height, making the region resolution-independent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeBox {
    /// Distance from the image's left edge.
    pub left: f32,
    /// Distance from the image's top edge.
    pub top: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
}

impl RelativeBox {
    /// Creates a relative box with every field clamped to 0.0..=1.0.
    #[must_use]
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left: left.clamp(0.0, 1.0),
            top: top.clamp(0.0, 1.0),
            width: width.clamp(0.0, 1.0),
            height: height.clamp(0.0, 1.0),
        }
    }
}

/// A single detected face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding region in the image's relative coordinate space.
    pub region: RelativeBox,
    /// Confidence score reported by the detection engine.
    pub score: f32,
}

impl Detection {
    /// Creates a detection from a region and engine score.
    #[must_use]
    pub const fn new(region: RelativeBox, score: f32) -> Self {
        Self { region, score }
    }
}

/// An overlay rectangle positioned with CSS-style percentage offsets.
///
/// Each field is a two-decimal percentage of the displayed image box, so a
/// `left` fraction of 0.1 renders as `"10.00%"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayRect {
    /// Offset from the image's left edge.
    pub left: String,
    /// Offset from the image's top edge.
    pub top: String,
    /// Rectangle width.
    pub width: String,
    /// Rectangle height.
    pub height: String,
}

impl OverlayRect {
    /// Maps a relative region to its percentage-positioned rectangle.
    #[must_use]
    pub fn from_region(region: &RelativeBox) -> Self {
        Self {
            left: percent(region.left),
            top: percent(region.top),
            width: percent(region.width),
            height: percent(region.height),
        }
    }
}

/// Formats a 0.0..=1.0 fraction as a percentage with exactly two decimals.
fn percent(fraction: f32) -> String {
    format!("{:.2}%", fraction * 100.0)
}

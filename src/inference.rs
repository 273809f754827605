// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! The inference-backend seam.
//!
//! The predictor never talks to an inference engine directly; it drives an
//! [`InferenceSession`] produced by a model descriptor. Engine bindings
//! (ONNX Runtime, `CoreML`, `TFLite`, ...) live behind this trait in their
//! own crates.

use crate::error::Result;
use crate::frame::Frame;

/// Image-fitting policy the backend must apply before inference.
///
/// The policy changes how normalized keypoint coordinates map back onto the
/// source frame, so the predictor passes it to the session on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleMode {
    /// Stretch the frame to the model input size without preserving aspect
    /// ratio or cropping.
    ScaleFill,
    /// Letterbox the frame into the model input size, preserving aspect
    /// ratio and padding the remainder.
    ScaleFit,
}

/// A single point reported by the inference backend.
///
/// Coordinates are normalized to the model input, x and y in roughly [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedPoint {
    /// Keypoint identifier (e.g. "nose", "left_wrist").
    pub identifier: String,
    /// Normalized x coordinate.
    pub x: f32,
    /// Normalized y coordinate.
    pub y: f32,
    /// Detection confidence in [0, 1].
    pub confidence: f32,
}

impl RecognizedPoint {
    /// Create a new recognized point.
    #[must_use]
    pub fn new(identifier: impl Into<String>, x: f32, y: f32, confidence: f32) -> Self {
        Self {
            identifier: identifier.into(),
            x,
            y,
            confidence,
        }
    }
}

/// A compiled model ready to run on frames.
///
/// `Send` so one predictor can be driven from a camera callback thread while
/// another thread observes it.
pub trait InferenceSession: Send {
    /// Run the model on one frame.
    ///
    /// Returns one point set per detected subject, zero or more sets per
    /// frame. Within one set, identifiers are unique.
    ///
    /// # Errors
    ///
    /// Returns [`PredictorError::Inference`](crate::PredictorError::Inference)
    /// when the engine rejects or fails on the frame.
    fn run(&mut self, frame: &Frame, scale: ScaleMode) -> Result<Vec<Vec<RecognizedPoint>>>;
}

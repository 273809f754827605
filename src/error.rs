// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the predictor library.

use std::fmt;

use crate::task::Task;

/// Result type alias for predictor operations.
pub type Result<T> = std::result::Result<T, PredictorError>;

/// Main error type for the predictor library.
#[derive(Debug)]
pub enum PredictorError {
    /// The model descriptor declares a task this predictor cannot serve.
    InvalidTask {
        /// Task the predictor requires.
        expected: Task,
        /// Task the model descriptor declared.
        actual: Task,
    },
    /// Error loading or compiling the model.
    ModelLoad(String),
    /// Error during a single inference run.
    Inference(String),
    /// Malformed frame material.
    Frame(String),
    /// Wrapped `std::io::Error`.
    Io(std::io::Error),
}

impl fmt::Display for PredictorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTask { expected, actual } => {
                write!(f, "Invalid task: expected {expected}, got {actual}")
            }
            Self::ModelLoad(msg) => write!(f, "Model load error: {msg}"),
            Self::Inference(msg) => write!(f, "Inference error: {msg}"),
            Self::Frame(msg) => write!(f, "Frame error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for PredictorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PredictorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for PredictorError {
    fn from(err: image::ImageError) -> Self {
        Self::Frame(err.to_string())
    }
}

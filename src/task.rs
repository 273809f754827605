// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Task declarations for model descriptors.
//!
//! A model descriptor declares the task its weights were trained for; the
//! predictor refuses any model whose task does not produce keypoints.

use std::fmt;
use std::str::FromStr;

/// Tasks a model descriptor can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Object detection - predicts bounding boxes and class labels.
    Detect,
    /// Instance segmentation - predicts masks for each detected object.
    Segment,
    /// Pose estimation - predicts keypoints for detected subjects.
    Pose,
    /// Image classification - predicts class probabilities for the entire image.
    Classify,
    /// Oriented bounding box detection - predicts rotated bounding boxes.
    Obb,
}

impl Task {
    /// Returns the string representation used in model metadata.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Detect => "detect",
            Self::Segment => "segment",
            Self::Pose => "pose",
            Self::Classify => "classify",
            Self::Obb => "obb",
        }
    }

    /// Returns whether models of this task report per-detection keypoints.
    #[must_use]
    pub const fn has_keypoints(&self) -> bool {
        matches!(self, Self::Pose)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Task {
    type Err = TaskParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "detect" | "detection" => Ok(Self::Detect),
            "segment" | "segmentation" => Ok(Self::Segment),
            "pose" | "keypoint" | "keypoints" => Ok(Self::Pose),
            "classify" | "classification" | "cls" => Ok(Self::Classify),
            "obb" | "oriented" => Ok(Self::Obb),
            _ => Err(TaskParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid task string.
#[derive(Debug, Clone)]
pub struct TaskParseError(String);

impl fmt::Display for TaskParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid task '{}', expected one of: detect, segment, pose, classify, obb",
            self.0
        )
    }
}

impl std::error::Error for TaskParseError {}

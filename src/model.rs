// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Model descriptors.
//!
//! A [`PoseModel`] is the external collaborator that knows where model
//! weights live and how to compile them into a runnable
//! [`InferenceSession`]. The predictor only asks two things of it: the task
//! it was trained for, and a loaded session.

use crate::error::Result;
use crate::inference::InferenceSession;
use crate::task::Task;

/// Descriptor for a pose estimation model.
///
/// # Example
///
/// ```no_run
/// use pose_predictor::{InferenceSession, PoseModel, PredictorError, Result, Task};
///
/// struct OnnxPoseModel {
///     path: std::path::PathBuf,
/// }
///
/// impl PoseModel for OnnxPoseModel {
///     fn task(&self) -> Task {
///         Task::Pose
///     }
///
///     fn load(&self) -> Result<Box<dyn InferenceSession>> {
///         // Hand the weights to an engine binding here.
///         Err(PredictorError::ModelLoad(format!(
///             "no engine available for {}",
///             self.path.display()
///         )))
///     }
/// }
/// ```
pub trait PoseModel {
    /// The task this model was trained for.
    fn task(&self) -> Task;

    /// Load and compile the model into a runnable inference session.
    ///
    /// # Errors
    ///
    /// Returns [`PredictorError::ModelLoad`](crate::PredictorError::ModelLoad)
    /// when the weights cannot be loaded or compiled by the backend.
    fn load(&self) -> Result<Box<dyn InferenceSession>>;
}

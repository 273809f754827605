// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]

//! # Pose Predictor
//!
//! Frame-at-a-time pose estimation glue for continuous camera feeds,
//! written in Rust. The crate wires a pre-trained pose model into a video
//! pipeline and republishes three signals per completed frame: the detected
//! keypoints, the smoothed inference latency, and the smoothed frame rate.
//!
//! ## Features
//!
//! - **Drop-if-busy admission** - at most one frame is ever in flight;
//!   frames arriving while inference runs are dropped, never queued, so a
//!   fast camera cannot build a latency backlog
//! - **Smoothed timing** - inference latency and frame rate pass through
//!   exponential-moving-average filters before they are reported
//! - **Typed keypoints** - raw backend point records become
//!   identifier-keyed [`PoseObservation`] values with screen-space
//!   projection and skeleton segments for overlays
//! - **Engine-agnostic** - any inference engine fits behind the
//!   [`PoseModel`] / [`InferenceSession`] traits
//!
//! ## Quick Start
//!
//! ```no_run
//! use pose_predictor::{
//!     Frame, FramePredictor, InferenceSession, PoseModel, RecognizedPoint, Result, ScaleMode,
//!     Task,
//! };
//!
//! struct StubModel;
//! struct StubSession;
//!
//! impl InferenceSession for StubSession {
//!     fn run(&mut self, _frame: &Frame, _scale: ScaleMode) -> Result<Vec<Vec<RecognizedPoint>>> {
//!         Ok(vec![vec![RecognizedPoint::new("nose", 0.5, 0.3, 0.9)]])
//!     }
//! }
//!
//! impl PoseModel for StubModel {
//!     fn task(&self) -> Task {
//!         Task::Pose
//!     }
//!
//!     fn load(&self) -> Result<Box<dyn InferenceSession>> {
//!         Ok(Box::new(StubSession))
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let predictor = FramePredictor::new(&StubModel, (1170, 2532))?;
//!     let frame = Frame::from_raw(640, 640, vec![0; 640 * 640 * 3])?;
//!
//!     predictor.predict(
//!         &frame,
//!         Some(&mut |poses| println!("{} subjects", poses.len())),
//!         Some(&mut |ms| println!("inference {ms:.1} ms")),
//!         Some(&mut |fps| println!("{fps:.1} fps")),
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`predictor`] | Core [`FramePredictor`] with admission and timing |
//! | [`model`] | [`PoseModel`] descriptor trait |
//! | [`inference`] | [`InferenceSession`] backend seam, [`ScaleMode`] |
//! | [`frame`] | [`Frame`] input material and conversions |
//! | [`results`] | Output types ([`PoseObservation`], [`Point`]) |
//! | [`skeleton`] | COCO-Pose keypoint identifiers and edges |
//! | [`task`] | Model task types ([`Task`]) |
//! | [`error`] | Error types ([`PredictorError`], [`Result`]) |
//! | [`logging`] | Verbosity flag backing the logging macros |
//!
//! ## License
//!
//! This project is licensed under [AGPL-3.0](https://www.gnu.org/licenses/agpl-3.0.html)
//! for open-source use.

// Modules
pub mod error;
pub mod frame;
pub mod inference;
pub mod logging;
pub mod model;
pub mod predictor;
pub mod results;
pub mod skeleton;
pub mod task;

// Re-export main types for convenience
pub use error::{PredictorError, Result};
pub use frame::Frame;
pub use inference::{InferenceSession, RecognizedPoint, ScaleMode};
pub use model::PoseModel;
pub use predictor::FramePredictor;
pub use results::{Point, PoseObservation};
pub use task::Task;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

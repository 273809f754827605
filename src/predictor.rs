// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Frame-at-a-time pose prediction.
//!
//! This module provides the main [`FramePredictor`] struct, which feeds
//! frames into a loaded pose model one at a time and republishes keypoint
//! output, smoothed inference latency, and smoothed frame rate to per-call
//! listeners.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::error::{PredictorError, Result};
use crate::frame::Frame;
use crate::inference::{InferenceSession, RecognizedPoint, ScaleMode};
use crate::model::PoseModel;
use crate::results::PoseObservation;
use crate::task::Task;

/// Smoothing factor shared by both timing filters.
const SMOOTHING: f64 = 0.05;

/// Raw latencies at or above this ceiling are discarded from the latency
/// filter; a first-call stall would otherwise corrupt the average.
const MAX_VALID_INFERENCE_SECS: f64 = 10.0;

/// Exponentially smoothed timing signals, updated once per completed frame.
#[derive(Debug)]
struct TimingState {
    smoothed_inference_secs: f64,
    smoothed_frame_interval_secs: f64,
    last_frame_at: Instant,
}

impl TimingState {
    fn new() -> Self {
        Self {
            smoothed_inference_secs: 0.0,
            smoothed_frame_interval_secs: 0.0,
            last_frame_at: Instant::now(),
        }
    }

    /// Fold one raw latency sample into the latency filter.
    fn record_inference(&mut self, raw_secs: f64) {
        if raw_secs < MAX_VALID_INFERENCE_SECS {
            self.smoothed_inference_secs =
                raw_secs * SMOOTHING + self.smoothed_inference_secs * (1.0 - SMOOTHING);
        }
    }

    /// Fold the elapsed inter-frame interval into the interval filter and
    /// restart it. The interval filter has no ceiling.
    fn record_frame(&mut self) {
        self.fold_interval(self.last_frame_at.elapsed().as_secs_f64());
        self.last_frame_at = Instant::now();
    }

    fn fold_interval(&mut self, interval_secs: f64) {
        self.smoothed_frame_interval_secs =
            interval_secs * SMOOTHING + self.smoothed_frame_interval_secs * (1.0 - SMOOTHING);
    }

    fn inference_millis(&self) -> f64 {
        self.smoothed_inference_secs * 1000.0
    }

    /// `None` while the interval accumulator is zero; reporting a rate from
    /// it would divide by zero.
    fn fps(&self) -> Option<f64> {
        if self.smoothed_frame_interval_secs > 0.0 {
            Some(1.0 / self.smoothed_frame_interval_secs)
        } else {
            None
        }
    }
}

/// Releases the in-flight slot on every exit path.
struct SlotGuard<'a>(&'a AtomicBool);

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Frame-at-a-time pose predictor.
///
/// Holds one [`InferenceSession`] and processes at most one frame at a
/// time: a frame arriving while another is in flight is dropped, not
/// queued. This is the intended backpressure policy for continuous camera
/// feeds that outpace inference.
///
/// The predictor is `Send + Sync`; a camera callback thread can submit
/// frames while another thread reads the smoothed timing accessors.
///
/// # Example
///
/// ```no_run
/// use pose_predictor::{Frame, FramePredictor, PoseModel};
///
/// fn run(model: &dyn PoseModel, frame: &Frame) -> pose_predictor::Result<()> {
///     let predictor = FramePredictor::new(model, (1170, 2532))?;
///     predictor.predict(
///         frame,
///         Some(&mut |poses| println!("{} subjects", poses.len())),
///         Some(&mut |ms| println!("inference {ms:.1} ms")),
///         Some(&mut |fps| println!("{fps:.1} fps")),
///     );
///     Ok(())
/// }
/// ```
pub struct FramePredictor {
    /// Loaded inference session.
    session: Mutex<Box<dyn InferenceSession>>,
    /// Timing filters, mutated only on the completion path.
    timing: Mutex<TimingState>,
    /// The single-slot admission guard.
    in_flight: AtomicBool,
    /// Display size of the consuming surface.
    screen_size: (u32, u32),
    /// Image-fitting policy passed to the session on every run.
    scale_mode: ScaleMode,
}

impl FramePredictor {
    /// Create a predictor from a model descriptor.
    ///
    /// # Arguments
    ///
    /// * `model` - Descriptor for a pose estimation model.
    /// * `screen_size` - Display size (width, height) of the consuming
    ///   surface, kept for screen-space projection by consumers.
    ///
    /// # Errors
    ///
    /// Returns [`PredictorError::InvalidTask`] unless the model's declared
    /// task is [`Task::Pose`], or [`PredictorError::ModelLoad`] if the
    /// backend cannot load the model.
    pub fn new(model: &dyn PoseModel, screen_size: (u32, u32)) -> Result<Self> {
        let actual = model.task();
        if actual != Task::Pose {
            return Err(PredictorError::InvalidTask {
                expected: Task::Pose,
                actual,
            });
        }

        let session = model.load()?;

        Ok(Self {
            session: Mutex::new(session),
            timing: Mutex::new(TimingState::new()),
            in_flight: AtomicBool::new(false),
            screen_size,
            scale_mode: ScaleMode::ScaleFill,
        })
    }

    /// Submit one frame for prediction.
    ///
    /// Fire-and-forget: results are delivered through the listeners, not a
    /// return value. Each listener is invoked at most once per completed
    /// frame, on the calling thread, after the in-flight slot has been
    /// released.
    ///
    /// The frame is silently dropped when another frame is in flight or
    /// when the frame is empty; no listener is invoked and no state
    /// changes. A backend failure is logged, forfeits the frame's results,
    /// and leaves the timing filters untouched.
    ///
    /// # Arguments
    ///
    /// * `frame` - The frame to run inference on.
    /// * `on_results` - Receives one [`PoseObservation`] per detected
    ///   subject, in backend order.
    /// * `on_inference_time` - Receives the smoothed inference time in
    ///   milliseconds.
    /// * `on_fps_rate` - Receives the smoothed frame rate. Not invoked
    ///   while the interval filter is empty.
    pub fn predict(
        &self,
        frame: &Frame,
        on_results: Option<&mut dyn FnMut(&[PoseObservation])>,
        on_inference_time: Option<&mut dyn FnMut(f64)>,
        on_fps_rate: Option<&mut dyn FnMut(f64)>,
    ) {
        if frame.is_empty() {
            crate::verbose!("Dropping frame: empty frame");
            return;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            crate::verbose!("Dropping frame: predictor busy");
            return;
        }

        // The slot is released inside run_guarded, before any listener fires.
        let Some((point_sets, raw_secs)) = self.run_guarded(frame) else {
            return;
        };

        let observations: Vec<PoseObservation> = point_sets
            .iter()
            .map(|points| PoseObservation::from_points(points))
            .collect();
        if let Some(listener) = on_results {
            listener(&observations);
        }

        let (millis, fps) = {
            let mut timing = lock_unpoisoned(&self.timing);
            timing.record_inference(raw_secs);
            timing.record_frame();
            (timing.inference_millis(), timing.fps())
        };
        if let Some(listener) = on_inference_time {
            listener(millis);
        }
        if let Some(listener) = on_fps_rate {
            if let Some(fps) = fps {
                listener(fps);
            }
        }
    }

    /// Run the session while holding the in-flight slot.
    ///
    /// Returns the raw point sets and the raw latency in seconds, or `None`
    /// on backend failure. The slot is released on every exit path.
    fn run_guarded(&self, frame: &Frame) -> Option<(Vec<Vec<RecognizedPoint>>, f64)> {
        let _slot = SlotGuard(&self.in_flight);

        let t0 = Instant::now();
        let outcome = lock_unpoisoned(&self.session).run(frame, self.scale_mode);
        let raw_secs = t0.elapsed().as_secs_f64();

        match outcome {
            Ok(point_sets) => Some((point_sets, raw_secs)),
            Err(e) => {
                crate::error!("Pose estimation error: {e}");
                None
            }
        }
    }

    /// Display size of the consuming surface, as passed at construction.
    #[must_use]
    pub const fn screen_size(&self) -> (u32, u32) {
        self.screen_size
    }

    /// The image-fitting policy the session is asked to apply. Always
    /// [`ScaleMode::ScaleFill`]: keypoint consumers rely on the frame being
    /// stretched, not cropped, when interpreting normalized coordinates.
    #[must_use]
    pub const fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    /// Smoothed inference time in milliseconds, as last reported.
    #[must_use]
    pub fn smoothed_inference_time(&self) -> f64 {
        lock_unpoisoned(&self.timing).inference_millis()
    }

    /// Smoothed frame rate, `None` before the first completed frame.
    #[must_use]
    pub fn current_fps(&self) -> Option<f64> {
        lock_unpoisoned(&self.timing).fps()
    }
}

impl std::fmt::Debug for FramePredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramePredictor")
            .field("screen_size", &self.screen_size)
            .field("scale_mode", &self.scale_mode)
            .field("busy", &self.in_flight.load(Ordering::Relaxed))
            .finish()
    }
}

// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Integration tests for the frame predictor

use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use pose_predictor::{
    Frame, FramePredictor, InferenceSession, Point, PoseModel, PoseObservation, PredictorError,
    RecognizedPoint, Result, ScaleMode, Task,
};

const SCREEN: (u32, u32) = (1170, 2532);

fn test_frame() -> Frame {
    Frame::from_raw(64, 48, vec![0; 64 * 48 * 3]).unwrap()
}

/// Model descriptor handing out a pre-built session exactly once.
struct OnceModel {
    task: Task,
    session: Mutex<Option<Box<dyn InferenceSession>>>,
}

impl OnceModel {
    fn new(task: Task, session: Box<dyn InferenceSession>) -> Self {
        Self {
            task,
            session: Mutex::new(Some(session)),
        }
    }
}

impl PoseModel for OnceModel {
    fn task(&self) -> Task {
        self.task
    }

    fn load(&self) -> Result<Box<dyn InferenceSession>> {
        self.session
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| PredictorError::ModelLoad("session already consumed".to_string()))
    }
}

/// Model descriptor whose load always fails.
struct FailingModel;

impl PoseModel for FailingModel {
    fn task(&self) -> Task {
        Task::Pose
    }

    fn load(&self) -> Result<Box<dyn InferenceSession>> {
        Err(PredictorError::ModelLoad("compile failed".to_string()))
    }
}

/// Session returning the same point sets on every run.
struct StaticSession {
    point_sets: Vec<Vec<RecognizedPoint>>,
}

impl InferenceSession for StaticSession {
    fn run(&mut self, _frame: &Frame, _scale: ScaleMode) -> Result<Vec<Vec<RecognizedPoint>>> {
        Ok(self.point_sets.clone())
    }
}

/// Session blocking inside its first run until released.
struct BlockingSession {
    entered: Sender<()>,
    release: Receiver<()>,
    blocked_once: bool,
}

impl InferenceSession for BlockingSession {
    fn run(&mut self, _frame: &Frame, _scale: ScaleMode) -> Result<Vec<Vec<RecognizedPoint>>> {
        if !self.blocked_once {
            self.blocked_once = true;
            self.entered.send(()).unwrap();
            self.release.recv().unwrap();
        }
        Ok(vec![])
    }
}

/// Session failing on the first run, succeeding afterwards.
struct FlakySession {
    calls: usize,
}

impl InferenceSession for FlakySession {
    fn run(&mut self, _frame: &Frame, _scale: ScaleMode) -> Result<Vec<Vec<RecognizedPoint>>> {
        self.calls += 1;
        if self.calls == 1 {
            Err(PredictorError::Inference(
                "backend rejected the frame".to_string(),
            ))
        } else {
            Ok(vec![vec![RecognizedPoint::new("nose", 0.5, 0.5, 1.0)]])
        }
    }
}

/// Session sleeping a scripted latency per call.
struct SleepySession {
    latencies: Vec<Duration>,
    calls: usize,
}

impl InferenceSession for SleepySession {
    fn run(&mut self, _frame: &Frame, _scale: ScaleMode) -> Result<Vec<Vec<RecognizedPoint>>> {
        let latency = self.latencies[self.calls.min(self.latencies.len() - 1)];
        self.calls += 1;
        thread::sleep(latency);
        Ok(vec![vec![RecognizedPoint::new("nose", 0.5, 0.5, 1.0)]])
    }
}

#[test]
fn test_construction_rejects_non_pose_task() {
    let model = OnceModel::new(
        Task::Detect,
        Box::new(StaticSession { point_sets: vec![] }),
    );

    // Always InvalidTask, never a partial predictor.
    for _ in 0..2 {
        let err = FramePredictor::new(&model, SCREEN).unwrap_err();
        assert!(matches!(err, PredictorError::InvalidTask { .. }));
    }
}

#[test]
fn test_construction_surfaces_load_failure() {
    let err = FramePredictor::new(&FailingModel, SCREEN).unwrap_err();
    assert!(matches!(err, PredictorError::ModelLoad(_)));
}

#[test]
fn test_predict_maps_points_to_keyed_observations() {
    let points = vec![
        RecognizedPoint::new("nose", 0.5, 0.3, 0.9),
        RecognizedPoint::new("left_eye", 0.4, 0.25, 0.8),
    ];
    let model = OnceModel::new(
        Task::Pose,
        Box::new(StaticSession {
            point_sets: vec![points],
        }),
    );
    let predictor = FramePredictor::new(&model, SCREEN).unwrap();

    let mut captured: Vec<PoseObservation> = Vec::new();
    let mut millis = None;
    predictor.predict(
        &test_frame(),
        Some(&mut |observations| captured.extend_from_slice(observations)),
        Some(&mut |ms| millis = Some(ms)),
        None,
    );

    assert_eq!(captured.len(), 1);
    let observation = &captured[0];
    assert_eq!(observation.len(), 2);
    assert_eq!(observation.point("nose"), Some(Point::new(0.5, 0.3)));
    assert_eq!(observation.point("left_eye"), Some(Point::new(0.4, 0.25)));
    assert!(millis.unwrap() >= 0.0);
}

#[test]
fn test_busy_frames_dropped_without_side_effects() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let model = OnceModel::new(
        Task::Pose,
        Box::new(BlockingSession {
            entered: entered_tx,
            release: release_rx,
            blocked_once: false,
        }),
    );
    let predictor = Arc::new(FramePredictor::new(&model, SCREEN).unwrap());

    let worker = {
        let predictor = Arc::clone(&predictor);
        thread::spawn(move || predictor.predict(&test_frame(), None, None, None))
    };
    entered_rx.recv().unwrap();

    // The slot is occupied: this submission must drop silently.
    let fired = Cell::new(0);
    predictor.predict(
        &test_frame(),
        Some(&mut |_| fired.set(fired.get() + 1)),
        Some(&mut |_| fired.set(fired.get() + 1)),
        Some(&mut |_| fired.set(fired.get() + 1)),
    );
    assert_eq!(fired.get(), 0);
    assert!(predictor.smoothed_inference_time().abs() < f64::EPSILON);
    assert!(predictor.current_fps().is_none());

    release_tx.send(()).unwrap();
    worker.join().unwrap();

    // Back to idle: the next frame proceeds normally.
    let mut fired = 0;
    predictor.predict(&test_frame(), Some(&mut |_| fired += 1), None, None);
    assert_eq!(fired, 1);
}

#[test]
fn test_empty_frames_dropped() {
    let model = OnceModel::new(
        Task::Pose,
        Box::new(StaticSession {
            point_sets: vec![vec![]],
        }),
    );
    let predictor = FramePredictor::new(&model, SCREEN).unwrap();

    let empty = Frame::from_raw(0, 0, Vec::new()).unwrap();
    let fired = Cell::new(0);
    predictor.predict(
        &empty,
        Some(&mut |_| fired.set(fired.get() + 1)),
        Some(&mut |_| fired.set(fired.get() + 1)),
        Some(&mut |_| fired.set(fired.get() + 1)),
    );
    assert_eq!(fired.get(), 0);

    let mut fired = 0;
    predictor.predict(&test_frame(), Some(&mut |_| fired += 1), None, None);
    assert_eq!(fired, 1);
}

#[test]
fn test_backend_failure_recovers() {
    let model = OnceModel::new(Task::Pose, Box::new(FlakySession { calls: 0 }));
    let predictor = FramePredictor::new(&model, SCREEN).unwrap();

    // Failed frame: no listeners, timing untouched.
    let fired = Cell::new(0);
    predictor.predict(
        &test_frame(),
        Some(&mut |_| fired.set(fired.get() + 1)),
        Some(&mut |_| fired.set(fired.get() + 1)),
        Some(&mut |_| fired.set(fired.get() + 1)),
    );
    assert_eq!(fired.get(), 0);
    assert!(predictor.smoothed_inference_time().abs() < f64::EPSILON);
    assert!(predictor.current_fps().is_none());

    // The slot was released: a well-formed frame proceeds normally.
    let mut captured: Vec<PoseObservation> = Vec::new();
    predictor.predict(
        &test_frame(),
        Some(&mut |observations: &[PoseObservation]| captured.extend_from_slice(observations)),
        None,
        None,
    );
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].len(), 1);
}

#[test]
fn test_sequential_frames_report_smoothed_timing() {
    let latencies = vec![
        Duration::from_millis(20),
        Duration::from_millis(30),
        Duration::from_millis(20),
    ];
    let model = OnceModel::new(
        Task::Pose,
        Box::new(SleepySession {
            latencies,
            calls: 0,
        }),
    );
    let predictor = FramePredictor::new(&model, SCREEN).unwrap();

    let mut millis = Vec::new();
    let mut fps = Vec::new();
    for _ in 0..3 {
        predictor.predict(
            &test_frame(),
            None,
            Some(&mut |ms| millis.push(ms)),
            Some(&mut |rate| fps.push(rate)),
        );
        thread::sleep(Duration::from_millis(33));
    }

    assert_eq!(millis.len(), 3);
    assert_eq!(fps.len(), 3);

    // The latency filter climbs towards the 20-30 ms raw latencies from
    // zero: one fold moves 5% of the way.
    assert!(millis[0] >= 20.0 * 0.05);
    assert!(millis[2] > millis[0]);
    assert!(millis[2] < 20.0);

    // The interval filter climbs towards the ~53-63 ms completion interval,
    // so the reported rate falls each frame while staying positive.
    assert!(fps[0] > fps[1]);
    assert!(fps[1] > fps[2]);
    assert!(fps[2] > 1.0);
}

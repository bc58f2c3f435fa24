use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use nalgebra::Point2;

use crate::expression::Expression;

// make SharedState an alias for a Mutex protected struct State
pub type SharedState = Arc<Mutex<State>>;

/// Number of frame deltas averaged for the FPS readout.
const FPS_WINDOW: usize = 10;

// the data shared between the pipeline thread and the ui; only the most
// recent frame is kept
#[derive(Debug, Default)]
pub struct State {
    pub fps: Option<f32>,
    pub resolution: Option<(u32, u32)>,
    pub tracker_name: Option<String>,
    pub frames_processed: u64,
    pub last_error: Option<String>,

    pub landmarks: Vec<Point2<f32>>,
    pub expression: Option<Expression>,
}

impl State {
    pub fn shared() -> SharedState {
        Arc::new(Mutex::new(State::default()))
    }

    pub fn face_detected(&self) -> bool {
        self.expression.is_some()
    }
}

/// Locks the shared state, recovering from a poisoned lock.
///
/// Every field is overwritten by the next frame, so a panic mid-update leaves
/// at most one stale frame behind.
pub fn lock_state(shared: &SharedState) -> MutexGuard<'_, State> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Rolling frames-per-second estimate over the last few frame deltas.
#[derive(Debug, Default)]
pub struct FrameTimer {
    last_frame_time: Option<Instant>,
    fps_vec: Vec<f32>,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frame at `now` and returns the rounded mean FPS, if known.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        if let Some(last) = self.last_frame_time {
            let frame_delta = now.saturating_duration_since(last).as_secs_f32();
            if frame_delta > 0.0 {
                self.fps_vec.push(1.0 / frame_delta);
                if self.fps_vec.len() > FPS_WINDOW {
                    self.fps_vec.remove(0);
                }
            }
        }
        self.last_frame_time = Some(now);
        self.fps()
    }

    pub fn fps(&self) -> Option<f32> {
        if self.fps_vec.is_empty() {
            return None;
        }
        Some((self.fps_vec.iter().sum::<f32>() / self.fps_vec.len() as f32).round())
    }
}

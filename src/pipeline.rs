//! Per-frame orchestration: tracker, then classifier, then the shared display state.

use std::time::{Duration, Instant};

use image::DynamicImage;
use tracing::{debug, trace, warn};

use crate::expression::{classify_with, ClassifierThresholds};
use crate::face_tracking::FaceTracker;
use crate::utils::{lock_state, FrameTimer, SharedState};

pub struct FramePipeline {
    tracker: Box<dyn FaceTracker>,
    thresholds: ClassifierThresholds,
    shared_state: SharedState,
    timer: FrameTimer,
}

impl FramePipeline {
    pub fn new(
        tracker: Box<dyn FaceTracker>,
        thresholds: ClassifierThresholds,
        shared_state: SharedState,
    ) -> Self {
        lock_state(&shared_state).tracker_name = Some(tracker.name().to_string());
        Self {
            tracker,
            thresholds,
            shared_state,
            timer: FrameTimer::new(),
        }
    }

    /// Runs one frame through the tracker and classifier and publishes the result.
    ///
    /// The previous frame's result is replaced entirely. A tracker error drops
    /// the frame and shows the "no face" state until the next good frame.
    pub fn step(&mut self, image: &DynamicImage, timestamp: Duration) {
        let detection = self.tracker.detect_for_frame(image, timestamp);
        let fps = self.timer.tick(Instant::now());

        let mut state = lock_state(&self.shared_state);
        state.fps = fps;
        state.resolution = Some((image.width(), image.height()));
        state.frames_processed += 1;

        match detection {
            Ok(Some(frame)) => {
                state.expression = classify_with(&frame.blendshapes, &self.thresholds);
                state.landmarks = frame.landmarks;
                state.last_error = None;
                if let Some(expression) = &state.expression {
                    debug!(
                        "frame {}: {} ({:.2}, icon {})",
                        state.frames_processed,
                        expression.dominant.emotion.name(),
                        expression.dominant.score,
                        expression.dominant.display.icon.name()
                    );
                    trace!(
                        "frame {} features: {}",
                        state.frames_processed,
                        expression
                            .features
                            .iter()
                            .filter(|&(_, value)| value > 0.0)
                            .map(|(feature, value)| format!("{}={:.2}", feature.name(), value))
                            .collect::<Vec<_>>()
                            .join(" ")
                    );
                }
            }
            Ok(None) => {
                state.expression = None;
                state.landmarks.clear();
                state.last_error = None;
            }
            Err(err) => {
                warn!("dropping frame {}: {}", state.frames_processed, err);
                state.expression = None;
                state.landmarks.clear();
                state.last_error = Some(err.to_string());
            }
        }
    }

    pub fn shared_state(&self) -> &SharedState {
        &self.shared_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blendshapes::BlendshapeScore;
    use crate::expression::Emotion;
    use crate::face_tracking::{FaceFrame, ReplayTracker};
    use crate::utils::State;
    use nalgebra::Point2;

    fn smiling() -> FaceFrame {
        FaceFrame {
            landmarks: vec![Point2::new(0.5, 0.5)],
            blendshapes: vec![
                BlendshapeScore::new("mouthSmileLeft", 0.8),
                BlendshapeScore::new("mouthSmileRight", 0.8),
            ],
        }
    }

    fn pipeline(frames: Vec<Option<FaceFrame>>) -> FramePipeline {
        let tracker = ReplayTracker::from_frames(frames, (8, 8)).unwrap();
        FramePipeline::new(
            Box::new(tracker),
            ClassifierThresholds::default(),
            State::shared(),
        )
    }

    #[test]
    fn publishes_latest_frame() {
        let mut pipeline = pipeline(vec![Some(smiling()), None]);
        let image = DynamicImage::new_rgb8(8, 8);

        pipeline.step(&image, Duration::from_millis(1));
        {
            let state = lock_state(pipeline.shared_state());
            let expression = state.expression.unwrap();
            assert_eq!(expression.dominant.emotion, Emotion::Joy);
            assert_eq!(state.landmarks.len(), 1);
            assert_eq!(state.resolution, Some((8, 8)));
            assert_eq!(state.tracker_name.as_deref(), Some("replay"));
        }

        pipeline.step(&image, Duration::from_millis(2));
        let state = lock_state(pipeline.shared_state());
        assert!(!state.face_detected());
        assert!(state.landmarks.is_empty());
        assert_eq!(state.frames_processed, 2);
    }

    #[test]
    fn face_without_blendshapes_has_no_expression() {
        let frame = FaceFrame {
            landmarks: vec![Point2::new(0.1, 0.2)],
            blendshapes: Vec::new(),
        };
        let mut pipeline = pipeline(vec![Some(frame)]);
        pipeline.step(&DynamicImage::new_rgb8(8, 8), Duration::from_millis(1));

        let state = lock_state(pipeline.shared_state());
        assert!(state.expression.is_none());
        assert_eq!(state.landmarks.len(), 1);
    }

    #[test]
    fn tracker_error_drops_frame() {
        let mut pipeline = pipeline(vec![Some(smiling())]);
        let image = DynamicImage::new_rgb8(8, 8);

        pipeline.step(&image, Duration::from_millis(5));
        pipeline.step(&image, Duration::from_millis(5));

        let state = lock_state(pipeline.shared_state());
        assert!(state.expression.is_none());
        assert!(state.landmarks.is_empty());
        assert!(state.last_error.is_some());
    }
}

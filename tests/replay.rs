use std::fs;
use std::path::Path;
use std::time::Duration;

use image::DynamicImage;
use xpression::config::AppConfig;
use xpression::expression::Emotion;
use xpression::face_tracking::{FaceTracker, ReplayTracker};
use xpression::pipeline::FramePipeline;
use xpression::utils::{lock_state, State};

fn demo(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

#[test]
fn demo_config_points_at_demo_recording() {
    let config = AppConfig::load(&demo("xpression.yaml")).unwrap();
    let recording = config.recording.clone().unwrap();
    assert_eq!(recording, demo("session.yaml"));

    let tracker = ReplayTracker::open(&recording).unwrap();
    assert_eq!(tracker.resolution(), (1280, 720));
    assert_eq!(tracker.len(), 300);
}

#[test]
fn demo_recording_walks_through_expressions() {
    let tracker = ReplayTracker::open(&demo("session.yaml")).unwrap();
    let (width, height) = tracker.resolution();
    let image = DynamicImage::new_rgb8(width / 16, height / 16);

    let mut pipeline = FramePipeline::new(
        Box::new(tracker),
        AppConfig::default().classifier_thresholds(),
        State::shared(),
    );

    let mut seen = Vec::new();
    for i in 0..300u64 {
        pipeline.step(&image, Duration::from_millis(i * 33 + 1));
        let state = lock_state(pipeline.shared_state());
        let emotion = state.expression.map(|e| e.dominant.emotion);
        if seen.last() != Some(&emotion) {
            seen.push(emotion);
        }
    }

    assert_eq!(
        seen,
        vec![
            None,
            Some(Emotion::Neutral),
            Some(Emotion::Joy),
            Some(Emotion::Sad),
            Some(Emotion::Rage),
            Some(Emotion::Shock),
            Some(Emotion::Fear),
            Some(Emotion::Disgust),
            Some(Emotion::Puff),
            Some(Emotion::Kiss),
        ]
    );
}

#[test]
fn recording_from_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("one.yaml");
    fs::write(
        &path,
        "frames:\n  - blendshapes:\n      - {categoryName: cheekPuff, score: 0.5}\n",
    )
    .unwrap();

    let mut tracker = ReplayTracker::open(&path).unwrap();
    assert_eq!(tracker.resolution(), (1280, 720));
    let frame = tracker
        .detect_for_frame(&DynamicImage::new_rgb8(2, 2), Duration::ZERO)
        .unwrap()
        .unwrap();
    assert!(frame.landmarks.is_empty());
    assert_eq!(frame.blendshapes.len(), 1);
}

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::DynamicImage;
use tracing::info;
use tracing_subscriber::EnvFilter;

use xpression::app::ExpressionApp;
use xpression::config::AppConfig;
use xpression::face_tracking::{ReplayTracker, TrackerError};
use xpression::pipeline::FramePipeline;
use xpression::utils::State;
use xpression::Error;

// runs the pipeline at a fixed rate; the tracker ignores pixels, so one blank
// frame of the recorded size stands in for the camera
fn worker_thread(mut pipeline: FramePipeline, image: DynamicImage, frame_rate: u32) {
    let interval = Duration::from_secs_f64(1.0 / frame_rate as f64);
    let start = Instant::now();

    loop {
        let tick = Instant::now();
        pipeline.step(&image, tick.duration_since(start));

        if let Some(rest) = interval.checked_sub(tick.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}

fn main() -> Result<(), Error> {
    // log to stderr (if you run with `RUST_LOG=debug`)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::resolve(config_path.as_deref())?;

    let recording = config.recording.as_deref().ok_or_else(|| {
        TrackerError::Unavailable(String::from(
            "no live tracker is built in; set `recording` in the config file",
        ))
    })?;
    let tracker = ReplayTracker::open(recording)?;
    let (width, height) = tracker.resolution();

    let shared_state = State::shared();
    let pipeline = FramePipeline::new(
        Box::new(tracker),
        config.classifier_thresholds(),
        Arc::clone(&shared_state),
    );

    let frame_rate = config.frame_rate;
    info!("starting pipeline at {} fps", frame_rate);
    std::thread::spawn(move || {
        worker_thread(pipeline, DynamicImage::new_rgb8(width, height), frame_rate)
    });

    let gui_data = Arc::clone(&shared_state);
    let mirrored = config.mirrored;
    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        &config.window_title,
        native_options,
        Box::new(move |cc| Box::new(ExpressionApp::new(cc, gui_data, mirrored))),
    )
    .map_err(|err| Error::Ui(err.to_string()))
}

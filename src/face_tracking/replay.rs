//! Plays back a recorded tracker session from a YAML file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use image::DynamicImage;
use nalgebra::Point2;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{FaceFrame, FaceTracker, TimestampGuard, TrackerError};
use crate::blendshapes::{Blendshape, BlendshapeScore};

#[derive(Debug, Deserialize)]
struct Recording {
    #[serde(default = "default_resolution")]
    resolution: (u32, u32),
    #[serde(default)]
    frames: Vec<RecordedFrame>,
}

fn default_resolution() -> (u32, u32) {
    (1280, 720)
}

#[derive(Debug, Default, Deserialize)]
struct RecordedFrame {
    #[serde(default)]
    landmarks: Vec<[f32; 2]>,
    #[serde(default)]
    blendshapes: Vec<BlendshapeScore>,
}

impl RecordedFrame {
    // an empty frame stands for "no face"
    fn to_face_frame(&self) -> Option<FaceFrame> {
        if self.landmarks.is_empty() && self.blendshapes.is_empty() {
            return None;
        }
        Some(FaceFrame {
            landmarks: self
                .landmarks
                .iter()
                .map(|&[x, y]| Point2::new(x, y))
                .collect(),
            blendshapes: self.blendshapes.clone(),
        })
    }
}

// category names the landmarker never emits, sorted and deduplicated
fn unknown_categories(frames: &[RecordedFrame]) -> Vec<&str> {
    let mut names: Vec<&str> = frames
        .iter()
        .flat_map(|frame| frame.blendshapes.iter())
        .map(|score| score.category_name.as_str())
        .filter(|name| Blendshape::from_name(name).is_none())
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}

#[derive(Debug)]
pub struct ReplayTracker {
    name: String,
    resolution: (u32, u32),
    frames: Vec<Option<FaceFrame>>,
    position: usize,
    timestamps: TimestampGuard,
}

impl ReplayTracker {
    pub fn open(path: &Path) -> Result<Self, TrackerError> {
        let text = fs::read_to_string(path).map_err(|source| TrackerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tracker = Self::from_yaml(&text, path)?;
        info!(
            "loaded recording {} ({} frames, {}x{})",
            path.display(),
            tracker.len(),
            tracker.resolution.0,
            tracker.resolution.1
        );
        Ok(tracker)
    }

    /// Parses a recording; `origin` is only used for naming and errors.
    pub fn from_yaml(text: &str, origin: &Path) -> Result<Self, TrackerError> {
        let recording: Recording =
            serde_yaml::from_str(text).map_err(|source| TrackerError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;

        if recording.frames.is_empty() {
            return Err(TrackerError::EmptyRecording(origin.to_path_buf()));
        }

        let unknown = unknown_categories(&recording.frames);
        if !unknown.is_empty() {
            warn!(
                "{}: ignoring unknown blendshape categories: {}",
                origin.display(),
                unknown.join(", ")
            );
        }

        let name = origin
            .file_name()
            .map(|n| format!("replay: {}", n.to_string_lossy()))
            .unwrap_or_else(|| String::from("replay"));

        Ok(Self {
            name,
            resolution: recording.resolution,
            frames: recording
                .frames
                .iter()
                .map(RecordedFrame::to_face_frame)
                .collect(),
            position: 0,
            timestamps: TimestampGuard::default(),
        })
    }

    /// Builds a tracker from frames held in memory.
    pub fn from_frames(
        frames: Vec<Option<FaceFrame>>,
        resolution: (u32, u32),
    ) -> Result<Self, TrackerError> {
        if frames.is_empty() {
            return Err(TrackerError::EmptyRecording(PathBuf::from("<memory>")));
        }
        Ok(Self {
            name: String::from("replay"),
            resolution,
            frames,
            position: 0,
            timestamps: TimestampGuard::default(),
        })
    }

    /// Frame size the recording was captured at.
    pub fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FaceTracker for ReplayTracker {
    fn detect_for_frame(
        &mut self,
        _image: &DynamicImage,
        timestamp: Duration,
    ) -> Result<Option<FaceFrame>, TrackerError> {
        self.timestamps.check(timestamp)?;

        let frame = self.frames[self.position].clone();
        self.position = (self.position + 1) % self.frames.len();
        if self.position == 0 {
            debug!("recording wrapped around");
        }
        Ok(frame)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

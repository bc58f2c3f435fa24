pub mod replay;

use std::path::PathBuf;
use std::time::Duration;

use image::DynamicImage;
use nalgebra::Point2;
use thiserror::Error;

use crate::blendshapes::BlendshapeScore;

pub use replay::ReplayTracker;

/// Everything the tracker reports for one detected face.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceFrame {
    /// Landmarks in normalized image coordinates ([0, 1] on both axes).
    pub landmarks: Vec<Point2<f32>>,
    pub blendshapes: Vec<BlendshapeScore>,
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("failed to read recording {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse recording {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("recording {0} contains no frames")]
    EmptyRecording(PathBuf),

    #[error("frame timestamp {current:?} does not follow {previous:?}")]
    NonMonotonicTimestamp {
        previous: Duration,
        current: Duration,
    },

    #[error("face tracker unavailable: {0}")]
    Unavailable(String),
}

// the face tracking capability: landmark detection and blendshape inference
// live behind this trait
pub trait FaceTracker: Send {
    /// Runs the tracker on one video frame.
    ///
    /// `timestamp` is the frame's position in the stream and must increase
    /// strictly between calls. `Ok(None)` means no face was found.
    fn detect_for_frame(
        &mut self,
        image: &DynamicImage,
        timestamp: Duration,
    ) -> Result<Option<FaceFrame>, TrackerError>;

    /// Short human readable name, shown in the HUD.
    fn name(&self) -> &str;
}

/// Rejects timestamps that do not strictly increase.
#[derive(Debug, Default)]
pub struct TimestampGuard {
    last: Option<Duration>,
}

impl TimestampGuard {
    pub fn check(&mut self, timestamp: Duration) -> Result<(), TrackerError> {
        if let Some(previous) = self.last {
            if timestamp <= previous {
                return Err(TrackerError::NonMonotonicTimestamp {
                    previous,
                    current: timestamp,
                });
            }
        }
        self.last = Some(timestamp);
        Ok(())
    }
}

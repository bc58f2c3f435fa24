use thiserror::Error;

use crate::config::ConfigError;
use crate::face_tracking::TrackerError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error("display surface failed: {0}")]
    Ui(String),
}

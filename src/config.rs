use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::expression::ClassifierThresholds;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "xpression.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_title: String,
    /// Pipeline ticks per second.
    pub frame_rate: u32,
    /// Flip landmarks horizontally, as for a user-facing camera.
    pub mirrored: bool,
    /// Recorded session to replay instead of a live tracker.
    pub recording: Option<PathBuf>,
    pub thresholds: ThresholdConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: String::from("XPRESSION"),
            frame_rate: 30,
            mirrored: true,
            recording: None,
            thresholds: ThresholdConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub neutral: f64,
    pub puff_suppression: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        let defaults = ClassifierThresholds::default();
        Self {
            neutral: defaults.neutral,
            puff_suppression: defaults.puff_suppression,
        }
    }
}

impl From<ThresholdConfig> for ClassifierThresholds {
    fn from(config: ThresholdConfig) -> Self {
        ClassifierThresholds {
            neutral: config.neutral,
            puff_suppression: config.puff_suppression,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: AppConfig =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        // recordings are relative to the config file
        if let (Some(recording), Some(dir)) = (config.recording.as_mut(), path.parent()) {
            if recording.is_relative() {
                *recording = dir.join(&*recording);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, else `xpression.yaml` if it exists, else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 {
            return Err(ConfigError::Invalid(String::from(
                "frame_rate must be positive",
            )));
        }
        let t = &self.thresholds;
        for (name, value) in [("neutral", t.neutral), ("puff_suppression", t.puff_suppression)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "threshold {} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn classifier_thresholds(&self) -> ClassifierThresholds {
        self.thresholds.into()
    }
}

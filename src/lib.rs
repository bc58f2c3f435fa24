//! Blendshape driven emotion HUD.
//!
//! A face tracker (see [`face_tracking::FaceTracker`]) reports landmarks and
//! blendshape scores for each frame; [`expression::classify`] turns the scores
//! into eight composite emotion scores and one dominant emotion, and the
//! [`pipeline::FramePipeline`] publishes the latest result for the HUD.

pub mod app;
pub mod blendshapes;
pub mod config;
pub mod error;
pub mod expression;
pub mod face_tracking;
pub mod pipeline;
pub mod utils;

pub use blendshapes::{Blendshape, BlendshapeScore};
pub use error::Error;
pub use expression::{classify, DominantEmotion, Emotion, EmotionScores, Expression};

//! Maps blendshape scores to composite emotion scores and a dominant emotion.
//!
//! Everything here is a pure function of a single frame's blendshapes. The
//! feature and formula tables below are scanned in declaration order, which is
//! what the dominant-emotion tie-break relies on.

pub mod display;

use crate::blendshapes::{score_of, Blendshape, BlendshapeScore};

pub use display::{EmotionDisplay, EmotionMeter, Icon, EMOTION_METERS};

/// Below this score every frame is labelled neutral.
pub const NEUTRAL_THRESHOLD: f64 = 0.15;

/// Above this puff score the kiss score is forced to zero.
pub const PUFF_SUPPRESSION_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierThresholds {
    pub neutral: f64,
    pub puff_suppression: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            neutral: NEUTRAL_THRESHOLD,
            puff_suppression: PUFF_SUPPRESSION_THRESHOLD,
        }
    }
}

// derived per-frame features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Smile,
    BrowDown,
    BrowRaise,
    BrowInnerUp,
    EyeWide,
    EyeSquint,
    JawOpen,
    NoseSneer,
    MouthFrown,
    MouthPucker,
    CheekPuff,
    EyeBlink,
}

impl Feature {
    pub const COUNT: usize = 12;

    pub fn name(self) -> &'static str {
        FEATURE_SOURCES[self as usize].name
    }
}

enum Source {
    Single(Blendshape),
    Pair(Blendshape, Blendshape),
}

struct FeatureSource {
    feature: Feature,
    name: &'static str,
    source: Source,
}

// indexed by `Feature as usize`
static FEATURE_SOURCES: [FeatureSource; Feature::COUNT] = [
    FeatureSource {
        feature: Feature::Smile,
        name: "smile",
        source: Source::Pair(Blendshape::MouthSmileLeft, Blendshape::MouthSmileRight),
    },
    FeatureSource {
        feature: Feature::BrowDown,
        name: "browDown",
        source: Source::Pair(Blendshape::BrowDownLeft, Blendshape::BrowDownRight),
    },
    FeatureSource {
        feature: Feature::BrowRaise,
        name: "browRaise",
        source: Source::Pair(Blendshape::BrowOuterUpLeft, Blendshape::BrowOuterUpRight),
    },
    FeatureSource {
        feature: Feature::BrowInnerUp,
        name: "browInnerUp",
        source: Source::Single(Blendshape::BrowInnerUp),
    },
    FeatureSource {
        feature: Feature::EyeWide,
        name: "eyeWide",
        source: Source::Pair(Blendshape::EyeWideLeft, Blendshape::EyeWideRight),
    },
    FeatureSource {
        feature: Feature::EyeSquint,
        name: "eyeSquint",
        source: Source::Pair(Blendshape::EyeSquintLeft, Blendshape::EyeSquintRight),
    },
    FeatureSource {
        feature: Feature::JawOpen,
        name: "jawOpen",
        source: Source::Single(Blendshape::JawOpen),
    },
    FeatureSource {
        feature: Feature::NoseSneer,
        name: "noseSneer",
        source: Source::Pair(Blendshape::NoseSneerLeft, Blendshape::NoseSneerRight),
    },
    FeatureSource {
        feature: Feature::MouthFrown,
        name: "mouthFrown",
        source: Source::Pair(Blendshape::MouthFrownLeft, Blendshape::MouthFrownRight),
    },
    FeatureSource {
        feature: Feature::MouthPucker,
        name: "mouthPucker",
        source: Source::Single(Blendshape::MouthPucker),
    },
    FeatureSource {
        feature: Feature::CheekPuff,
        name: "cheekPuff",
        source: Source::Single(Blendshape::CheekPuff),
    },
    FeatureSource {
        feature: Feature::EyeBlink,
        name: "eyeBlink",
        source: Source::Pair(Blendshape::EyeBlinkLeft, Blendshape::EyeBlinkRight),
    },
];

/// The twelve derived features of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFeatures {
    values: [f64; Feature::COUNT],
}

impl RawFeatures {
    pub fn from_blendshapes(blendshapes: &[BlendshapeScore]) -> Self {
        let mut values = [0.0; Feature::COUNT];
        for entry in FEATURE_SOURCES.iter() {
            values[entry.feature as usize] = match entry.source {
                Source::Single(shape) => score_of(blendshapes, shape),
                Source::Pair(left, right) => {
                    (score_of(blendshapes, left) + score_of(blendshapes, right)) / 2.0
                }
            };
        }
        Self { values }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        FEATURE_SOURCES
            .iter()
            .map(|entry| (entry.feature, self.values[entry.feature as usize]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Neutral,
    Joy,
    Sad,
    Rage,
    Shock,
    Fear,
    Disgust,
    Puff,
    Kiss,
}

impl Emotion {
    /// The scored emotions in scan order. Earlier entries win ties.
    pub const SCORED: [Emotion; 8] = [
        Emotion::Joy,
        Emotion::Sad,
        Emotion::Rage,
        Emotion::Shock,
        Emotion::Fear,
        Emotion::Disgust,
        Emotion::Puff,
        Emotion::Kiss,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Joy => "joy",
            Emotion::Sad => "sad",
            Emotion::Rage => "rage",
            Emotion::Shock => "shock",
            Emotion::Fear => "fear",
            Emotion::Disgust => "disgust",
            Emotion::Puff => "puff",
            Emotion::Kiss => "kiss",
        }
    }

    pub fn display(self) -> &'static EmotionDisplay {
        display::display_for(self)
    }

    // position in `SCORED`, None for neutral
    fn slot(self) -> Option<usize> {
        Self::SCORED.iter().position(|&e| e == self)
    }
}

struct EmotionFormula {
    emotion: Emotion,
    terms: &'static [(Feature, f64)],
    divisor: f64,
}

impl EmotionFormula {
    fn evaluate(&self, features: &RawFeatures) -> f64 {
        let sum = self
            .terms
            .iter()
            .fold(0.0, |acc, &(feature, weight)| acc + features.get(feature) * weight);
        sum / self.divisor
    }
}

// same order as `Emotion::SCORED`
static EMOTION_FORMULAS: [EmotionFormula; 8] = [
    EmotionFormula {
        emotion: Emotion::Joy,
        terms: &[(Feature::Smile, 1.0)],
        divisor: 1.0,
    },
    EmotionFormula {
        emotion: Emotion::Sad,
        terms: &[(Feature::MouthFrown, 1.5), (Feature::BrowInnerUp, 0.8)],
        divisor: 2.3,
    },
    EmotionFormula {
        emotion: Emotion::Rage,
        terms: &[
            (Feature::BrowDown, 1.0),
            (Feature::JawOpen, 0.2),
            (Feature::EyeSquint, 0.3),
        ],
        divisor: 1.5,
    },
    EmotionFormula {
        emotion: Emotion::Shock,
        terms: &[
            (Feature::BrowRaise, 1.0),
            (Feature::EyeWide, 1.0),
            (Feature::JawOpen, 1.0),
        ],
        divisor: 3.0,
    },
    EmotionFormula {
        emotion: Emotion::Fear,
        terms: &[
            (Feature::BrowInnerUp, 1.0),
            (Feature::EyeWide, 1.0),
            (Feature::MouthFrown, 0.5),
        ],
        divisor: 2.5,
    },
    EmotionFormula {
        emotion: Emotion::Disgust,
        terms: &[
            (Feature::NoseSneer, 1.0),
            (Feature::BrowDown, 0.5),
            (Feature::EyeSquint, 0.2),
        ],
        divisor: 1.7,
    },
    EmotionFormula {
        emotion: Emotion::Puff,
        terms: &[(Feature::CheekPuff, 1.4)],
        divisor: 1.0,
    },
    EmotionFormula {
        emotion: Emotion::Kiss,
        terms: &[(Feature::MouthPucker, 0.7)],
        divisor: 1.0,
    },
];

/// Composite scores for the eight scored emotions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionScores {
    values: [f64; 8],
}

impl EmotionScores {
    /// Builds scores directly, in `Emotion::SCORED` order.
    pub fn from_values(values: [f64; 8]) -> Self {
        Self { values }
    }

    pub fn from_features(features: &RawFeatures, thresholds: &ClassifierThresholds) -> Self {
        let mut values = [0.0; 8];
        for (slot, formula) in EMOTION_FORMULAS.iter().enumerate() {
            debug_assert_eq!(formula.emotion, Emotion::SCORED[slot]);
            values[slot] = formula.evaluate(features);
        }
        let mut scores = Self { values };

        // puffed cheeks look like a pucker
        if scores.get(Emotion::Puff) > thresholds.puff_suppression {
            scores.set(Emotion::Kiss, 0.0);
        }
        scores
    }

    /// Score of `emotion`; neutral has no score and reads as 0.
    pub fn get(&self, emotion: Emotion) -> f64 {
        emotion.slot().map_or(0.0, |slot| self.values[slot])
    }

    fn set(&mut self, emotion: Emotion, value: f64) {
        if let Some(slot) = emotion.slot() {
            self.values[slot] = value;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::SCORED.iter().copied().zip(self.values.iter().copied())
    }

    pub fn joy(&self) -> f64 {
        self.get(Emotion::Joy)
    }

    pub fn sad(&self) -> f64 {
        self.get(Emotion::Sad)
    }

    pub fn rage(&self) -> f64 {
        self.get(Emotion::Rage)
    }

    pub fn shock(&self) -> f64 {
        self.get(Emotion::Shock)
    }

    pub fn fear(&self) -> f64 {
        self.get(Emotion::Fear)
    }

    pub fn disgust(&self) -> f64 {
        self.get(Emotion::Disgust)
    }

    pub fn puff(&self) -> f64 {
        self.get(Emotion::Puff)
    }

    pub fn kiss(&self) -> f64 {
        self.get(Emotion::Kiss)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominantEmotion {
    pub emotion: Emotion,
    /// Highest score seen during the scan, even when overridden to neutral.
    pub score: f64,
    pub display: &'static EmotionDisplay,
}

impl DominantEmotion {
    pub fn label(&self) -> &'static str {
        self.display.label
    }
}

/// Picks the dominant emotion by strict-greater scan in `Emotion::SCORED` order.
pub fn dominant_emotion(
    scores: &EmotionScores,
    thresholds: &ClassifierThresholds,
) -> DominantEmotion {
    let mut max_score = 0.0;
    let mut dominant = Emotion::Neutral;

    for (emotion, score) in scores.iter() {
        if score > max_score {
            max_score = score;
            dominant = emotion;
        }
    }

    if max_score < thresholds.neutral {
        dominant = Emotion::Neutral;
    }

    DominantEmotion {
        emotion: dominant,
        score: max_score,
        display: dominant.display(),
    }
}

/// Classification of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expression {
    pub features: RawFeatures,
    pub emotions: EmotionScores,
    pub dominant: DominantEmotion,
}

/// Classifies one frame with the default thresholds.
///
/// Returns `None` when the frame has no blendshapes, i.e. no face was detected.
pub fn classify(blendshapes: &[BlendshapeScore]) -> Option<Expression> {
    classify_with(blendshapes, &ClassifierThresholds::default())
}

pub fn classify_with(
    blendshapes: &[BlendshapeScore],
    thresholds: &ClassifierThresholds,
) -> Option<Expression> {
    if blendshapes.is_empty() {
        return None;
    }

    let features = RawFeatures::from_blendshapes(blendshapes);
    let emotions = EmotionScores::from_features(&features, thresholds);
    let dominant = dominant_emotion(&emotions, thresholds);

    Some(Expression {
        features,
        emotions,
        dominant,
    })
}

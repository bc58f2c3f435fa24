use serde::{Deserialize, Deserializer};

/// One `{categoryName, score}` pair as reported by the face tracker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlendshapeScore {
    #[serde(rename = "categoryName")]
    pub category_name: String,
    // missing or non-numeric scores deserialize to NaN and read as 0
    #[serde(default = "nan", deserialize_with = "lenient_score")]
    pub score: f32,
}

impl BlendshapeScore {
    pub fn new(category_name: impl Into<String>, score: f32) -> Self {
        Self {
            category_name: category_name.into(),
            score,
        }
    }
}

fn nan() -> f32 {
    f32::NAN
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientScore {
    Number(f32),
    Other(serde::de::IgnoredAny),
}

fn lenient_score<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    match LenientScore::deserialize(deserializer)? {
        LenientScore::Number(score) => Ok(score),
        LenientScore::Other(_) => Ok(f32::NAN),
    }
}

// the 52 blendshape categories of the mediapipe face landmarker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blendshape {
    Neutral,
    BrowDownLeft,
    BrowDownRight,
    BrowInnerUp,
    BrowOuterUpLeft,
    BrowOuterUpRight,
    CheekPuff,
    CheekSquintLeft,
    CheekSquintRight,
    EyeBlinkLeft,
    EyeBlinkRight,
    EyeLookDownLeft,
    EyeLookDownRight,
    EyeLookInLeft,
    EyeLookInRight,
    EyeLookOutLeft,
    EyeLookOutRight,
    EyeLookUpLeft,
    EyeLookUpRight,
    EyeSquintLeft,
    EyeSquintRight,
    EyeWideLeft,
    EyeWideRight,
    JawForward,
    JawLeft,
    JawOpen,
    JawRight,
    MouthClose,
    MouthDimpleLeft,
    MouthDimpleRight,
    MouthFrownLeft,
    MouthFrownRight,
    MouthFunnel,
    MouthLeft,
    MouthLowerDownLeft,
    MouthLowerDownRight,
    MouthPressLeft,
    MouthPressRight,
    MouthPucker,
    MouthRight,
    MouthRollLower,
    MouthRollUpper,
    MouthShrugLower,
    MouthShrugUpper,
    MouthSmileLeft,
    MouthSmileRight,
    MouthStretchLeft,
    MouthStretchRight,
    MouthUpperUpLeft,
    MouthUpperUpRight,
    NoseSneerLeft,
    NoseSneerRight,
}

impl Blendshape {
    /// All categories, in the order the landmarker emits them.
    pub const ALL: [Blendshape; 52] = [
        Blendshape::Neutral,
        Blendshape::BrowDownLeft,
        Blendshape::BrowDownRight,
        Blendshape::BrowInnerUp,
        Blendshape::BrowOuterUpLeft,
        Blendshape::BrowOuterUpRight,
        Blendshape::CheekPuff,
        Blendshape::CheekSquintLeft,
        Blendshape::CheekSquintRight,
        Blendshape::EyeBlinkLeft,
        Blendshape::EyeBlinkRight,
        Blendshape::EyeLookDownLeft,
        Blendshape::EyeLookDownRight,
        Blendshape::EyeLookInLeft,
        Blendshape::EyeLookInRight,
        Blendshape::EyeLookOutLeft,
        Blendshape::EyeLookOutRight,
        Blendshape::EyeLookUpLeft,
        Blendshape::EyeLookUpRight,
        Blendshape::EyeSquintLeft,
        Blendshape::EyeSquintRight,
        Blendshape::EyeWideLeft,
        Blendshape::EyeWideRight,
        Blendshape::JawForward,
        Blendshape::JawLeft,
        Blendshape::JawOpen,
        Blendshape::JawRight,
        Blendshape::MouthClose,
        Blendshape::MouthDimpleLeft,
        Blendshape::MouthDimpleRight,
        Blendshape::MouthFrownLeft,
        Blendshape::MouthFrownRight,
        Blendshape::MouthFunnel,
        Blendshape::MouthLeft,
        Blendshape::MouthLowerDownLeft,
        Blendshape::MouthLowerDownRight,
        Blendshape::MouthPressLeft,
        Blendshape::MouthPressRight,
        Blendshape::MouthPucker,
        Blendshape::MouthRight,
        Blendshape::MouthRollLower,
        Blendshape::MouthRollUpper,
        Blendshape::MouthShrugLower,
        Blendshape::MouthShrugUpper,
        Blendshape::MouthSmileLeft,
        Blendshape::MouthSmileRight,
        Blendshape::MouthStretchLeft,
        Blendshape::MouthStretchRight,
        Blendshape::MouthUpperUpLeft,
        Blendshape::MouthUpperUpRight,
        Blendshape::NoseSneerLeft,
        Blendshape::NoseSneerRight,
    ];

    /// The category name used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Blendshape::Neutral => "_neutral",
            Blendshape::BrowDownLeft => "browDownLeft",
            Blendshape::BrowDownRight => "browDownRight",
            Blendshape::BrowInnerUp => "browInnerUp",
            Blendshape::BrowOuterUpLeft => "browOuterUpLeft",
            Blendshape::BrowOuterUpRight => "browOuterUpRight",
            Blendshape::CheekPuff => "cheekPuff",
            Blendshape::CheekSquintLeft => "cheekSquintLeft",
            Blendshape::CheekSquintRight => "cheekSquintRight",
            Blendshape::EyeBlinkLeft => "eyeBlinkLeft",
            Blendshape::EyeBlinkRight => "eyeBlinkRight",
            Blendshape::EyeLookDownLeft => "eyeLookDownLeft",
            Blendshape::EyeLookDownRight => "eyeLookDownRight",
            Blendshape::EyeLookInLeft => "eyeLookInLeft",
            Blendshape::EyeLookInRight => "eyeLookInRight",
            Blendshape::EyeLookOutLeft => "eyeLookOutLeft",
            Blendshape::EyeLookOutRight => "eyeLookOutRight",
            Blendshape::EyeLookUpLeft => "eyeLookUpLeft",
            Blendshape::EyeLookUpRight => "eyeLookUpRight",
            Blendshape::EyeSquintLeft => "eyeSquintLeft",
            Blendshape::EyeSquintRight => "eyeSquintRight",
            Blendshape::EyeWideLeft => "eyeWideLeft",
            Blendshape::EyeWideRight => "eyeWideRight",
            Blendshape::JawForward => "jawForward",
            Blendshape::JawLeft => "jawLeft",
            Blendshape::JawOpen => "jawOpen",
            Blendshape::JawRight => "jawRight",
            Blendshape::MouthClose => "mouthClose",
            Blendshape::MouthDimpleLeft => "mouthDimpleLeft",
            Blendshape::MouthDimpleRight => "mouthDimpleRight",
            Blendshape::MouthFrownLeft => "mouthFrownLeft",
            Blendshape::MouthFrownRight => "mouthFrownRight",
            Blendshape::MouthFunnel => "mouthFunnel",
            Blendshape::MouthLeft => "mouthLeft",
            Blendshape::MouthLowerDownLeft => "mouthLowerDownLeft",
            Blendshape::MouthLowerDownRight => "mouthLowerDownRight",
            Blendshape::MouthPressLeft => "mouthPressLeft",
            Blendshape::MouthPressRight => "mouthPressRight",
            Blendshape::MouthPucker => "mouthPucker",
            Blendshape::MouthRight => "mouthRight",
            Blendshape::MouthRollLower => "mouthRollLower",
            Blendshape::MouthRollUpper => "mouthRollUpper",
            Blendshape::MouthShrugLower => "mouthShrugLower",
            Blendshape::MouthShrugUpper => "mouthShrugUpper",
            Blendshape::MouthSmileLeft => "mouthSmileLeft",
            Blendshape::MouthSmileRight => "mouthSmileRight",
            Blendshape::MouthStretchLeft => "mouthStretchLeft",
            Blendshape::MouthStretchRight => "mouthStretchRight",
            Blendshape::MouthUpperUpLeft => "mouthUpperUpLeft",
            Blendshape::MouthUpperUpRight => "mouthUpperUpRight",
            Blendshape::NoseSneerLeft => "noseSneerLeft",
            Blendshape::NoseSneerRight => "noseSneerRight",
        }
    }

    pub fn from_name(name: &str) -> Option<Blendshape> {
        Self::ALL.iter().copied().find(|shape| shape.name() == name)
    }
}

/// Returns the score of the first entry named after `shape`.
///
/// Absent shapes and non-finite scores read as 0. Later duplicates are never
/// consulted, even when the first entry is unusable. The score is widened to
/// `f64` here and all classifier arithmetic stays in `f64` from then on.
pub fn score_of(blendshapes: &[BlendshapeScore], shape: Blendshape) -> f64 {
    let name = shape.name();
    match blendshapes.iter().find(|s| s.category_name == name) {
        Some(entry) if entry.score.is_finite() => f64::from(entry.score),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_for_every_category() {
        for shape in Blendshape::ALL {
            assert_eq!(Blendshape::from_name(shape.name()), Some(shape));
        }
        assert_eq!(Blendshape::from_name("tongueOut"), None);
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = Blendshape::ALL.iter().map(|s| s.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 52);
    }

    #[test]
    fn missing_shape_reads_as_zero() {
        let shapes = vec![BlendshapeScore::new("jawOpen", 0.5)];
        assert_eq!(score_of(&shapes, Blendshape::CheekPuff), 0.0);
        assert_eq!(score_of(&shapes, Blendshape::JawOpen), 0.5);
    }

    #[test]
    fn first_duplicate_wins() {
        let shapes = vec![
            BlendshapeScore::new("jawOpen", 0.25),
            BlendshapeScore::new("jawOpen", 0.75),
        ];
        assert_eq!(score_of(&shapes, Blendshape::JawOpen), 0.25);
    }

    #[test]
    fn scores_widen_without_rounding() {
        let shapes = vec![BlendshapeScore::new("browInnerUp", 0.4)];
        assert_eq!(score_of(&shapes, Blendshape::BrowInnerUp), f64::from(0.4f32));
    }

    #[test]
    fn non_finite_scores_read_as_zero() {
        let shapes = vec![
            BlendshapeScore::new("jawOpen", f32::NAN),
            BlendshapeScore::new("jawOpen", 0.9),
            BlendshapeScore::new("cheekPuff", f32::INFINITY),
        ];
        assert_eq!(score_of(&shapes, Blendshape::JawOpen), 0.0);
        assert_eq!(score_of(&shapes, Blendshape::CheekPuff), 0.0);
    }

    #[test]
    fn malformed_scores_deserialize_as_nan() {
        let yaml = "
- categoryName: jawOpen
  score: wide
- categoryName: cheekPuff
- categoryName: mouthPucker
  score: 0.25
";
        let shapes: Vec<BlendshapeScore> = serde_yaml::from_str(yaml).unwrap();
        assert!(shapes[0].score.is_nan());
        assert!(shapes[1].score.is_nan());
        assert_eq!(score_of(&shapes, Blendshape::JawOpen), 0.0);
        assert_eq!(score_of(&shapes, Blendshape::CheekPuff), 0.0);
        assert_eq!(score_of(&shapes, Blendshape::MouthPucker), 0.25);
    }
}

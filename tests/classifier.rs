use xpression::expression::{dominant_emotion, ClassifierThresholds};
use xpression::{classify, Blendshape, BlendshapeScore, Emotion, EmotionScores};

fn shapes(pairs: &[(&str, f32)]) -> Vec<BlendshapeScore> {
    pairs
        .iter()
        .map(|&(name, score)| BlendshapeScore::new(name, score))
        .collect()
}

#[test]
fn empty_frame_has_no_expression() {
    assert!(classify(&[]).is_none());
}

#[test]
fn all_zero_scores_are_neutral() {
    let input: Vec<BlendshapeScore> = Blendshape::ALL
        .iter()
        .map(|shape| BlendshapeScore::new(shape.name(), 0.0))
        .collect();
    let expression = classify(&input).unwrap();

    assert_eq!(expression.dominant.emotion, Emotion::Neutral);
    assert_eq!(expression.dominant.label(), "Neutral");
    assert!(expression.emotions.iter().all(|(_, score)| score == 0.0));
}

#[test]
fn unknown_categories_only_are_neutral() {
    let expression = classify(&shapes(&[("tongueOut", 1.0)])).unwrap();
    assert_eq!(expression.dominant.emotion, Emotion::Neutral);
}

#[test]
fn smiling_more_raises_joy() {
    let mut previous = -1.0;
    for step in 0..=10 {
        let smile = step as f32 / 10.0;
        let expression = classify(&shapes(&[
            ("mouthSmileLeft", smile),
            ("mouthSmileRight", smile),
        ]))
        .unwrap();
        let joy = expression.emotions.joy();
        assert!(joy > previous, "joy {} did not rise above {}", joy, previous);
        previous = joy;

        if joy >= 0.15 {
            assert_eq!(expression.dominant.label(), "Happy");
        } else {
            assert_eq!(expression.dominant.label(), "Neutral");
        }
    }
}

#[test]
fn puffed_cheeks_suppress_kiss() {
    let expression = classify(&shapes(&[("cheekPuff", 0.5), ("mouthPucker", 1.0)])).unwrap();
    assert_eq!(expression.emotions.kiss(), 0.0);
    assert!((expression.emotions.puff() - 0.7).abs() < 1e-6);
    assert_eq!(expression.dominant.label(), "Puff");
}

#[test]
fn ties_go_to_earlier_emotion() {
    let scores = EmotionScores::from_values([0.5, 0.5, 0.1, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let dominant = dominant_emotion(&scores, &ClassifierThresholds::default());
    assert_eq!(dominant.emotion, Emotion::Joy);
    assert_eq!(dominant.label(), "Happy");
}

#[test]
fn smile_scenario() {
    let expression = classify(&shapes(&[
        ("mouthSmileLeft", 0.8),
        ("mouthSmileRight", 0.8),
    ]))
    .unwrap();

    assert!((expression.emotions.joy() - 0.8).abs() < 1e-6);
    for (emotion, score) in expression.emotions.iter() {
        if emotion != Emotion::Joy {
            assert_eq!(score, 0.0, "{}", emotion.name());
        }
    }
    assert_eq!(expression.dominant.label(), "Happy");
    assert_eq!(expression.dominant.display.color, "#10b981");
    assert_eq!(expression.dominant.display.icon.name(), "smile");
}

#[test]
fn shock_scenario() {
    let expression = classify(&shapes(&[
        ("jawOpen", 0.9),
        ("browOuterUpLeft", 0.9),
        ("browOuterUpRight", 0.9),
        ("eyeWideLeft", 0.9),
        ("eyeWideRight", 0.9),
    ]))
    .unwrap();

    assert!((expression.emotions.shock() - 0.9).abs() < 1e-6);
    assert_eq!(expression.dominant.emotion, Emotion::Shock);
    assert_eq!(expression.dominant.label(), "Shocked");
}

#[test]
fn fear_scenario() {
    let expression = classify(&shapes(&[
        ("browInnerUp", 1.0),
        ("eyeWideLeft", 1.0),
        ("eyeWideRight", 1.0),
    ]))
    .unwrap();

    assert!((expression.emotions.fear() - 0.8).abs() < 1e-9);
    assert_eq!(expression.dominant.emotion, Emotion::Fear);
    assert_eq!(expression.dominant.label(), "Fear");
}

#[test]
fn classification_is_deterministic() {
    let input = shapes(&[
        ("browDownLeft", 0.7),
        ("browDownRight", 0.6),
        ("eyeSquintLeft", 0.4),
        ("noseSneerRight", 0.5),
    ]);
    assert_eq!(classify(&input), classify(&input));
    assert_eq!(classify(&input).unwrap().dominant.label(), "Angry");
}

// static display metadata for the HUD

use std::time::{Duration, Instant};

use super::Emotion;

/// How long a meter's instruction stays visible after it is selected.
pub const INSTRUCTION_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Meh,
    Smile,
    Frown,
    Angry,
    Zap,
    Ghost,
    Annoyed,
    Wind,
    Heart,
}

impl Icon {
    pub fn name(self) -> &'static str {
        match self {
            Icon::Meh => "meh",
            Icon::Smile => "smile",
            Icon::Frown => "frown",
            Icon::Angry => "angry",
            Icon::Zap => "zap",
            Icon::Ghost => "ghost",
            Icon::Annoyed => "annoyed",
            Icon::Wind => "wind",
            Icon::Heart => "heart",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct EmotionDisplay {
    pub emotion: Emotion,
    pub label: &'static str,
    pub emoji: &'static str,
    /// `#rrggbb`
    pub color: &'static str,
    pub icon: Icon,
}

impl EmotionDisplay {
    pub fn rgb(&self) -> [u8; 3] {
        // the table only holds valid colours
        hex_to_rgb(self.color).unwrap_or([0x94, 0xa3, 0xb8])
    }
}

static EMOTION_DISPLAYS: [EmotionDisplay; 9] = [
    EmotionDisplay {
        emotion: Emotion::Neutral,
        label: "Neutral",
        emoji: "😐",
        color: "#94a3b8",
        icon: Icon::Meh,
    },
    EmotionDisplay {
        emotion: Emotion::Joy,
        label: "Happy",
        emoji: "😊",
        color: "#10b981",
        icon: Icon::Smile,
    },
    EmotionDisplay {
        emotion: Emotion::Sad,
        label: "Sad",
        emoji: "😢",
        color: "#3b82f6",
        icon: Icon::Frown,
    },
    EmotionDisplay {
        emotion: Emotion::Rage,
        label: "Angry",
        emoji: "😠",
        color: "#ef4444",
        icon: Icon::Angry,
    },
    EmotionDisplay {
        emotion: Emotion::Shock,
        label: "Shocked",
        emoji: "😱",
        color: "#f59e0b",
        icon: Icon::Zap,
    },
    EmotionDisplay {
        emotion: Emotion::Fear,
        label: "Fear",
        emoji: "😨",
        color: "#7c3aed",
        icon: Icon::Ghost,
    },
    EmotionDisplay {
        emotion: Emotion::Disgust,
        label: "Disgusted",
        emoji: "🤢",
        color: "#84cc16",
        icon: Icon::Annoyed,
    },
    EmotionDisplay {
        emotion: Emotion::Puff,
        label: "Puff",
        emoji: "🐡",
        color: "#d97706",
        icon: Icon::Wind,
    },
    EmotionDisplay {
        emotion: Emotion::Kiss,
        label: "Kissing",
        emoji: "😘",
        color: "#f43f5e",
        icon: Icon::Heart,
    },
];

pub(super) fn display_for(emotion: Emotion) -> &'static EmotionDisplay {
    // every variant has exactly one row; neutral is the first
    EMOTION_DISPLAYS
        .iter()
        .find(|d| d.emotion == emotion)
        .unwrap_or(&EMOTION_DISPLAYS[0])
}

/// One of the eight progress meters under the dominant label.
#[derive(Debug, PartialEq, Eq)]
pub struct EmotionMeter {
    pub emotion: Emotion,
    pub label: &'static str,
    pub instruction: &'static str,
}

impl EmotionMeter {
    pub fn display(&self) -> &'static EmotionDisplay {
        self.emotion.display()
    }
}

/// Meters in scan order.
pub static EMOTION_METERS: [EmotionMeter; 8] = [
    EmotionMeter {
        emotion: Emotion::Joy,
        label: "Joy",
        instruction: "Smile widely and raise your cheeks!",
    },
    EmotionMeter {
        emotion: Emotion::Sad,
        label: "Sad",
        instruction: "Frown your mouth and raise inner brows.",
    },
    EmotionMeter {
        emotion: Emotion::Rage,
        label: "Rage",
        instruction: "Furrow brows and clench your jaw.",
    },
    EmotionMeter {
        emotion: Emotion::Shock,
        label: "Shock",
        instruction: "Raise brows high and open mouth!",
    },
    EmotionMeter {
        emotion: Emotion::Fear,
        label: "Fear",
        instruction: "Raise eyebrows and widen your eyes.",
    },
    EmotionMeter {
        emotion: Emotion::Disgust,
        label: "Disgust",
        instruction: "Wrinkle your nose and raise upper lip.",
    },
    EmotionMeter {
        emotion: Emotion::Puff,
        label: "Puff",
        instruction: "Puff out your cheeks like a blowfish!",
    },
    EmotionMeter {
        emotion: Emotion::Kiss,
        label: "Kiss",
        instruction: "Pucker your lips forward!",
    },
];

/// Fraction of a meter to fill for `value`, clamped to [0, 1].
pub fn meter_fill(value: f64) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0) as f32
    } else {
        0.0
    }
}

pub fn hex_to_rgb(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Instruction text of the most recently clicked meter.
#[derive(Debug, Default)]
pub struct InstructionTip {
    selected: Option<(&'static str, Instant)>,
}

impl InstructionTip {
    pub fn select(&mut self, meter: &EmotionMeter, now: Instant) {
        self.selected = Some((meter.instruction, now));
    }

    /// The instruction to show at `now`, clearing it once it has timed out.
    pub fn current(&mut self, now: Instant) -> Option<&'static str> {
        match self.selected {
            Some((text, since))
                if now.saturating_duration_since(since) < INSTRUCTION_TIMEOUT =>
            {
                Some(text)
            }
            Some(_) => {
                self.selected = None;
                None
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_emotion_has_display_row() {
        let all = [Emotion::Neutral]
            .into_iter()
            .chain(Emotion::SCORED)
            .collect::<Vec<_>>();
        for emotion in all {
            let display = display_for(emotion);
            assert_eq!(display.emotion, emotion);
            assert!(hex_to_rgb(display.color).is_some(), "{}", display.color);
        }
        assert_eq!(display_for(Emotion::Shock).label, "Shocked");
        assert_eq!(display_for(Emotion::Neutral).icon.name(), "meh");
    }

    #[test]
    fn meters_share_scan_order_and_colours() {
        for (meter, emotion) in EMOTION_METERS.iter().zip(Emotion::SCORED) {
            assert_eq!(meter.emotion, emotion);
            assert_eq!(meter.display().color, display_for(emotion).color);
        }
    }

    #[test]
    fn meter_fill_clamps() {
        assert_eq!(meter_fill(-0.2), 0.0);
        assert_eq!(meter_fill(0.4), 0.4);
        assert_eq!(meter_fill(1.4), 1.0);
        assert_eq!(meter_fill(f64::NAN), 0.0);
        assert_eq!(meter_fill(f64::INFINITY), 0.0);
    }

    #[test]
    fn parses_hex_colours() {
        assert_eq!(hex_to_rgb("#10b981"), Some([0x10, 0xb9, 0x81]));
        assert_eq!(hex_to_rgb("10b981"), None);
        assert_eq!(hex_to_rgb("#10b98"), None);
        assert_eq!(hex_to_rgb("#zzzzzz"), None);
    }

    #[test]
    fn instruction_clears_after_timeout() {
        let start = Instant::now();
        let mut tip = InstructionTip::default();
        assert_eq!(tip.current(start), None);

        tip.select(&EMOTION_METERS[6], start);
        assert_eq!(
            tip.current(start + Duration::from_secs(2)),
            Some("Puff out your cheeks like a blowfish!")
        );
        assert_eq!(tip.current(start + INSTRUCTION_TIMEOUT), None);
        // stays cleared
        assert_eq!(tip.current(start + Duration::from_secs(1)), None);
    }
}

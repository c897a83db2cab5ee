//! Side effects requested by the scheduler

use serde::Serialize;

/// Tone presets, as (frequency Hz, duration ms)
pub mod tones {
    /// Pre-roll second
    pub const COUNTDOWN: (u16, u16) = (880, 150);
    /// Pre-roll finished
    pub const GO: (u16, u16) = (1320, 400);
    /// Step ending soon
    pub const WARNING: (u16, u16) = (660, 100);
    /// Step ending now
    pub const URGENT: (u16, u16) = (990, 150);
    /// EMOM interval boundary
    pub const EMOM: (u16, u16) = (1100, 200);
    /// First beat of a bar
    pub const ACCENT: (u16, u16) = (1200, 40);
    /// Other beats
    pub const BEAT: (u16, u16) = (800, 30);
    /// Session finished
    pub const COMPLETE: (u16, u16) = (1046, 600);

    /// Vibration on completion, alternating on/off in ms
    pub const COMPLETE_VIBRATION: &[u32] = &[200, 100, 200];
}

/// Something the host should do
///
/// Effects are requests. The host executes them best-effort and never
/// reports failures back to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "effect")]
pub enum Effect {
    Speak { text: String },
    StopSpeech,
    Beep { frequency_hz: u16, duration_ms: u16 },
    Vibrate { pattern: Vec<u32> },
    Flash,
    AcquireWakeLock,
    ReleaseWakeLock,
    /// Start the beat clock from beat 0, tagging its beats with `generation`
    StartBeat { bpm: u16, generation: u32 },
    /// Change tempo from the next beat on
    RetuneBeat { bpm: u16 },
    StopBeat,
    /// Start the callout timer
    StartCallouts { interval_s: u32 },
    StopCallouts,
    /// Session reached `Complete`
    Completed,
    /// Session was stopped early and thrown away
    Discarded,
}

impl Effect {
    pub fn speak(text: impl Into<String>) -> Self {
        Effect::Speak { text: text.into() }
    }

    /// Beep with a `(frequency, duration)` preset
    pub fn tone((frequency_hz, duration_ms): (u16, u16)) -> Self {
        Effect::Beep {
            frequency_hz,
            duration_ms,
        }
    }

    pub fn vibrate(pattern: &[u32]) -> Self {
        Effect::Vibrate {
            pattern: pattern.to_vec(),
        }
    }
}

//! Compiled steps
//!
//! Steps are the atomic units of a session. Each has a kind and a duration
//! (or none, for an open-ended block). The scheduler never looks at the
//! tool config again once steps exist.

use serde::{Deserialize, Serialize};

use crate::config::settings::PREROLL_S;

/// Step kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    /// Pre-roll before the first real step
    Countdown,
    /// Work
    Active,
    /// Recovery; the only kind that may be skipped
    Rest,
    /// Random callouts while climbing
    Callout,
    /// Fixed-tempo beat
    Metronome,
    /// Beat with a tempo that changes by pattern
    VariableMetronome,
}

impl StepKind {
    /// Whether the step owns the beat clock while current
    pub fn uses_beat_clock(&self) -> bool {
        matches!(self, StepKind::Metronome | StepKind::VariableMetronome)
    }
}

/// Periodic spoken reminder within a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Seconds of step time between reminders
    pub interval: u32,
    /// Text to speak
    pub text: String,
}

/// Tempo pattern for a variable-metronome step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "kebab-case")]
pub enum TempoPattern {
    /// Alternate slow cruising moves with fast surges
    #[serde(rename_all = "camelCase")]
    SurgeCruise {
        slow_bpm: u16,
        fast_bpm: u16,
        slow_moves: u32,
        fast_moves: u32,
    },
    /// Slow down step by step until the end tempo
    #[serde(rename_all = "camelCase")]
    Deceleration {
        start_bpm: u16,
        end_bpm: u16,
        decrement_per_phase: u16,
        moves_per_phase: u32,
    },
}

impl TempoPattern {
    /// Tempo the beat clock starts at
    pub fn start_bpm(&self) -> u16 {
        match *self {
            TempoPattern::SurgeCruise { slow_bpm, .. } => slow_bpm,
            TempoPattern::Deceleration { start_bpm, .. } => start_bpm,
        }
    }
}

/// One timed (or open-ended) unit of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Step kind
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// Seconds, or `None` for an open-ended block
    pub duration: Option<u32>,
    /// Short label for display and logs
    pub label: String,
    /// Spoken when the step begins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<Reminder>,
    /// Seconds between EMOM announcements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emom_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Tempo of a fixed metronome step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<u16>,
    #[serde(flatten)]
    pub tempo: Option<TempoPattern>,
}

impl Step {
    fn new(kind: StepKind, duration: Option<u32>, label: impl Into<String>) -> Self {
        Self {
            kind,
            duration,
            label: label.into(),
            announce: None,
            reminder: None,
            emom_interval: None,
            color: None,
            bpm: None,
            tempo: None,
        }
    }

    /// The pre-roll every compiled session starts with
    pub fn preroll() -> Self {
        Self::new(StepKind::Countdown, Some(PREROLL_S), "Get ready")
            .announce("Get ready")
            .color("yellow")
    }

    /// Bounded work step
    pub fn active(duration: u32, label: impl Into<String>) -> Self {
        Self::new(StepKind::Active, Some(duration), label).color("green")
    }

    /// Work step with no end; the climber stops it
    pub fn open_ended(label: impl Into<String>) -> Self {
        Self::new(StepKind::Active, None, label).color("green")
    }

    /// Rest step
    pub fn rest(duration: u32, label: impl Into<String>) -> Self {
        Self::new(StepKind::Rest, Some(duration), label).color("blue")
    }

    /// Callout step
    pub fn callout(duration: Option<u32>, label: impl Into<String>) -> Self {
        Self::new(StepKind::Callout, duration, label).color("orange")
    }

    /// Fixed-tempo metronome step
    pub fn metronome(duration: u32, bpm: u16, label: impl Into<String>) -> Self {
        let mut step = Self::new(StepKind::Metronome, Some(duration), label).color("purple");
        step.bpm = Some(bpm);
        step
    }

    /// Variable-tempo metronome step
    pub fn variable_metronome(
        duration: u32,
        tempo: TempoPattern,
        label: impl Into<String>,
    ) -> Self {
        let mut step =
            Self::new(StepKind::VariableMetronome, Some(duration), label).color("purple");
        step.tempo = Some(tempo);
        step
    }

    /// Set the spoken announcement
    pub fn announce(mut self, text: impl Into<String>) -> Self {
        self.announce = Some(text.into());
        self
    }

    /// Attach a periodic reminder
    pub fn reminder(mut self, reminder: Option<Reminder>) -> Self {
        self.reminder = reminder;
        self
    }

    /// Attach an EMOM interval
    pub fn emom(mut self, interval: u32) -> Self {
        self.emom_interval = Some(interval);
        self
    }

    /// Override the display color
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Duration with open-ended steps counted as zero
    pub fn duration_or_zero(&self) -> u32 {
        self.duration.unwrap_or(0)
    }

    /// Whether the step is a rest
    pub fn is_rest(&self) -> bool {
        self.kind == StepKind::Rest
    }

    /// Tempo the beat clock should start at, if this step uses one
    pub fn start_bpm(&self) -> Option<u16> {
        match self.kind {
            StepKind::Metronome => self.bpm,
            StepKind::VariableMetronome => self.tempo.map(|t| t.start_bpm()),
            _ => None,
        }
    }
}

//! Mutable run state of a session

use heapless::FnvIndexSet;
use serde::{Deserialize, Serialize};

use crate::compiler::{Step, StepKind};
use crate::metronome::TempoPhase;

/// Milestones tracked per step; must be a power of two
pub const MAX_MILESTONES: usize = 8;

/// A one-time announcement within a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Milestone {
    Halfway,
    /// Seconds remaining
    Remaining(u32),
}

impl Milestone {
    /// Spoken form
    pub fn announcement(&self) -> String {
        match *self {
            Milestone::Halfway => "Halfway there".to_owned(),
            Milestone::Remaining(60) => "1 minute remaining".to_owned(),
            Milestone::Remaining(s) if s % 60 == 0 => format!("{} minutes remaining", s / 60),
            Milestone::Remaining(s) => format!("{s} seconds remaining"),
        }
    }
}

/// A step the session has left, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Index in the compiled program
    pub index: usize,
    pub label: String,
    pub kind: StepKind,
    /// Seconds spent in the step
    pub elapsed_s: u32,
    /// Left through a skip
    pub skipped: bool,
}

/// Position and per-step counters
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub step_index: usize,
    /// Zero for open-ended steps
    pub step_time_left: u32,
    pub step_elapsed: u32,
    /// Whole session, excluding paused time
    pub elapsed: u32,
    /// Active steps finished
    pub steps_completed: u32,
    /// Cleared on every step change
    pub milestones: FnvIndexSet<Milestone, MAX_MILESTONES>,
    /// Step-elapsed second of the last reminder
    pub last_reminder_at: u32,
    /// Step-elapsed second of the last EMOM announcement
    pub last_emom_at: u32,
    /// Phase fields of a variable-metronome step
    pub tempo: Option<TempoPhase>,
}

impl RunState {
    /// Reset the per-step fields for `step` at `index`
    pub fn enter(&mut self, index: usize, step: &Step) {
        self.step_index = index;
        self.step_time_left = step.duration_or_zero();
        self.step_elapsed = 0;
        self.milestones.clear();
        self.last_reminder_at = 0;
        self.last_emom_at = 0;
        self.tempo = step.tempo.map(TempoPhase::new);
    }

    /// Record `milestone`; false if it already fired this step
    pub fn mark(&mut self, milestone: Milestone) -> bool {
        // Not remembered once the set is full; each remaining-time value
        // is still only hit on one tick
        !self.milestones.contains(&milestone) && self.milestones.insert(milestone).unwrap_or(true)
    }
}

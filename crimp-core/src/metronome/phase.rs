//! Tempo phase tracking for variable-metronome steps
//!
//! Phases are measured in beats, not seconds. The tracker remembers the
//! beat index a phase started on, so the beats spent in the current phase
//! are always `index - phase_start_beat`.

use crate::compiler::TempoPattern;

/// A tempo change the host should apply and announce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseChange {
    /// New tempo for the beat clock
    pub bpm: u16,
    /// What to say about it
    pub announcement: String,
}

/// Phase state of a variable-metronome step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempoPhase {
    pattern: TempoPattern,
    current_bpm: u16,
    /// Beat index the current phase began on; negative after a resume
    phase_start_beat: i64,
    is_slow_phase: bool,
    last_beat: Option<u64>,
}

impl TempoPhase {
    /// Start tracking `pattern` from its first phase
    pub fn new(pattern: TempoPattern) -> Self {
        Self {
            pattern,
            current_bpm: pattern.start_bpm(),
            phase_start_beat: 0,
            is_slow_phase: true,
            last_beat: None,
        }
    }

    pub fn current_bpm(&self) -> u16 {
        self.current_bpm
    }

    pub fn phase_start_beat(&self) -> i64 {
        self.phase_start_beat
    }

    /// Surge-cruise only; deceleration is always "slow"
    pub fn is_slow_phase(&self) -> bool {
        self.is_slow_phase
    }

    /// Beats played so far in the current phase, including `index`
    fn beats_in_phase(&self, index: u64) -> i64 {
        index as i64 - self.phase_start_beat
    }

    /// Account for beat `index`; returns a change when a phase ends
    pub fn on_beat(&mut self, index: u64) -> Option<PhaseChange> {
        self.last_beat = Some(index);
        let in_phase = self.beats_in_phase(index);

        match self.pattern {
            TempoPattern::SurgeCruise {
                slow_bpm,
                fast_bpm,
                slow_moves,
                fast_moves,
            } => {
                let moves = if self.is_slow_phase {
                    slow_moves
                } else {
                    fast_moves
                };
                if in_phase < moves as i64 {
                    return None;
                }
                self.is_slow_phase = !self.is_slow_phase;
                self.phase_start_beat = index as i64;
                let (bpm, announcement) = if self.is_slow_phase {
                    (slow_bpm, "Cruise")
                } else {
                    (fast_bpm, "Surge")
                };
                self.current_bpm = bpm;
                Some(PhaseChange {
                    bpm,
                    announcement: announcement.to_owned(),
                })
            }
            TempoPattern::Deceleration {
                end_bpm,
                decrement_per_phase,
                moves_per_phase,
                ..
            } => {
                if self.current_bpm <= end_bpm || in_phase < moves_per_phase as i64 {
                    return None;
                }
                self.current_bpm = self
                    .current_bpm
                    .saturating_sub(decrement_per_phase)
                    .max(end_bpm);
                self.phase_start_beat = index as i64;
                let announcement = if self.current_bpm == end_bpm {
                    format!("Final tempo, {} beats per minute", self.current_bpm)
                } else {
                    format!("{} beats per minute", self.current_bpm)
                };
                Some(PhaseChange {
                    bpm: self.current_bpm,
                    announcement,
                })
            }
        }
    }

    /// The beat clock is about to restart from beat 0
    ///
    /// Shifts the phase start so beats already played in this phase still
    /// count once the restarted clock's beats come in.
    pub fn rebase_for_restart(&mut self) {
        if let Some(last) = self.last_beat.take() {
            self.phase_start_beat -= last as i64 + 1;
        }
    }
}

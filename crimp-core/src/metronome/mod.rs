//! Metronome
//!
//! The beat clock produces beats on a self-correcting grid; the tempo
//! phase tracker turns beat counts into tempo changes for the
//! variable-metronome patterns. Neither sleeps: the host feeds them
//! timestamps and beat indices.

pub mod beat_clock;
pub mod phase;

pub use beat_clock::{BeatClock, BeatEvent};
pub use phase::{PhaseChange, TempoPhase};

/// Slowest supported tempo
pub const MIN_BPM: u16 = 10;

/// Fastest supported tempo
pub const MAX_BPM: u16 = 200;

/// Beats per bar; the first beat of each bar is accented
pub const BEATS_PER_BAR: u64 = 4;

/// Clamp any tempo into the supported range
pub fn clamp_bpm(bpm: u32) -> u16 {
    bpm.clamp(MIN_BPM as u32, MAX_BPM as u32) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bpm() {
        assert_eq!(clamp_bpm(0), MIN_BPM);
        assert_eq!(clamp_bpm(72), 72);
        assert_eq!(clamp_bpm(100_000), MAX_BPM);
    }
}

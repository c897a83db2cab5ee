//! Self-correcting beat clock
//!
//! A naive metronome sleeps one interval after every beat, so timer
//! latency accumulates beat after beat. This clock instead keeps every
//! beat on an absolute grid: each firing measures how late it is against
//! the grid and shortens the next delay by that amount.
//!
//! Internally the grid is kept in microseconds so tempos that do not
//! divide a minute evenly do not pick up rounding drift.

use super::{clamp_bpm, BEATS_PER_BAR};

/// One beat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatEvent {
    /// Beats since the clock was last started, from 0
    pub index: u64,
    /// First beat of a bar
    pub accent: bool,
    /// Tempo the beat was played at
    pub bpm: u16,
    /// Start request that produced this run of beats
    pub generation: u32,
}

/// Drift-corrected periodic beat source
#[derive(Debug, Clone)]
pub struct BeatClock {
    bpm: u16,
    /// Beats emitted since the last start
    beats: u64,
    /// Grid position of the last beat, or `None` while stopped
    anchor_us: Option<u64>,
    generation: u32,
}

impl BeatClock {
    /// Create a stopped clock
    pub fn new(bpm: u16) -> Self {
        Self {
            bpm: clamp_bpm(bpm as u32),
            beats: 0,
            anchor_us: None,
            generation: 0,
        }
    }

    /// Current tempo
    pub fn bpm(&self) -> u16 {
        self.bpm
    }

    /// Beats emitted since the last start
    pub fn beat_count(&self) -> u64 {
        self.beats
    }

    /// Time between beats at the current tempo
    pub fn interval_us(&self) -> u64 {
        60_000_000 / self.bpm as u64
    }

    /// Start at `now_ms`
    ///
    /// Resets the beat counter and returns the first (accented) beat,
    /// which the host should play immediately. Every beat until the next
    /// start carries `generation`.
    pub fn start(&mut self, now_ms: u64, generation: u32) -> BeatEvent {
        self.beats = 0;
        self.generation = generation;
        self.anchor_us = Some(now_ms * 1000);
        self.emit()
    }

    /// Stop the clock; the beat counter is kept
    pub fn stop(&mut self) {
        self.anchor_us = None;
    }

    /// Change tempo
    ///
    /// Clamped to the supported range. Takes effect from the next beat.
    pub fn change_bpm(&mut self, bpm: u16) {
        self.bpm = clamp_bpm(bpm as u32);
    }

    /// Absolute time the next beat is due, in milliseconds
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.deadline_us().map(|us| us.div_ceil(1000))
    }

    /// How long to wait from `now_ms` until the next beat
    ///
    /// Never less than 1 ms, so a late clock cannot spin.
    pub fn next_delay_ms(&self, now_ms: u64) -> Option<u64> {
        self.next_deadline_ms()
            .map(|deadline| deadline.saturating_sub(now_ms).max(1))
    }

    /// The timer fired at `now_ms`
    ///
    /// Returns the beat to play, or `None` if the clock was stopped in
    /// the meantime. A firing more than a whole interval late re-anchors
    /// the grid at `now_ms` instead of rushing out catch-up beats.
    pub fn fire(&mut self, now_ms: u64) -> Option<BeatEvent> {
        let due_us = self.deadline_us()?;
        let now_us = now_ms * 1000;
        let drift_us = now_us as i64 - due_us as i64;

        self.anchor_us = if drift_us >= self.interval_us() as i64 {
            Some(now_us)
        } else {
            Some(due_us)
        };
        Some(self.emit())
    }

    fn deadline_us(&self) -> Option<u64> {
        self.anchor_us.map(|anchor| anchor + self.interval_us())
    }

    fn emit(&mut self) -> BeatEvent {
        let index = self.beats;
        self.beats += 1;
        BeatEvent {
            index,
            accent: index % BEATS_PER_BAR == 0,
            bpm: self.bpm,
            generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_start_emits_accented_beat() {
        let mut clock = BeatClock::new(120);
        let beat = clock.start(1_000, 7);
        assert_eq!(beat.index, 0);
        assert!(beat.accent);
        assert_eq!(clock.next_deadline_ms(), Some(1_500));
        assert_eq!(clock.fire(1_500).map(|b| b.generation), Some(7));
    }

    #[test]
    fn test_accent_every_fourth_beat() {
        let mut clock = BeatClock::new(60);
        clock.start(0, 1);
        let accents: Vec<bool> = (1..=8)
            .map(|n| clock.fire(n * 1000).unwrap().accent)
            .collect();
        assert_eq!(
            accents,
            [false, false, false, true, false, false, false, true]
        );
    }

    #[test]
    fn test_late_fire_shortens_next_delay() {
        let mut clock = BeatClock::new(60);
        clock.start(0, 1);
        // Fired 30 ms late
        clock.fire(1_030).unwrap();
        assert_eq!(clock.next_delay_ms(1_030), Some(970));
    }

    #[test]
    fn test_delay_never_below_one_ms() {
        let mut clock = BeatClock::new(60);
        clock.start(0, 1);
        assert_eq!(clock.next_delay_ms(999), Some(1));
        assert_eq!(clock.next_delay_ms(1_500), Some(1));
    }

    #[test]
    fn test_stall_reanchors_grid() {
        let mut clock = BeatClock::new(60);
        clock.start(0, 1);
        // Three seconds late: one beat, then a fresh grid
        clock.fire(4_000).unwrap();
        assert_eq!(clock.next_deadline_ms(), Some(5_000));
    }

    #[test]
    fn test_stop_keeps_count() {
        let mut clock = BeatClock::new(100);
        clock.start(0, 1);
        clock.fire(600).unwrap();
        clock.stop();
        assert_eq!(clock.beat_count(), 2);
        assert!(clock.fire(1_200).is_none());
        assert_eq!(clock.next_deadline_ms(), None);

        clock.start(5_000, 1);
        assert_eq!(clock.beat_count(), 1);
    }

    #[test]
    fn test_change_bpm_clamps_and_applies_next() {
        let mut clock = BeatClock::new(60);
        clock.start(0, 1);
        clock.change_bpm(250);
        assert_eq!(clock.bpm(), 200);
        assert_eq!(clock.next_deadline_ms(), Some(300));
        clock.change_bpm(1);
        assert_eq!(clock.bpm(), 10);
    }

    #[test]
    fn test_uneven_tempo_has_no_rounding_drift() {
        let mut clock = BeatClock::new(70);
        clock.start(0, 1);
        for _ in 0..70 {
            let due = clock.next_deadline_ms().unwrap();
            clock.fire(due).unwrap();
        }
        // 70 beats at 70 bpm is exactly one minute
        assert!(clock.next_deadline_ms().unwrap().abs_diff(60_000 + 857) <= 1);
    }

    proptest! {
        #[test]
        fn prop_hundred_beats_stay_within_one_interval(
            bpm in 30u16..=200,
            latencies in proptest::collection::vec(0u64..40, 100),
        ) {
            let mut clock = BeatClock::new(bpm);
            let start = 10_000u64;
            clock.start(start, 1);
            let mut now = start;
            for latency in &latencies {
                let delay = clock.next_delay_ms(now).unwrap();
                now += delay + latency;
                clock.fire(now).unwrap();
            }
            let interval_ms = clock.interval_us() as f64 / 1000.0;
            let theoretical = start as f64 + 100.0 * interval_ms;
            let drift = (now as f64 - theoretical).abs();
            prop_assert!(drift < interval_ms, "drift {drift} >= interval {interval_ms}");
            prop_assert_eq!(clock.beat_count(), 101);
        }
    }
}

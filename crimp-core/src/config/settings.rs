//! Engine tuning knobs
//!
//! The early-exit threshold and milestone gates are heuristics. They live
//! here as named values so a host can tune them without touching the
//! scheduler.

use serde::{Deserialize, Serialize};

/// Seconds of countdown before the first real step
pub const PREROLL_S: u32 = 5;

/// Duration used when nothing in the config says how long to run
pub const FALLBACK_DURATION_S: u32 = 600;

/// A "N seconds remaining" announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneThreshold {
    /// Remaining seconds at which the announcement fires
    pub remaining_s: u32,
    /// Step must be strictly longer than this for the announcement to fire
    pub min_duration_s: u32,
}

impl MilestoneThreshold {
    /// Create a threshold
    pub const fn new(remaining_s: u32, min_duration_s: u32) -> Self {
        Self {
            remaining_s,
            min_duration_s,
        }
    }
}

/// Scheduler settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Stopping before this many elapsed seconds discards the session
    pub early_exit_threshold_s: u32,
    /// Minimum step duration for the "halfway" announcement
    pub halfway_min_duration_s: u32,
    /// Fixed remaining-time announcements, checked in order
    pub milestones: Vec<MilestoneThreshold>,
    /// Low-urgency beeps start at this many seconds remaining
    pub warning_window_s: u32,
    /// High-urgency beeps start at this many seconds remaining
    pub urgent_window_s: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            early_exit_threshold_s: 10,
            halfway_min_duration_s: 120,
            milestones: vec![
                MilestoneThreshold::new(300, 360),
                MilestoneThreshold::new(120, 180),
                MilestoneThreshold::new(60, 90),
                MilestoneThreshold::new(30, 45),
            ],
            warning_window_s: 10,
            urgent_window_s: 3,
        }
    }
}

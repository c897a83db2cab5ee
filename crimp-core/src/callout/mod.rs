//! Random callouts
//!
//! Builds the phrases shouted at a climber mid-route ("Left crimp",
//! "Right foot high"). Timing lives with the host; this module only
//! decides what to say and remembers what it said.

pub mod generator;

pub use generator::{CalloutGenerator, CalloutSource, DEFAULT_INTERVAL_S, HISTORY_LEN};

//! Session scheduler
//!
//! Walks a compiled program one heartbeat at a time. Beats and callout
//! timers are owned by the host; the scheduler only asks for them to be
//! started, retuned or stopped through [`Effect`]s.

pub mod effect;
pub mod run;
pub mod session;

pub use effect::{tones, Effect};
pub use run::{LogEntry, Milestone, RunState, MAX_MILESTONES};
pub use session::Session;

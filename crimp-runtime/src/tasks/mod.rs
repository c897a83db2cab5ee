//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod beat;
pub mod callout;
pub mod controller;
pub mod heartbeat;

pub use beat::beat_task;
pub use callout::callout_task;
pub use controller::{controller_task, HostController};
pub use heartbeat::heartbeat_task;

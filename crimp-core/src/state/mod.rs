//! State machine for session execution
//!
//! The session lifecycle is explicit, finite and deterministic. The
//! scheduler owns one `SessionState` and only moves it through
//! `transition`.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::SessionState;

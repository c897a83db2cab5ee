//! Host-agnostic core logic for the Crimp training-tool engine
//!
//! This crate contains all session logic that does not depend on a
//! particular host, clock or audio stack:
//!
//! - Configuration map, tool definitions and engine settings
//! - Step compiler (tool + config -> ordered, timed steps)
//! - Session state machine
//! - Session scheduler (heartbeat-driven step execution)
//! - Drift-corrected metronome beat clock
//! - Random callout generator
//! - Completion record handed to a session recorder
//!
//! Nothing in here sleeps or spawns. Every operation takes the current
//! input (a tick, a beat, a user action) and returns the effects the host
//! should perform.

#![deny(unsafe_code)]

pub mod callout;
pub mod compiler;
pub mod config;
pub mod metronome;
pub mod record;
pub mod scheduler;
pub mod state;

//! Crimp cue adapter layer
//!
//! This crate defines the traits a host implements to turn engine effects
//! into something the climber can hear, feel or see. The engine itself
//! never calls these directly; the runtime maps each effect onto one call
//! and swallows whatever error comes back.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Runtime (crimp-runtime, etc.)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  crimp-cue (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ crimp-cue-    │       │  mobile /     │
//! │    term       │       │  browser host │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`speech::Speech`] - Spoken announcements
//! - [`tone::Tone`], [`tone::Flash`] - Beeps and visual flashes
//! - [`haptics::Haptics`] - Vibration patterns
//! - [`wake::WakeLock`] - Keeping the screen awake while running
//! - [`CueSink`] - Everything above, bundled

#![deny(unsafe_code)]

pub mod haptics;
pub mod speech;
pub mod tone;
pub mod wake;

pub use haptics::Haptics;
pub use speech::Speech;
pub use tone::{Flash, Tone};
pub use wake::WakeLock;

/// Errors a cue adapter may report
///
/// None of these are fatal to a session. Callers log and move on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CueError {
    /// The output device is missing or was never initialised
    #[error("cue output unavailable")]
    Unavailable,
    /// The platform refused the request (permissions, focus, policy)
    #[error("cue request denied: {0}")]
    Denied(String),
    /// Writing to the output failed
    #[error("cue output failed: {0}")]
    Io(String),
}

/// A complete cue adapter
///
/// Blanket-implemented for any type providing every individual trait.
pub trait CueSink: Speech + Tone + Flash + Haptics + WakeLock {}

impl<T: Speech + Tone + Flash + Haptics + WakeLock> CueSink for T {}

//! Inter-task communication channels
//!
//! Every timer and the stdin reader post onto `SESSION_EVENTS`; only the
//! controller task receives from it, so the session has one writer.
//! Timer tasks are driven by latest-wins signals from the controller.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crimp_core::metronome::BeatEvent;

/// Channel capacity for session events
const SESSION_CHANNEL_SIZE: usize = 16;

/// User commands from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Pause,
    Resume,
    Skip,
    Stop,
}

/// Everything the controller reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMessage {
    /// One-second heartbeat
    Tick,
    /// Beat from the beat clock
    Beat(BeatEvent),
    /// Callout interval elapsed
    CalloutDue,
    /// Keyboard input
    Command(UserCommand),
}

/// Beat task commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatCommand {
    Start { bpm: u16, generation: u32 },
    Retune { bpm: u16 },
    Stop,
}

/// Callout task commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalloutCommand {
    Start { interval_s: u32 },
    Stop,
}

/// Session events for the controller
pub static SESSION_EVENTS: Channel<CriticalSectionRawMutex, SessionMessage, SESSION_CHANNEL_SIZE> =
    Channel::new();

/// Heartbeat on (true) or off (false)
pub static HEARTBEAT_CMD: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Beat clock command (updated by controller)
pub static BEAT_CMD: Signal<CriticalSectionRawMutex, BeatCommand> = Signal::new();

/// Callout timer command (updated by controller)
pub static CALLOUT_CMD: Signal<CriticalSectionRawMutex, CalloutCommand> = Signal::new();

//! Tone and visual flash output

use crate::CueError;

/// Audible beeps
pub trait Tone {
    /// Play a sine tone of `frequency_hz` for `duration_ms`
    fn beep(&mut self, frequency_hz: u16, duration_ms: u16) -> Result<(), CueError>;
}

/// Brief full-screen flash, paired with beat or step cues
pub trait Flash {
    /// Flash the screen once
    ///
    /// Hosts without a screen may treat this as a no-op.
    fn flash(&mut self) -> Result<(), CueError> {
        Ok(())
    }
}

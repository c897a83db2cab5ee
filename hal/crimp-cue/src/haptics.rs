//! Vibration output

use crate::CueError;

/// Vibration motor
pub trait Haptics {
    /// Play a vibration pattern
    ///
    /// `pattern` alternates on/off durations in milliseconds, starting with on.
    fn vibrate(&mut self, pattern: &[u32]) -> Result<(), CueError>;
}

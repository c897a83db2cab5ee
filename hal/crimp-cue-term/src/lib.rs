//! Terminal cue adapter
//!
//! Renders cues as text lines on any [`std::io::Write`]. Speech is printed,
//! tones ring the terminal bell, vibration and flashes are drawn as short
//! markers. Useful for running sessions from a laptop next to the wall and
//! for scripted runs where the output is captured.

#![deny(unsafe_code)]

use std::io::Write;

use crimp_cue::{CueError, Flash, Haptics, Speech, Tone, WakeLock};
use tracing::trace;

/// ASCII bell
const BELL: &str = "\x07";

/// Cue adapter writing to a terminal (or any writer)
pub struct TerminalCues<W: Write> {
    out: W,
    /// Ring the bell for tones
    bell: bool,
    wake_held: bool,
}

impl<W: Write> TerminalCues<W> {
    /// Create an adapter over `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            bell: true,
            wake_held: false,
        }
    }

    /// Disable the terminal bell (tones are still printed)
    pub fn without_bell(mut self) -> Self {
        self.bell = false;
        self
    }

    /// Consume the adapter and return the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) -> Result<(), CueError> {
        writeln!(self.out, "{text}").map_err(|e| CueError::Io(e.to_string()))?;
        self.out.flush().map_err(|e| CueError::Io(e.to_string()))
    }
}

impl<W: Write> Speech for TerminalCues<W> {
    fn speak(&mut self, text: &str) -> Result<(), CueError> {
        self.line(&format!(">> {text}"))
    }

    fn stop_speech(&mut self) -> Result<(), CueError> {
        // Printed lines cannot be taken back
        Ok(())
    }
}

impl<W: Write> Tone for TerminalCues<W> {
    fn beep(&mut self, frequency_hz: u16, duration_ms: u16) -> Result<(), CueError> {
        trace!(frequency_hz, duration_ms, "beep");
        let marker = if frequency_hz >= 1000 { "BEEP" } else { "beep" };
        if self.bell {
            self.line(&format!("{BELL}[{marker}]"))
        } else {
            self.line(&format!("[{marker}]"))
        }
    }
}

impl<W: Write> Flash for TerminalCues<W> {
    fn flash(&mut self) -> Result<(), CueError> {
        self.line("[*]")
    }
}

impl<W: Write> Haptics for TerminalCues<W> {
    fn vibrate(&mut self, pattern: &[u32]) -> Result<(), CueError> {
        let pulses = pattern.iter().step_by(2).count();
        self.line(&format!("[bzz x{pulses}]"))
    }
}

impl<W: Write> WakeLock for TerminalCues<W> {
    fn acquire(&mut self) -> Result<(), CueError> {
        self.wake_held = true;
        Ok(())
    }

    fn release(&mut self) -> Result<(), CueError> {
        self.wake_held = false;
        Ok(())
    }

    fn is_held(&self) -> bool {
        self.wake_held
    }
}

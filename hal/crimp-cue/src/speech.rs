//! Speech output

use crate::CueError;

/// Text-to-speech output
pub trait Speech {
    /// Queue `text` for speaking
    ///
    /// Implementations should not block until the utterance finishes.
    fn speak(&mut self, text: &str) -> Result<(), CueError>;

    /// Cancel whatever is being spoken and drop the queue
    fn stop_speech(&mut self) -> Result<(), CueError>;
}

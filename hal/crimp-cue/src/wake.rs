//! Screen wake lock

use crate::CueError;

/// Keeps the display awake while a session runs
pub trait WakeLock {
    /// Acquire the lock
    ///
    /// Acquiring an already held lock must succeed.
    fn acquire(&mut self) -> Result<(), CueError>;

    /// Release the lock
    ///
    /// Releasing a lock that is not held must succeed.
    fn release(&mut self) -> Result<(), CueError>;

    /// Whether the lock is currently held
    fn is_held(&self) -> bool;
}

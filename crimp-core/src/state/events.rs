//! Events that trigger session state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Execution control events
    /// User started the session
    Start,
    /// User paused
    Pause,
    /// User resumed a session paused during a work or rest step
    Resume,
    /// User resumed a session paused during the pre-roll
    ResumeCountdown,
    /// User stopped after the early-exit threshold
    StopLate,
    /// User stopped before the early-exit threshold
    StopEarly,

    // Scheduler events
    /// Pre-roll countdown reached zero
    CountdownFinished,
    /// Last step finished
    Finish,
}

//! Session state machine definition
//!
//! Every cue the scheduler emits is a function of the current state and
//! the step being run.

use super::events::Event;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Program compiled, nothing started
    #[default]
    Idle,
    /// Pre-roll step counting down
    Countdown,
    /// Work and rest steps executing
    Running,
    /// Execution paused by user
    Paused,
    /// Ran to the end or stopped after the early-exit threshold
    Complete,
    /// Stopped before the early-exit threshold; nothing is recorded
    Discarded,
}

impl SessionState {
    /// Check if the heartbeat should advance time in this state
    pub fn is_ticking(&self) -> bool {
        matches!(self, SessionState::Countdown | SessionState::Running)
    }

    /// Check if a stop request is meaningful
    pub fn can_stop(&self) -> bool {
        matches!(
            self,
            SessionState::Countdown | SessionState::Running | SessionState::Paused
        )
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use SessionState::*;

        match (self, event) {
            // Idle transitions
            (Idle, Start) => Countdown,

            // Countdown transitions
            (Countdown, CountdownFinished) => Running,
            (Countdown, Pause) => Paused,
            (Countdown, StopEarly) => Discarded,
            (Countdown, StopLate) => Complete,
            // Single-step programs never leave the pre-roll
            (Countdown, Finish) => Complete,

            // Running transitions
            (Running, Pause) => Paused,
            (Running, Finish) => Complete,
            (Running, StopLate) => Complete,
            (Running, StopEarly) => Discarded,

            // Paused transitions
            (Paused, Resume) => Running,
            (Paused, ResumeCountdown) => Countdown,
            (Paused, StopLate) => Complete,
            (Paused, StopEarly) => Discarded,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let state = SessionState::Idle
            .transition(Event::Start)
            .transition(Event::CountdownFinished)
            .transition(Event::Finish);
        assert_eq!(state, SessionState::Complete);
    }

    #[test]
    fn test_pause_resume_round_trip() {
        let paused = SessionState::Running.transition(Event::Pause);
        assert_eq!(paused, SessionState::Paused);
        assert_eq!(paused.transition(Event::Resume), SessionState::Running);

        let paused = SessionState::Countdown.transition(Event::Pause);
        assert_eq!(
            paused.transition(Event::ResumeCountdown),
            SessionState::Countdown
        );
    }

    #[test]
    fn test_stop_from_active_states() {
        for state in [
            SessionState::Countdown,
            SessionState::Running,
            SessionState::Paused,
        ] {
            assert!(state.can_stop());
            assert_eq!(state.transition(Event::StopEarly), SessionState::Discarded);
            assert_eq!(state.transition(Event::StopLate), SessionState::Complete);
        }
    }

    #[test]
    fn test_terminal_states_absorb() {
        let events = [
            Event::Start,
            Event::Pause,
            Event::Resume,
            Event::StopLate,
            Event::StopEarly,
            Event::Finish,
        ];
        for state in [SessionState::Complete, SessionState::Discarded] {
            for event in events {
                assert_eq!(state.transition(event), state);
            }
        }
    }

    #[test]
    fn test_paused_does_not_tick() {
        assert!(!SessionState::Paused.is_ticking());
        assert!(!SessionState::Idle.is_ticking());
        assert!(SessionState::Running.is_ticking());
        assert!(SessionState::Countdown.is_ticking());
    }

    #[test]
    fn test_idle_ignores_pause() {
        assert_eq!(SessionState::Idle.transition(Event::Pause), SessionState::Idle);
        assert!(!SessionState::Idle.can_stop());
    }
}

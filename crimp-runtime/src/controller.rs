//! Session controller
//!
//! The controller is the single owner of the session:
//! - Feeds it heartbeat ticks, beats, callout firings and user commands
//! - Plays the resulting effects on the cue adapter
//! - Turns timer effects into commands for the timer tasks
//! - Hands the completion record to the recorder

use tracing::{debug, info};

use crimp_core::record::{RecordError, SessionRecord, SessionRecorder};
use crimp_core::scheduler::{Effect, Session};
use crimp_cue::{CueError, CueSink, Flash, Haptics, Speech, Tone, WakeLock};

use crate::channels::{BeatCommand, CalloutCommand, SessionMessage, UserCommand};

/// How the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Completed,
    Discarded,
}

/// A command for one of the timer tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Beat(BeatCommand),
    Callout(CalloutCommand),
}

/// Result of handling one message
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Timer commands, in order
    pub timers: Vec<TimerCommand>,
    /// Set once the session is over
    pub end: Option<SessionEnd>,
}

/// Coordinates the session with its host
pub struct Controller<C: CueSink, R: SessionRecorder> {
    session: Session,
    cues: C,
    recorder: Option<R>,
    tool_id: Option<u64>,
    notes: Option<String>,
    /// Record waiting to be handed off
    pending: Option<SessionRecord>,
}

impl<C: CueSink, R: SessionRecorder> Controller<C, R> {
    /// Create a controller
    ///
    /// Without a recorder, completed sessions are only logged.
    pub fn new(session: Session, cues: C, recorder: Option<R>) -> Self {
        Self {
            session,
            cues,
            recorder,
            tool_id: None,
            notes: None,
            pending: None,
        }
    }

    /// Catalog id and free-text notes for the record
    pub fn with_record_info(mut self, tool_id: Option<u64>, notes: Option<String>) -> Self {
        self.tool_id = tool_id;
        self.notes = notes;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Record still waiting for a successful hand-off
    pub fn pending_record(&self) -> Option<&SessionRecord> {
        self.pending.as_ref()
    }

    /// Start the session
    pub fn start(&mut self) -> Outcome {
        let effects = self.session.start();
        self.apply(effects)
    }

    /// Handle one message from the event channel
    pub fn handle(&mut self, message: SessionMessage) -> Outcome {
        let effects = match message {
            SessionMessage::Tick => self.session.tick(),
            SessionMessage::Beat(beat) => self.session.on_beat(beat),
            SessionMessage::CalloutDue => self.session.on_callout_due(),
            SessionMessage::Command(command) => {
                debug!(?command, "user command");
                match command {
                    UserCommand::Pause => self.session.pause(),
                    UserCommand::Resume => self.session.resume(),
                    UserCommand::Skip => self.session.skip(),
                    UserCommand::Stop => self.session.stop(),
                }
            }
        };
        self.apply(effects)
    }

    /// Hand the completion record to the recorder
    ///
    /// On failure the record stays pending so the call can be retried.
    pub fn save_record(&mut self) -> Result<(), RecordError> {
        let Some(record) = self.pending.as_ref() else {
            return Ok(());
        };
        let Some(recorder) = self.recorder.as_mut() else {
            info!(
                duration_s = record.duration_seconds,
                rounds = record.results.rounds,
                "session complete (not recorded)"
            );
            self.pending = None;
            return Ok(());
        };
        recorder.record(record)?;
        info!(
            duration_s = record.duration_seconds,
            rounds = record.results.rounds,
            "session recorded"
        );
        self.pending = None;
        Ok(())
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Outcome {
        let mut outcome = Outcome::default();
        for effect in effects {
            match effect {
                Effect::Speak { text } => cue("speak", self.cues.speak(&text)),
                Effect::StopSpeech => cue("stop_speech", self.cues.stop_speech()),
                Effect::Beep {
                    frequency_hz,
                    duration_ms,
                } => cue("beep", self.cues.beep(frequency_hz, duration_ms)),
                Effect::Vibrate { pattern } => cue("vibrate", self.cues.vibrate(&pattern)),
                Effect::Flash => cue("flash", self.cues.flash()),
                Effect::AcquireWakeLock => cue("wake_lock", self.cues.acquire()),
                Effect::ReleaseWakeLock => cue("wake_release", self.cues.release()),
                Effect::StartBeat { bpm, generation } => outcome
                    .timers
                    .push(TimerCommand::Beat(BeatCommand::Start { bpm, generation })),
                Effect::RetuneBeat { bpm } => outcome
                    .timers
                    .push(TimerCommand::Beat(BeatCommand::Retune { bpm })),
                Effect::StopBeat => outcome.timers.push(TimerCommand::Beat(BeatCommand::Stop)),
                Effect::StartCallouts { interval_s } => outcome
                    .timers
                    .push(TimerCommand::Callout(CalloutCommand::Start { interval_s })),
                Effect::StopCallouts => outcome
                    .timers
                    .push(TimerCommand::Callout(CalloutCommand::Stop)),
                Effect::Completed => {
                    self.pending = self.session.record(self.tool_id, self.notes.clone());
                    outcome.end = Some(SessionEnd::Completed);
                }
                Effect::Discarded => outcome.end = Some(SessionEnd::Discarded),
            }
        }
        outcome
    }
}

/// Cue failures never reach the session
fn cue(name: &'static str, result: Result<(), CueError>) {
    if let Err(error) = result {
        debug!(cue = name, %error, "cue failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crimp_core::compiler::{compile, Program, Step};
    use crimp_core::config::{Config, EngineSettings, ToolDefinition, ToolType};
    use crimp_core::metronome::BeatEvent;

    /// Cue adapter that logs calls and can be told to fail
    #[derive(Default)]
    struct MockCues {
        calls: Vec<String>,
        fail: bool,
        held: bool,
    }

    impl MockCues {
        fn call(&mut self, call: String) -> Result<(), CueError> {
            self.calls.push(call);
            if self.fail {
                Err(CueError::Unavailable)
            } else {
                Ok(())
            }
        }
    }

    impl Speech for MockCues {
        fn speak(&mut self, text: &str) -> Result<(), CueError> {
            self.call(format!("speak:{text}"))
        }
        fn stop_speech(&mut self) -> Result<(), CueError> {
            self.call("stop_speech".into())
        }
    }

    impl Tone for MockCues {
        fn beep(&mut self, frequency_hz: u16, _duration_ms: u16) -> Result<(), CueError> {
            self.call(format!("beep:{frequency_hz}"))
        }
    }

    impl Flash for MockCues {}

    impl Haptics for MockCues {
        fn vibrate(&mut self, pattern: &[u32]) -> Result<(), CueError> {
            self.call(format!("vibrate:{}", pattern.len()))
        }
    }

    impl WakeLock for MockCues {
        fn acquire(&mut self) -> Result<(), CueError> {
            self.held = true;
            self.call("acquire".into())
        }
        fn release(&mut self) -> Result<(), CueError> {
            self.held = false;
            self.call("release".into())
        }
        fn is_held(&self) -> bool {
            self.held
        }
    }

    #[derive(Default)]
    struct MockRecorder {
        saved: Vec<SessionRecord>,
        failures_left: u32,
    }

    impl SessionRecorder for MockRecorder {
        fn record(&mut self, record: &SessionRecord) -> Result<(), RecordError> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(RecordError::Rejected("offline".into()));
            }
            self.saved.push(record.clone());
            Ok(())
        }
    }

    fn program(steps: Vec<Step>) -> Program {
        let mut all = vec![Step::preroll()];
        all.extend(steps);
        Program {
            steps: all,
            recipe: None,
            diagnostics: Vec::new(),
            config: Config::new(),
        }
    }

    fn controller(
        steps: Vec<Step>,
        cues: MockCues,
        recorder: MockRecorder,
    ) -> Controller<MockCues, MockRecorder> {
        let session = Session::new(program(steps), EngineSettings::default(), 0);
        Controller::new(session, cues, Some(recorder))
    }

    fn run_until_end(controller: &mut Controller<MockCues, MockRecorder>) -> Option<SessionEnd> {
        for _ in 0..10_000 {
            let outcome = controller.handle(SessionMessage::Tick);
            if outcome.end.is_some() {
                return outcome.end;
            }
        }
        None
    }

    #[test]
    fn test_effects_reach_cues() {
        let mut controller = controller(
            vec![Step::active(10, "Hang")],
            MockCues::default(),
            MockRecorder::default(),
        );
        let outcome = controller.start();
        assert!(outcome.timers.is_empty());
        assert_eq!(controller.cues.calls, vec!["acquire", "speak:Get ready"]);
        assert!(controller.cues.is_held());
    }

    #[test]
    fn test_cue_failures_swallowed() {
        let cues = MockCues {
            fail: true,
            ..MockCues::default()
        };
        let mut controller = controller(vec![Step::active(10, "Hang")], cues, MockRecorder::default());
        controller.start();
        assert_eq!(run_until_end(&mut controller), Some(SessionEnd::Completed));
        assert!(controller.cues.calls.iter().any(|c| c == "release"));
    }

    #[test]
    fn test_metronome_timer_commands() {
        let mut controller = controller(
            vec![Step::metronome(3, 72, "Pace")],
            MockCues::default(),
            MockRecorder::default(),
        );
        controller.start();
        let mut timers = Vec::new();
        for _ in 0..5 {
            timers.extend(controller.handle(SessionMessage::Tick).timers);
        }
        assert_eq!(
            timers,
            vec![TimerCommand::Beat(BeatCommand::Start {
                bpm: 72,
                generation: 1
            })]
        );

        controller.handle(SessionMessage::Beat(BeatEvent {
            index: 0,
            accent: true,
            bpm: 72,
            generation: 1,
        }));
        assert_eq!(controller.cues.calls.last().map(String::as_str), Some("beep:1200"));

        let outcome = controller.handle(SessionMessage::Command(UserCommand::Pause));
        assert_eq!(outcome.timers, vec![TimerCommand::Beat(BeatCommand::Stop)]);
    }

    #[test]
    fn test_callout_timer_commands() {
        let tool = ToolDefinition::new("Callouts", ToolType::Callout);
        let config = Config::new().with("duration", 30).with("interval", 6);
        let session = Session::new(compile(&tool, &config), EngineSettings::default(), 2);
        let mut controller: Controller<MockCues, MockRecorder> =
            Controller::new(session, MockCues::default(), None);
        controller.start();
        let mut timers = Vec::new();
        for _ in 0..5 {
            timers.extend(controller.handle(SessionMessage::Tick).timers);
        }
        assert_eq!(
            timers,
            vec![TimerCommand::Callout(CalloutCommand::Start { interval_s: 6 })]
        );
        let before = controller.cues.calls.len();
        controller.handle(SessionMessage::CalloutDue);
        assert_eq!(controller.cues.calls.len(), before + 1);
    }

    #[test]
    fn test_completion_is_recorded() {
        let mut controller = controller(
            vec![Step::active(3, "Hang"), Step::rest(2, "Rest"), Step::active(3, "Hang")],
            MockCues::default(),
            MockRecorder::default(),
        )
        .with_record_info(Some(12), Some("good skin".into()));
        controller.start();
        assert_eq!(run_until_end(&mut controller), Some(SessionEnd::Completed));
        assert!(controller.pending_record().is_some());

        controller.save_record().unwrap();
        assert!(controller.pending_record().is_none());
        let saved = &controller.recorder.as_ref().unwrap().saved;
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].tool_id, Some(12));
        assert_eq!(saved[0].duration_seconds, 13);
        assert_eq!(saved[0].results.rounds, 2);
        assert_eq!(saved[0].notes.as_deref(), Some("good skin"));
    }

    #[test]
    fn test_failed_save_kept_for_retry() {
        let recorder = MockRecorder {
            failures_left: 1,
            ..MockRecorder::default()
        };
        let mut controller = controller(vec![Step::active(3, "Hang")], MockCues::default(), recorder);
        controller.start();
        run_until_end(&mut controller);

        assert!(controller.save_record().is_err());
        let kept = controller.pending_record().cloned();
        assert!(kept.is_some());
        assert_eq!(controller.session().run().elapsed, 8);

        controller.save_record().unwrap();
        assert_eq!(controller.recorder.as_ref().unwrap().saved[0], kept.unwrap());
    }

    #[test]
    fn test_early_stop_discards_without_record() {
        let mut controller = controller(
            vec![Step::active(60, "Hang")],
            MockCues::default(),
            MockRecorder::default(),
        );
        controller.start();
        controller.handle(SessionMessage::Tick);
        let outcome = controller.handle(SessionMessage::Command(UserCommand::Stop));
        assert_eq!(outcome.end, Some(SessionEnd::Discarded));
        assert!(controller.pending_record().is_none());
        controller.save_record().unwrap();
        assert!(controller.recorder.as_ref().unwrap().saved.is_empty());
        assert!(!controller.cues.is_held());
    }
}

//! Heartbeat-driven session execution
//!
//! `Session` is the single owner of the run state. Heartbeat ticks, user
//! actions, beat events and callout timer firings all come through `&mut
//! self` methods, each returning the effects for the host to perform.

use tracing::{debug, info};

use super::effect::{tones, Effect};
use super::run::{LogEntry, Milestone, RunState};
use crate::callout::CalloutGenerator;
use crate::compiler::{Program, Step, StepKind};
use crate::config::EngineSettings;
use crate::metronome::BeatEvent;
use crate::record::{SessionRecord, SessionResults};
use crate::state::{Event, SessionState};

/// Tempo used when a beat step carries none
const DEFAULT_BPM: u16 = 60;

/// Seconds of pre-roll that get a spoken number
const COUNTDOWN_SPOKEN_S: u32 = 3;

/// A running training session
#[derive(Debug)]
pub struct Session {
    program: Program,
    settings: EngineSettings,
    state: SessionState,
    run: RunState,
    callouts: CalloutGenerator,
    log: Vec<LogEntry>,
    /// Tag of the latest beat clock start; older beats are stale
    beat_generation: u32,
}

impl Session {
    /// Prepare `program` for execution
    ///
    /// `seed` drives the callout generator.
    pub fn new(program: Program, settings: EngineSettings, seed: u64) -> Self {
        let callouts = CalloutGenerator::from_config(&program.config, seed);
        Self {
            program,
            settings,
            state: SessionState::Idle,
            run: RunState::default(),
            callouts,
            log: Vec::new(),
            beat_generation: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn callouts(&self) -> &CalloutGenerator {
        &self.callouts
    }

    /// Steps left so far, in order
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Current step, if the session has started
    pub fn current_step(&self) -> Option<&Step> {
        if self.state == SessionState::Idle {
            return None;
        }
        self.program.steps.get(self.run.step_index)
    }

    /// Begin the pre-roll
    pub fn start(&mut self) -> Vec<Effect> {
        if self.state != SessionState::Idle || self.program.steps.is_empty() {
            return Vec::new();
        }
        self.apply(Event::Start);
        info!(steps = self.program.steps.len(), "session started");

        let mut effects = vec![Effect::AcquireWakeLock];
        self.enter_step(0, &mut effects);
        if self.program.steps[0].kind != StepKind::Countdown {
            self.apply(Event::CountdownFinished);
        }
        effects
    }

    /// Advance by one second
    pub fn tick(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.state.is_ticking() {
            return effects;
        }
        let Some(step) = self.program.steps.get(self.run.step_index) else {
            return effects;
        };
        let (kind, duration) = (step.kind, step.duration);

        self.run.elapsed = self.run.elapsed.saturating_add(1);
        self.run.step_elapsed = self.run.step_elapsed.saturating_add(1);

        let Some(duration) = duration else {
            // Open-ended: runs until stopped
            return effects;
        };
        self.run.step_time_left = self.run.step_time_left.saturating_sub(1);
        let left = self.run.step_time_left;

        if kind == StepKind::Countdown {
            if left == 0 {
                effects.push(Effect::tone(tones::GO));
            } else if left <= COUNTDOWN_SPOKEN_S {
                effects.push(Effect::tone(tones::COUNTDOWN));
                effects.push(Effect::speak(left.to_string()));
            }
        } else if left > 0 {
            self.warning_beeps(left, &mut effects);
            self.milestones(duration, left, &mut effects);
            self.reminder(&mut effects);
            self.emom(&mut effects);
        }

        if left == 0 {
            self.advance(false, &mut effects);
        }
        effects
    }

    /// Freeze the session
    pub fn pause(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.state.is_ticking() {
            return effects;
        }
        self.apply(Event::Pause);
        debug!(step = self.run.step_index, "session paused");

        effects.push(Effect::StopSpeech);
        self.stop_side_timers(&mut effects);
        if let Some(tempo) = self.run.tempo.as_mut() {
            tempo.rebase_for_restart();
        }
        effects.push(Effect::ReleaseWakeLock);
        effects
    }

    /// Continue a paused session
    pub fn resume(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.state != SessionState::Paused {
            return effects;
        }
        let in_countdown = self
            .current_step()
            .is_some_and(|step| step.kind == StepKind::Countdown);
        self.apply(if in_countdown {
            Event::ResumeCountdown
        } else {
            Event::Resume
        });
        debug!(step = self.run.step_index, "session resumed");

        effects.push(Effect::AcquireWakeLock);
        self.start_side_timers(&mut effects);
        effects
    }

    /// End the session at the user's request
    ///
    /// Below the early-exit threshold the session is thrown away; otherwise
    /// it completes with the current step logged as far as it got.
    pub fn stop(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.state.can_stop() {
            return effects;
        }
        if self.state != SessionState::Paused {
            self.stop_side_timers(&mut effects);
        }
        effects.push(Effect::StopSpeech);
        effects.push(Effect::ReleaseWakeLock);

        if self.run.elapsed < self.settings.early_exit_threshold_s {
            self.apply(Event::StopEarly);
            info!(elapsed_s = self.run.elapsed, "session discarded");
            effects.push(Effect::Discarded);
        } else {
            self.log_current(false);
            self.apply(Event::StopLate);
            info!(elapsed_s = self.run.elapsed, "session stopped");
            effects.push(Effect::Completed);
        }
        effects
    }

    /// Cut the current rest short
    pub fn skip(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        let resting = self.current_step().is_some_and(Step::is_rest);
        if self.state != SessionState::Running || !resting {
            return effects;
        }
        debug!(step = self.run.step_index, "rest skipped");
        self.advance(true, &mut effects);
        effects
    }

    /// A beat from the beat clock
    pub fn on_beat(&mut self, beat: BeatEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        let on_beat_step = self
            .current_step()
            .is_some_and(|step| step.kind.uses_beat_clock());
        if self.state != SessionState::Running || !on_beat_step {
            return effects;
        }
        if beat.generation != self.beat_generation {
            debug!(generation = beat.generation, "stale beat dropped");
            return effects;
        }

        effects.push(Effect::tone(if beat.accent {
            tones::ACCENT
        } else {
            tones::BEAT
        }));
        if let Some(change) = self.run.tempo.as_mut().and_then(|t| t.on_beat(beat.index)) {
            debug!(bpm = change.bpm, beat = beat.index, "tempo phase change");
            effects.push(Effect::RetuneBeat { bpm: change.bpm });
            effects.push(Effect::speak(change.announcement));
        }
        effects
    }

    /// The callout timer fired
    pub fn on_callout_due(&mut self) -> Vec<Effect> {
        let calling = self
            .current_step()
            .is_some_and(|step| step.kind == StepKind::Callout);
        if self.state != SessionState::Running || !calling || !self.callouts.is_auto() {
            return Vec::new();
        }
        vec![Effect::speak(self.callouts.generate())]
    }

    /// Completion record, once the session is complete
    pub fn record(&self, tool_id: Option<u64>, notes: Option<String>) -> Option<SessionRecord> {
        if self.state != SessionState::Complete {
            return None;
        }
        Some(SessionRecord {
            tool_id,
            duration_seconds: self.run.elapsed,
            config: self.program.config.clone(),
            results: SessionResults {
                rounds: self.run.steps_completed,
                log: self.log.clone(),
            },
            notes,
        })
    }

    fn apply(&mut self, event: Event) {
        let next = self.state.transition(event);
        if next != self.state {
            debug!(from = ?self.state, to = ?next, ?event, "session state");
        }
        self.state = next;
    }

    fn warning_beeps(&self, left: u32, effects: &mut Vec<Effect>) {
        if left <= self.settings.urgent_window_s {
            effects.push(Effect::tone(tones::URGENT));
        } else if left <= self.settings.warning_window_s {
            effects.push(Effect::tone(tones::WARNING));
        }
    }

    /// At most one announcement; halfway wins over a coincident threshold
    fn milestones(&mut self, duration: u32, left: u32, effects: &mut Vec<Effect>) {
        let halfway = duration >= self.settings.halfway_min_duration_s && left == duration / 2;
        let threshold = self
            .settings
            .milestones
            .iter()
            .find(|m| left == m.remaining_s && duration > m.min_duration_s)
            .map(|m| Milestone::Remaining(m.remaining_s));

        let mut spoken = None;
        if halfway && self.run.mark(Milestone::Halfway) {
            spoken = Some(Milestone::Halfway);
        }
        if let Some(threshold) = threshold {
            if self.run.mark(threshold) && spoken.is_none() {
                spoken = Some(threshold);
            }
        }
        if let Some(milestone) = spoken {
            effects.push(Effect::speak(milestone.announcement()));
        }
    }

    fn reminder(&mut self, effects: &mut Vec<Effect>) {
        let Some(reminder) = self
            .program
            .steps
            .get(self.run.step_index)
            .and_then(|step| step.reminder.as_ref())
        else {
            return;
        };
        if reminder.interval == 0 {
            return;
        }
        if self.run.step_elapsed - self.run.last_reminder_at >= reminder.interval {
            self.run.last_reminder_at = self.run.step_elapsed;
            effects.push(Effect::speak(reminder.text.clone()));
        }
    }

    fn emom(&mut self, effects: &mut Vec<Effect>) {
        let Some(interval) = self
            .program
            .steps
            .get(self.run.step_index)
            .and_then(|step| step.emom_interval)
            .filter(|i| *i > 0)
        else {
            return;
        };
        if self.run.step_elapsed - self.run.last_emom_at >= interval {
            self.run.last_emom_at = self.run.step_elapsed;
            let round = self.run.step_elapsed / interval + 1;
            let noun = if interval == 60 { "Minute" } else { "Round" };
            effects.push(Effect::tone(tones::EMOM));
            effects.push(Effect::speak(format!("{noun} {round}")));
        }
    }

    /// Leave the current step and enter the next, or finish
    fn advance(&mut self, skipped: bool, effects: &mut Vec<Effect>) {
        let Some(kind) = self.current_step().map(|step| step.kind) else {
            return;
        };
        self.stop_side_timers(effects);
        if kind == StepKind::Active {
            self.run.steps_completed += 1;
        }
        self.log_current(skipped);
        if kind == StepKind::Countdown {
            self.apply(Event::CountdownFinished);
        }

        let next = self.run.step_index + 1;
        if next >= self.program.steps.len() {
            self.apply(Event::Finish);
            info!(
                elapsed_s = self.run.elapsed,
                rounds = self.run.steps_completed,
                "session complete"
            );
            effects.push(Effect::ReleaseWakeLock);
            effects.push(Effect::tone(tones::COMPLETE));
            effects.push(Effect::vibrate(tones::COMPLETE_VIBRATION));
            effects.push(Effect::Completed);
            return;
        }

        effects.push(Effect::Flash);
        self.enter_step(next, effects);
    }

    fn enter_step(&mut self, index: usize, effects: &mut Vec<Effect>) {
        let Some(step) = self.program.steps.get(index) else {
            return;
        };
        self.run.enter(index, step);
        debug!(index, label = %step.label, kind = ?step.kind, "step entered");
        if let Some(text) = &step.announce {
            effects.push(Effect::speak(text.clone()));
        }
        self.start_side_timers(effects);
    }

    fn log_current(&mut self, skipped: bool) {
        let Some(step) = self.program.steps.get(self.run.step_index) else {
            return;
        };
        self.log.push(LogEntry {
            index: self.run.step_index,
            label: step.label.clone(),
            kind: step.kind,
            elapsed_s: self.run.step_elapsed,
            skipped,
        });
    }

    /// Start the timer the current step owns
    fn start_side_timers(&mut self, effects: &mut Vec<Effect>) {
        let Some(step) = self.program.steps.get(self.run.step_index) else {
            return;
        };
        match step.kind {
            StepKind::Callout => {
                let phrase = self.callouts.start_auto();
                effects.push(Effect::speak(phrase));
                effects.push(Effect::StartCallouts {
                    interval_s: self.callouts.interval_s(),
                });
            }
            StepKind::Metronome | StepKind::VariableMetronome => {
                let bpm = self
                    .run
                    .tempo
                    .as_ref()
                    .map(|t| t.current_bpm())
                    .or_else(|| step.start_bpm())
                    .unwrap_or(DEFAULT_BPM);
                self.beat_generation = self.beat_generation.wrapping_add(1);
                effects.push(Effect::StartBeat {
                    bpm,
                    generation: self.beat_generation,
                });
            }
            _ => {}
        }
    }

    /// Stop the timer the current step owns
    fn stop_side_timers(&mut self, effects: &mut Vec<Effect>) {
        let Some(step) = self.program.steps.get(self.run.step_index) else {
            return;
        };
        match step.kind {
            StepKind::Callout => {
                self.callouts.stop_auto();
                effects.push(Effect::StopCallouts);
            }
            StepKind::Metronome | StepKind::VariableMetronome => {
                effects.push(Effect::StopBeat);
            }
            _ => {}
        }
    }
}

//! Main controller task
//!
//! Receives every session event from one channel, runs it through the
//! controller and forwards timer commands to the timer tasks.

use std::io::Stdout;
use std::sync::mpsc::Sender;

use embassy_time::Timer;
use tracing::{error, info, warn};

use crimp_cue_term::TerminalCues;

use crate::channels::{BEAT_CMD, CALLOUT_CMD, HEARTBEAT_CMD, SESSION_EVENTS};
use crate::channels::{BeatCommand, CalloutCommand};
use crate::controller::{Controller, SessionEnd, TimerCommand};
use crate::recorder::JsonFileRecorder;

/// Delay before the one retry of a failed record hand-off
const RECORD_RETRY_MS: u64 = 1000;

/// The controller as run on a terminal host
pub type HostController = Controller<TerminalCues<Stdout>, JsonFileRecorder>;

/// Controller task - main coordination loop
///
/// Reports how the session ended on `done` once every timer is stopped
/// and the record has been handed off.
#[embassy_executor::task]
pub async fn controller_task(mut controller: Box<HostController>, done: Sender<SessionEnd>) {
    info!("Controller task started");

    let outcome = controller.start();
    dispatch(&outcome.timers);
    HEARTBEAT_CMD.signal(true);

    let end = loop {
        let message = SESSION_EVENTS.receive().await;
        let outcome = controller.handle(message);
        dispatch(&outcome.timers);
        if let Some(end) = outcome.end {
            break end;
        }
    };

    // Cancel all three timers together
    HEARTBEAT_CMD.signal(false);
    BEAT_CMD.signal(BeatCommand::Stop);
    CALLOUT_CMD.signal(CalloutCommand::Stop);

    if end == SessionEnd::Completed {
        if let Err(e) = controller.save_record() {
            warn!(error = %e, "failed to save session, retrying");
            Timer::after_millis(RECORD_RETRY_MS).await;
            if let Err(e) = controller.save_record() {
                let duration_s = controller.pending_record().map(|r| r.duration_seconds);
                error!(error = %e, ?duration_s, "failed to save session");
            }
        }
    }

    info!(?end, elapsed_s = controller.session().run().elapsed, "session ended");
    if done.send(end).is_err() {
        warn!("nobody waiting for the session result");
    }
}

fn dispatch(timers: &[TimerCommand]) {
    for command in timers {
        match *command {
            TimerCommand::Beat(command) => BEAT_CMD.signal(command),
            TimerCommand::Callout(command) => CALLOUT_CMD.signal(command),
        }
    }
}

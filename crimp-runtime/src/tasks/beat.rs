//! Beat task
//!
//! Owns the `BeatClock` and sleeps until its next deadline. The clock
//! corrects for wake-up latency itself, so this task only reports how
//! late it woke.

use core::future::pending;

use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};
use tracing::{debug, info, trace};

use crimp_core::metronome::{BeatClock, BeatEvent};

use crate::channels::{BeatCommand, SessionMessage, BEAT_CMD, SESSION_EVENTS};

/// Tempo of an idle clock; replaced by the first start command
const IDLE_BPM: u16 = 60;

/// Beat task
#[embassy_executor::task]
pub async fn beat_task() {
    info!("Beat task started");

    let origin = Instant::now();
    let now_ms = move || origin.elapsed().as_millis();
    let mut clock = BeatClock::new(IDLE_BPM);

    loop {
        let delay = clock.next_delay_ms(now_ms());
        let wait = async move {
            match delay {
                Some(ms) => Timer::after_millis(ms).await,
                None => pending::<()>().await,
            }
        };

        match select(BEAT_CMD.wait(), wait).await {
            Either::First(command) => {
                if let Some(beat) = apply(&mut clock, command, now_ms()) {
                    post(beat).await;
                }
            }
            Either::Second(()) => {
                if let Some(beat) = clock.fire(now_ms()) {
                    post(beat).await;
                }
            }
        }
    }
}

/// Apply a controller command; a start yields the first beat
fn apply(clock: &mut BeatClock, command: BeatCommand, now_ms: u64) -> Option<BeatEvent> {
    debug!(?command, "beat command");
    match command {
        BeatCommand::Start { bpm, generation } => {
            clock.change_bpm(bpm);
            Some(clock.start(now_ms, generation))
        }
        BeatCommand::Retune { bpm } => {
            clock.change_bpm(bpm);
            None
        }
        BeatCommand::Stop => {
            clock.stop();
            None
        }
    }
}

async fn post(beat: BeatEvent) {
    trace!(index = beat.index, accent = beat.accent, "beat");
    SESSION_EVENTS.send(SessionMessage::Beat(beat)).await;
}

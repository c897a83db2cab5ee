//! Heartbeat task
//!
//! Posts a tick to the controller once a second while switched on.
//! The session ignores ticks while paused, so pause leaves it running.

use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};
use tracing::{debug, info};

use crate::channels::{SessionMessage, HEARTBEAT_CMD, SESSION_EVENTS};

/// Heartbeat interval in milliseconds
pub const HEARTBEAT_INTERVAL_MS: u64 = 1000;

/// Heartbeat task
#[embassy_executor::task]
pub async fn heartbeat_task() {
    info!("Heartbeat task started");

    loop {
        // Wait until switched on
        while !HEARTBEAT_CMD.wait().await {}
        debug!("heartbeat on");

        let mut ticker = Ticker::every(Duration::from_millis(HEARTBEAT_INTERVAL_MS));
        loop {
            let event = select(ticker.next(), HEARTBEAT_CMD.wait()).await;
            match event {
                Either::First(()) => SESSION_EVENTS.send(SessionMessage::Tick).await,
                Either::Second(true) => {}
                Either::Second(false) => {
                    debug!("heartbeat off");
                    break;
                }
            }
        }
    }
}

//! Callout timer task
//!
//! Fires `CalloutDue` at a fixed interval while armed. The phrase itself
//! is picked by the session.

use core::future::pending;

use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};
use tracing::{debug, info};

use crate::channels::{CalloutCommand, SessionMessage, CALLOUT_CMD, SESSION_EVENTS};

/// Callout timer task
#[embassy_executor::task]
pub async fn callout_task() {
    info!("Callout task started");

    let mut ticker: Option<Ticker> = None;
    loop {
        let event = select(CALLOUT_CMD.wait(), async {
            match ticker.as_mut() {
                Some(ticker) => ticker.next().await,
                None => pending::<()>().await,
            }
        })
        .await;

        match event {
            Either::First(CalloutCommand::Start { interval_s }) => {
                debug!(interval_s, "callouts armed");
                // The first phrase is spoken on start; wait a full interval
                ticker = Some(Ticker::every(Duration::from_secs(interval_s.max(1).into())));
            }
            Either::First(CalloutCommand::Stop) => {
                debug!("callouts disarmed");
                ticker = None;
            }
            Either::Second(()) => SESSION_EVENTS.send(SessionMessage::CalloutDue).await,
        }
    }
}

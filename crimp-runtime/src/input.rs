//! Keyboard input
//!
//! Stdin is blocking, so it is read on a plain thread. Each line holding
//! a command (`p`, `r`, `s`, `q` or the full word) is posted onto the
//! session channel.

use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use embassy_futures::block_on;
use tracing::debug;

use crate::channels::{SessionMessage, UserCommand, SESSION_EVENTS};

/// Command typed on one line, if any
pub fn parse_line(line: &str) -> Option<UserCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "p" | "pause" => Some(UserCommand::Pause),
        "r" | "resume" => Some(UserCommand::Resume),
        "s" | "skip" => Some(UserCommand::Skip),
        "q" | "quit" | "stop" => Some(UserCommand::Stop),
        _ => None,
    }
}

/// Start the stdin reader
pub fn spawn_stdin_reader() -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin".into())
        .spawn(|| {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                let Some(command) = parse_line(&line) else {
                    continue;
                };
                debug!(?command, "key");
                post(command);
            }
            debug!("stdin closed");
        })
}

/// Queue `command` for the controller, waiting while the channel is full
fn post(command: UserCommand) {
    block_on(SESSION_EVENTS.send(SessionMessage::Command(command)));
}

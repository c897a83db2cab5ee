//! Completion hand-off
//!
//! A finished session is summarised into a [`SessionRecord`] and passed to
//! whatever stores sessions. The engine keeps no copy of its own beyond the
//! `Session` itself, so a failed hand-off can simply be retried.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::scheduler::LogEntry;

/// Errors from a session recorder
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("record encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("record rejected: {0}")]
    Rejected(String),
}

/// What the session achieved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResults {
    /// Active steps completed
    pub rounds: u32,
    pub log: Vec<LogEntry>,
}

/// Summary of a completed session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub tool_id: Option<u64>,
    /// Seconds of session time, excluding pauses
    pub duration_seconds: u32,
    /// Resolved config the session ran with
    pub config: Config,
    pub results: SessionResults,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Destination for completed sessions
pub trait SessionRecorder {
    /// Store `record`
    ///
    /// Errors are returned to the caller; the caller still owns the record.
    fn record(&mut self, record: &SessionRecord) -> Result<(), RecordError>;
}

impl<R: SessionRecorder + ?Sized> SessionRecorder for &mut R {
    fn record(&mut self, record: &SessionRecord) -> Result<(), RecordError> {
        (**self).record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::StepKind;

    struct FailingRecorder {
        attempts: u32,
    }

    impl SessionRecorder for FailingRecorder {
        fn record(&mut self, _record: &SessionRecord) -> Result<(), RecordError> {
            self.attempts += 1;
            Err(RecordError::Rejected("offline".into()))
        }
    }

    fn sample() -> SessionRecord {
        SessionRecord {
            tool_id: Some(4),
            duration_seconds: 95,
            config: Config::new().with("sets", 3),
            results: SessionResults {
                rounds: 3,
                log: vec![LogEntry {
                    index: 1,
                    label: "Set 1 of 3".into(),
                    kind: StepKind::Active,
                    elapsed_s: 30,
                    skipped: false,
                }],
            },
            notes: None,
        }
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["tool_id"], 4);
        assert_eq!(json["duration_seconds"], 95);
        assert_eq!(json["config"]["sets"], 3);
        assert_eq!(json["results"]["rounds"], 3);
        assert_eq!(json["results"]["log"][0]["kind"], "active");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_failed_record_left_to_caller() {
        let record = sample();
        fn store<R: SessionRecorder>(mut recorder: R, record: &SessionRecord) -> bool {
            recorder.record(record).is_ok()
        }

        let mut recorder = FailingRecorder { attempts: 0 };
        assert!(!store(&mut recorder, &record));
        assert!(recorder.record(&record).is_err());
        assert_eq!(recorder.attempts, 2);
        assert_eq!(record, sample());
    }
}

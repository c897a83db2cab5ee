//! JSON file session recorder

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crimp_core::record::{RecordError, SessionRecord, SessionRecorder};

/// Writes each record to `session-<unix-ts>.json` in a directory
#[derive(Debug, Clone)]
pub struct JsonFileRecorder {
    dir: PathBuf,
}

impl JsonFileRecorder {
    /// Record into `dir`, created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// First free file name for `timestamp`
    fn path_for(&self, timestamp: u64) -> PathBuf {
        let mut path = self.dir.join(format!("session-{timestamp}.json"));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("session-{timestamp}-{n}.json"));
            n += 1;
        }
        path
    }

    /// Write `record` stamped with `timestamp`; returns the file written
    pub fn write_at(&self, record: &SessionRecord, timestamp: u64) -> Result<PathBuf, RecordError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(timestamp);
        let mut out = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut out, record)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(path)
    }
}

impl SessionRecorder for JsonFileRecorder {
    fn record(&mut self, record: &SessionRecord) -> Result<(), RecordError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let path = self.write_at(record, timestamp)?;
        info!(path = %path.display(), "session written");
        Ok(())
    }
}

//! Per-request log: one JSON line per request, bounded in length.
//!
//! Writes happen on the blocking pool after the response is produced.
//! Failures are logged and never reach the client.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How a request was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Ok,
    Error,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub id: String,
    pub timestamp: String,
    /// `stream` or `aggregate`.
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub text_chars: usize,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub keywords: Vec<String>,
    pub queries: Vec<String>,
    pub videos: usize,
    pub duration_ms: u64,
}

impl RequestLogEntry {
    pub fn new(mode: &str, filename: Option<String>, text_chars: usize) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            mode: mode.to_string(),
            filename,
            text_chars,
            outcome: Outcome::Ok,
            error: None,
            keywords: Vec::new(),
            queries: Vec::new(),
            videos: 0,
            duration_ms: 0,
        }
    }
}

pub struct RequestLog {
    path: PathBuf,
    max_lines: usize,
    lock: Mutex<()>,
}

impl RequestLog {
    pub fn new(path: impl AsRef<Path>, max_lines: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_lines: max_lines.max(1),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry and trim the file to the newest `max_lines` lines.
    pub fn append(&self, entry: &RequestLogEntry) -> std::io::Result<()> {
        let line = serde_json::to_string(entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let _guard = self.lock.lock();
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        drop(file);

        self.trim_locked()
    }

    fn trim_locked(&self) -> std::io::Result<()> {
        let content = std::fs::read_to_string(&self.path)?;
        let lines: Vec<&str> = content.lines().collect();
        if lines.len() <= self.max_lines {
            return Ok(());
        }
        let keep = &lines[lines.len() - self.max_lines..];
        let mut trimmed = keep.join("\n");
        trimmed.push('\n');
        std::fs::write(&self.path, trimmed)?;
        debug!("Trimmed request log to {} lines", self.max_lines);
        Ok(())
    }

    /// The newest `n` entries, oldest first. Unparsable lines are skipped.
    pub fn tail(&self, n: usize) -> std::io::Result<Vec<serde_json::Value>> {
        let _guard = self.lock.lock();
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
        let start = lines.len().saturating_sub(n);
        Ok(lines[start..]
            .iter()
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect())
    }

    /// Fire-and-forget append on the blocking pool.
    pub fn record(self: &Arc<Self>, entry: RequestLogEntry) {
        let log = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            if let Err(e) = log.append(&entry) {
                warn!("Failed to write request log {}: {}", log.path.display(), e);
            }
        });
    }
}

//! Append-only session event log.
//!
//! Every conversation gets its own JSON Lines file under the configured
//! directory, one event per line with a local timestamp, a source tag
//! ("system", "caller", "agent") and the message text. Files are only
//! ever appended to; events keep arrival order.

use chrono::Local;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct SessionEvent<'a> {
    timestamp: String,
    source: &'a str,
    message: &'a str,
}

/// Writes conversation events to a per-session JSONL file.
///
/// A session starts lazily on the first [`ChatLogger::log_event`] call, or
/// explicitly via [`ChatLogger::start_session`]. Starting a session emits a
/// `"system"` / `"Chat session started"` event as the first line.
#[derive(Debug)]
pub struct ChatLogger {
    log_dir: PathBuf,
    session_file: Option<PathBuf>,
}

impl ChatLogger {
    /// Create a logger rooted at `log_dir`. The directory is created on
    /// session start, not here.
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            session_file: None,
        }
    }

    /// Open a fresh session file named after the current local time and
    /// record the opening system event. Returns the file path.
    ///
    /// # Errors
    ///
    /// I/O errors from directory creation or the first append.
    pub fn start_session(&mut self) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.log_dir)?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = self.log_dir.join(format!("chat_session_{stamp}.json"));
        self.session_file = Some(path.clone());
        self.append("system", "Chat session started")?;
        tracing::info!(file = %path.display(), "chat session started");
        Ok(path)
    }

    /// Append one event. Starts a session first if none is open.
    ///
    /// # Errors
    ///
    /// I/O errors from session start or the append itself.
    pub fn log_event(&mut self, source: &str, message: &str) -> std::io::Result<()> {
        if self.session_file.is_none() {
            self.start_session()?;
        }
        self.append(source, message)
    }

    /// Path of the current session file, if a session is open.
    #[must_use]
    pub fn session_path(&self) -> Option<&Path> {
        self.session_file.as_deref()
    }

    fn append(&self, source: &str, message: &str) -> std::io::Result<()> {
        let Some(path) = &self.session_file else {
            return Ok(());
        };
        let event = SessionEvent {
            timestamp: Local::now().to_rfc3339(),
            source,
            message,
        };
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        serde_json::to_writer(&mut file, &event)?;
        file.write_all(b"\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn start_session_creates_dir_and_opening_event() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("chat_logs");
        let mut logger = ChatLogger::new(&root);

        let path = logger.start_session().expect("session starts");
        assert!(path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("chat_session_") && n.ends_with(".json")));

        let contents = fs::read_to_string(&path).expect("file exists");
        let first: serde_json::Value =
            serde_json::from_str(contents.lines().next().expect("one line")).expect("valid JSON");
        assert_eq!(first["source"], "system");
        assert_eq!(first["message"], "Chat session started");
        assert!(first["timestamp"].is_string());
    }

    #[test]
    fn log_event_lazily_starts_session_and_appends_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut logger = ChatLogger::new(dir.path());
        assert!(logger.session_path().is_none());

        logger.log_event("caller", "do we have coke").expect("logs");
        logger.log_event("agent", "we have three variants").expect("logs");

        let path = logger.session_path().expect("session open").to_path_buf();
        let contents = fs::read_to_string(path).expect("file exists");
        let events: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).expect("valid JSON"))
            .collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0]["source"], "system");
        assert_eq!(events[1]["source"], "caller");
        assert_eq!(events[1]["message"], "do we have coke");
        assert_eq!(events[2]["source"], "agent");
    }

    #[test]
    fn events_are_appended_not_rewritten() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut logger = ChatLogger::new(dir.path());
        logger.log_event("caller", "first").expect("logs");
        let path = logger.session_path().expect("open").to_path_buf();
        let before = fs::read_to_string(&path).expect("read");

        logger.log_event("caller", "second").expect("logs");
        let after = fs::read_to_string(&path).expect("read");
        assert!(after.starts_with(&before));
    }
}

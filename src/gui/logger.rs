//! Session log behind the Logs view.
//!
//! Entries are kept in a bounded in-memory window for display, appended to
//! `<data_dir>/logs/session_<timestamp>.log`, and forwarded to `tracing`.

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::settings::AppSettings;

const DEFAULT_CAPACITY: usize = 1000;

/// What a session log line is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
    /// Screen frozen or region selected.
    Capture,
    /// Model returned a solution.
    Answer,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Success => "OK",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Capture => "CAPTURE",
            LogLevel::Answer => "ANSWER",
        }
    }

    fn trace(self, message: &str) {
        match self {
            LogLevel::Error => tracing::error!(target: "coding_helper::session", "{}", message),
            LogLevel::Warning => tracing::warn!(target: "coding_helper::session", "{}", message),
            LogLevel::Info | LogLevel::Success | LogLevel::Capture | LogLevel::Answer => {
                tracing::info!(target: "coding_helper::session", kind = self.tag(), "{}", message)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

/// Short form used in the Logs view: `12:03:44 CAPTURE Selected region ...`.
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<7} {}",
            self.timestamp.format("%H:%M:%S"),
            self.level.tag(),
            self.message
        )
    }
}

/// Bounded session log, optionally mirrored to a file.
#[derive(Debug)]
pub struct Logger {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    file: Option<PathBuf>,
}

impl Logger {
    /// Log to a new session file under the platform data dir. Falls back to
    /// memory only when the directory cannot be created.
    pub fn new() -> Self {
        let file = AppSettings::logs_dir().and_then(|dir| {
            fs::create_dir_all(&dir).ok()?;
            Some(dir.join(format!("session_{}.log", Local::now().format("%Y%m%d_%H%M%S"))))
        });
        Self {
            file,
            ..Self::in_memory(DEFAULT_CAPACITY)
        }
    }

    /// Keep at most `capacity` entries and never touch the disk.
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity: capacity.max(1),
            file: None,
        }
    }

    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        let entry = LogEntry {
            timestamp: Local::now(),
            level,
            message: message.into(),
        };
        level.trace(&entry.message);

        if let Some(path) = &self.file {
            let written = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .and_then(|mut f| {
                    writeln!(
                        f,
                        "{} [{}] {}",
                        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        level.tag(),
                        entry.message
                    )
                });
            if let Err(e) = written {
                tracing::warn!("Session log write to {} failed: {}", path.display(), e);
            }
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn capture(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Capture, message);
    }

    pub fn answer(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Answer, message);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Empties the view only; the session file keeps everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn log_file_path(&self) -> Option<&PathBuf> {
        self.file.as_ref()
    }

    /// All retained entries, one per line, oldest first.
    pub fn format_all(&self) -> String {
        self.entries
            .iter()
            .map(LogEntry::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_display() {
        let mut logger = Logger::in_memory(10);
        logger.answer("Two pointers");
        let line = logger.format_all();
        assert!(line.contains("ANSWER"));
        assert!(line.ends_with("Two pointers"));
    }

    #[test]
    fn test_logger_keeps_most_recent_entries() {
        let mut logger = Logger::in_memory(3);
        for i in 0..5 {
            logger.info(format!("entry {}", i));
        }
        let messages: Vec<_> = logger.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["entry 2", "entry 3", "entry 4"]);
        assert!(logger.log_file_path().is_none());

        logger.clear();
        assert!(logger.format_all().is_empty());
    }

    #[test]
    fn test_session_file_receives_every_entry() {
        let path = std::env::temp_dir().join(format!(
            "coding_helper_session_{}.log",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        let mut logger = Logger::in_memory(1);
        logger.file = Some(path.clone());
        logger.capture("Selected region 10x10+0+0");
        logger.error("Image analysis error: timeout");
        logger.clear();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[CAPTURE] Selected region 10x10+0+0"));
        assert!(lines[1].ends_with("[ERROR] Image analysis error: timeout"));
        let _ = fs::remove_file(&path);
    }
}

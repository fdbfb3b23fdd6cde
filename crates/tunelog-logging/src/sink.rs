//! ---
//! tl_section: "02-logging-tree"
//! tl_subsection: "module"
//! tl_type: "source"
//! tl_scope: "code"
//! tl_description: "Hierarchical logger with configuration-driven levels."
//! tl_version: "v0.1.0"
//! tl_owner: "tbd"
//! ---
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::DateTime;
use parking_lot::Mutex;

use crate::level::Level;

/// One emission in flight from a logger to its sinks. Borrowed and
/// ephemeral; sinks that need to keep the data must copy it.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    /// Full colon-separated name of the emitting logger.
    pub logger: &'a str,
    /// UTC timestamp in microseconds since the epoch.
    pub timestamp_micros: i64,
    /// Process-local identifier of the emitting thread.
    pub thread: u64,
    /// Severity of the record.
    pub level: Level,
    /// Message text, never empty.
    pub message: &'a str,
    /// Source file of the emission site.
    pub file: &'a str,
    /// Source line of the emission site.
    pub line: u32,
}

/// Output destination for log records.
///
/// Implementations must not panic out of [`log`](Self::log): failures (I/O
/// or otherwise) are the sink's own responsibility and must never abort the
/// logging call path.
pub trait LogSink: Send + Sync {
    /// Deliver one record.
    fn log(&self, record: &LogRecord<'_>);
}

fn format_timestamp(micros: i64) -> String {
    match DateTime::from_timestamp_micros(micros) {
        Some(when) => when.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
        None => micros.to_string(),
    }
}

/// Console sink writing one formatted line per record to stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    /// Create a stdout sink.
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for StdoutSink {
    fn log(&self, record: &LogRecord<'_>) {
        let line = format!(
            "{} [{}] {} {} {}:{} - {}\n",
            format_timestamp(record.timestamp_micros),
            record.level,
            record.thread,
            record.logger,
            record.file,
            record.line,
            record.message
        );
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(line.as_bytes());
        let _ = stdout.flush();
    }
}

/// Append-mode file sink.
///
/// The file is opened (created if necessary) at construction time; write
/// errors after that are swallowed so a full disk cannot abort callers.
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Open `path` for appending, creating it if it does not exist.
    pub fn new(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Path this sink appends to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn log(&self, record: &LogRecord<'_>) {
        let line = format!(
            "[{}] {} {} {} {}:{} {}\n",
            format_timestamp(record.timestamp_micros),
            record.level,
            record.thread,
            record.logger,
            record.file,
            record.line,
            record.message
        );
        let mut file = self.file.lock();
        let _ = file.write_all(line.as_bytes());
        let _ = file.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record<'a>(message: &'a str) -> LogRecord<'a> {
        LogRecord {
            logger: "svc:api",
            timestamp_micros: 1_700_000_000_123_456,
            thread: 7,
            level: Level::Info,
            message,
            file: "svc.rs",
            line: 42,
        }
    }

    #[test]
    fn timestamps_render_with_microsecond_precision() {
        assert_eq!(
            format_timestamp(1_700_000_000_123_456),
            "2023-11-14 22:13:20.123456"
        );
    }

    #[test]
    fn file_sink_appends_formatted_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let sink = FileSink::new(&path).unwrap();
        sink.log(&record("first"));
        sink.log(&record("second"));

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("INFOR 7 svc:api svc.rs:42 first"));
        assert!(lines[1].ends_with("second"));
        assert_eq!(sink.path(), path.as_path());
    }
}

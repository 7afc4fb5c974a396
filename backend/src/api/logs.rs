//! Progress log with real-time streaming via Server-Sent Events (SSE).
//!
//! Every pipeline message goes through one process-wide broadcaster: it is
//! printed to the console sink (stdout, stderr or nowhere) and sent to every
//! subscribed SSE client.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::broadcast;

/// Log level for frontend display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting level (ranking entries under their heading)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Line as printed on the console.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        format!("{}{} {}", "   ".repeat(self.indent as usize), prefix, self.message)
    }
}

/// Where console lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LogSink {
    Stdout = 0,
    Stderr = 1,
    Off = 2,
}

impl LogSink {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogSink::Stdout,
            1 => LogSink::Stderr,
            _ => LogSink::Off,
        }
    }
}

/// Global log broadcaster
pub static LOG_BROADCASTER: Lazy<LogBroadcaster> = Lazy::new(LogBroadcaster::new);

/// Broadcasts log entries to all connected SSE clients
pub struct LogBroadcaster {
    sender: broadcast::Sender<LogEntry>,
    sink: AtomicU8,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self {
            sender,
            sink: AtomicU8::new(LogSink::Stdout as u8),
        }
    }

    pub fn sink(&self) -> LogSink {
        LogSink::from_u8(self.sink.load(Ordering::Relaxed))
    }

    /// Change the console sink. Broadcasting is unaffected.
    pub fn set_sink(&self, sink: LogSink) {
        self.sink.store(sink as u8, Ordering::Relaxed);
    }

    /// Stop (or resume) printing to stdout.
    pub fn set_quiet(&self, quiet: bool) {
        self.set_sink(if quiet { LogSink::Off } else { LogSink::Stdout });
    }

    pub fn is_quiet(&self) -> bool {
        self.sink() == LogSink::Off
    }

    /// Move console output from stdout to stderr, leaving a silenced
    /// broadcaster silent.
    pub fn redirect_to_stderr(&self) {
        let _ = self.sink.compare_exchange(
            LogSink::Stdout as u8,
            LogSink::Stderr as u8,
            Ordering::Relaxed,
            Ordering::Relaxed,
        );
    }

    /// Print and broadcast an entry
    pub fn log(&self, entry: LogEntry) {
        match self.sink() {
            LogSink::Stdout => println!("{}", entry.render()),
            LogSink::Stderr => eprintln!("{}", entry.render()),
            LogSink::Off => {}
        }

        // no receivers is fine
        let _ = self.sender.send(entry);
    }

    /// Get a receiver for SSE streaming
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Silence console output of the global broadcaster.
pub fn set_quiet(quiet: bool) {
    LOG_BROADCASTER.set_quiet(quiet);
}

/// Keep stdout free for data: console lines of the global broadcaster go to
/// stderr from now on (unless silenced).
pub fn redirect_to_stderr() {
    LOG_BROADCASTER.redirect_to_stderr();
}

pub fn log_info(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::new(LogLevel::Info, msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::new(LogLevel::Success, msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::new(LogLevel::Warning, msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::new(LogLevel::Error, msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOG_BROADCASTER.log(LogEntry::new(LogLevel::Info, msg).with_indent(indent));
}

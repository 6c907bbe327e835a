//! Logging for the frame layer
//!
//! Everything logs through the `engine_*!` macros, which forward to the
//! logger installed with `Engine::set_logger`. Messages are tagged with a
//! source such as `galaxy3d::RenderQueue` or `galaxy3d::sim::CommandQueue`.
//!
//! Frame-protocol events (frame begin/end, queue drains, swaps) are logged at
//! TRACE/DEBUG so a render loop stays quiet at the default level.

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Receiver for log entries
///
/// Implementations are called from the render thread and from backend
/// threads (vblank ticker, queue worker), hence `Send + Sync`.
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_frame::galaxy3d::log::{Logger, LogEntry};
///
/// struct FrameTraceLogger;
///
/// impl Logger for FrameTraceLogger {
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("{} {}", entry.source, entry.message);
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-event information (vblank, queue completion)
    Trace,
    /// Per-frame information
    Debug,
    /// Lifecycle messages (init, shutdown)
    Info,
    /// Recoverable misuse (rejected framerate, stale key)
    Warn,
    /// Failures and contract violations, with file:line
    Error,
}

impl LogSeverity {
    /// Fixed-width label used by `DefaultLogger`
    pub fn label(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

/// One log message with its origin
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Emitting component (e.g. "galaxy3d::RenderQueue")
    pub source: String,
    pub message: String,
    /// Set for ERROR entries only
    pub file: Option<&'static str>,
    /// Set for ERROR entries only
    pub line: Option<u32>,
}

impl LogEntry {
    /// `file:line` when the entry carries a location
    pub fn location(&self) -> Option<String> {
        match (self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
            _ => None,
        }
    }
}

/// Colored console logger, installed until `Engine::set_logger` replaces it
///
/// Entries below `min_severity` are dropped. WARN and ERROR go to stderr,
/// everything else to stdout.
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
#[derive(Debug, Clone, Copy)]
pub struct DefaultLogger {
    pub min_severity: LogSeverity,
}

impl DefaultLogger {
    pub fn new(min_severity: LogSeverity) -> Self {
        Self { min_severity }
    }

    /// Whether an entry of this severity would be printed
    pub fn enabled(&self, severity: LogSeverity) -> bool {
        severity >= self.min_severity
    }

    fn format(&self, entry: &LogEntry) -> String {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let label = entry.severity.label();
        let severity = match entry.severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        };

        let mut line = format!(
            "[{}] [{}] [{}] {}",
            datetime.format("%H:%M:%S%.3f"),
            severity,
            entry.source.bright_blue(),
            entry.message,
        );
        if let Some(location) = entry.location() {
            line.push_str(&format!(" ({})", location));
        }
        line
    }
}

impl Default for DefaultLogger {
    fn default() -> Self {
        Self::new(LogSeverity::Info)
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        if !self.enabled(entry.severity) {
            return;
        }
        let line = self.format(entry);
        if entry.severity >= LogSeverity::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

// ===== LOGGING MACROS =====

#[doc(hidden)]
#[macro_export]
macro_rules! __engine_log {
    ($severity:ident, $source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::$severity,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a TRACE message (per-event, very verbose)
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Trace, $source, $($arg)*) };
}

/// Log a DEBUG message
///
/// ```ignore
/// engine_debug!("galaxy3d::RenderQueue", "frame {} submitted", frame);
/// ```
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Debug, $source, $($arg)*) };
}

#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Info, $source, $($arg)*) };
}

#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Warn, $source, $($arg)*) };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log_at(
            $crate::galaxy3d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            (file!(), line!())
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;

//! Process-wide logging host
//!
//! Frame state lives in an explicit `RenderQueue` owned by the caller. The
//! only global kept here is the replaceable logger, so vblank and
//! queue-completion producers on backend threads can log without a handle
//! to the queue.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::default())))
}

fn install(logger: Box<dyn Logger>) {
    // Poisoned: a logger panicked mid-call
    let mut lock = match logger_lock().write() {
        Ok(lock) => lock,
        Err(poisoned) => poisoned.into_inner(),
    };
    *lock = logger;
}

fn dispatch(entry: LogEntry) {
    if let Ok(lock) = logger_lock().read() {
        lock.log(&entry);
    }
}

/// Engine-wide services that are not tied to one render queue
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_frame::galaxy3d::{Engine, log::{Logger, LogEntry}};
///
/// struct Silent;
/// impl Logger for Silent {
///     fn log(&self, _entry: &LogEntry) {}
/// }
///
/// Engine::set_logger(Silent);
/// // ...
/// Engine::reset_logger();
/// ```
pub struct Engine;

impl Engine {
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        install(Box::new(logger));
    }

    /// Restore the colored console logger at INFO level
    pub fn reset_logger() {
        install(Box::new(DefaultLogger::default()));
    }

    /// Entry point of `engine_trace!` through `engine_warn!`
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        });
    }

    /// Entry point of `engine_error!`: same as `log`, plus `(file, line)`
    pub fn log_at(severity: LogSeverity, source: &str, message: String, location: (&'static str, u32)) {
        dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(location.0),
            line: Some(location.1),
        });
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

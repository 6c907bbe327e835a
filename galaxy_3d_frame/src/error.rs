//! Error types for the Galaxy3D frame layer
//!
//! This module defines the error type shared by the render queue, the
//! render target registry and the synchronous transfer gateway, plus the
//! contract-violation policy used when an operation is called in a state
//! that could corrupt in-flight GPU memory.

use std::fmt;

/// Result type for Galaxy3D frame operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D frame errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (event channel closed, device failure, etc.)
    BackendError(String),

    /// Out of VRAM
    OutOfMemory,

    /// Invalid resource or argument (stale target key, texture outside VRAM, etc.)
    InvalidResource(String),

    /// Initialization failed (render queue, simulated device)
    InitializationFailed(String),

    /// Operation called in a state that breaks the frame protocol
    ///
    /// Only returned under `ViolationPolicy::Propagate`; under
    /// `ViolationPolicy::Abort` the process is terminated instead.
    ContractViolation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of VRAM"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::ContractViolation(msg) => write!(f, "Contract violation: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// What to do when the frame protocol is violated by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViolationPolicy {
    /// Log the violation and terminate the process immediately
    #[default]
    Abort,

    /// Log the violation and return `Error::ContractViolation`
    Propagate,
}

/// Report a contract violation according to `policy`
///
/// Always logs at ERROR severity. Returns the error to propagate when the
/// policy allows it; never returns under `ViolationPolicy::Abort`.
pub(crate) fn contract_violation(policy: ViolationPolicy, source: &str, message: String) -> Error {
    crate::engine_error!(source, "Contract violation: {}", message);
    match policy {
        ViolationPolicy::Abort => std::process::abort(),
        ViolationPolicy::Propagate => Error::ContractViolation(message),
    }
}

// ===== ERROR MACROS =====

/// Log an error and build an `Error::BackendError` from the message
///
/// # Example
///
/// ```ignore
/// let err = engine_err!("galaxy3d::RenderQueue", "event channel closed");
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

/// Log an error and return `Err(Error::BackendError)` from the current function
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

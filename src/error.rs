//! Error types for keyvet.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//! Most failures during a run degrade to a false verdict or an empty result
//! rather than surfacing here; these variants cover the cases that do escape
//! (client construction, config loading) and the typed failures the HTTP and
//! catalog layers log before degrading.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KeyvetError>;

/// Exit codes for the `keyvet` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success (including empty runs).
    Success = 0,
    /// Unexpected failure.
    GeneralError = 1,
    /// Config or response parse errors.
    ParseError = 3,
    /// Timeout.
    Timeout = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Main error type for keyvet operations.
#[derive(Error, Debug)]
pub enum KeyvetError {
    /// Request timed out after the given number of seconds.
    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    /// Network-level failure (connection, DNS, TLS, non-2xx on a required call).
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse a provider response body.
    #[error("failed to parse response: {0}")]
    ParseResponse(String),

    /// Configuration error (bad config file, invalid value).
    #[error("configuration error: {0}")]
    Config(String),
}

impl KeyvetError {
    /// Map error to a process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) | Self::ParseResponse(_) => ExitCode::ParseError,
            Self::Timeout(_) => ExitCode::Timeout,
            Self::Network(_) => ExitCode::GeneralError,
        }
    }
}

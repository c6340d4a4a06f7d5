//! Custom error types for the application.
//!
//! This module defines the primary error type, `DaqError`, for the entire
//! application. Using the `thiserror` crate, it provides a centralized and
//! consistent way to handle the few kinds of errors this system can hit:
//!
//! - **`Config`**: Wraps errors from the `config` crate (file parsing, format).
//! - **`Configuration`**: Semantic errors in the configuration — values that
//!   parse fine but are logically invalid (zero channels, offset above full
//!   scale). Caught during the validation step.
//! - **`Io`**: Wraps standard `std::io::Error` for console I/O.
//! - **`SweepTimeout`**: The bounded replacement for an unbounded hardware
//!   wait — a sweep that did not complete within the configured window. The
//!   cycle controller treats this as retryable and runs the next cycle.
//! - **`Acquisition`**: Any other failure reported by the capture hardware.
//!
//! Malformed console input is deliberately *not* an error: unrecognized
//! command bytes are silently ignored, matching the control surface of the
//! device this loop drives.

use std::time::Duration;
use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type AppResult<T> = std::result::Result<T, DaqError>;

#[derive(Error, Debug)]
pub enum DaqError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sweep did not complete within {timeout:?}")]
    SweepTimeout { timeout: Duration },

    #[error("Acquisition error: {0}")]
    Acquisition(String),
}

impl DaqError {
    /// Whether the cycle controller may retry the operation on the next
    /// cycle instead of aborting the loop.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DaqError::SweepTimeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_timeout_is_retryable() {
        let err = DaqError::SweepTimeout {
            timeout: Duration::from_millis(250),
        };
        assert!(err.is_retryable());
        assert!(err.to_string().contains("250ms"));
    }

    #[test]
    fn acquisition_error_is_fatal() {
        let err = DaqError::Acquisition("fifo overrun".to_string());
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Acquisition error: fifo overrun");
    }

    #[test]
    fn configuration_error_is_fatal() {
        let err = DaqError::Configuration("channels must be at least 1".into());
        assert!(!err.is_retryable());
    }
}

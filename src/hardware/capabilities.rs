//! Atomic Hardware Capabilities
//!
//! Fine-grained capability traits for the devices this loop touches. Instead
//! of one monolithic `Hardware` trait, each collaborator implements exactly
//! the capability it provides:
//!
//! - The sampling peripheral implements `SweepCapture`
//! - The digital output bank implements `RelayBank`
//! - The operator console implements `CommandSource` and `ReportSink`
//!
//! # Shape of a Capability
//!
//! Every trait here is `#[async_trait]`, bounded `Send + Sync`, returns
//! `anyhow::Result`, and covers a single hardware concern. The cycle
//! controller only ever holds `Arc<dyn ...>` handles, so swapping real
//! peripherals for mocks is a composition-root decision, not a code change.

use anyhow::Result;
use async_trait::async_trait;

/// Capability: round-robin bulk sample capture.
///
/// # Contract
///
/// - `configure` is called exactly once at startup. It fixes the round-robin
///   channel order, the transfer width (one `u16` per conversion), and the
///   peripheral-paced bulk transfer geometry.
/// - `fill_sweep` overwrites every slot of `frame` with one complete
///   interleaved sweep (`frame[i]` belongs to channel `i % channels`) and
///   returns only once the final sample has landed. Residual queued samples
///   are flushed before return, so nothing leaks into the next sweep.
/// - The future may pend indefinitely on stalled hardware; callers bound it
///   with a timeout (see [`crate::engine::AcquisitionEngine`]).
#[async_trait]
pub trait SweepCapture: Send + Sync {
    /// One-time peripheral setup. Must precede any `fill_sweep` call.
    async fn configure(&self) -> Result<()>;

    /// Overwrite `frame` with one complete interleaved sweep.
    async fn fill_sweep(&self, frame: &mut [u16]) -> Result<()>;
}

/// Capability: a contiguous bank of digital output lines.
#[async_trait]
pub trait RelayBank: Send + Sync {
    /// Drive the bank with the 4-bit relay state. Lines above bit 3 are
    /// always driven low.
    async fn apply(&self, nibble: u8) -> Result<()>;

    /// Number of physical lines in the bank.
    fn lines(&self) -> u32;
}

/// Capability: non-blocking single-character command input.
#[async_trait]
pub trait CommandSource: Send + Sync {
    /// Return the next pending input character, or `None` when no input is
    /// waiting. Never blocks the cycle.
    async fn poll(&self) -> Result<Option<char>>;
}

/// Capability: line-oriented text output for cycle reports.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Emit one report line. The sink appends the newline.
    async fn write_line(&self, line: &str) -> Result<()>;
}

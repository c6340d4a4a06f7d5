//! Hardware collaborators.
//!
//! Everything the acquisition loop talks to — the sampling peripheral, the
//! relay output bank, the command console — sits behind a small capability
//! trait, so the pipeline runs identically against real peripherals and the
//! mocks used in tests.

pub mod capabilities;
pub mod console;
pub mod mock;

pub use capabilities::{CommandSource, RelayBank, ReportSink, SweepCapture};

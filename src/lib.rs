//! # Sweep DAQ Core Library
//!
//! This crate implements a continuous multi-channel analog acquisition loop:
//! three analog inputs sampled in round-robin order by a peripheral-paced
//! bulk transfer, reduced to per-channel mean and standard deviation after a
//! fixed offset correction, and reported one line per cycle alongside an
//! externally settable relay-control word.
//!
//! ## Crate Structure
//!
//! - **`buffer`**: `SweepBuffer`, the fixed interleaved sample store with
//!   stride-based channel views.
//! - **`config`**: TOML-backed `Settings` with defaults matching the
//!   reference hardware and semantic validation.
//! - **`controller`**: `CycleController`, the always-running cycle loop
//!   (command poll → relay drive → sweep → reduce → report).
//! - **`engine`**: `AcquisitionEngine`, timeout-bounded sweeps over a
//!   `SweepCapture` capability.
//! - **`error`**: the `DaqError` enum for centralized error handling.
//! - **`hardware`**: capability traits for all collaborators, console/relay
//!   implementations for host processes, and mocks for tests.
//! - **`stats`**: the explicit offset-correction pass and the pure
//!   mean/sigma reducers.

pub mod buffer;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod hardware;
pub mod stats;

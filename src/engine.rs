//! Acquisition engine: one bounded sweep per call.
//!
//! Wraps a [`SweepCapture`] capability and turns its open-ended hardware
//! wait into a timeout-bounded operation. On expiry the engine surfaces
//! [`DaqError::SweepTimeout`] and leaves retry policy to the cycle
//! controller; the buffer's corrected flag stays cleared, so a partially
//! written sweep is never reduced or reported.

use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::trace;

use crate::buffer::SweepBuffer;
use crate::error::{AppResult, DaqError};
use crate::hardware::SweepCapture;

/// Drives the capture peripheral through complete interleaved sweeps.
pub struct AcquisitionEngine {
    capture: Arc<dyn SweepCapture>,
    timeout: Duration,
}

impl AcquisitionEngine {
    pub fn new(capture: Arc<dyn SweepCapture>, timeout: Duration) -> Self {
        Self { capture, timeout }
    }

    /// One-time peripheral setup; must run before the first sweep.
    pub async fn configure(&self) -> AppResult<()> {
        self.capture
            .configure()
            .await
            .map_err(|err| DaqError::Acquisition(err.to_string()))
    }

    /// Run one sweep into `buffer`, bounded by the configured timeout.
    ///
    /// On `Ok`, every slot of the buffer has been overwritten with the new
    /// sweep. On [`DaqError::SweepTimeout`] the buffer contents are
    /// unspecified, but the cleared corrected flag keeps the caller from
    /// reporting them; the next successful sweep overwrites everything.
    pub async fn run_sweep(&self, buffer: &mut SweepBuffer) -> AppResult<()> {
        let result = {
            let frame = buffer.begin_sweep();
            time::timeout(self.timeout, self.capture.fill_sweep(frame)).await
        };
        match result {
            Ok(Ok(())) => {
                trace!(samples = buffer.len(), "sweep complete");
                Ok(())
            }
            Ok(Err(err)) => Err(DaqError::Acquisition(err.to_string())),
            Err(_) => Err(DaqError::SweepTimeout {
                timeout: self.timeout,
            }),
        }
    }
}

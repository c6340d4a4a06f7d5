//! Cycle controller: the always-running acquisition loop.
//!
//! One cycle is: poll the command source for a relay command, drive the
//! relay bank, run a sweep, correct and reduce each channel, emit one
//! report line. The controller owns the sweep buffer and the relay state
//! outright; the sequential sweep-then-reduce handoff is a `&mut` borrow,
//! not a synchronization point.
//!
//! A timed-out sweep is logged and retried on the next cycle (no report is
//! emitted for it); any other error aborts the loop.

use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::buffer::SweepBuffer;
use crate::config::Settings;
use crate::engine::AcquisitionEngine;
use crate::error::{AppResult, DaqError};
use crate::hardware::console::decode_relay_command;
use crate::hardware::{CommandSource, RelayBank, ReportSink};
use crate::stats::{correct_offset, reduce_channel};

/// Owns one acquisition session: buffer, engine, collaborators, relay state.
pub struct CycleController {
    buffer: SweepBuffer,
    engine: AcquisitionEngine,
    commands: Arc<dyn CommandSource>,
    relays: Arc<dyn RelayBank>,
    sink: Arc<dyn ReportSink>,
    adc_offset: u16,
    relay_state: u8,
}

impl CycleController {
    pub fn new(
        settings: &Settings,
        engine: AcquisitionEngine,
        commands: Arc<dyn CommandSource>,
        relays: Arc<dyn RelayBank>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            buffer: SweepBuffer::new(settings.acquisition.channels, settings.acquisition.depth),
            engine,
            commands,
            relays,
            sink,
            adc_offset: settings.acquisition.adc_offset,
            relay_state: 0,
        }
    }

    /// Current 4-bit relay-control word.
    pub fn relay_state(&self) -> u8 {
        self.relay_state
    }

    /// Run one full cycle: command, relays, sweep, reduce, report.
    pub async fn run_cycle(&mut self) -> AppResult<()> {
        if let Some(c) = self
            .commands
            .poll()
            .await
            .map_err(|err| DaqError::Acquisition(err.to_string()))?
        {
            if let Some(nibble) = decode_relay_command(c) {
                debug!(command = %c, state = nibble, "relay state updated");
                self.relay_state = nibble;
            }
        }

        self.relays
            .apply(self.relay_state)
            .await
            .map_err(|err| DaqError::Acquisition(err.to_string()))?;

        self.engine.run_sweep(&mut self.buffer).await?;
        correct_offset(&mut self.buffer, self.adc_offset);

        let line = self.format_report();
        self.sink
            .write_line(&line)
            .await
            .map_err(|err| DaqError::Io(std::io::Error::other(err.to_string())))?;
        Ok(())
    }

    /// Run `max_cycles` cycles, or forever when `None`.
    ///
    /// Timed-out sweeps count as cycles but produce no report; the loop
    /// simply retries on the next iteration.
    pub async fn run(&mut self, max_cycles: Option<u64>) -> AppResult<()> {
        let mut cycle: u64 = 0;
        loop {
            if let Some(max) = max_cycles {
                if cycle >= max {
                    return Ok(());
                }
            }
            cycle += 1;

            match self.run_cycle().await {
                Ok(()) => {}
                Err(err) if err.is_retryable() => {
                    warn!(cycle, error = %err, "sweep abandoned, retrying next cycle");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One report line: relay nibble as a lowercase hex digit, then per
    /// channel a zero-padded 9-character mean and sigma with 4 decimals.
    fn format_report(&self) -> String {
        let mut line = format!("{:x}", self.relay_state & 0x0f);
        for channel in 0..self.buffer.channels() {
            let stats = reduce_channel(&self.buffer, channel);
            let _ = write!(line, " {:09.4} {:09.4}", stats.mean, stats.sigma);
        }
        line
    }
}

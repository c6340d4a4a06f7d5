//! Configuration management.
//!
//! Settings are loaded from an optional TOML file via the `config` crate and
//! fall back to the defaults of the reference hardware: three analog inputs
//! sampled 500 deep, a 12-bit converter with a fixed 4-count offset artifact,
//! and a seven-line relay bank. Semantic validation happens after
//! deserialization and surfaces `DaqError::Configuration`.

use crate::error::{AppResult, DaqError};
use config::Config;
use serde::Deserialize;
use std::time::Duration;

/// Top-level application settings.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub acquisition: AcquisitionSettings,
    pub relay: RelaySettings,
}

/// Geometry and timing of one acquisition sweep.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AcquisitionSettings {
    /// Number of analog inputs sampled in round-robin order.
    pub channels: usize,
    /// Samples captured per channel per sweep.
    pub depth: usize,
    /// Fixed subtractive bias correction for the converter artifact, in
    /// ADC counts.
    pub adc_offset: u16,
    /// Converter resolution; raw codes span `0..2^resolution_bits`.
    pub resolution_bits: u32,
    /// Upper bound on one sweep's bulk transfer before it is abandoned
    /// and retried on the next cycle.
    #[serde(with = "humantime_serde")]
    pub sweep_timeout: Duration,
}

/// Digital relay output bank.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RelaySettings {
    /// Contiguous output lines driven with the 4-bit relay state
    /// (upper lines always low).
    pub lines: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            acquisition: AcquisitionSettings::default(),
            relay: RelaySettings::default(),
        }
    }
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            channels: 3,
            depth: 500,
            adc_offset: 4,
            resolution_bits: 12,
            sweep_timeout: Duration::from_secs(2),
        }
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self { lines: 7 }
    }
}

impl AcquisitionSettings {
    /// Highest raw code the converter can produce (`2^resolution_bits - 1`).
    pub fn max_code(&self) -> u16 {
        ((1u32 << self.resolution_bits) - 1) as u16
    }

    /// Total samples in one interleaved sweep.
    pub fn sweep_len(&self) -> usize {
        self.channels * self.depth
    }
}

impl Settings {
    /// Load settings, layering an optional TOML file over the defaults.
    pub fn load(config_path: Option<&str>) -> AppResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }
        let settings: Settings = builder
            .build()
            .map_err(DaqError::Config)?
            .try_deserialize()
            .map_err(DaqError::Config)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Semantic validation of values that parse fine but make no sense.
    pub fn validate(&self) -> AppResult<()> {
        let acq = &self.acquisition;
        if acq.channels == 0 {
            return Err(DaqError::Configuration(
                "acquisition.channels must be at least 1".into(),
            ));
        }
        if acq.depth == 0 {
            return Err(DaqError::Configuration(
                "acquisition.depth must be at least 1".into(),
            ));
        }
        if acq.resolution_bits == 0 || acq.resolution_bits > 16 {
            return Err(DaqError::Configuration(format!(
                "acquisition.resolution_bits must be within 1..=16, got {}",
                acq.resolution_bits
            )));
        }
        if acq.adc_offset >= acq.max_code() {
            return Err(DaqError::Configuration(format!(
                "acquisition.adc_offset {} is at or above full scale {}",
                acq.adc_offset,
                acq.max_code()
            )));
        }
        if acq.sweep_timeout.is_zero() {
            return Err(DaqError::Configuration(
                "acquisition.sweep_timeout must be non-zero".into(),
            ));
        }
        // The relay state is a 4-bit word; the bank must be wide enough.
        if self.relay.lines < 4 {
            return Err(DaqError::Configuration(format!(
                "relay.lines must be at least 4, got {}",
                self.relay.lines
            )));
        }
        Ok(())
    }
}

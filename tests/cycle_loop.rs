//! Integration tests for the acquisition cycle loop.
//!
//! These wire the full pipeline — controller, engine, buffer, reducers —
//! against mock collaborators and assert on externally observable behavior:
//! report lines, relay states, and sweep freshness.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sweep_daq::buffer::SweepBuffer;
use sweep_daq::config::Settings;
use sweep_daq::controller::CycleController;
use sweep_daq::engine::AcquisitionEngine;
use sweep_daq::hardware::mock::{MockAdc, MockCommandSource, MockRelayBank, MockReportSink};
use sweep_daq::hardware::SweepCapture;
use sweep_daq::stats::{channel_mean, channel_sigma, correct_offset};

fn test_settings(channels: usize, depth: usize) -> Settings {
    let mut settings = Settings::default();
    settings.acquisition.channels = channels;
    settings.acquisition.depth = depth;
    settings.acquisition.sweep_timeout = Duration::from_millis(100);
    settings
}

// =============================================================================
// Sweep Completeness
// =============================================================================

/// Capture that stamps every slot with the ordinal of the sweep that wrote
/// it, making stale samples from an earlier sweep detectable.
struct TaggingCapture {
    sweep_no: AtomicU16,
}

impl TaggingCapture {
    fn new() -> Self {
        Self {
            sweep_no: AtomicU16::new(0),
        }
    }
}

#[async_trait]
impl SweepCapture for TaggingCapture {
    async fn configure(&self) -> Result<()> {
        Ok(())
    }

    async fn fill_sweep(&self, frame: &mut [u16]) -> Result<()> {
        let tag = self.sweep_no.fetch_add(1, Ordering::SeqCst) + 1;
        frame.fill(tag);
        Ok(())
    }
}

#[tokio::test]
async fn every_slot_is_overwritten_each_sweep() {
    let capture = Arc::new(TaggingCapture::new());
    let engine = AcquisitionEngine::new(capture, Duration::from_secs(1));
    engine.configure().await.unwrap();

    let mut buffer = SweepBuffer::new(3, 500);
    engine.run_sweep(&mut buffer).await.unwrap();
    assert!(buffer.as_slice().iter().all(|&s| s == 1));

    engine.run_sweep(&mut buffer).await.unwrap();
    let stale = buffer.as_slice().iter().filter(|&&s| s != 2).count();
    assert_eq!(stale, 0, "{stale} slots kept values from the prior sweep");
}

// =============================================================================
// End-to-End Cycle Behavior
// =============================================================================

#[tokio::test]
async fn full_session_reports_and_relays() {
    let settings = test_settings(3, 16);

    let adc = Arc::new(MockAdc::with_levels(vec![100, 2000, 4]));
    let commands = Arc::new(MockCommandSource::new());
    let relays = Arc::new(MockRelayBank::default());
    let sink = Arc::new(MockReportSink::new());

    let engine = AcquisitionEngine::new(adc.clone(), settings.acquisition.sweep_timeout);
    engine.configure().await.unwrap();

    // One relay command queued before the session starts.
    commands.push('3').await;

    let mut controller = CycleController::new(
        &settings,
        engine,
        commands.clone(),
        relays.clone(),
        sink.clone(),
    );
    controller.run(Some(3)).await.unwrap();

    let lines = sink.lines().await;
    assert_eq!(lines.len(), 3);

    // Channel 2 rests at the offset floor: corrected to zero, flat.
    for line in &lines {
        assert_eq!(
            line,
            "3 0096.0000 0000.0000 1996.0000 0000.0000 0000.0000 0000.0000"
        );
    }

    // The relay bank saw state 3 on every cycle.
    assert_eq!(relays.applied().await, vec![3, 3, 3]);
    assert_eq!(adc.sweep_count(), 3);
}

#[tokio::test]
async fn relay_commands_take_effect_between_cycles() {
    let settings = test_settings(3, 4);

    let adc = Arc::new(MockAdc::with_levels(vec![50, 50, 50]));
    let commands = Arc::new(MockCommandSource::new());
    let relays = Arc::new(MockRelayBank::default());
    let sink = Arc::new(MockReportSink::new());

    let engine = AcquisitionEngine::new(adc, settings.acquisition.sweep_timeout);
    engine.configure().await.unwrap();

    let mut controller = CycleController::new(
        &settings,
        engine,
        commands.clone(),
        relays.clone(),
        sink.clone(),
    );

    // Cycle 1: no input. Cycle 2: 'B'. Cycle 3: unrecognized 'x'.
    controller.run_cycle().await.unwrap();
    commands.push('B').await;
    controller.run_cycle().await.unwrap();
    commands.push('x').await;
    controller.run_cycle().await.unwrap();

    assert_eq!(relays.applied().await, vec![0, 11, 11]);

    let lines = sink.lines().await;
    assert!(lines[0].starts_with("0 "));
    assert!(lines[1].starts_with("b "));
    assert!(lines[2].starts_with("b "), "unrecognized input must not reset state");
}

#[tokio::test]
async fn noisy_channels_report_positive_sigma() {
    let settings = test_settings(3, 200);

    let adc = Arc::new(MockAdc::with_levels(vec![1000, 2000, 3000]).with_noise(50));
    let commands = Arc::new(MockCommandSource::new());
    let relays = Arc::new(MockRelayBank::default());
    let sink = Arc::new(MockReportSink::new());

    let engine = AcquisitionEngine::new(adc, settings.acquisition.sweep_timeout);
    engine.configure().await.unwrap();

    let mut controller =
        CycleController::new(&settings, engine, commands, relays, sink.clone());
    controller.run_cycle().await.unwrap();

    let line = &sink.lines().await[0];
    let fields: Vec<&str> = line.split(' ').collect();
    assert_eq!(fields.len(), 1 + 3 * 2);

    // Means stay near (level - offset); sigmas are positive but bounded by
    // the noise amplitude.
    let means: Vec<f64> = [1, 3, 5].iter().map(|&i| fields[i].parse().unwrap()).collect();
    let sigmas: Vec<f64> = [2, 4, 6].iter().map(|&i| fields[i].parse().unwrap()).collect();
    for (mean, expected) in means.iter().zip([996.0, 1996.0, 2996.0]) {
        assert!(
            (mean - expected).abs() < 50.0,
            "mean {mean} too far from {expected}"
        );
    }
    for sigma in sigmas {
        assert!(sigma >= 0.0 && sigma <= 50.0, "sigma {sigma} out of bounds");
    }
}

// =============================================================================
// Reducer Semantics Over Captured Sweeps
// =============================================================================

#[tokio::test]
async fn reducers_match_hand_computed_values_over_a_real_sweep() {
    // Two channels, depth 4, deterministic ramp per channel.
    struct RampCapture;

    #[async_trait]
    impl SweepCapture for RampCapture {
        async fn configure(&self) -> Result<()> {
            Ok(())
        }

        async fn fill_sweep(&self, frame: &mut [u16]) -> Result<()> {
            // Channel 0: 14, 24, 34, 44. Channel 1: constant 104.
            for (i, slot) in frame.iter_mut().enumerate() {
                *slot = if i % 2 == 0 {
                    14 + 10 * (i as u16 / 2)
                } else {
                    104
                };
            }
            Ok(())
        }
    }

    let engine = AcquisitionEngine::new(Arc::new(RampCapture), Duration::from_secs(1));
    let mut buffer = SweepBuffer::new(2, 4);
    engine.run_sweep(&mut buffer).await.unwrap();
    correct_offset(&mut buffer, 4);

    // Channel 0 corrected: 10, 20, 30, 40 -> mean 25, population sigma
    // sqrt(125) ~= 11.1803.
    let mean0 = channel_mean(&buffer, 0);
    let sigma0 = channel_sigma(&buffer, 0, mean0);
    assert!((mean0 - 25.0).abs() < 1e-9);
    assert!((sigma0 - 125.0_f64.sqrt()).abs() < 1e-9);

    // Channel 1 corrected: constant 100 -> sigma exactly zero.
    let mean1 = channel_mean(&buffer, 1);
    assert!((mean1 - 100.0).abs() < 1e-9);
    assert_eq!(channel_sigma(&buffer, 1, mean1), 0.0);
}

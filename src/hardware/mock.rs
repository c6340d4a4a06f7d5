//! Mock Hardware Implementations
//!
//! Simulated collaborators for testing the acquisition loop without physical
//! hardware. All mocks use async-safe operations (tokio::time::sleep, not
//! std::thread::sleep).
//!
//! # Available Mocks
//!
//! - `MockAdc` - Simulated round-robin converter with per-channel levels,
//!   optional noise, and stall injection for timeout tests
//! - `MockRelayBank` - Records every applied relay state
//! - `MockCommandSource` - Replays a queue of command characters
//! - `MockReportSink` - Collects emitted report lines

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::time::{sleep, Duration};

use crate::hardware::capabilities::{CommandSource, RelayBank, ReportSink, SweepCapture};

// =============================================================================
// MockAdc - Simulated Round-Robin Converter
// =============================================================================

/// Mock round-robin ADC with a peripheral-paced bulk fill.
///
/// Each sweep writes every slot of the destination frame: slot `i` gets
/// channel `i % channels`'s base level, plus uniform noise of the configured
/// amplitude, clamped to the converter's full scale. A stall budget lets
/// tests make the next N sweeps hang forever to exercise timeout handling.
///
/// # Example
///
/// ```rust,ignore
/// let adc = MockAdc::with_levels(vec![100, 200, 300]);
/// adc.configure().await?;
/// adc.fill_sweep(&mut frame).await?;
/// ```
pub struct MockAdc {
    channels: usize,
    levels: Arc<RwLock<Vec<u16>>>,
    noise: u16,
    max_code: u16,
    configured: Arc<RwLock<bool>>,
    stall_budget: AtomicU64,
    sweep_count: AtomicU64,
}

impl MockAdc {
    /// Create a mock ADC with every channel resting at mid-scale of a
    /// 12-bit converter.
    pub fn new(channels: usize) -> Self {
        Self::with_levels(vec![2048; channels])
    }

    /// Create a mock ADC with one fixed base level per channel.
    pub fn with_levels(levels: Vec<u16>) -> Self {
        assert!(!levels.is_empty(), "mock ADC needs at least one channel");
        Self {
            channels: levels.len(),
            levels: Arc::new(RwLock::new(levels)),
            noise: 0,
            max_code: 4095,
            configured: Arc::new(RwLock::new(false)),
            stall_budget: AtomicU64::new(0),
            sweep_count: AtomicU64::new(0),
        }
    }

    /// Add uniform noise of `amplitude` counts around each base level.
    pub fn with_noise(mut self, amplitude: u16) -> Self {
        self.noise = amplitude;
        self
    }

    /// Number of round-robin channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Change one channel's base level between sweeps.
    pub async fn set_level(&self, channel: usize, code: u16) {
        self.levels.write().await[channel] = code;
    }

    /// Make the next `sweeps` fills hang forever (simulated stalled
    /// peripheral). Each timed-out fill consumes one unit of the budget.
    pub fn stall_for(&self, sweeps: u64) {
        self.stall_budget.store(sweeps, Ordering::SeqCst);
    }

    /// Total sweeps completed (stalled fills do not count).
    pub fn sweep_count(&self) -> u64 {
        self.sweep_count.load(Ordering::SeqCst)
    }

    fn sample(&self, base: u16) -> u16 {
        if self.noise == 0 {
            return base.min(self.max_code);
        }
        let hi = base.saturating_add(self.noise).min(self.max_code);
        let lo = base.saturating_sub(self.noise).min(hi);
        rand::thread_rng().gen_range(lo..=hi)
    }
}

#[async_trait]
impl SweepCapture for MockAdc {
    async fn configure(&self) -> Result<()> {
        *self.configured.write().await = true;
        Ok(())
    }

    async fn fill_sweep(&self, frame: &mut [u16]) -> Result<()> {
        if !*self.configured.read().await {
            anyhow::bail!("MockAdc: fill_sweep before configure");
        }
        if frame.len() % self.channels != 0 {
            anyhow::bail!(
                "MockAdc: frame length {} is not a multiple of {} channels",
                frame.len(),
                self.channels
            );
        }

        if self
            .stall_budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            // Stalled peripheral: the data-ready signal never fires.
            futures::future::pending::<()>().await;
        }

        let levels = self.levels.read().await.clone();
        for (i, slot) in frame.iter_mut().enumerate() {
            *slot = self.sample(levels[i % self.channels]);
        }

        // Mimic the conversion time of a real sweep.
        sleep(Duration::from_millis(1)).await;

        self.sweep_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// MockRelayBank - Recording Digital Output Bank
// =============================================================================

/// Relay bank that records every applied state for later assertions.
pub struct MockRelayBank {
    lines: u32,
    applied: Arc<RwLock<Vec<u8>>>,
}

impl MockRelayBank {
    pub fn new(lines: u32) -> Self {
        Self {
            lines,
            applied: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Every state applied so far, in order.
    pub async fn applied(&self) -> Vec<u8> {
        self.applied.read().await.clone()
    }

    /// Most recently applied state, if any.
    pub async fn last(&self) -> Option<u8> {
        self.applied.read().await.last().copied()
    }
}

impl Default for MockRelayBank {
    fn default() -> Self {
        Self::new(7)
    }
}

#[async_trait]
impl RelayBank for MockRelayBank {
    async fn apply(&self, nibble: u8) -> Result<()> {
        self.applied.write().await.push(nibble & 0x0f);
        Ok(())
    }

    fn lines(&self) -> u32 {
        self.lines
    }
}

// =============================================================================
// MockCommandSource - Queued Command Input
// =============================================================================

/// Command source replaying a pre-seeded queue, one character per poll.
pub struct MockCommandSource {
    queue: Mutex<VecDeque<char>>,
}

impl MockCommandSource {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue one command character for a later poll.
    pub async fn push(&self, c: char) {
        self.queue.lock().await.push_back(c);
    }
}

impl Default for MockCommandSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandSource for MockCommandSource {
    async fn poll(&self) -> Result<Option<char>> {
        Ok(self.queue.lock().await.pop_front())
    }
}

// =============================================================================
// MockReportSink - Collecting Output Sink
// =============================================================================

/// Report sink collecting every emitted line.
pub struct MockReportSink {
    lines: Arc<RwLock<Vec<String>>>,
}

impl MockReportSink {
    pub fn new() -> Self {
        Self {
            lines: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// All lines written so far, in order.
    pub async fn lines(&self) -> Vec<String> {
        self.lines.read().await.clone()
    }
}

impl Default for MockReportSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportSink for MockReportSink {
    async fn write_line(&self, line: &str) -> Result<()> {
        self.lines.write().await.push(line.to_string());
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! Fixed-capacity interleaved sweep storage.
//!
//! One `SweepBuffer` holds exactly one acquisition sweep: `channels × depth`
//! unsigned 16-bit samples in round-robin order, so index `i` belongs to
//! channel `i % channels`. The buffer is allocated once at startup and
//! overwritten in place every cycle; per-channel access is by stride, never
//! by copy.

/// Interleaved sample storage for one acquisition sweep.
///
/// # Invariants
///
/// - `len() == channels * depth`, always an exact multiple of `channels`.
/// - Each channel owns exactly `depth` entries at stride `channels`,
///   starting at its own index.
///
/// The `corrected` flag tracks whether the offset-correction pass has run
/// for the sweep currently in the buffer. [`begin_sweep`](Self::begin_sweep)
/// clears it, which is what makes the correction pass idempotent per cycle.
#[derive(Debug)]
pub struct SweepBuffer {
    samples: Vec<u16>,
    channels: usize,
    depth: usize,
    corrected: bool,
}

impl SweepBuffer {
    /// Allocate a zeroed buffer for `channels * depth` samples.
    pub fn new(channels: usize, depth: usize) -> Self {
        assert!(channels > 0, "buffer needs at least one channel");
        assert!(depth > 0, "buffer needs at least one sample per channel");
        Self {
            samples: vec![0; channels * depth],
            channels,
            depth,
            corrected: false,
        }
    }

    /// Build a buffer from existing interleaved samples.
    ///
    /// `samples.len()` must be a non-zero multiple of `channels`. Intended
    /// for tests and for replaying captured sweeps.
    pub fn from_interleaved(channels: usize, samples: Vec<u16>) -> Self {
        assert!(channels > 0, "buffer needs at least one channel");
        assert!(
            !samples.is_empty() && samples.len() % channels == 0,
            "sample count {} is not a non-zero multiple of {} channels",
            samples.len(),
            channels
        );
        let depth = samples.len() / channels;
        Self {
            samples,
            channels,
            depth,
            corrected: false,
        }
    }

    /// Number of interleaved channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Samples per channel per sweep.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Total samples in the buffer (`channels * depth`).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; the buffer is sized at construction.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Read-only view of the whole interleaved sweep.
    pub fn as_slice(&self) -> &[u16] {
        &self.samples
    }

    /// Hand the whole buffer to the acquisition engine for overwriting.
    ///
    /// Clears the corrected flag: whatever lands in the buffer is a fresh
    /// raw sweep that has not had the offset pass applied.
    pub fn begin_sweep(&mut self) -> &mut [u16] {
        self.corrected = false;
        &mut self.samples
    }

    /// Mutable view over every sample, for the offset-correction pass.
    pub(crate) fn samples_mut(&mut self) -> &mut [u16] {
        &mut self.samples
    }

    /// Stride view over the samples belonging to `channel`.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= channels()`.
    pub fn channel_samples(&self, channel: usize) -> impl Iterator<Item = u16> + '_ {
        assert!(channel < self.channels, "channel {channel} out of range");
        self.samples
            .iter()
            .skip(channel)
            .step_by(self.channels)
            .copied()
    }

    /// Whether the offset-correction pass has run for the current sweep.
    pub fn is_corrected(&self) -> bool {
        self.corrected
    }

    pub(crate) fn mark_corrected(&mut self) {
        self.corrected = true;
    }
}

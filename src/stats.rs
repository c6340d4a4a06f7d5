//! Streaming statistical reduction over one sweep.
//!
//! The reduction happens in two stages, deliberately decoupled:
//!
//! 1. [`correct_offset`] — one explicit pass that subtracts the converter's
//!    fixed bias from every sample (clamping at zero) and stores the result
//!    back into the buffer. It runs at most once per sweep, gated by the
//!    buffer's corrected flag.
//! 2. [`channel_mean`] / [`channel_sigma`] — pure reductions over the
//!    corrected stride view. Because correction is its own pass, the two
//!    statistics can be computed in either order.
//!
//! Accumulation is in `f64`, which holds exact integer sums far beyond a
//! full-scale sweep, so there is no overflow concern across any realistic
//! depth. Inputs are bounded ADC codes, so NaN/Inf never arise.

use crate::buffer::SweepBuffer;

/// Mean and population standard deviation of one channel for one sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    pub mean: f64,
    pub sigma: f64,
}

/// Apply the fixed subtractive bias correction to every sample in place.
///
/// Raw codes at or below `offset` clamp to 0 instead of underflowing. The
/// pass is idempotent per sweep: once the buffer is marked corrected it is
/// a no-op until the next [`SweepBuffer::begin_sweep`].
pub fn correct_offset(buffer: &mut SweepBuffer, offset: u16) {
    if buffer.is_corrected() {
        return;
    }
    for sample in buffer.samples_mut() {
        *sample = sample.saturating_sub(offset);
    }
    buffer.mark_corrected();
}

/// Arithmetic mean of the `depth` samples belonging to `channel`.
///
/// Expects the offset pass to have run already; on a raw buffer this is the
/// mean of the raw codes.
pub fn channel_mean(buffer: &SweepBuffer, channel: usize) -> f64 {
    let sum: f64 = buffer.channel_samples(channel).map(f64::from).sum();
    sum / buffer.depth() as f64
}

/// Population standard deviation of `channel` around `mean`.
///
/// `sqrt(avg((sample - mean)^2))` over the same stride view as
/// [`channel_mean`]; always >= 0.
pub fn channel_sigma(buffer: &SweepBuffer, channel: usize, mean: f64) -> f64 {
    let sum_sq: f64 = buffer
        .channel_samples(channel)
        .map(|s| {
            let dev = f64::from(s) - mean;
            dev * dev
        })
        .sum();
    (sum_sq / buffer.depth() as f64).sqrt()
}

/// Convenience: mean then sigma for one channel.
pub fn reduce_channel(buffer: &SweepBuffer, channel: usize) -> ChannelStats {
    let mean = channel_mean(buffer, channel);
    let sigma = channel_sigma(buffer, channel, mean);
    ChannelStats { mean, sigma }
}

//! Zero-padded frame extraction around a center sample.

use crate::core::types::Sample;

/// Samples before the center of a `width`-sample frame, center included.
#[inline]
pub fn half_before(width: usize) -> usize {
    width.div_ceil(2)
}

/// Samples after the center of a `width`-sample frame.
#[inline]
pub fn half_after(width: usize) -> usize {
    width / 2
}

/// Extracts `width` samples of `signal` centered on `pin`.
///
/// Frame index `half_before(width)` corresponds to `signal[pin]`. Where the
/// frame reaches past either end of the signal the missing samples are zero.
/// Any `pin` is accepted, including `pin >= signal.len()`.
pub fn extract_frame(signal: &[Sample], pin: usize, width: usize) -> Vec<f64> {
    let mut frame = vec![0.0; width];
    let center = half_before(width);
    let lo = pin.saturating_sub(center);
    let hi = (pin + half_after(width)).min(signal.len());
    if lo >= hi {
        return frame;
    }

    let offset = lo + center - pin;
    for (dst, &s) in frame[offset..offset + (hi - lo)].iter_mut().zip(&signal[lo..hi]) {
        *dst = s as f64;
    }
    frame
}

/// Start of the `window_len` sub-frame sharing its center with a
/// `frame_width` frame.
///
/// `frame_width` must be at least `window_len`.
#[inline]
pub fn sub_frame_offset(frame_width: usize, window_len: usize) -> usize {
    half_before(frame_width) - half_before(window_len)
}

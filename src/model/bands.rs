//! Band selection: keep each resolution's peaks inside its own band.
//!
//! Bands are taken as given. Overlapping bands duplicate peaks found by
//! both resolutions; gaps between bands drop peaks.

use super::analyzer::Peak;
use super::params::Band;

/// Peaks whose frequency lies in `band`, in their original order.
pub fn select_band(peaks: &[Peak], band: &Band) -> Vec<Peak> {
    peaks
        .iter()
        .filter(|p| band.contains(p.frequency))
        .copied()
        .collect()
}

/// Concatenates the in-band peaks of every resolution, resolution-major.
///
/// `per_resolution[i]` is filtered by `bands[i]`; extra entries in either
/// slice are ignored.
pub fn merge_band_peaks(per_resolution: &[Vec<Peak>], bands: &[Band]) -> Vec<Peak> {
    let mut merged = Vec::with_capacity(per_resolution.iter().map(Vec::len).sum());
    for (peaks, band) in per_resolution.iter().zip(bands) {
        merged.extend(peaks.iter().filter(|p| band.contains(p.frequency)).copied());
    }
    merged
}

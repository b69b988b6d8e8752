//! Per-resolution peak analysis: DFT, peak picking and interpolation.

use crate::error::SineModelError;
use crate::spectral::dft::DftAnalyzer;
use crate::spectral::peaks::{detect_peaks, interpolate_peaks};
use crate::spectral::sines::Sinusoid;

/// A spectral peak found by one resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Fractional bin location in the analysis spectrum.
    pub location: f64,
    /// Interpolated magnitude in dB.
    pub magnitude_db: f64,
    /// Phase at the frame center, in radians.
    pub phase: f64,
    /// Frequency in Hz (`location * sample_rate / fft_size`).
    pub frequency: f64,
}

impl Peak {
    /// The sinusoid this peak describes.
    #[inline]
    pub fn sinusoid(&self) -> Sinusoid {
        Sinusoid {
            frequency: self.frequency,
            magnitude_db: self.magnitude_db,
            phase: self.phase,
        }
    }
}

/// Finds the interpolated spectral peaks of a frame at one resolution.
#[derive(Debug, Clone)]
pub struct PeakAnalyzer {
    dft: DftAnalyzer,
    threshold_db: f64,
    sample_rate: u32,
}

impl PeakAnalyzer {
    /// Creates an analyzer for one window and FFT size.
    ///
    /// # Errors
    /// Fails on an empty or zero-sum window, or an FFT size that is not a
    /// power of two at least as long as the window.
    pub fn new(
        window: &[f64],
        fft_size: usize,
        threshold_db: f64,
        sample_rate: u32,
    ) -> Result<Self, SineModelError> {
        if sample_rate == 0 {
            return Err(SineModelError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            dft: DftAnalyzer::new(window, fft_size)?,
            threshold_db,
            sample_rate,
        })
    }

    /// Analysis window length.
    #[inline]
    pub fn window_len(&self) -> usize {
        self.dft.window_len()
    }

    #[inline]
    pub fn fft_size(&self) -> usize {
        self.dft.fft_size()
    }

    /// Peaks of a frame of exactly `window_len()` samples.
    pub fn analyze_frame(&self, frame: &[f64]) -> Vec<Peak> {
        let spectrum = self.dft.analyze(frame);
        let locations = detect_peaks(&spectrum.magnitude_db, self.threshold_db);
        let bin_hz = self.sample_rate as f64 / self.fft_size() as f64;
        interpolate_peaks(&spectrum.magnitude_db, &spectrum.phase, &locations)
            .into_iter()
            .map(|p| Peak {
                location: p.location,
                magnitude_db: p.magnitude_db,
                phase: p.phase,
                frequency: p.location * bin_hz,
            })
            .collect()
    }

    /// Peaks of the `window_len()` samples of `frame` starting at `offset`.
    ///
    /// The driver passes the offset that centers this window inside its
    /// widest frame (see [`sub_frame_offset`](super::frame::sub_frame_offset)).
    pub fn analyze_at(&self, frame: &[f64], offset: usize) -> Vec<Peak> {
        self.analyze_frame(&frame[offset..offset + self.window_len()])
    }

    /// Peaks of the window-length segment centered on the middle of `frame`.
    ///
    /// Returns no peaks if `frame` is shorter than the window.
    pub fn analyze(&self, frame: &[f64]) -> Vec<Peak> {
        if frame.len() < self.window_len() {
            return Vec::new();
        }
        let offset = frame.len().div_ceil(2) - self.window_len().div_ceil(2);
        self.analyze_at(frame, offset)
    }
}

//! Frame synthesis from merged peaks and overlap-add into the output.

use crate::core::fft::is_valid_fft_size;
use crate::core::window::{blackman_harris_window, normalize_window, triangular_window};
use crate::error::SineModelError;
use crate::spectral::sines::{SineSynthesizer, Sinusoid};

use super::analyzer::Peak;

/// Smallest accepted synthesis FFT size.
const MIN_FFT_SIZE: usize = 8;

/// Builds the synthesis window for an `fft_size`-point synthesis frame.
///
/// The central `fft_size / 2` samples hold a triangle of twice the hop
/// divided by the unit-sum Blackman-Harris window that shapes every
/// generated lobe; the rest is zero. Consecutive frames one hop apart then
/// sum to the original sinusoid.
pub fn synthesis_window(fft_size: usize) -> Vec<f64> {
    let hop = fft_size / 4;
    let half = fft_size / 2;
    let mut window = vec![0.0; fft_size];
    let triangle = triangular_window(2 * hop);
    let bh = normalize_window(&blackman_harris_window(fft_size)).unwrap_or_default();
    if bh.len() != fft_size {
        return window;
    }
    for (i, &t) in triangle.iter().enumerate() {
        let idx = half - hop + i;
        window[idx] = t / bh[idx];
    }
    window
}

/// Renders merged peaks into windowed time frames.
#[derive(Debug, Clone)]
pub struct SpectralSynthesizer {
    synth: SineSynthesizer,
    window: Vec<f64>,
    sample_rate: u32,
}

impl SpectralSynthesizer {
    /// Creates a synthesizer for `fft_size`-sample frames.
    ///
    /// # Errors
    /// Returns [`SineModelError::InvalidSynthesisSize`] unless `fft_size` is a
    /// power of two of at least 8, and
    /// [`SineModelError::InvalidSampleRate`] for a zero sample rate.
    pub fn new(fft_size: usize, sample_rate: u32) -> Result<Self, SineModelError> {
        if !is_valid_fft_size(fft_size) || fft_size < MIN_FFT_SIZE {
            return Err(SineModelError::InvalidSynthesisSize(fft_size));
        }
        if sample_rate == 0 {
            return Err(SineModelError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            synth: SineSynthesizer::new(fft_size),
            window: synthesis_window(fft_size),
            sample_rate,
        })
    }

    #[inline]
    pub fn fft_size(&self) -> usize {
        self.synth.fft_size()
    }

    /// Hop between consecutive frames (a quarter of the FFT size).
    #[inline]
    pub fn hop_size(&self) -> usize {
        self.fft_size() / 4
    }

    /// The synthesis window applied by [`overlap_add`](Self::overlap_add).
    #[inline]
    pub fn window(&self) -> &[f64] {
        &self.window
    }

    /// Synthesizes one unwindowed frame of `fft_size()` samples.
    pub fn synthesize(&self, peaks: &[Peak]) -> Vec<f64> {
        let sinusoids: Vec<Sinusoid> = peaks.iter().map(Peak::sinusoid).collect();
        self.synth.synthesize(&sinusoids, self.sample_rate)
    }

    /// Windows `frame` and adds it into `output[pin - fft_size/2 ..]`.
    ///
    /// Samples that would land outside `output` are discarded.
    pub fn overlap_add(&self, output: &mut [f64], frame: &[f64], pin: usize) {
        let half = self.fft_size() / 2;
        let Some(start) = pin.checked_sub(half) else {
            return;
        };
        for ((out, &y), &w) in output
            .iter_mut()
            .skip(start)
            .zip(frame.iter())
            .zip(self.window.iter())
        {
            *out += w * y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_support() {
        let w = synthesis_window(512);
        assert_eq!(w.len(), 512);
        assert!(w[..128].iter().all(|&v| v == 0.0));
        assert!(w[384..].iter().all(|&v| v == 0.0));
        assert!(w[128..384].iter().all(|&v| v > 0.0));
    }

    #[test]
    fn test_window_times_lobe_shape_overlaps_to_unity() {
        // Each frame carries bh-shaped sinusoids, so the effective window is
        // sw * bh; four of them one hop apart sum to one.
        let n = 512;
        let hop = n / 4;
        let sw = synthesis_window(n);
        let bh = normalize_window(&blackman_harris_window(n)).unwrap();
        let eff: Vec<f64> = sw.iter().zip(&bh).map(|(a, b)| a * b).collect();
        for i in 0..hop {
            let total: f64 = (0..4).map(|k| eff[i + k * hop]).sum();
            assert!((total - 1.0).abs() < 1e-12, "index {i}: {total}");
        }
    }

    #[test]
    fn test_rejects_bad_sizes() {
        assert_eq!(
            SpectralSynthesizer::new(500, 44100).unwrap_err(),
            SineModelError::InvalidSynthesisSize(500)
        );
        assert!(SpectralSynthesizer::new(4, 44100).is_err());
        assert!(SpectralSynthesizer::new(512, 0).is_err());
        assert_eq!(SpectralSynthesizer::new(512, 44100).unwrap().hop_size(), 128);
    }

    #[test]
    fn test_no_peaks_is_silent() {
        let synth = SpectralSynthesizer::new(512, 44100).unwrap();
        let frame = synth.synthesize(&[]);
        assert_eq!(frame.len(), 512);
        assert!(frame.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_overlap_add_placement() {
        let synth = SpectralSynthesizer::new(16, 44100).unwrap();
        let frame = vec![1.0; 16];
        let mut out = vec![0.0; 40];
        synth.overlap_add(&mut out, &frame, 20);
        assert!(out[..12].iter().all(|&v| v == 0.0));
        assert_eq!(&out[12..28], synth.window());
        assert!(out[28..].iter().all(|&v| v == 0.0));

        // Partially outside: clipped, never panics.
        let mut short = vec![0.0; 10];
        synth.overlap_add(&mut short, &frame, 8);
        synth.overlap_add(&mut short, &frame, 3);
        assert_eq!(short.len(), 10);
    }
}

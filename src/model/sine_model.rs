//! Single-resolution sinusoidal model without peak tracking.
//!
//! Each hop analyzes one window-length slice of the input, keeps every peak
//! above the threshold and resynthesizes it through the shared spectral
//! synthesizer. This is the baseline the multi-resolution model is measured
//! against.

use crate::core::types::Sample;
use crate::error::SineModelError;

use super::analyzer::PeakAnalyzer;
use super::frame::{half_after, half_before};
use super::params::SineModelParams;
use super::synthesis::SpectralSynthesizer;
use super::{to_samples, validate_input};

/// Sinusoidal analysis/synthesis at a single resolution.
///
/// # Example
///
/// ```
/// use sinemodel::core::window::{generate_window, WindowType};
/// use sinemodel::model::{SineModel, SineModelParams};
///
/// let window = generate_window(WindowType::Hamming, 1023);
/// let model = SineModel::new(SineModelParams::new(window, 1024)).unwrap();
///
/// let input = vec![0.0f32; 8192];
/// let output = model.process(&input).unwrap();
/// assert_eq!(output.len(), input.len());
/// ```
#[derive(Debug, Clone)]
pub struct SineModel {
    analyzer: PeakAnalyzer,
    synthesizer: SpectralSynthesizer,
    /// First frame center; also the distance kept from the end.
    start: usize,
}

impl SineModel {
    /// Builds the model, validating `params`.
    pub fn new(params: SineModelParams) -> Result<Self, SineModelError> {
        params.validate()?;
        let analyzer = PeakAnalyzer::new(
            &params.window,
            params.fft_size,
            params.threshold_db,
            params.sample_rate,
        )?;
        let synthesizer =
            SpectralSynthesizer::new(params.synthesis_fft_size, params.sample_rate)?;
        let start = (params.synthesis_fft_size / 2).max(half_before(params.window.len()));
        log::debug!(
            "sine model: window {}, fft {}, hop {}",
            params.window.len(),
            params.fft_size,
            synthesizer.hop_size()
        );
        Ok(Self {
            analyzer,
            synthesizer,
            start,
        })
    }

    /// Hop size in samples.
    #[inline]
    pub fn hop_size(&self) -> usize {
        self.synthesizer.hop_size()
    }

    /// Analyzes and resynthesizes `input`. The output has the input's length.
    ///
    /// Input too short for a single hop yields silence.
    ///
    /// # Errors
    /// Returns [`SineModelError::NonFiniteInput`] if any sample is NaN or infinite.
    pub fn process(&self, input: &[Sample]) -> Result<Vec<Sample>, SineModelError> {
        validate_input(input)?;
        let len = input.len();
        let mut output = vec![0.0f64; len];
        if len <= 2 * self.start {
            if len > 0 {
                log::warn!(
                    "input of {} samples is too short for one hop (need more than {})",
                    len,
                    2 * self.start
                );
            }
            return Ok(to_samples(output));
        }

        let before = half_before(self.analyzer.window_len());
        let after = half_after(self.analyzer.window_len());
        let end = len - self.start;
        let hop = self.hop_size();
        let mut frame = vec![0.0f64; self.analyzer.window_len()];
        let mut pin = self.start;
        let mut hops = 0usize;
        while pin < end {
            for (dst, &s) in frame.iter_mut().zip(&input[pin - before..pin + after]) {
                *dst = s as f64;
            }
            let peaks = self.analyzer.analyze_frame(&frame);
            let y = self.synthesizer.synthesize(&peaks);
            self.synthesizer.overlap_add(&mut output, &y, pin);
            pin += hop;
            hops += 1;
        }
        log::debug!("sine model: {} hops over {} samples", hops, len);
        Ok(to_samples(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::window::{generate_window, WindowType};
    use std::f64::consts::PI;

    fn model(window_len: usize, fft_size: usize) -> SineModel {
        let w = generate_window(WindowType::BlackmanHarris, window_len);
        SineModel::new(SineModelParams::new(w, fft_size)).unwrap()
    }

    #[test]
    fn test_output_length_matches_input() {
        let m = model(511, 512);
        for len in [0, 1, 100, 512, 513, 4000, 10_001] {
            let out = m.process(&vec![0.1; len]).unwrap();
            assert_eq!(out.len(), len, "length {len}");
        }
    }

    #[test]
    fn test_short_input_is_silent() {
        let m = model(1023, 1024);
        // start = 512, so 1024 samples cannot hold a hop.
        let out = m.process(&vec![0.5; 1024]).unwrap();
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rejects_non_finite() {
        let m = model(511, 512);
        let mut input = vec![0.0; 2000];
        input[10] = f32::NAN;
        assert_eq!(m.process(&input), Err(SineModelError::NonFiniteInput));
    }

    #[test]
    fn test_reconstructs_sinusoid_interior() {
        let m = model(1023, 1024);
        let sr = 44100.0;
        let input: Vec<f32> = (0..16384)
            .map(|i| (0.5 * (2.0 * PI * 440.0 * i as f64 / sr).sin()) as f32)
            .collect();
        let out = m.process(&input).unwrap();
        let (mut sig, mut err) = (0.0f64, 0.0f64);
        for i in 2048..16384 - 2048 {
            sig += (input[i] as f64).powi(2);
            err += (input[i] as f64 - out[i] as f64).powi(2);
        }
        let snr = 10.0 * (sig / err).log10();
        assert!(snr > 50.0, "interior SNR {snr:.1} dB");
    }

    #[test]
    fn test_invalid_params() {
        let w = generate_window(WindowType::Hamming, 1023);
        assert!(SineModel::new(SineModelParams::new(w.clone(), 1000)).is_err());
        assert!(SineModel::new(SineModelParams::new(w, 1024).with_synthesis_fft_size(6)).is_err());
    }
}

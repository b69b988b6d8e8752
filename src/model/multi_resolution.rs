//! Multi-resolution sinusoidal model.
//!
//! Every hop extracts one frame as wide as the largest analysis window and
//! hands it to each resolution. Each resolution analyzes the centered slice
//! matching its own window and contributes only the peaks inside its band:
//!
//! - **Long windows** resolve closely spaced low partials
//! - **Short windows** follow fast changes in the upper bands
//!
//! The merged peaks are synthesized into a single frame and overlap-added
//! into the output with the hop of the synthesis FFT.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::types::Sample;
use crate::error::SineModelError;

use super::analyzer::{Peak, PeakAnalyzer};
use super::bands::merge_band_peaks;
use super::frame::{extract_frame, half_before, sub_frame_offset};
use super::params::{Band, MultiResParams};
use super::synthesis::SpectralSynthesizer;
use super::{to_samples, validate_input};

/// One resolution's analyzer and where its window sits in the shared frame.
#[derive(Debug, Clone)]
struct Stage {
    analyzer: PeakAnalyzer,
    offset: usize,
}

/// Sinusoidal analysis/synthesis with per-band analysis resolutions.
///
/// With one resolution whose band is `[0, sample_rate / 2)` the output is
/// identical to [`SineModel`](super::SineModel) with the same window.
///
/// # Example
///
/// ```
/// use sinemodel::core::window::WindowType;
/// use sinemodel::model::{Band, MultiResParams, MultiResolutionSineModel, Resolution};
///
/// let params = MultiResParams::new(vec![
///     Resolution::with_window_type(WindowType::Hamming, 2047, 2048, Band::new(0.0, 2000.0)),
///     Resolution::with_window_type(WindowType::Hamming, 511, 512, Band::new(2000.0, 22050.0)),
/// ]);
/// let model = MultiResolutionSineModel::new(params).unwrap();
///
/// let input = vec![0.0f32; 8192];
/// let output = model.process(&input).unwrap();
/// assert_eq!(output.len(), input.len());
/// ```
#[derive(Debug, Clone)]
pub struct MultiResolutionSineModel {
    /// Analyzers in resolution order.
    stages: Vec<Stage>,
    /// Band of each stage, same order.
    bands: Vec<Band>,
    /// Peak synthesizer and synthesis window.
    synthesizer: SpectralSynthesizer,
    /// Width of the shared analysis frame (largest window).
    frame_width: usize,
    /// First frame center; also the distance kept from the end.
    start: usize,
}

impl MultiResolutionSineModel {
    /// Builds the model, validating `params`.
    ///
    /// # Errors
    /// Returns the first configuration problem found in `params`.
    pub fn new(params: MultiResParams) -> Result<Self, SineModelError> {
        params.validate()?;

        let min_window = params
            .resolutions
            .iter()
            .map(|r| r.window.len())
            .min()
            .ok_or(SineModelError::NoResolutions)?;
        let frame_width = params
            .resolutions
            .iter()
            .map(|r| r.window.len())
            .max()
            .ok_or(SineModelError::NoResolutions)?;

        let stages = params
            .resolutions
            .iter()
            .map(|r| {
                Ok(Stage {
                    analyzer: PeakAnalyzer::new(
                        &r.window,
                        r.fft_size,
                        params.threshold_db,
                        params.sample_rate,
                    )?,
                    offset: sub_frame_offset(frame_width, r.window.len()),
                })
            })
            .collect::<Result<Vec<_>, SineModelError>>()?;
        let bands = params.resolutions.iter().map(|r| r.band).collect();

        let synthesizer =
            SpectralSynthesizer::new(params.synthesis_fft_size, params.sample_rate)?;
        let start = (params.synthesis_fft_size / 2).max(half_before(min_window));

        log::debug!("min window size {}", min_window);
        log::debug!("max window size {}", frame_width);
        log::debug!("hop size {}", synthesizer.hop_size());

        Ok(Self {
            stages,
            bands,
            synthesizer,
            frame_width,
            start,
        })
    }

    /// Number of analysis resolutions.
    #[inline]
    pub fn num_resolutions(&self) -> usize {
        self.stages.len()
    }

    /// Width of the frame shared by all resolutions.
    #[inline]
    pub fn frame_width(&self) -> usize {
        self.frame_width
    }

    /// Hop size in samples.
    #[inline]
    pub fn hop_size(&self) -> usize {
        self.synthesizer.hop_size()
    }

    /// Center of the first frame.
    #[inline]
    pub fn first_frame_center(&self) -> usize {
        self.start
    }

    /// Analyzes and resynthesizes `input`. The output has the input's length.
    ///
    /// Input too short for a single hop (at most `2 * first_frame_center()`
    /// samples) yields silence.
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

        let end = len - self.start;
        let hop = self.hop_size();
        let mut pin = self.start;
        let mut hops = 0usize;
        while pin < end {
            let frame = extract_frame(input, pin, self.frame_width);
            let per_resolution = self.analyze(&frame);
            let peaks = merge_band_peaks(&per_resolution, &self.bands);
            let y = self.synthesizer.synthesize(&peaks);
            self.synthesizer.overlap_add(&mut output, &y, pin);
            pin += hop;
            hops += 1;
        }
        log::debug!(
            "multi-resolution model: {} hops over {} samples",
            hops,
            len
        );
        Ok(to_samples(output))
    }

    /// Peaks of every resolution for one shared frame, in resolution order.
    #[cfg(not(feature = "parallel"))]
    fn analyze(&self, frame: &[f64]) -> Vec<Vec<Peak>> {
        self.stages
            .iter()
            .map(|s| s.analyzer.analyze_at(frame, s.offset))
            .collect()
    }

    /// Peaks of every resolution for one shared frame, in resolution order.
    #[cfg(feature = "parallel")]
    fn analyze(&self, frame: &[f64]) -> Vec<Vec<Peak>> {
        self.stages
            .par_iter()
            .map(|s| s.analyzer.analyze_at(frame, s.offset))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::window::WindowType;
    use crate::model::params::Resolution;
    use std::f64::consts::PI;

    fn three_band() -> MultiResParams {
        MultiResParams::new(vec![
            Resolution::with_window_type(
                WindowType::BlackmanHarris,
                4095,
                4096,
                Band::new(0.0, 1000.0),
            ),
            Resolution::with_window_type(
                WindowType::BlackmanHarris,
                2047,
                2048,
                Band::new(1000.0, 5000.0),
            ),
            Resolution::with_window_type(
                WindowType::BlackmanHarris,
                1023,
                1024,
                Band::new(5000.0, 22050.0),
            ),
        ])
    }

    #[test]
    fn test_geometry() {
        let model = MultiResolutionSineModel::new(three_band()).unwrap();
        assert_eq!(model.num_resolutions(), 3);
        assert_eq!(model.frame_width(), 4095);
        assert_eq!(model.hop_size(), 128);
        // max(hNs = 256, (1023 + 1) / 2 = 512)
        assert_eq!(model.first_frame_center(), 512);
        let offsets: Vec<usize> = model.stages.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0, 1024, 1536]);
    }

    #[test]
    fn test_output_length() {
        let model = MultiResolutionSineModel::new(three_band()).unwrap();
        for len in [0, 1, 1024, 1025, 5000] {
            let out = model.process(&vec![0.25; len]).unwrap();
            assert_eq!(out.len(), len, "length {len}");
        }
    }

    #[test]
    fn test_empty_and_silent_input() {
        let model = MultiResolutionSineModel::new(three_band()).unwrap();
        assert!(model.process(&[]).unwrap().is_empty());
        let out = model.process(&vec![0.0; 6000]).unwrap();
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rejects_infinite_input() {
        let model = MultiResolutionSineModel::new(three_band()).unwrap();
        let mut input = vec![0.0; 6000];
        input[3000] = f32::INFINITY;
        assert_eq!(model.process(&input), Err(SineModelError::NonFiniteInput));
    }

    #[test]
    fn test_no_resolutions() {
        assert_eq!(
            MultiResolutionSineModel::new(MultiResParams::new(vec![])).unwrap_err(),
            SineModelError::NoResolutions
        );
    }

    #[test]
    fn test_band_routing_silences_out_of_band_tone() {
        // A 3 kHz tone analyzed only by a resolution whose band excludes it.
        let params = MultiResParams::new(vec![Resolution::with_window_type(
            WindowType::BlackmanHarris,
            1023,
            1024,
            Band::new(5000.0, 22050.0),
        )]);
        let model = MultiResolutionSineModel::new(params).unwrap();
        let input: Vec<f32> = (0..8192)
            .map(|i| (0.5 * (2.0 * PI * 3000.0 * i as f64 / 44100.0).sin()) as f32)
            .collect();
        let out = model.process(&input).unwrap();
        let peak = out.iter().fold(0.0f32, |m, &v| m.max(v.abs()));
        assert!(peak < 1e-3, "out-of-band tone leaked: {peak}");
    }
}

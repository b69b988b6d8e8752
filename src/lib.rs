#![forbid(unsafe_code)]
//! Sinusoidal analysis/synthesis with multiple analysis resolutions.
//!
//! `sinemodel` decomposes audio into spectral peaks frame by frame and
//! resynthesizes it as a sum of sinusoids. The multi-resolution model gives
//! each frequency band its own analysis window: long windows resolve low
//! partials, short windows keep high bands sharp in time. The merged peaks
//! are rendered with a single synthesis transform and overlap-added into an
//! output of the input's length.
//!
//! # Quick Start
//!
//! ```
//! use sinemodel::{Band, MultiResParams, Resolution, WindowType};
//!
//! // Half a second of 440 Hz + 3 kHz at 44.1 kHz
//! let input: Vec<f32> = (0..22050)
//!     .map(|i| {
//!         let t = i as f32 / 44100.0;
//!         0.3 * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
//!             + 0.3 * (2.0 * std::f32::consts::PI * 3000.0 * t).sin()
//!     })
//!     .collect();
//!
//! let params = MultiResParams::new(vec![
//!     Resolution::with_window_type(WindowType::BlackmanHarris, 2047, 2048, Band::new(0.0, 1000.0)),
//!     Resolution::with_window_type(WindowType::BlackmanHarris, 1023, 1024, Band::new(1000.0, 22050.0)),
//! ])
//! .with_sample_rate(44100);
//!
//! let output = sinemodel::sine_model_multi_res(&input, &params).unwrap();
//! assert_eq!(output.len(), input.len());
//! ```
//!
//! # Measuring fidelity
//!
//! ```
//! use sinemodel::analysis::fidelity::{diff_snr, Snr};
//!
//! let x = vec![0.5f32, -0.5, 0.25];
//! assert_eq!(diff_snr(&x, &x).unwrap(), Snr::Perfect);
//! ```

pub mod analysis;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod model;
pub mod spectral;

pub use analysis::fidelity::{diff_snr, FidelityReport, Snr};
pub use config::ModelConfig;
pub use crate::core::types::{AudioBuffer, Sample};
pub use crate::core::window::WindowType;
pub use error::SineModelError;
pub use model::{
    Band, MultiResParams, MultiResolutionSineModel, Peak, Resolution, SineModel,
    SineModelParams,
};

use crate::core::types::interleave;

/// Runs `process_fn` on every channel of `buffer` and re-interleaves the result.
fn process_buffer(
    buffer: &AudioBuffer,
    process_fn: impl Fn(&[Sample]) -> Result<Vec<Sample>, SineModelError>,
) -> Result<AudioBuffer, SineModelError> {
    let outputs = buffer
        .deinterleave()
        .iter()
        .map(|channel| process_fn(channel))
        .collect::<Result<Vec<_>, _>>()?;
    AudioBuffer::new(interleave(&outputs), buffer.sample_rate, buffer.channels)
}

/// Analyzes and resynthesizes mono audio with the single-resolution model.
///
/// # Errors
///
/// Returns a configuration error if `params` is invalid and
/// [`SineModelError::NonFiniteInput`] if the input contains NaN or infinity.
///
/// # Example
///
/// ```
/// use sinemodel::{SineModelParams, WindowType};
/// use sinemodel::core::window::generate_window;
///
/// let input = vec![0.0f32; 4096];
/// let params = SineModelParams::new(generate_window(WindowType::Hamming, 511), 512);
/// let output = sinemodel::sine_model(&input, &params).unwrap();
/// assert_eq!(output.len(), 4096);
/// ```
pub fn sine_model(input: &[Sample], params: &SineModelParams) -> Result<Vec<Sample>, SineModelError> {
    SineModel::new(params.clone())?.process(input)
}

/// Analyzes and resynthesizes mono audio with the multi-resolution model.
///
/// # Errors
///
/// Returns a configuration error if `params` is invalid and
/// [`SineModelError::NonFiniteInput`] if the input contains NaN or infinity.
pub fn sine_model_multi_res(
    input: &[Sample],
    params: &MultiResParams,
) -> Result<Vec<Sample>, SineModelError> {
    MultiResolutionSineModel::new(params.clone())?.process(input)
}

/// Runs the multi-resolution model from parallel window, FFT size and band
/// sequences.
///
/// # Errors
///
/// Returns [`SineModelError::ConfigurationMismatch`] when the three
/// sequences differ in length, plus every error of [`sine_model_multi_res`].
pub fn sine_model_multi_res_from_sequences(
    input: &[Sample],
    sample_rate: u32,
    windows: Vec<Vec<f64>>,
    fft_sizes: Vec<usize>,
    threshold_db: f64,
    bands: Vec<Band>,
) -> Result<Vec<Sample>, SineModelError> {
    let params = MultiResParams::from_sequences(windows, fft_sizes, bands)?
        .with_sample_rate(sample_rate)
        .with_threshold_db(threshold_db);
    sine_model_multi_res(input, &params)
}

/// Single-resolution model over every channel of an [`AudioBuffer`].
///
/// The buffer's sample rate overrides the one in `params`.
///
/// # Example
///
/// ```
/// use sinemodel::{AudioBuffer, SineModelParams, WindowType};
/// use sinemodel::core::window::generate_window;
///
/// let buffer = AudioBuffer::new(vec![0.0; 8192], 48000, 2).unwrap();
/// let params = SineModelParams::new(generate_window(WindowType::Hann, 511), 512);
/// let output = sinemodel::sine_model_buffer(&buffer, &params).unwrap();
/// assert_eq!(output.sample_rate, 48000);
/// assert_eq!(output.num_frames(), 4096);
/// ```
pub fn sine_model_buffer(
    buffer: &AudioBuffer,
    params: &SineModelParams,
) -> Result<AudioBuffer, SineModelError> {
    let model = SineModel::new(params.clone().with_sample_rate(buffer.sample_rate))?;
    process_buffer(buffer, |channel| model.process(channel))
}

/// Multi-resolution model over every channel of an [`AudioBuffer`].
///
/// The buffer's sample rate overrides the one in `params`; bands are kept
/// as given.
pub fn sine_model_multi_res_buffer(
    buffer: &AudioBuffer,
    params: &MultiResParams,
) -> Result<AudioBuffer, SineModelError> {
    let model =
        MultiResolutionSineModel::new(params.clone().with_sample_rate(buffer.sample_rate))?;
    process_buffer(buffer, |channel| model.process(channel))
}

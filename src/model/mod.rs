//! Sinusoidal models: single-resolution and multi-resolution analysis/synthesis.

pub mod analyzer;
pub mod bands;
pub mod frame;
pub mod multi_resolution;
pub mod params;
pub mod sine_model;
pub mod synthesis;

pub use analyzer::{Peak, PeakAnalyzer};
pub use multi_resolution::MultiResolutionSineModel;
pub use params::{Band, MultiResParams, Resolution, SineModelParams};
pub use sine_model::SineModel;
pub use synthesis::SpectralSynthesizer;

use crate::core::types::Sample;
use crate::error::SineModelError;

/// Rejects input containing NaN or infinite samples.
pub(crate) fn validate_input(input: &[Sample]) -> Result<(), SineModelError> {
    if input.iter().any(|s| !s.is_finite()) {
        return Err(SineModelError::NonFiniteInput);
    }
    Ok(())
}

/// Converts the f64 accumulator back to output samples.
#[inline]
pub(crate) fn to_samples(output: Vec<f64>) -> Vec<Sample> {
    output.into_iter().map(|v| v as Sample).collect()
}

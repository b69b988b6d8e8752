//! Error types for the sinemodel crate.

use thiserror::Error;

/// Errors that can occur during sinusoidal analysis/synthesis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SineModelError {
    /// The window, FFT size and band sequences have different lengths.
    #[error(
        "configuration mismatch: {windows} windows, {fft_sizes} FFT sizes, {bands} bands"
    )]
    ConfigurationMismatch {
        windows: usize,
        fft_sizes: usize,
        bands: usize,
    },
    /// A multi-resolution model needs at least one resolution.
    #[error("at least one analysis resolution is required")]
    NoResolutions,
    /// FFT size must be a power of two no smaller than its window.
    #[error("invalid FFT size {fft_size} for window of {window_len} samples")]
    InvalidFftSize { fft_size: usize, window_len: usize },
    /// Analysis window is empty or cannot be normalized.
    #[error("invalid analysis window: {0}")]
    InvalidWindow(String),
    /// Synthesis FFT size must be an even power of two of at least 8.
    #[error("invalid synthesis FFT size: {0}")]
    InvalidSynthesisSize(usize),
    /// Sample rate must be positive.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(u32),
    /// Peak threshold must be a number.
    #[error("invalid peak threshold: {0} dB")]
    InvalidThreshold(f64),
    /// Input contains NaN or infinite samples.
    #[error("input contains non-finite samples")]
    NonFiniteInput,
    /// Signals compared by the fidelity evaluator differ in length.
    #[error("length mismatch: original has {original} samples, reconstruction has {reconstructed}")]
    LengthMismatch {
        original: usize,
        reconstructed: usize,
    },
    /// Reference signal has zero energy while the error does not.
    #[error("reference signal has no energy")]
    SilentReference,
    /// Invalid audio format or configuration document.
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for SineModelError {
    fn from(err: std::io::Error) -> Self {
        SineModelError::IoError(err.to_string())
    }
}

impl From<hound::Error> for SineModelError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => SineModelError::IoError(e.to_string()),
            other => SineModelError::InvalidFormat(other.to_string()),
        }
    }
}

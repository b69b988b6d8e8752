//! Parameters for the single- and multi-resolution sinusoidal models.

use crate::core::fft::is_valid_fft_size;
use crate::core::window::{generate_window, WindowType};
use crate::error::SineModelError;

/// Default synthesis FFT size.
pub const DEFAULT_SYNTHESIS_FFT_SIZE: usize = 512;
/// Default peak detection threshold in dB.
pub const DEFAULT_THRESHOLD_DB: f64 = -90.0;
/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
/// Smallest synthesis FFT size (hop of two samples).
const MIN_SYNTHESIS_FFT_SIZE: usize = 8;

/// Half-open frequency interval `[min_hz, max_hz)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min_hz: f64,
    pub max_hz: f64,
}

impl Band {
    /// Create a band. No ordering check is made; an inverted band is empty.
    pub fn new(min_hz: f64, max_hz: f64) -> Self {
        Self { min_hz, max_hz }
    }

    /// The band `[0, sample_rate / 2)`.
    pub fn full(sample_rate: u32) -> Self {
        Self::new(0.0, sample_rate as f64 / 2.0)
    }

    /// Returns true if `freq_hz` lies in `[min_hz, max_hz)`.
    #[inline]
    pub fn contains(&self, freq_hz: f64) -> bool {
        self.min_hz <= freq_hz && freq_hz < self.max_hz
    }
}

impl From<(f64, f64)> for Band {
    fn from((min_hz, max_hz): (f64, f64)) -> Self {
        Self::new(min_hz, max_hz)
    }
}

/// One analysis resolution: window, FFT size and the band it is trusted for.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Analysis window; normalized to unit sum by the analyzer.
    pub window: Vec<f64>,
    /// FFT size (power of two, at least the window length).
    pub fft_size: usize,
    /// Band whose peaks this resolution contributes.
    pub band: Band,
}

impl Resolution {
    pub fn new(window: Vec<f64>, fft_size: usize, band: Band) -> Self {
        Self {
            window,
            fft_size,
            band,
        }
    }

    /// Builds a resolution from a window type and length.
    pub fn with_window_type(
        window_type: WindowType,
        window_size: usize,
        fft_size: usize,
        band: Band,
    ) -> Self {
        Self::new(generate_window(window_type, window_size), fft_size, band)
    }

    /// Validates window and FFT size.
    pub fn validate(&self) -> Result<(), SineModelError> {
        validate_window_and_fft(&self.window, self.fft_size)
    }
}

/// Parameters for the multi-resolution sinusoidal model.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiResParams {
    /// Analysis resolutions, in band order.
    pub resolutions: Vec<Resolution>,
    /// Peak detection threshold in dB (default: -90).
    pub threshold_db: f64,
    /// Sample rate in Hz (default: 44100).
    pub sample_rate: u32,
    /// Synthesis FFT size (default: 512); the hop is a quarter of it.
    pub synthesis_fft_size: usize,
}

impl MultiResParams {
    /// Create parameters for the given resolutions with default settings.
    pub fn new(resolutions: Vec<Resolution>) -> Self {
        Self {
            resolutions,
            threshold_db: DEFAULT_THRESHOLD_DB,
            sample_rate: DEFAULT_SAMPLE_RATE,
            synthesis_fft_size: DEFAULT_SYNTHESIS_FFT_SIZE,
        }
    }

    /// Builds parameters from parallel window, FFT size and band sequences.
    ///
    /// # Errors
    /// Returns [`SineModelError::ConfigurationMismatch`] if the sequences
    /// differ in length.
    pub fn from_sequences(
        windows: Vec<Vec<f64>>,
        fft_sizes: Vec<usize>,
        bands: Vec<Band>,
    ) -> Result<Self, SineModelError> {
        if windows.len() != fft_sizes.len() || windows.len() != bands.len() {
            return Err(SineModelError::ConfigurationMismatch {
                windows: windows.len(),
                fft_sizes: fft_sizes.len(),
                bands: bands.len(),
            });
        }
        let resolutions = windows
            .into_iter()
            .zip(fft_sizes)
            .zip(bands)
            .map(|((window, fft_size), band)| Resolution::new(window, fft_size, band))
            .collect();
        Ok(Self::new(resolutions))
    }

    /// Set the peak detection threshold in dB.
    pub fn with_threshold_db(mut self, threshold_db: f64) -> Self {
        self.threshold_db = threshold_db;
        self
    }

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the synthesis FFT size.
    pub fn with_synthesis_fft_size(mut self, size: usize) -> Self {
        self.synthesis_fft_size = size;
        self
    }

    /// Hop size shared by analysis and synthesis.
    #[inline]
    pub fn hop_size(&self) -> usize {
        self.synthesis_fft_size / 4
    }

    /// Validate all parameters.
    pub fn validate(&self) -> Result<(), SineModelError> {
        if self.resolutions.is_empty() {
            return Err(SineModelError::NoResolutions);
        }
        for resolution in &self.resolutions {
            resolution.validate()?;
        }
        validate_common(self.threshold_db, self.sample_rate, self.synthesis_fft_size)
    }
}

/// Parameters for the single-resolution sinusoidal model.
#[derive(Debug, Clone, PartialEq)]
pub struct SineModelParams {
    /// Analysis window; normalized to unit sum by the analyzer.
    pub window: Vec<f64>,
    /// FFT size (power of two, at least the window length).
    pub fft_size: usize,
    /// Peak detection threshold in dB (default: -90).
    pub threshold_db: f64,
    /// Sample rate in Hz (default: 44100).
    pub sample_rate: u32,
    /// Synthesis FFT size (default: 512).
    pub synthesis_fft_size: usize,
}

impl SineModelParams {
    pub fn new(window: Vec<f64>, fft_size: usize) -> Self {
        Self {
            window,
            fft_size,
            threshold_db: DEFAULT_THRESHOLD_DB,
            sample_rate: DEFAULT_SAMPLE_RATE,
            synthesis_fft_size: DEFAULT_SYNTHESIS_FFT_SIZE,
        }
    }

    /// Set the peak detection threshold in dB.
    pub fn with_threshold_db(mut self, threshold_db: f64) -> Self {
        self.threshold_db = threshold_db;
        self
    }

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the synthesis FFT size.
    pub fn with_synthesis_fft_size(mut self, size: usize) -> Self {
        self.synthesis_fft_size = size;
        self
    }

    /// The equivalent multi-resolution parameters: one resolution covering
    /// `[0, sample_rate / 2)`.
    pub fn to_multi_res(&self) -> MultiResParams {
        MultiResParams {
            resolutions: vec![Resolution::new(
                self.window.clone(),
                self.fft_size,
                Band::full(self.sample_rate),
            )],
            threshold_db: self.threshold_db,
            sample_rate: self.sample_rate,
            synthesis_fft_size: self.synthesis_fft_size,
        }
    }

    /// Validate all parameters.
    pub fn validate(&self) -> Result<(), SineModelError> {
        validate_window_and_fft(&self.window, self.fft_size)?;
        validate_common(self.threshold_db, self.sample_rate, self.synthesis_fft_size)
    }
}

fn validate_window_and_fft(window: &[f64], fft_size: usize) -> Result<(), SineModelError> {
    if window.is_empty() {
        return Err(SineModelError::InvalidWindow("window is empty".to_string()));
    }
    if !is_valid_fft_size(fft_size) || fft_size < window.len() {
        return Err(SineModelError::InvalidFftSize {
            fft_size,
            window_len: window.len(),
        });
    }
    Ok(())
}

fn validate_common(
    threshold_db: f64,
    sample_rate: u32,
    synthesis_fft_size: usize,
) -> Result<(), SineModelError> {
    if threshold_db.is_nan() {
        return Err(SineModelError::InvalidThreshold(threshold_db));
    }
    if sample_rate == 0 {
        return Err(SineModelError::InvalidSampleRate(sample_rate));
    }
    if !is_valid_fft_size(synthesis_fft_size) || synthesis_fft_size < MIN_SYNTHESIS_FFT_SIZE {
        return Err(SineModelError::InvalidSynthesisSize(synthesis_fft_size));
    }
    Ok(())
}

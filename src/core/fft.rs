//! FFT-related constants and utilities shared across the crate.

use rustfft::num_complex::Complex;

/// Zero-valued complex number, used for FFT buffer initialization.
pub const COMPLEX_ZERO: Complex<f64> = Complex::new(0.0, 0.0);

/// Smallest magnitude kept before converting to decibels.
pub const MAGNITUDE_FLOOR: f64 = f64::EPSILON;

/// Real or imaginary parts below this are treated as zero before taking phase.
pub const PHASE_TOLERANCE: f64 = 1e-14;

/// Returns true if `size` is a non-zero power of two.
#[inline]
pub fn is_valid_fft_size(size: usize) -> bool {
    size != 0 && size.is_power_of_two()
}

/// Number of non-negative frequency bins for an FFT of `fft_size`.
#[inline]
pub fn num_bins(fft_size: usize) -> usize {
    fft_size / 2 + 1
}

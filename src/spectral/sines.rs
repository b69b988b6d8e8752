//! Frequency-domain sinusoid generation and inverse transform.
//!
//! Each sinusoid is drawn into the spectrum as the main lobe of a
//! Blackman-Harris window (9 bins), so that dividing the inverse transform by
//! the same window recovers a plain sinusoid.

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::core::fft::COMPLEX_ZERO;
use crate::core::window::BH_COEFFS;

/// Number of bins in a generated main lobe.
pub const LOBE_BINS: usize = 9;

/// Size of the Dirichlet kernel used to evaluate the lobe shape.
const LOBE_KERNEL_SIZE: usize = 512;

/// A sinusoid to synthesize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sinusoid {
    /// Frequency in Hz.
    pub frequency: f64,
    /// Magnitude in dB.
    pub magnitude_db: f64,
    /// Phase at the frame center, in radians.
    pub phase: f64,
}

/// Periodic sinc (Dirichlet kernel) of `size` points, `size` at the origin.
#[inline]
fn dirichlet(x: f64, size: f64) -> f64 {
    let denom = (x / 2.0).sin();
    if denom.abs() < 1e-12 {
        size
    } else {
        (size * x / 2.0).sin() / denom
    }
}

/// Samples the Blackman-Harris transform at (fractional) bin offsets.
///
/// Normalized so the lobe peak is 1.0.
pub fn blackman_harris_lobe(offsets: &[f64]) -> Vec<f64> {
    let n = LOBE_KERNEL_SIZE as f64;
    let df = 2.0 * PI / n;
    offsets
        .iter()
        .map(|&x| {
            let f = x * PI * 2.0 / n;
            let sum: f64 = BH_COEFFS
                .iter()
                .enumerate()
                .map(|(m, &a)| {
                    let shift = df * m as f64;
                    a / 2.0 * (dirichlet(f - shift, n) + dirichlet(f + shift, n))
                })
                .sum();
            sum / n / BH_COEFFS[0]
        })
        .collect()
}

/// Builds an `fft_size`-point spectrum containing one lobe per sinusoid.
///
/// Sinusoids at 0 Hz or within one bin of Nyquist are skipped. Lobe bins
/// that fall below zero are folded back with conjugated phase; bins above
/// Nyquist are dropped. The negative-frequency half is the conjugate mirror
/// of the positive half, so the inverse transform is real.
pub fn generate_spectral_sines(
    sinusoids: &[Sinusoid],
    fft_size: usize,
    sample_rate: u32,
) -> Vec<Complex<f64>> {
    let mut spectrum = vec![COMPLEX_ZERO; fft_size];
    let half = (fft_size / 2) as i64;

    for s in sinusoids {
        let loc = fft_size as f64 * s.frequency / sample_rate as f64;
        if loc <= 0.0 || loc > (half - 1) as f64 {
            continue;
        }
        let center = loc.round_ties_even();
        let remainder = center - loc;
        let offsets: Vec<f64> = (0..LOBE_BINS)
            .map(|m| remainder + m as f64 - 4.0)
            .collect();
        let gain = 10f64.powf(s.magnitude_db / 20.0);
        let positive = Complex::from_polar(1.0, s.phase);
        let negative = positive.conj();

        for (m, lobe) in blackman_harris_lobe(&offsets).into_iter().enumerate() {
            let mag = lobe * gain;
            let bin = center as i64 - 4 + m as i64;
            if bin < 0 {
                spectrum[(-bin) as usize] += negative * mag;
            } else if bin > half {
                continue;
            } else if bin == 0 || bin == half {
                spectrum[bin as usize] += (positive + negative) * mag;
            } else {
                spectrum[bin as usize] += positive * mag;
            }
        }
    }

    for k in (half as usize + 1)..fft_size {
        spectrum[k] = spectrum[fft_size - k].conj();
    }
    spectrum
}

/// Inverse transform with a cached plan.
#[derive(Clone)]
pub struct SineSynthesizer {
    fft_size: usize,
    ifft: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for SineSynthesizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SineSynthesizer")
            .field("fft_size", &self.fft_size)
            .finish()
    }
}

impl SineSynthesizer {
    /// Plans the inverse FFT. `fft_size` must be even.
    pub fn new(fft_size: usize) -> Self {
        debug_assert!(fft_size % 2 == 0);
        Self {
            fft_size,
            ifft: FftPlanner::new().plan_fft_inverse(fft_size),
        }
    }

    /// Returns the FFT size.
    #[inline]
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Real part of the scaled inverse FFT of `spectrum`.
    pub fn inverse(&self, spectrum: &[Complex<f64>]) -> Vec<f64> {
        let mut buffer = spectrum.to_vec();
        self.ifft.process(&mut buffer);
        let norm = 1.0 / self.fft_size as f64;
        buffer.iter().map(|c| c.re * norm).collect()
    }

    /// Renders sinusoids to a time frame centered on index `fft_size / 2 - 1`.
    ///
    /// The inverse transform puts the phase origin at index zero; the two
    /// halves are swapped so the frame reads in natural time order.
    pub fn synthesize(&self, sinusoids: &[Sinusoid], sample_rate: u32) -> Vec<f64> {
        let spectrum = generate_spectral_sines(sinusoids, self.fft_size, sample_rate);
        let buffer = self.inverse(&spectrum);
        let half = self.fft_size / 2;
        let mut frame = Vec::with_capacity(self.fft_size);
        frame.extend_from_slice(&buffer[half + 1..]);
        frame.extend_from_slice(&buffer[..half + 1]);
        frame
    }
}

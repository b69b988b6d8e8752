//! Zero-phase windowed DFT analysis of a single frame.

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::core::fft::{is_valid_fft_size, num_bins, COMPLEX_ZERO, MAGNITUDE_FLOOR, PHASE_TOLERANCE};
use crate::core::window::{apply_window, normalize_window};
use crate::error::SineModelError;

const TWO_PI: f64 = 2.0 * PI;

/// Magnitude (dB) and unwrapped phase (radians) of the non-negative bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub magnitude_db: Vec<f64>,
    pub phase: Vec<f64>,
}

impl Spectrum {
    /// Number of bins (`fft_size / 2 + 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.magnitude_db.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.magnitude_db.is_empty()
    }
}

/// Windowed DFT analyzer with a cached forward FFT plan.
///
/// The window is normalized to sum one, so a full-scale sinusoid of
/// amplitude `A` shows up at `20*log10(A/2)` dB at its peak.
#[derive(Clone)]
pub struct DftAnalyzer {
    window: Vec<f64>,
    fft_size: usize,
    fft: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for DftAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DftAnalyzer")
            .field("window_len", &self.window.len())
            .field("fft_size", &self.fft_size)
            .finish()
    }
}

impl DftAnalyzer {
    /// Creates an analyzer for `window` and `fft_size`.
    ///
    /// # Errors
    ///
    /// Returns [`SineModelError::InvalidWindow`] for an empty window or one
    /// that sums to zero, and [`SineModelError::InvalidFftSize`] when the FFT
    /// size is not a power of two or is shorter than the window.
    pub fn new(window: &[f64], fft_size: usize) -> Result<Self, SineModelError> {
        if window.is_empty() {
            return Err(SineModelError::InvalidWindow("window is empty".to_string()));
        }
        if !is_valid_fft_size(fft_size) || fft_size < window.len() {
            return Err(SineModelError::InvalidFftSize {
                fft_size,
                window_len: window.len(),
            });
        }
        let window = normalize_window(window).ok_or_else(|| {
            SineModelError::InvalidWindow("window sum must be finite and non-zero".to_string())
        })?;
        let fft = FftPlanner::new().plan_fft_forward(fft_size);
        Ok(Self {
            window,
            fft_size,
            fft,
        })
    }

    /// Returns the analysis window length.
    #[inline]
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Returns the FFT size.
    #[inline]
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Returns the normalized analysis window.
    #[inline]
    pub fn window(&self) -> &[f64] {
        &self.window
    }

    /// Analyzes one frame of exactly `window_len()` samples.
    ///
    /// The windowed frame is rotated so that its center sample lands on
    /// index zero of the FFT buffer (zero-phase layout), which makes the phase
    /// of a peak refer to the frame center.
    pub fn analyze(&self, frame: &[f64]) -> Spectrum {
        debug_assert_eq!(frame.len(), self.window.len());
        let m = self.window.len();
        let half_m1 = m.div_ceil(2);
        let half_m2 = m / 2;
        let n = self.fft_size;

        let mut windowed = frame.to_vec();
        apply_window(&mut windowed, &self.window);

        let mut buffer = vec![COMPLEX_ZERO; n];
        for (i, &v) in windowed.iter().enumerate() {
            let idx = if i < half_m2 { n - half_m2 + i } else { i - half_m2 };
            buffer[idx] = Complex::new(v, 0.0);
        }
        debug_assert!(half_m1 + half_m2 == m);

        self.fft.process(&mut buffer);

        let bins = num_bins(n);
        let mut magnitude_db = Vec::with_capacity(bins);
        let mut phase = Vec::with_capacity(bins);
        for c in &buffer[..bins] {
            magnitude_db.push(20.0 * c.norm().max(MAGNITUDE_FLOOR).log10());
            let re = if c.re.abs() < PHASE_TOLERANCE { 0.0 } else { c.re };
            let im = if c.im.abs() < PHASE_TOLERANCE { 0.0 } else { c.im };
            phase.push(im.atan2(re));
        }
        unwrap_phase(&mut phase);

        Spectrum {
            magnitude_db,
            phase,
        }
    }
}

/// Removes 2π jumps between consecutive phase values in place.
pub fn unwrap_phase(phase: &mut [f64]) {
    let mut correction = 0.0;
    let mut prev = match phase.first() {
        Some(&p) => p,
        None => return,
    };
    for p in phase.iter_mut().skip(1) {
        let raw = *p;
        let diff = raw - prev;
        if diff.abs() >= PI {
            let mut wrapped = (diff + PI).rem_euclid(TWO_PI) - PI;
            if wrapped == -PI && diff > 0.0 {
                wrapped = PI;
            }
            correction += wrapped - diff;
        }
        prev = raw;
        *p = raw + correction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::window::{generate_window, WindowType};

    fn sine(freq: f64, amp: f64, sample_rate: f64, len: usize, center: usize) -> Vec<f64> {
        (0..len)
            .map(|i| amp * (TWO_PI * freq * (i as f64 - center as f64) / sample_rate).cos())
            .collect()
    }

    #[test]
    fn test_rejects_bad_configuration() {
        let w = generate_window(WindowType::Hamming, 1023);
        assert!(matches!(
            DftAnalyzer::new(&w, 1000),
            Err(SineModelError::InvalidFftSize { .. })
        ));
        assert!(matches!(
            DftAnalyzer::new(&w, 512),
            Err(SineModelError::InvalidFftSize { .. })
        ));
        assert!(matches!(
            DftAnalyzer::new(&[], 512),
            Err(SineModelError::InvalidWindow(_))
        ));
        assert!(matches!(
            DftAnalyzer::new(&[0.0; 8], 16),
            Err(SineModelError::InvalidWindow(_))
        ));
    }

    #[test]
    fn test_spectrum_size() {
        let w = generate_window(WindowType::Hann, 511);
        let dft = DftAnalyzer::new(&w, 1024).unwrap();
        let spec = dft.analyze(&vec![0.0; 511]);
        assert_eq!(spec.len(), 513);
        assert_eq!(spec.phase.len(), 513);
    }

    #[test]
    fn test_bin_centered_cosine_peak() {
        // Bin 32 of a 1024-point FFT: amplitude 1.0 shows up at -6.02 dB with
        // zero phase, because the cosine peaks at the frame center.
        let sr = 44100.0;
        let freq = 32.0 * sr / 1024.0;
        let w = generate_window(WindowType::BlackmanHarris, 1023);
        let dft = DftAnalyzer::new(&w, 1024).unwrap();
        let frame = sine(freq, 1.0, sr, 1023, 511);
        let spec = dft.analyze(&frame);

        let (peak_bin, peak_db) = spec
            .magnitude_db
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
        assert_eq!(peak_bin, 32);
        assert!((peak_db - 20.0 * 0.5f64.log10()).abs() < 0.01, "peak {peak_db} dB");
        // Unwrapping may add whole turns below the peak.
        let wrapped = spec.phase[32].rem_euclid(TWO_PI);
        assert!(wrapped.min(TWO_PI - wrapped) < 1e-3, "phase {}", spec.phase[32]);
    }

    #[test]
    fn test_silence_floor() {
        let w = generate_window(WindowType::Hamming, 255);
        let dft = DftAnalyzer::new(&w, 256).unwrap();
        let spec = dft.analyze(&vec![0.0; 255]);
        let floor = 20.0 * f64::EPSILON.log10();
        assert!(spec.magnitude_db.iter().all(|&m| (m - floor).abs() < 1e-9));
        assert!(spec.phase.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_unwrap_phase() {
        let mut p = vec![3.0, -3.0, 3.0];
        unwrap_phase(&mut p);
        assert!((p[1] - (-3.0 + TWO_PI)).abs() < 1e-12);
        assert!((p[2] - 3.0).abs() < 1e-12);

        let mut small = vec![0.1, 0.2, 0.3];
        unwrap_phase(&mut small);
        assert_eq!(small, vec![0.1, 0.2, 0.3]);

        let mut empty: Vec<f64> = vec![];
        unwrap_phase(&mut empty);
    }
}

//! Window functions for spectral analysis and synthesis.
//!
//! Analysis windows are symmetric (the first and last samples mirror each
//! other), which keeps the zero-phase frame layout exact for odd sizes.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Blackman-Harris window coefficients (4-term, -92 dB sidelobes).
pub const BH_COEFFS: [f64; 4] = [0.35875, 0.48829, 0.14128, 0.01168];

/// Classic Blackman window coefficients.
const BLACKMAN_A0: f64 = 0.42;
const BLACKMAN_A1: f64 = 0.5;
const BLACKMAN_A2: f64 = 0.08;

const HAMMING_ALPHA: f64 = 0.54;
const HAMMING_BETA: f64 = 0.46;

/// Window function types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowType {
    Rectangular,
    Hann,
    Hamming,
    Blackman,
    BlackmanHarris,
    Kaiser(u32), // beta parameter scaled by 100 (e.g., 800 = 8.0)
}

impl std::str::FromStr for WindowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rectangular" | "rect" | "boxcar" => Ok(WindowType::Rectangular),
            "hann" | "hanning" => Ok(WindowType::Hann),
            "hamming" => Ok(WindowType::Hamming),
            "blackman" => Ok(WindowType::Blackman),
            "blackman-harris" | "blackmanharris" | "bh" => Ok(WindowType::BlackmanHarris),
            "kaiser" => Ok(WindowType::Kaiser(800)), // default beta=8.0
            other if other.starts_with("kaiser:") => {
                let beta_str = &other["kaiser:".len()..];
                match beta_str.parse::<f64>() {
                    Ok(beta) if beta >= 0.0 => {
                        Ok(WindowType::Kaiser((beta * 100.0).round() as u32))
                    }
                    _ => Err(format!(
                        "invalid Kaiser beta '{}' (expected a non-negative number)",
                        beta_str
                    )),
                }
            }
            other => Err(format!(
                "unknown window type '{}' (use rectangular, hann, hamming, blackman, \
                 blackman-harris or kaiser:<beta>)",
                other
            )),
        }
    }
}

/// Generates a window function of the specified type and size.
pub fn generate_window(window_type: WindowType, size: usize) -> Vec<f64> {
    match window_type {
        WindowType::Rectangular => vec![1.0; size],
        WindowType::Hann => hann_window(size),
        WindowType::Hamming => hamming_window(size),
        WindowType::Blackman => blackman_window(size),
        WindowType::BlackmanHarris => blackman_harris_window(size),
        WindowType::Kaiser(beta_100) => kaiser_window(size, beta_100 as f64 / 100.0),
    }
}

/// Returns `Some(trivial_window)` for degenerate sizes (0 or 1), or `None`
/// to indicate the caller should compute the full window.
#[inline]
fn trivial_window(size: usize) -> Option<Vec<f64>> {
    match size {
        0 => Some(vec![]),
        1 => Some(vec![1.0]),
        _ => None,
    }
}

/// Evaluates a symmetric generalized cosine window with alternating-sign terms.
#[inline]
fn cosine_sum_window(size: usize, coeffs: &[f64]) -> Vec<f64> {
    if let Some(w) = trivial_window(size) {
        return w;
    }
    let n = size as f64;
    (0..size)
        .map(|i| {
            let x = 2.0 * PI * i as f64 / (n - 1.0);
            coeffs
                .iter()
                .enumerate()
                .map(|(k, &a)| {
                    let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                    sign * a * (k as f64 * x).cos()
                })
                .sum()
        })
        .collect()
}

/// Generates a Hann window.
#[inline]
pub fn hann_window(size: usize) -> Vec<f64> {
    cosine_sum_window(size, &[0.5, 0.5])
}

/// Generates a Hamming window.
#[inline]
pub fn hamming_window(size: usize) -> Vec<f64> {
    cosine_sum_window(size, &[HAMMING_ALPHA, HAMMING_BETA])
}

/// Generates a Blackman window.
#[inline]
pub fn blackman_window(size: usize) -> Vec<f64> {
    cosine_sum_window(size, &[BLACKMAN_A0, BLACKMAN_A1, BLACKMAN_A2])
}

/// Generates a Blackman-Harris window.
#[inline]
pub fn blackman_harris_window(size: usize) -> Vec<f64> {
    cosine_sum_window(size, &BH_COEFFS)
}

/// Generates a Kaiser window using the zeroth-order modified Bessel function.
#[inline]
fn kaiser_window(size: usize, beta: f64) -> Vec<f64> {
    if let Some(w) = trivial_window(size) {
        return w;
    }
    let n = size as f64;
    let denom = bessel_i0(beta);
    (0..size)
        .map(|i| {
            let x = 2.0 * i as f64 / (n - 1.0) - 1.0;
            let arg = beta * (1.0 - x * x).max(0.0).sqrt();
            bessel_i0(arg) / denom
        })
        .collect()
}

/// Maximum number of series terms for Bessel I0 convergence.
const BESSEL_MAX_TERMS: usize = 30;
/// Relative convergence threshold for Bessel I0 series.
const BESSEL_CONVERGENCE: f64 = 1e-15;

/// Zeroth-order modified Bessel function of the first kind.
/// Computed via series expansion.
#[inline]
fn bessel_i0(x: f64) -> f64 {
    let mut sum = 1.0;
    let mut term = 1.0;
    let x_half = x / 2.0;
    for k in 1..BESSEL_MAX_TERMS {
        term *= (x_half / k as f64) * (x_half / k as f64);
        sum += term;
        if term < BESSEL_CONVERGENCE * sum {
            break;
        }
    }
    sum
}

/// Generates a triangular window without zero end points.
///
/// Even sizes use `(2n - 1) / size` for `n = 1..=size/2`, mirrored; odd sizes
/// use `2n / (size + 1)`. Two even-length triangles shifted by half their
/// length sum to exactly one.
pub fn triangular_window(size: usize) -> Vec<f64> {
    if let Some(w) = trivial_window(size) {
        return w;
    }
    let half = size.div_ceil(2);
    let rising: Vec<f64> = if size % 2 == 0 {
        (1..=half)
            .map(|n| (2 * n - 1) as f64 / size as f64)
            .collect()
    } else {
        (1..=half)
            .map(|n| 2.0 * n as f64 / (size + 1) as f64)
            .collect()
    };
    let mut w = rising.clone();
    let mirror = if size % 2 == 0 { half } else { half - 1 };
    w.extend(rising[..mirror].iter().rev());
    w
}

/// Scales a window so its samples sum to one.
///
/// Returns `None` when the window is empty or its sum is zero or not finite.
pub fn normalize_window(window: &[f64]) -> Option<Vec<f64>> {
    let sum: f64 = window.iter().sum();
    if window.is_empty() || !sum.is_finite() || sum == 0.0 {
        return None;
    }
    Some(window.iter().map(|&w| w / sum).collect())
}

/// Applies a window function to a slice in-place.
#[inline]
pub fn apply_window(data: &mut [f64], window: &[f64]) {
    for (sample, &w) in data.iter_mut().zip(window.iter()) {
        *sample *= w;
    }
}

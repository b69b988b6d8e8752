//! Reconstruction fidelity as a signal-to-noise ratio.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::Sample;
use crate::error::SineModelError;

/// Signal-to-noise ratio of a reconstruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Snr {
    /// Finite SNR in dB.
    Decibels(f64),
    /// The reconstruction is sample-exact.
    Perfect,
}

impl Snr {
    /// SNR in dB, or `None` for a perfect reconstruction.
    #[inline]
    pub fn as_db(&self) -> Option<f64> {
        match self {
            Snr::Decibels(db) => Some(*db),
            Snr::Perfect => None,
        }
    }

    #[inline]
    pub fn is_perfect(&self) -> bool {
        matches!(self, Snr::Perfect)
    }

    /// True if the SNR is perfect or above `db`.
    #[inline]
    pub fn exceeds(&self, db: f64) -> bool {
        match self {
            Snr::Decibels(v) => *v > db,
            Snr::Perfect => true,
        }
    }
}

impl fmt::Display for Snr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Snr::Decibels(db) => write!(f, "{:.2} dB", db),
            Snr::Perfect => write!(f, "perfect"),
        }
    }
}

/// Sum of squared samples, accumulated in f64.
pub fn energy(signal: &[Sample]) -> f64 {
    signal.iter().map(|&s| (s as f64) * (s as f64)).sum()
}

/// `10 * log10(signal / noise)`.
///
/// # Errors
/// Zero noise energy is [`Snr::Perfect`]; zero signal energy with non-zero
/// noise is [`SineModelError::SilentReference`].
pub fn snr_from_energy(signal_energy: f64, noise_energy: f64) -> Result<Snr, SineModelError> {
    if noise_energy == 0.0 {
        return Ok(Snr::Perfect);
    }
    if signal_energy == 0.0 {
        return Err(SineModelError::SilentReference);
    }
    Ok(Snr::Decibels(10.0 * (signal_energy / noise_energy).log10()))
}

/// SNR of `reconstructed` against `original`.
///
/// # Errors
/// Returns [`SineModelError::LengthMismatch`] for signals of different
/// lengths and [`SineModelError::SilentReference`] when the original is
/// silent but the reconstruction is not.
pub fn diff_snr(original: &[Sample], reconstructed: &[Sample]) -> Result<Snr, SineModelError> {
    if original.len() != reconstructed.len() {
        return Err(SineModelError::LengthMismatch {
            original: original.len(),
            reconstructed: reconstructed.len(),
        });
    }
    let error_energy: f64 = original
        .iter()
        .zip(reconstructed)
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum();
    snr_from_energy(energy(original), error_energy)
}

/// Serializable summary of one reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FidelityReport {
    /// Which model produced the reconstruction.
    pub label: String,
    /// SNR in dB; absent when the reconstruction is perfect.
    pub snr_db: Option<f64>,
    /// True for a sample-exact reconstruction.
    #[serde(default)]
    pub perfect: bool,
    /// Number of samples compared.
    pub num_samples: usize,
    /// Sample rate of the compared signals.
    pub sample_rate: u32,
}

impl FidelityReport {
    /// Measures `reconstructed` against `original`.
    pub fn measure(
        label: impl Into<String>,
        original: &[Sample],
        reconstructed: &[Sample],
        sample_rate: u32,
    ) -> Result<Self, SineModelError> {
        let snr = diff_snr(original, reconstructed)?;
        Ok(Self {
            label: label.into(),
            snr_db: snr.as_db(),
            perfect: snr.is_perfect(),
            num_samples: original.len(),
            sample_rate,
        })
    }

    /// The SNR this report describes.
    pub fn snr(&self) -> Snr {
        match self.snr_db {
            Some(db) if !self.perfect => Snr::Decibels(db),
            _ => Snr::Perfect,
        }
    }
}

/// Writes fidelity reports as a JSON array.
pub fn write_reports_json(path: &Path, reports: &[FidelityReport]) -> Result<(), SineModelError> {
    let json = serde_json::to_string_pretty(reports).map_err(|e| {
        SineModelError::InvalidFormat(format!("failed to serialize fidelity report: {}", e))
    })?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Reads fidelity reports written by [`write_reports_json`].
pub fn read_reports_json(path: &Path) -> Result<Vec<FidelityReport>, SineModelError> {
    let data = std::fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|e| {
        SineModelError::InvalidFormat(format!(
            "failed to parse fidelity report from {}: {}",
            path.display(),
            e
        ))
    })
}

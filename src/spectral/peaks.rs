//! Spectral peak picking and parabolic refinement.

/// A peak refined to sub-bin precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolatedPeak {
    /// Fractional bin location.
    pub location: f64,
    /// Interpolated magnitude in dB.
    pub magnitude_db: f64,
    /// Phase in radians, linearly interpolated in the unwrapped phase spectrum.
    pub phase: f64,
}

/// Finds local maxima above `threshold_db`.
///
/// The first and last bins are never reported, so every returned index has
/// two neighbours for interpolation.
pub fn detect_peaks(magnitude_db: &[f64], threshold_db: f64) -> Vec<usize> {
    if magnitude_db.len() < 3 {
        return Vec::new();
    }
    (1..magnitude_db.len() - 1)
        .filter(|&k| {
            let v = magnitude_db[k];
            v > threshold_db && v > magnitude_db[k - 1] && v > magnitude_db[k + 1]
        })
        .collect()
}

/// Refines peak bins with a parabola through each peak and its neighbours.
///
/// Location and magnitude come from the vertex of the parabola fitted to the
/// dB magnitudes; phase is read from the phase spectrum at the refined location.
pub fn interpolate_peaks(
    magnitude_db: &[f64],
    phase: &[f64],
    locations: &[usize],
) -> Vec<InterpolatedPeak> {
    locations
        .iter()
        .filter(|&&k| k >= 1 && k + 1 < magnitude_db.len())
        .map(|&k| {
            let val = magnitude_db[k];
            let lval = magnitude_db[k - 1];
            let rval = magnitude_db[k + 1];
            let offset = 0.5 * (lval - rval) / (lval - 2.0 * val + rval);
            let location = k as f64 + offset;
            InterpolatedPeak {
                location,
                magnitude_db: val - 0.25 * (lval - rval) * offset,
                phase: interpolate_linear(phase, location),
            }
        })
        .collect()
}

/// Linear interpolation of `values` at fractional index `x`, clamped at the ends.
fn interpolate_linear(values: &[f64], x: f64) -> f64 {
    let last = match values.len() {
        0 => return 0.0,
        n => n - 1,
    };
    if x <= 0.0 {
        return values[0];
    }
    if x >= last as f64 {
        return values[last];
    }
    let i = x.floor() as usize;
    let frac = x - i as f64;
    values[i] + (values[i + 1] - values[i]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_peaks_threshold() {
        let mag = vec![-100.0, -20.0, -100.0, -95.0, -100.0, -10.0, -30.0];
        assert_eq!(detect_peaks(&mag, -90.0), vec![1, 5]);
        assert_eq!(detect_peaks(&mag, -99.0), vec![1, 3, 5]);
    }

    #[test]
    fn test_detect_peaks_plateau_and_edges() {
        // Flat tops are not strict maxima; edge bins are never peaks.
        let mag = vec![0.0, -5.0, -5.0, -10.0, -3.0];
        assert!(detect_peaks(&mag, -90.0).is_empty());
        assert!(detect_peaks(&[0.0, 1.0], -90.0).is_empty());
    }

    #[test]
    fn test_interpolate_symmetric_peak() {
        let mag = vec![-30.0, -10.0, -30.0];
        let phase = vec![0.0, 1.0, 2.0];
        let peaks = interpolate_peaks(&mag, &phase, &[1]);
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].location, 1.0);
        assert_eq!(peaks[0].magnitude_db, -10.0);
        assert_eq!(peaks[0].phase, 1.0);
    }

    #[test]
    fn test_interpolate_parabola_vertex() {
        // y = -(x - 2.3)^2 sampled at 1, 2, 3 has its vertex at 2.3, 0.0.
        let f = |x: f64| -(x - 2.3) * (x - 2.3);
        let mag = vec![f(0.0), f(1.0), f(2.0), f(3.0), f(4.0)];
        let phase = vec![0.0, 0.5, 1.0, 1.5, 2.0];
        let peaks = interpolate_peaks(&mag, &phase, &[2]);
        assert!((peaks[0].location - 2.3).abs() < 1e-12);
        assert!(peaks[0].magnitude_db.abs() < 1e-12);
        assert!((peaks[0].phase - 1.15).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_skips_edge_bins() {
        let mag = vec![-1.0, -2.0, -3.0];
        let phase = vec![0.0; 3];
        assert!(interpolate_peaks(&mag, &phase, &[0, 2]).is_empty());
    }
}

//! Short-time spectral primitives: windowed DFT analysis, peak picking and
//! interpolation, and frequency-domain sinusoid synthesis.

pub mod dft;
pub mod peaks;
pub mod sines;

pub use dft::{DftAnalyzer, Spectrum};
pub use peaks::{detect_peaks, interpolate_peaks, InterpolatedPeak};
pub use sines::{generate_spectral_sines, SineSynthesizer, Sinusoid};

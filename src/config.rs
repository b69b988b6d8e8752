//! JSON model configuration.
//!
//! A [`ModelConfig`] describes both models run by the comparison tool: the
//! single-resolution baseline and the resolution table of the
//! multi-resolution model. Bands are given in Hz and used as written.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::window::{generate_window, WindowType};
use crate::error::SineModelError;
use crate::model::params::{
    Band, MultiResParams, Resolution, SineModelParams, DEFAULT_SYNTHESIS_FFT_SIZE,
    DEFAULT_THRESHOLD_DB,
};

/// One row of the resolution table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionSpec {
    /// Analysis window length in samples.
    pub window_size: usize,
    /// FFT size.
    pub fft_size: usize,
    /// Lower band edge in Hz (inclusive).
    pub min_hz: f64,
    /// Upper band edge in Hz (exclusive).
    pub max_hz: f64,
    /// Window type for this row; falls back to the config's window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowType>,
}

/// Window and FFT size of the single-resolution baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleSpec {
    pub window_size: usize,
    pub fft_size: usize,
}

impl Default for SingleSpec {
    fn default() -> Self {
        Self {
            window_size: 1023,
            fft_size: 1024,
        }
    }
}

/// Serializable description of the single- and multi-resolution models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Default analysis window type.
    pub window: WindowType,
    /// Peak detection threshold in dB.
    pub threshold_db: f64,
    /// Synthesis FFT size.
    pub synthesis_fft_size: usize,
    /// Single-resolution baseline.
    #[serde(default)]
    pub single: SingleSpec,
    /// Multi-resolution table, in band order.
    pub resolutions: Vec<ResolutionSpec>,
}

impl ModelConfig {
    /// The standard three-band layout: long windows below 1 kHz, medium
    /// windows up to 5 kHz and short windows up to Nyquist.
    pub fn default_three_band(sample_rate: u32) -> Self {
        let nyquist = sample_rate as f64 / 2.0;
        let row = |window_size, fft_size, min_hz, max_hz| ResolutionSpec {
            window_size,
            fft_size,
            min_hz,
            max_hz,
            window: None,
        };
        Self {
            window: WindowType::Hamming,
            threshold_db: DEFAULT_THRESHOLD_DB,
            synthesis_fft_size: DEFAULT_SYNTHESIS_FFT_SIZE,
            single: SingleSpec::default(),
            resolutions: vec![
                row(4095, 4096, 0.0, 1000.0),
                row(2047, 2048, 1000.0, 5000.0),
                row(1023, 1024, 5000.0, nyquist),
            ],
        }
    }

    /// Set the default window type.
    pub fn with_window(mut self, window: WindowType) -> Self {
        self.window = window;
        self
    }

    /// Set the peak detection threshold in dB.
    pub fn with_threshold_db(mut self, threshold_db: f64) -> Self {
        self.threshold_db = threshold_db;
        self
    }

    /// Multi-resolution parameters at `sample_rate`, validated.
    pub fn multi_res_params(&self, sample_rate: u32) -> Result<MultiResParams, SineModelError> {
        let resolutions = self
            .resolutions
            .iter()
            .map(|r| {
                Resolution::with_window_type(
                    r.window.unwrap_or(self.window),
                    r.window_size,
                    r.fft_size,
                    Band::new(r.min_hz, r.max_hz),
                )
            })
            .collect();
        let params = MultiResParams::new(resolutions)
            .with_threshold_db(self.threshold_db)
            .with_sample_rate(sample_rate)
            .with_synthesis_fft_size(self.synthesis_fft_size);
        params.validate()?;
        Ok(params)
    }

    /// Single-resolution parameters at `sample_rate`, validated.
    pub fn single_params(&self, sample_rate: u32) -> Result<SineModelParams, SineModelError> {
        let params = SineModelParams::new(
            generate_window(self.window, self.single.window_size),
            self.single.fft_size,
        )
        .with_threshold_db(self.threshold_db)
        .with_sample_rate(sample_rate)
        .with_synthesis_fft_size(self.synthesis_fft_size);
        params.validate()?;
        Ok(params)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SineModelError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            SineModelError::InvalidFormat(format!("failed to serialize model config: {}", e))
        })
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, SineModelError> {
        serde_json::from_str(json).map_err(|e| {
            SineModelError::InvalidFormat(format!("failed to parse model config: {}", e))
        })
    }

    /// Reads a configuration file.
    pub fn load(path: &Path) -> Result<Self, SineModelError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| SineModelError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&data).map_err(|e| match e {
            SineModelError::InvalidFormat(msg) => {
                SineModelError::InvalidFormat(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Writes the configuration as JSON.
    pub fn save(&self, path: &Path) -> Result<(), SineModelError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::default_three_band(44100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = ModelConfig::default();
        assert_eq!(config.window, WindowType::Hamming);
        assert_eq!(config.threshold_db, -90.0);
        assert_eq!(config.synthesis_fft_size, 512);
        let sizes: Vec<(usize, usize)> = config
            .resolutions
            .iter()
            .map(|r| (r.window_size, r.fft_size))
            .collect();
        assert_eq!(sizes, vec![(4095, 4096), (2047, 2048), (1023, 1024)]);
        assert_eq!(config.resolutions[2].max_hz, 22050.0);
        assert_eq!(ModelConfig::default_three_band(48000).resolutions[2].max_hz, 24000.0);
    }

    #[test]
    fn test_params_from_config() {
        let config = ModelConfig::default().with_window(WindowType::BlackmanHarris);
        let params = config.multi_res_params(44100).unwrap();
        assert_eq!(params.resolutions.len(), 3);
        assert_eq!(params.resolutions[0].window.len(), 4095);
        assert_eq!(params.resolutions[1].band, Band::new(1000.0, 5000.0));

        let single = config.single_params(44100).unwrap();
        assert_eq!(single.window.len(), 1023);
        assert_eq!(single.fft_size, 1024);
    }

    #[test]
    fn test_per_row_window_override() {
        let mut config = ModelConfig::default();
        config.resolutions[0].window = Some(WindowType::Rectangular);
        let params = config.multi_res_params(44100).unwrap();
        assert!(params.resolutions[0].window.iter().all(|&w| w == 1.0));
        assert!(params.resolutions[1].window[0] < 0.1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ModelConfig::default();
        config.resolutions[1].fft_size = 1000;
        assert!(matches!(
            config.multi_res_params(44100),
            Err(SineModelError::InvalidFftSize { .. })
        ));
        config.resolutions.clear();
        assert_eq!(
            config.multi_res_params(44100).unwrap_err(),
            SineModelError::NoResolutions
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ModelConfig::default();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"hamming\""));
        assert!(!json.contains("\"window\": null"));
        assert_eq!(ModelConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_missing_single_uses_default() {
        let json = r#"{
            "window": "blackman-harris",
            "threshold_db": -80.0,
            "synthesis_fft_size": 1024,
            "resolutions": [
                { "window_size": 511, "fft_size": 512, "min_hz": 0.0, "max_hz": 22050.0 }
            ]
        }"#;
        let config = ModelConfig::from_json(json).unwrap();
        assert_eq!(config.single, SingleSpec::default());
        assert_eq!(config.resolutions[0].window, None);
        assert!(ModelConfig::from_json("{ not json").is_err());
    }
}

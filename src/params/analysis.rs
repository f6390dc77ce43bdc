//! Spectrum analysis configuration and constants.

use serde::Deserialize;

use crate::error::{MeterError, Result};

/// Analyser and band configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Analysis window size in samples (power of 2, 32..=32768)
    pub fft_size: usize,

    /// Magnitude smoothing between successive frames (0 = none, must be < 1 to react)
    pub smoothing_time_constant: f32,

    /// Upper edge of the low band (Hz, exclusive)
    pub low_band_max_hz: f32,

    /// Upper edge of the mid band (Hz, exclusive); everything above is high
    pub mid_band_max_hz: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fft_size: analysis_constants::FFT_SIZE,
            smoothing_time_constant: 0.8,
            low_band_max_hz: 250.0,
            mid_band_max_hz: 2000.0,
        }
    }
}

impl AnalysisConfig {
    /// Number of frequency bins produced per frame
    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<()> {
        if !self.fft_size.is_power_of_two()
            || !(analysis_constants::MIN_FFT_SIZE..=analysis_constants::MAX_FFT_SIZE)
                .contains(&self.fft_size)
        {
            return Err(MeterError::invalid_config(format!(
                "FFT size must be a power of 2 between {} and {}, got {}",
                analysis_constants::MIN_FFT_SIZE,
                analysis_constants::MAX_FFT_SIZE,
                self.fft_size
            )));
        }
        if !(0.0..=1.0).contains(&self.smoothing_time_constant) {
            return Err(MeterError::invalid_config(format!(
                "Smoothing time constant must be within [0, 1], got {}",
                self.smoothing_time_constant
            )));
        }
        if self.low_band_max_hz <= 0.0 || self.low_band_max_hz >= self.mid_band_max_hz {
            return Err(MeterError::invalid_config(format!(
                "Band edges must satisfy 0 < low ({}) < mid ({})",
                self.low_band_max_hz, self.mid_band_max_hz
            )));
        }
        Ok(())
    }
}

/// Byte-domain constants shared by the analyser and the volume computation
pub mod analysis_constants {
    /// Default analysis window (2048 points)
    pub const FFT_SIZE: usize = 2048;

    pub const MIN_FFT_SIZE: usize = 32;
    pub const MAX_FFT_SIZE: usize = 32768;

    /// Byte value representing a zero-amplitude sample
    pub const BYTE_MIDPOINT: u8 = 128;
}

//! Per-frame readings derived from analyser output.

use crate::classify::SoundSource;
use crate::params::{analysis_constants::BYTE_MIDPOINT, AnalysisConfig};

/// Summed linear magnitude per frequency band (not normalized)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandEnergies {
    pub low: f32,
    pub mid: f32,
    pub high: f32,
}

/// Everything the meter displays for one analysis frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReading {
    /// Volume percentage [0, 100]
    pub volume: u8,
    /// Dominant frequency (Hz)
    pub frequency_hz: u32,
    pub bands: BandEnergies,
    pub source: SoundSource,
}

/// Analyse one frame of time-domain bytes and dB spectrum
pub fn analyze_frame(
    time_data: &[u8],
    spectrum_db: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> FrameReading {
    let frequency_hz = dominant_frequency(spectrum_db, sample_rate);
    FrameReading {
        volume: volume_percent(time_data),
        frequency_hz,
        bands: band_energies(spectrum_db, sample_rate, config),
        source: SoundSource::classify(frequency_hz),
    }
}

/// Mean absolute deviation from the byte midpoint, as a rounded percentage
pub fn volume_percent(time_data: &[u8]) -> u8 {
    if time_data.is_empty() {
        return 0;
    }

    let midpoint = BYTE_MIDPOINT as f32;
    let sum: f32 = time_data
        .iter()
        .map(|&b| (b as f32 - midpoint).abs())
        .sum();
    let average = sum / time_data.len() as f32;

    (average / midpoint * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Sum linear magnitudes into low/mid/high bands.
///
/// Bin `i` is placed at `i * sample_rate / bin_count` Hz. Non-finite
/// magnitudes contribute nothing.
pub fn band_energies(spectrum_db: &[f32], sample_rate: u32, config: &AnalysisConfig) -> BandEnergies {
    let bin_count = spectrum_db.len();
    let mut bands = BandEnergies::default();
    if bin_count == 0 {
        return bands;
    }

    for (i, &db) in spectrum_db.iter().enumerate() {
        let frequency = i as f32 * sample_rate as f32 / bin_count as f32;
        let magnitude = 10f32.powf(db / 20.0);
        if !magnitude.is_finite() {
            continue;
        }

        if frequency < config.low_band_max_hz {
            bands.low += magnitude;
        } else if frequency < config.mid_band_max_hz {
            bands.mid += magnitude;
        } else {
            bands.high += magnitude;
        }
    }

    bands
}

/// Index of the loudest bin; the first one wins ties, bin 0 if none is finite
pub fn dominant_bin(spectrum_db: &[f32]) -> usize {
    let mut max_index = 0;
    let mut max_value = f32::NEG_INFINITY;
    for (i, &db) in spectrum_db.iter().enumerate() {
        if db > max_value {
            max_value = db;
            max_index = i;
        }
    }
    max_index
}

/// Dominant frequency in whole Hz
pub fn dominant_frequency(spectrum_db: &[f32], sample_rate: u32) -> u32 {
    let bin_count = spectrum_db.len();
    if bin_count == 0 {
        return 0;
    }
    let index = dominant_bin(spectrum_db);
    (index as f64 * sample_rate as f64 / (2.0 * bin_count as f64)).round() as u32
}

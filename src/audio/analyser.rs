//! Rolling-window spectrum analyser.
//!
//! Mirrors the behaviour of a browser analyser node: a fixed window of the most
//! recent samples, readable as unsigned bytes in the time domain or as smoothed
//! decibel magnitudes in the frequency domain.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::collections::VecDeque;
use std::f32::consts::PI;
use std::sync::Arc;

use crate::params::AnalysisConfig;

/// Blackman window alpha (classic Blackman)
const BLACKMAN_ALPHA: f32 = 0.16;

/// Analyser over the most recent `fft_size` samples of one capture session
pub struct Analyser {
    sample_rate: u32,
    fft_size: usize,
    smoothing_time_constant: f32,

    /// Oldest sample first, always exactly `fft_size` long
    window: VecDeque<f32>,

    fft: Arc<dyn Fft<f32>>,
    fft_buffer: Vec<Complex<f32>>,
    fft_scratch: Vec<Complex<f32>>,
    blackman: Vec<f32>,

    /// Smoothed linear magnitudes, one per frequency bin
    smoothed: Vec<f32>,
}

impl Analyser {
    /// Create an analyser for a stream at `sample_rate` (config must be validated)
    pub fn new(sample_rate: u32, config: &AnalysisConfig) -> Self {
        let fft_size = config.fft_size;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let fft_scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            sample_rate,
            fft_size,
            smoothing_time_constant: config.smoothing_time_constant,
            window: std::iter::repeat(0.0).take(fft_size).collect(),
            fft,
            fft_buffer: vec![Complex::new(0.0, 0.0); fft_size],
            fft_scratch,
            blackman: (0..fft_size).map(|i| blackman_window(i, fft_size)).collect(),
            smoothed: vec![0.0; config.frequency_bin_count()],
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Append captured samples, dropping the oldest to keep the window size fixed
    pub fn push_samples(&mut self, samples: &[f32]) {
        let skip = samples.len().saturating_sub(self.fft_size);
        for &sample in &samples[skip..] {
            self.window.pop_front();
            self.window.push_back(sample);
        }
    }

    /// Fill `out` with the window as bytes centered at 128 (oldest first)
    pub fn byte_time_domain_data(&self, out: &mut [u8]) {
        for (dst, &sample) in out.iter_mut().zip(self.window.iter()) {
            *dst = (128.0 * (sample + 1.0)).clamp(0.0, 255.0) as u8;
        }
    }

    /// Fill `out` with smoothed magnitudes in dB, one value per bin.
    ///
    /// A zero magnitude yields `f32::NEG_INFINITY`.
    pub fn float_frequency_data(&mut self, out: &mut [f32]) {
        self.update_spectrum();

        for (dst, &magnitude) in out.iter_mut().zip(self.smoothed.iter()) {
            *dst = 20.0 * magnitude.log10();
        }
    }

    fn update_spectrum(&mut self) {
        // Apply Blackman window
        for ((dst, &sample), &w) in self
            .fft_buffer
            .iter_mut()
            .zip(self.window.iter())
            .zip(self.blackman.iter())
        {
            *dst = Complex::new(sample * w, 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.fft_buffer, &mut self.fft_scratch);

        let scale = 1.0 / self.fft_size as f32;
        let tau = self.smoothing_time_constant;
        for (smoothed, bin) in self.smoothed.iter_mut().zip(self.fft_buffer.iter()) {
            let magnitude = bin.norm() * scale;
            let next = tau * *smoothed + (1.0 - tau) * magnitude;
            *smoothed = if next.is_finite() { next } else { 0.0 };
        }
    }
}

/// Blackman window function for FFT analysis
pub fn blackman_window(index: usize, size: usize) -> f32 {
    let a0 = 0.5 * (1.0 - BLACKMAN_ALPHA);
    let a1 = 0.5;
    let a2 = 0.5 * BLACKMAN_ALPHA;
    let x = index as f32 / size as f32;
    a0 - a1 * (2.0 * PI * x).cos() + a2 * (4.0 * PI * x).cos()
}

//! FFT front-end producing magnitude frames for the pipeline

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f64::consts::PI;
use std::sync::Arc;

/// Turns blocks of mono samples into `fft_size / 2` bin magnitude frames
pub struct MagnitudeAnalyzer {
    fft_size: usize,
    fft: Arc<dyn Fft<f64>>,
    window: Vec<f64>,
    /// Scales a full-scale sine to a peak bin of ~1.0
    scale: f64,
    /// Pre-allocated FFT buffer to avoid allocation in analyze()
    fft_buffer: Vec<Complex<f64>>,
}

impl MagnitudeAnalyzer {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        // Periodic Hann window
        let window: Vec<f64> = (0..fft_size)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / fft_size as f64).cos()))
            .collect();
        let window_sum: f64 = window.iter().sum();
        let scale = if window_sum > 0.0 { 2.0 / window_sum } else { 0.0 };

        Self {
            fft_size,
            fft,
            window,
            scale,
            fft_buffer: vec![Complex::new(0.0, 0.0); fft_size],
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of bins per frame
    pub fn band_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Analyze up to `fft_size` samples (zero padded) into `frame`
    pub fn analyze_into(&mut self, samples: &[f64], frame: &mut Vec<f64>) {
        let sample_count = samples.len().min(self.fft_size);
        for (i, (buf, &sample)) in self.fft_buffer.iter_mut().zip(samples).enumerate() {
            *buf = Complex::new(sample * self.window[i], 0.0);
        }
        for buf in self.fft_buffer.iter_mut().skip(sample_count) {
            *buf = Complex::new(0.0, 0.0);
        }

        self.fft.process(&mut self.fft_buffer);

        frame.clear();
        frame.extend(
            self.fft_buffer[..self.fft_size / 2]
                .iter()
                .map(|c| c.norm() * self.scale),
        );
    }

    /// Analyze a block of samples and return its magnitude frame
    pub fn analyze(&mut self, samples: &[f64]) -> Vec<f64> {
        let mut frame = Vec::with_capacity(self.band_count());
        self.analyze_into(samples, &mut frame);
        frame
    }
}

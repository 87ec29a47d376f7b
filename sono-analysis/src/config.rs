//! Pipeline configuration
//!
//! A [`PipelineConfig`] is fixed for the lifetime of a [`crate::Pipeline`].
//! It is checked once by [`PipelineConfig::validate`] when the pipeline is
//! built and never consulted for errors again.

use crate::error::ConfigError;
use crate::tables::gaussian;

/// How the Gaussian kernel is swept across a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelWindow {
    /// All `2 * radius + 1` taps, reading from an unmodified copy of the frame
    #[default]
    Full,
    /// Legacy sweep: `2 * radius` taps (the top tap is skipped) and the frame
    /// is overwritten while it is read, so lower neighbours are already smoothed
    Truncated,
}

/// Shape of the spatial smoothing kernel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianParams {
    /// Mean of the Gaussian density
    pub mu: f64,
    /// Standard deviation (must be > 0)
    pub sigma: f64,
    /// Kernel half-width in bins
    pub radius: u32,
    /// Convolution sweep
    pub window: KernelWindow,
}

impl Default for GaussianParams {
    fn default() -> Self {
        Self {
            mu: 0.0,
            sigma: 1.0,
            radius: 2,
            window: KernelWindow::Full,
        }
    }
}

/// Parameters for one analysis pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Sample rate of the analysed audio in Hz
    pub sample_rate: f64,
    /// FFT length that produced the magnitude frames
    pub fft_size: u32,
    /// Lower edge of the first output band in Hz
    pub start_frequency: f64,
    /// Upper edge of the last output band in Hz
    pub end_frequency: f64,
    /// Number of output bands
    pub out_bands: u32,
    /// Spatial smoothing kernel
    pub gaussian: GaussianParams,
    /// Enable the 5-frame moving average
    pub temporal_weighting: bool,
    /// Enable A-weighting
    pub a_weighting: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            fft_size: 1024,
            start_frequency: 0.0,
            end_frequency: 10000.0,
            out_bands: 81,
            gaussian: GaussianParams::default(),
            temporal_weighting: true,
            a_weighting: true,
        }
    }
}

impl PipelineConfig {
    /// Width of one FFT bin in Hz
    pub fn bandwidth(&self) -> f64 {
        self.sample_rate / f64::from(self.fft_size)
    }

    /// Number of bins in a magnitude frame (`fft_size / 2`)
    pub fn band_count(&self) -> usize {
        (self.fft_size / 2) as usize
    }

    /// Sum of the mirrored kernel taps: the centre plus twice each
    /// negative offset
    fn kernel_sum(&self) -> f64 {
        let GaussianParams { mu, sigma, radius, .. } = self.gaussian;
        let sides: f64 = (1..=radius)
            .map(|offset| gaussian(-f64::from(offset), sigma, mu))
            .sum();
        gaussian(0.0, sigma, mu) + 2.0 * sides
    }

    /// Check every parameter the coefficient tables depend on.
    ///
    /// The kernel radius may not exceed the number of bins, and the kernel
    /// taps must not all underflow to zero (a large `|mu|` against `sigma`).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::NonPositiveSampleRate(self.sample_rate));
        }
        if self.fft_size < 2 {
            return Err(ConfigError::InvalidFftSize(self.fft_size));
        }
        if !(self.gaussian.sigma.is_finite() && self.gaussian.sigma > 0.0) {
            return Err(ConfigError::NonPositiveSigma(self.gaussian.sigma));
        }
        if !self.gaussian.mu.is_finite() {
            return Err(ConfigError::NonFiniteMu(self.gaussian.mu));
        }
        if self.gaussian.radius as usize > self.band_count() {
            return Err(ConfigError::RadiusTooLarge {
                radius: self.gaussian.radius,
                band_count: self.band_count(),
            });
        }
        let kernel_sum = self.kernel_sum();
        if !(kernel_sum.is_finite() && kernel_sum > 0.0) {
            return Err(ConfigError::DegenerateKernel {
                mu: self.gaussian.mu,
                sigma: self.gaussian.sigma,
            });
        }
        if self.out_bands == 0 {
            return Err(ConfigError::NoOutputBands);
        }

        let (start, end) = (self.start_frequency, self.end_frequency);
        if !(start.is_finite() && end.is_finite()) || start < 0.0 || start >= end {
            return Err(ConfigError::InvalidFrequencyRange { start, end });
        }

        // A zero start frequency opens with a fixed one-bin band, so the
        // geometric part needs room above it.
        if start == 0.0 && self.out_bands > 1 && end <= self.bandwidth() {
            return Err(ConfigError::RangeBelowResolution {
                end,
                bandwidth: self.bandwidth(),
            });
        }

        Ok(())
    }
}

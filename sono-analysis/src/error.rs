//! Error types

use thiserror::Error;

/// Invalid pipeline configuration, reported once at construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("sample rate must be positive, got {0}")]
    NonPositiveSampleRate(f64),
    #[error("FFT size must be at least 2, got {0}")]
    InvalidFftSize(u32),
    #[error("Gaussian sigma must be positive, got {0}")]
    NonPositiveSigma(f64),
    #[error("Gaussian mu must be finite, got {0}")]
    NonFiniteMu(f64),
    #[error("filter radius {radius} exceeds the {band_count} bins of a frame")]
    RadiusTooLarge { radius: u32, band_count: usize },
    #[error("Gaussian kernel vanishes for mu {mu} and sigma {sigma}")]
    DegenerateKernel { mu: f64, sigma: f64 },
    #[error("at least one output band is required")]
    NoOutputBands,
    #[error("invalid frequency range {start} Hz - {end} Hz")]
    InvalidFrequencyRange { start: f64, end: f64 },
    #[error("end frequency {end} Hz does not exceed the first bin ({bandwidth} Hz)")]
    RangeBelowResolution { end: f64, bandwidth: f64 },
}

/// A frame whose length differs from the pipeline's bin count
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("frame has {actual} bins, expected {expected}")]
pub struct ShapeError {
    pub expected: usize,
    pub actual: usize,
}

/// Any error raised by the analysis crate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),
}

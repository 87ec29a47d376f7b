//! Sound level analysis for sono
//!
//! Turns FFT magnitude frames into perceptually weighted, smoothed levels
//! per fractional-octave band, for sound level meters and spectrum displays.

mod bands;
mod config;
mod error;
mod pipeline;
mod smoothing;
mod spectrum;
mod tables;
mod temporal;
mod weighting;

pub use bands::{band_levels_db, BandAggregator, MIN_LEVEL_DB};
pub use config::{GaussianParams, KernelWindow, PipelineConfig};
pub use error::{AnalysisError, ConfigError, ShapeError};
pub use pipeline::Pipeline;
pub use smoothing::GaussianSmoother;
pub use spectrum::MagnitudeAnalyzer;
pub use tables::{a_weighting, gaussian, Band, CoefficientTables};
pub use temporal::{TemporalAverager, HISTORY_DEPTH};
pub use weighting::AWeighter;

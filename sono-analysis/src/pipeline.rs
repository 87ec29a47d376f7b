//! Sound level pipeline
//!
//! Each call to [`Pipeline::process`] runs one magnitude frame through the
//! stages in a fixed order:
//!
//! 1. Gaussian smoothing across bins (always)
//! 2. 5-frame moving average (if `temporal_weighting`)
//! 3. A-weighting (if `a_weighting`)
//! 4. RMS per fractional-octave band (always)
//!
//! A pipeline holds per-stream state and is not meant to be shared between
//! streams; give every stream its own instance.

use std::sync::Arc;

use crate::bands::BandAggregator;
use crate::config::PipelineConfig;
use crate::error::{ConfigError, ShapeError};
use crate::smoothing::GaussianSmoother;
use crate::tables::{Band, CoefficientTables};
use crate::temporal::{TemporalAverager, HISTORY_DEPTH};
use crate::weighting::AWeighter;

pub struct Pipeline {
    config: PipelineConfig,
    tables: Arc<CoefficientTables>,
    smoother: GaussianSmoother,
    averager: Option<TemporalAverager>,
    weighter: Option<AWeighter>,
    aggregator: BandAggregator,
    /// Working copy of the current frame; the caller's buffer is never touched
    work: Vec<f64>,
    frames_processed: u64,
}

impl Pipeline {
    /// Validate `config` and precompute all coefficient tables
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let band_count = config.band_count();
        let bandwidth = config.bandwidth();
        let tables = Arc::new(CoefficientTables::new(&config));

        tracing::debug!(
            band_count,
            bandwidth,
            out_bands = config.out_bands,
            band_ratio = tables.band_ratio(),
            kernel_len = tables.kernel().len(),
            "built sound level pipeline"
        );

        let smoother = GaussianSmoother::new(tables.clone(), config.gaussian.window, band_count);
        let averager = config
            .temporal_weighting
            .then(|| TemporalAverager::new(band_count));
        let weighter = config.a_weighting.then(|| AWeighter::new(tables.clone()));
        let aggregator = BandAggregator::new(tables.bands(), bandwidth, band_count);

        Ok(Self {
            config,
            tables,
            smoother,
            averager,
            weighter,
            aggregator,
            work: Vec::with_capacity(band_count),
            frames_processed: 0,
        })
    }

    /// Process one magnitude frame and return one value per output band
    pub fn process(&mut self, frame: &[f64]) -> Result<Vec<f64>, ShapeError> {
        let mut out = Vec::with_capacity(self.aggregator.len());
        self.process_into(frame, &mut out)?;
        Ok(out)
    }

    /// Like [`Pipeline::process`], writing the band values into `out`.
    ///
    /// On a shape error neither `out` nor the pipeline state is modified.
    pub fn process_into(&mut self, frame: &[f64], out: &mut Vec<f64>) -> Result<(), ShapeError> {
        let expected = self.config.band_count();
        if frame.len() != expected {
            return Err(ShapeError {
                expected,
                actual: frame.len(),
            });
        }

        self.work.clear();
        self.work.extend_from_slice(frame);

        self.smoother.smooth(&mut self.work);

        if let Some(averager) = self.averager.as_mut() {
            let averaged = averager.smooth(&mut self.work);
            if averaged && self.frames_processed == HISTORY_DEPTH as u64 {
                tracing::trace!(
                    frame = self.frames_processed + 1,
                    "temporal smoothing active"
                );
            }
        }

        if let Some(weighter) = &self.weighter {
            weighter.apply(&mut self.work);
        }

        self.aggregator.aggregate_into(&self.work, out)?;
        self.frames_processed += 1;
        Ok(())
    }

    /// Drop the temporal history, as if the pipeline had just been built
    pub fn reset(&mut self) {
        if let Some(averager) = self.averager.as_mut() {
            averager.reset();
        }
        self.frames_processed = 0;
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Precomputed coefficient tables
    pub fn tables(&self) -> &CoefficientTables {
        &self.tables
    }

    pub fn bands(&self) -> &[Band] {
        self.tables.bands()
    }

    pub fn kernel(&self) -> &[f64] {
        self.tables.kernel()
    }

    /// Expected input frame length
    pub fn band_count(&self) -> usize {
        self.config.band_count()
    }

    /// Width of one input bin in Hz
    pub fn bandwidth(&self) -> f64 {
        self.config.bandwidth()
    }

    /// Frames processed since construction or the last reset
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Whether the next frame will be temporally averaged
    pub fn is_temporal_active(&self) -> bool {
        self.averager
            .as_ref()
            .is_some_and(TemporalAverager::is_active)
    }
}

//! Fractional-octave band aggregation

use std::ops::RangeInclusive;

use crate::error::ShapeError;
use crate::tables::Band;

/// Floor for [`band_levels_db`]
pub const MIN_LEVEL_DB: f64 = -100.0;

/// Reduces a frame to one RMS value per output band
#[derive(Debug, Clone)]
pub struct BandAggregator {
    /// Inclusive bin range per band, `None` when the band holds no bins
    ranges: Vec<Option<RangeInclusive<usize>>>,
    band_count: usize,
}

impl BandAggregator {
    pub fn new(bands: &[Band], bandwidth: f64, band_count: usize) -> Self {
        let last_bin = band_count.saturating_sub(1);
        let ranges = bands
            .iter()
            .map(|band| {
                let start = (band.lower_frequency / bandwidth).floor() as usize;
                let end = ((band.upper_frequency / bandwidth).floor() as usize).min(last_bin);
                (start <= end).then_some(start..=end)
            })
            .collect();

        Self { ranges, band_count }
    }

    /// Number of output bands
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Bin range covered by band `index`
    pub fn bin_range(&self, index: usize) -> Option<RangeInclusive<usize>> {
        self.ranges.get(index).cloned().flatten()
    }

    /// Write one RMS value per band into `out`, replacing its contents.
    ///
    /// A band whose bin range is empty reports `0.0`. A frame whose length
    /// differs from the bin count the aggregator was built for is rejected
    /// and `out` is left as it was.
    pub fn aggregate_into(&self, frame: &[f64], out: &mut Vec<f64>) -> Result<(), ShapeError> {
        if frame.len() != self.band_count {
            return Err(ShapeError {
                expected: self.band_count,
                actual: frame.len(),
            });
        }

        out.clear();
        out.extend(self.ranges.iter().map(|range| match range {
            Some(range) => {
                let bins = &frame[range.clone()];
                let sum: f64 = bins.iter().map(|v| v * v).sum();
                (sum / bins.len() as f64).sqrt()
            }
            None => 0.0,
        }));
        Ok(())
    }

    /// One RMS value per band
    pub fn aggregate(&self, frame: &[f64]) -> Result<Vec<f64>, ShapeError> {
        let mut out = Vec::with_capacity(self.ranges.len());
        self.aggregate_into(frame, &mut out)?;
        Ok(out)
    }
}

/// Convert band RMS values to decibels, floored at [`MIN_LEVEL_DB`]
pub fn band_levels_db(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|&v| {
            if v > 0.0 {
                (20.0 * v.log10()).max(MIN_LEVEL_DB)
            } else {
                MIN_LEVEL_DB
            }
        })
        .collect()
}

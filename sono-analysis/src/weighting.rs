//! Perceptual A-weighting of magnitude frames

use std::sync::Arc;

use crate::tables::CoefficientTables;

/// Multiplies every bin by its precomputed A-weighting gain
pub struct AWeighter {
    tables: Arc<CoefficientTables>,
}

impl AWeighter {
    pub fn new(tables: Arc<CoefficientTables>) -> Self {
        Self { tables }
    }

    /// Weight `frame` in place. Bins past the end of the table are left alone.
    pub fn apply(&self, frame: &mut [f64]) {
        for (value, gain) in frame.iter_mut().zip(self.tables.a_weights()) {
            *value *= gain;
        }
    }
}

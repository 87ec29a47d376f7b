//! Spatial (across-bin) Gaussian smoothing

use std::sync::Arc;

use crate::config::KernelWindow;
use crate::tables::CoefficientTables;

/// Convolves a magnitude frame with the precomputed Gaussian kernel.
///
/// Bins outside the frame count as zero. The result is divided by the full
/// kernel sum, so the edges roll off instead of being renormalised.
pub struct GaussianSmoother {
    tables: Arc<CoefficientTables>,
    window: KernelWindow,
    /// Copy of the input frame for the full sweep
    scratch: Vec<f64>,
}

impl GaussianSmoother {
    pub fn new(tables: Arc<CoefficientTables>, window: KernelWindow, band_count: usize) -> Self {
        let scratch = match window {
            KernelWindow::Full => Vec::with_capacity(band_count),
            KernelWindow::Truncated => Vec::new(),
        };
        Self {
            tables,
            window,
            scratch,
        }
    }

    /// Smooth `frame` in place
    pub fn smooth(&mut self, frame: &mut [f64]) {
        match self.window {
            KernelWindow::Full => self.smooth_full(frame),
            KernelWindow::Truncated => self.smooth_truncated(frame),
        }
    }

    fn smooth_full(&mut self, frame: &mut [f64]) {
        let kernel = self.tables.kernel();
        let norm = self.tables.kernel_sum();
        let radius = kernel.len() / 2;

        self.scratch.clear();
        self.scratch.extend_from_slice(frame);
        let input = &self.scratch;

        for (i, out) in frame.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (k, &weight) in kernel.iter().enumerate() {
                if let Some(&value) = (i + k).checked_sub(radius).and_then(|j| input.get(j)) {
                    acc += value * weight;
                }
            }
            *out = acc / norm;
        }
    }

    /// Legacy sweep: the top tap is never used and bins below `i` have
    /// already been overwritten when bin `i` is computed.
    fn smooth_truncated(&mut self, frame: &mut [f64]) {
        let kernel = self.tables.kernel();
        let norm = self.tables.kernel_sum();
        let radius = kernel.len() / 2;

        for i in 0..frame.len() {
            let mut acc = 0.0;
            for (k, &weight) in kernel.iter().take(2 * radius).enumerate() {
                if let Some(&value) = (i + k).checked_sub(radius).and_then(|j| frame.get(j)) {
                    acc += value * weight;
                }
            }
            frame[i] = acc / norm;
        }
    }
}

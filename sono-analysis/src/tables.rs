//! Coefficient tables built once per pipeline
//!
//! - Gaussian smoothing kernel (mirrored about its centre tap)
//! - A-weighting gain for every FFT bin
//! - Fractional-octave band edges

use crate::config::{GaussianParams, PipelineConfig};
use crate::error::ConfigError;

// Squared A-weighting pole frequencies (20.6 Hz, 107.7 Hz, 737.9 Hz, 12194 Hz)
const A_F1_SQ: f64 = 424.36;
const A_F2_SQ: f64 = 11599.29;
const A_F3_SQ: f64 = 544496.41;
const A_F4_SQ: f64 = 148840000.0;
/// Normalises the curve to unity gain at 1 kHz (+2 dB)
const A_GAIN: f64 = 1.2588966;

/// Gaussian density (unnormalised) at `x`
pub fn gaussian(x: f64, sigma: f64, mu: f64) -> f64 {
    let d = x - mu;
    (-(d * d) / (2.0 * sigma * sigma)).exp()
}

/// Analytic A-weighting amplitude gain at `freq` Hz
///
/// Gain is 1.0 at 1 kHz, peaks slightly above unity around 2.5 kHz and
/// falls towards zero at both ends of the audible range. No clamping.
pub fn a_weighting(freq: f64) -> f64 {
    let ff = freq * freq;
    A_GAIN * A_F4_SQ * ff * ff
        / ((ff + A_F1_SQ) * ((ff + A_F2_SQ) * (ff + A_F3_SQ)).sqrt() * (ff + A_F4_SQ))
}

/// One output band, `[lower_frequency, upper_frequency]` in Hz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub lower_frequency: f64,
    pub upper_frequency: f64,
}

/// Precomputed, read-only tables shared by every pipeline stage
#[derive(Debug, Clone)]
pub struct CoefficientTables {
    pub(crate) kernel: Vec<f64>,
    pub(crate) kernel_sum: f64,
    pub(crate) a_weights: Vec<f64>,
    pub(crate) bands: Vec<Band>,
    pub(crate) band_ratio: f64,
}

impl CoefficientTables {
    /// Validate `config` and build all tables
    pub fn build(config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Build all tables from an already validated config
    pub(crate) fn new(config: &PipelineConfig) -> Self {
        let kernel = build_kernel(&config.gaussian);
        let kernel_sum = kernel.iter().sum();
        let (bands, band_ratio) = build_bands(config);

        Self {
            kernel,
            kernel_sum,
            a_weights: build_a_weights(config.band_count(), config.bandwidth()),
            bands,
            band_ratio,
        }
    }

    /// Gaussian kernel, `2 * radius + 1` taps
    pub fn kernel(&self) -> &[f64] {
        &self.kernel
    }

    /// Sum of the kernel taps, used as the convolution normaliser
    pub fn kernel_sum(&self) -> f64 {
        self.kernel_sum
    }

    /// A-weighting gain per bin
    pub fn a_weights(&self) -> &[f64] {
        &self.a_weights
    }

    /// Output bands in ascending frequency order
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Frequency ratio between consecutive geometric band edges
    pub fn band_ratio(&self) -> f64 {
        self.band_ratio
    }
}

/// Sample the negative half and centre, then mirror it.
///
/// The kernel stays symmetric about the centre tap even for a non-zero `mu`.
fn build_kernel(params: &GaussianParams) -> Vec<f64> {
    let radius = params.radius as usize;
    let mut kernel = Vec::with_capacity(2 * radius + 1);

    for offset in 0..=radius {
        let x = offset as f64 - radius as f64;
        kernel.push(gaussian(x, params.sigma, params.mu));
    }
    for i in (0..radius).rev() {
        kernel.push(kernel[i]);
    }

    kernel
}

fn build_a_weights(band_count: usize, bandwidth: f64) -> Vec<f64> {
    (0..band_count)
        .map(|i| a_weighting(i as f64 * bandwidth))
        .collect()
}

/// Geometrically spaced band edges covering `[start, end]`.
///
/// Each upper edge is the previous one times a constant ratio. The next lower
/// edge continues from the unclamped value; the last upper edge is pinned to
/// `end`. A zero start frequency has no finite ratio, so the first band is
/// then the single bin `[0, bandwidth]` and the geometric run starts there.
fn build_bands(config: &PipelineConfig) -> (Vec<Band>, f64) {
    let end = config.end_frequency;
    let count = config.out_bands as usize;
    let mut bands = Vec::with_capacity(count);

    let (mut lower, geometric) = if config.start_frequency > 0.0 {
        (config.start_frequency, count)
    } else if count == 1 {
        bands.push(Band {
            lower_frequency: 0.0,
            upper_frequency: end,
        });
        return (bands, 1.0);
    } else {
        let first_upper = config.bandwidth();
        bands.push(Band {
            lower_frequency: 0.0,
            upper_frequency: first_upper,
        });
        (first_upper, count - 1)
    };

    let ratio = 2f64.powf((end / lower).log2() / geometric as f64);

    for _ in 0..geometric {
        let upper = lower * ratio;
        bands.push(Band {
            lower_frequency: lower,
            upper_frequency: upper.min(end),
        });
        lower = upper;
    }

    if let Some(last) = bands.last_mut() {
        last.upper_frequency = end;
    }

    (bands, ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KernelWindow;

    fn band_config(start: f64, end: f64, count: u32) -> PipelineConfig {
        PipelineConfig {
            start_frequency: start,
            end_frequency: end,
            out_bands: count,
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_gaussian_peak_at_mu() {
        assert_eq!(gaussian(0.0, 1.0, 0.0), 1.0);
        assert_eq!(gaussian(3.0, 2.0, 3.0), 1.0);
        assert!((gaussian(1.0, 1.0, 0.0) - (-0.5f64).exp()).abs() < 1e-12);
        assert_eq!(gaussian(-2.0, 1.0, 0.0), gaussian(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_kernel_length_and_symmetry() {
        for radius in 0..6 {
            let params = GaussianParams {
                mu: 0.7,
                sigma: 1.3,
                radius,
                window: KernelWindow::Full,
            };
            let kernel = build_kernel(&params);
            assert_eq!(kernel.len(), 2 * radius as usize + 1);
            for i in 0..kernel.len() {
                assert_eq!(kernel[i], kernel[kernel.len() - 1 - i]);
            }
            assert!(kernel.iter().sum::<f64>() > 0.0);
        }
    }

    #[test]
    fn test_kernel_values() {
        let kernel = build_kernel(&GaussianParams::default());
        let e_half = (-0.5f64).exp();
        let e_two = (-2.0f64).exp();
        let expected = [e_two, e_half, 1.0, e_half, e_two];
        for (got, want) in kernel.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_a_weighting_reference_points() {
        assert_eq!(a_weighting(0.0), 0.0);
        assert!((a_weighting(1000.0) - 1.0).abs() < 0.01);
        // -19.1 dB at 100 Hz, -50.5 dB at 20 Hz
        let db = |f: f64| 20.0 * a_weighting(f).log10();
        assert!((db(100.0) + 19.1).abs() < 0.2, "100 Hz: {} dB", db(100.0));
        assert!((db(20.0) + 50.5).abs() < 0.5, "20 Hz: {} dB", db(20.0));
        assert!(a_weighting(20000.0) < a_weighting(10000.0));
    }

    #[test]
    fn test_a_weight_table_peaks_near_2500hz() {
        let config = PipelineConfig::default();
        let weights = build_a_weights(config.band_count(), config.bandwidth());
        assert_eq!(weights.len(), 512);
        assert!(weights[0] < 1e-6);

        let (peak_bin, peak) = weights
            .iter()
            .enumerate()
            .fold((0, 0.0), |acc, (i, &w)| if w > acc.1 { (i, w) } else { acc });
        let peak_freq = peak_bin as f64 * config.bandwidth();
        assert!(
            (2000.0..3200.0).contains(&peak_freq),
            "peak at {peak_freq} Hz"
        );
        assert!(peak > 1.0 && peak < 1.3);
    }

    #[test]
    fn test_bands_cover_range_geometrically() {
        let (bands, ratio) = build_bands(&band_config(100.0, 8000.0, 8));
        assert_eq!(bands.len(), 8);
        assert_eq!(bands[0].lower_frequency, 100.0);
        assert_eq!(bands[7].upper_frequency, 8000.0);
        assert!((ratio - 80f64.powf(1.0 / 8.0)).abs() < 1e-12);

        for pair in bands.windows(2) {
            assert_eq!(pair[0].upper_frequency, pair[1].lower_frequency);
            assert!(pair[0].lower_frequency < pair[1].lower_frequency);
        }
        for band in &bands[..7] {
            let r = band.upper_frequency / band.lower_frequency;
            assert!((r - ratio).abs() < 1e-9);
        }
    }

    #[test]
    fn test_octave_bands() {
        let (bands, ratio) = build_bands(&band_config(125.0, 8000.0, 6));
        assert!((ratio - 2.0).abs() < 1e-12);
        let edges: Vec<f64> = bands.iter().map(|b| b.lower_frequency).collect();
        for (got, want) in edges.iter().zip([125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0]) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_start_opens_with_one_bin() {
        let config = PipelineConfig::default();
        let (bands, _) = build_bands(&config);
        assert_eq!(bands.len(), 81);
        assert_eq!(bands[0].lower_frequency, 0.0);
        assert_eq!(bands[0].upper_frequency, config.bandwidth());
        assert_eq!(bands[1].lower_frequency, config.bandwidth());
        assert_eq!(bands[80].upper_frequency, 10000.0);
        assert!(bands
            .iter()
            .all(|b| b.lower_frequency.is_finite() && b.upper_frequency.is_finite()));
        for pair in bands.windows(2) {
            assert_eq!(pair[0].upper_frequency, pair[1].lower_frequency);
        }
    }

    #[test]
    fn test_zero_start_single_band() {
        let (bands, _) = build_bands(&band_config(0.0, 5000.0, 1));
        assert_eq!(
            bands,
            vec![Band {
                lower_frequency: 0.0,
                upper_frequency: 5000.0
            }]
        );
    }

    #[test]
    fn test_build_validates() {
        let config = PipelineConfig {
            out_bands: 0,
            ..PipelineConfig::default()
        };
        assert_eq!(
            CoefficientTables::build(&config).unwrap_err(),
            ConfigError::NoOutputBands
        );
    }

    #[test]
    fn test_tables_sizes() {
        let tables = CoefficientTables::new(&PipelineConfig::default());
        assert_eq!(tables.kernel().len(), 5);
        assert_eq!(tables.a_weights().len(), 512);
        assert_eq!(tables.bands().len(), 81);
        let sum: f64 = tables.kernel().iter().sum();
        assert_eq!(tables.kernel_sum(), sum);
    }
}

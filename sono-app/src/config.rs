//! Demo configuration
//!
//! Settings come from an optional `key=value` file followed by `key=value`
//! command-line overrides. Lines starting with `#` and blank lines are
//! skipped, unknown keys are ignored with a warning.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use sono_analysis::{KernelWindow, PipelineConfig};

use crate::signal::Signal;

/// Everything the demo needs to run
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub signal: Signal,
    /// Number of frames to synthesize and analyze
    pub frames: usize,
    /// Frequency for [`Signal::Tone`]
    pub tone_hz: f64,
    /// Amplitude of the synthesized signal (0.0 - 1.0)
    pub amplitude: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            signal: Signal::Sweep,
            frames: 120,
            tone_hz: 1000.0,
            amplitude: 0.5,
        }
    }
}

impl AppConfig {
    /// Build from command-line arguments.
    ///
    /// `config=<path>` loads a file before the remaining overrides apply.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        let mut config = Self::default();

        for arg in &args {
            if let Some(path) = arg.strip_prefix("config=") {
                config.load_from(Path::new(path.trim()))?;
            }
        }

        for arg in args.iter().filter(|a| !a.starts_with("config=")) {
            let Some((key, value)) = arg.split_once('=') else {
                bail!("expected key=value, got '{arg}'");
            };
            config.set(key.trim(), value.trim())?;
        }

        Ok(config)
    }

    /// Apply settings from a file
    pub fn load_from(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        self.apply(&content)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Apply settings from `key=value` text
    pub fn apply(&mut self, content: &str) -> Result<()> {
        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                bail!("line {}: expected key=value", number + 1);
            };
            self.set(key.trim(), value.trim())
                .with_context(|| format!("line {}", number + 1))?;
        }
        Ok(())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let pipeline = &mut self.pipeline;
        match key {
            "sample_rate" => pipeline.sample_rate = parse(key, value)?,
            "fft_size" => pipeline.fft_size = parse(key, value)?,
            "start_frequency" => pipeline.start_frequency = parse(key, value)?,
            "end_frequency" => pipeline.end_frequency = parse(key, value)?,
            "out_bands" => pipeline.out_bands = parse(key, value)?,
            "gaussian_mu" => pipeline.gaussian.mu = parse(key, value)?,
            "gaussian_sigma" => pipeline.gaussian.sigma = parse(key, value)?,
            "filter_radius" => pipeline.gaussian.radius = parse(key, value)?,
            "kernel_window" => {
                pipeline.gaussian.window = match value {
                    "full" => KernelWindow::Full,
                    "truncated" => KernelWindow::Truncated,
                    _ => bail!("kernel_window must be 'full' or 'truncated', got '{value}'"),
                }
            }
            "temporal_weighting" => pipeline.temporal_weighting = parse(key, value)?,
            "a_weighting" => pipeline.a_weighting = parse(key, value)?,
            "signal" => self.signal = value.parse()?,
            "frames" => self.frames = parse(key, value)?,
            "tone_hz" => self.tone_hz = parse(key, value)?,
            "amplitude" => self.amplitude = parse(key, value)?,
            _ => tracing::warn!(key, "ignoring unknown config key"),
        }
        Ok(())
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("invalid value '{value}' for {key}"))
}

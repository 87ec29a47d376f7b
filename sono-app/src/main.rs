//! sono - terminal sound level meter demo
//!
//! Synthesizes a test signal, runs it through the FFT front-end and the
//! sound level pipeline, and prints one bar-graph line per frame.
//!
//! Usage: `sono [config=<file>] [key=value ...]`

mod config;
mod display;
mod signal;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use sono_analysis::{band_levels_db, MagnitudeAnalyzer, Pipeline};

use config::AppConfig;
use display::{format_frequency, render_line};
use signal::SignalGenerator;

fn main() -> Result<()> {
    // Bars go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_args(std::env::args().skip(1))?;
    run(&config)
}

fn run(config: &AppConfig) -> Result<()> {
    let mut pipeline =
        Pipeline::new(config.pipeline.clone()).context("invalid pipeline configuration")?;
    let fft_size = config.pipeline.fft_size as usize;
    let mut analyzer = MagnitudeAnalyzer::new(fft_size);
    let mut generator = SignalGenerator::new(
        config.signal,
        config.pipeline.sample_rate,
        config.amplitude,
        config.tone_hz,
        config.pipeline.end_frequency,
        config.frames,
    );

    tracing::info!(
        signal = %config.signal,
        frames = config.frames,
        bands = pipeline.bands().len(),
        bandwidth = pipeline.bandwidth(),
        "starting analysis"
    );

    let mut block = vec![0.0; fft_size];
    let mut frame = Vec::with_capacity(pipeline.band_count());
    let mut values = Vec::with_capacity(pipeline.bands().len());
    let mut loudest: Option<(usize, f64)> = None;

    for index in 0..config.frames {
        let frequency = generator.current_frequency();
        generator.next_block(&mut block);
        analyzer.analyze_into(&block, &mut frame);
        pipeline.process_into(&frame, &mut values)?;

        let levels = band_levels_db(&values);
        println!("{}", render_line(&levels));

        if let Some((band, level)) = peak(&levels) {
            tracing::debug!(
                frame = index,
                input_hz = ?frequency,
                peak_band = band,
                peak_db = level,
                "frame analyzed"
            );
            if loudest.map_or(true, |(_, best)| level > best) {
                loudest = Some((band, level));
            }
        }
    }

    match loudest {
        Some((band, level)) => {
            let edges = pipeline.bands()[band];
            tracing::info!(
                "loudest band {} ({} - {} Hz) at {:.1} dB",
                band,
                format_frequency(edges.lower_frequency),
                format_frequency(edges.upper_frequency),
                level
            );
        }
        None => tracing::info!("no frames analyzed"),
    }

    Ok(())
}

/// Index and level of the loudest band
fn peak(levels_db: &[f64]) -> Option<(usize, f64)> {
    levels_db
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
}

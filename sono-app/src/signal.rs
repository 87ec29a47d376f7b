//! Test signal synthesis

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use anyhow::bail;

/// Lowest frequency of the sweep
const SWEEP_START_HZ: f64 = 50.0;

/// Kind of synthesized input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Exponential sine sweep from 50 Hz up to the end frequency
    Sweep,
    /// Fixed sine tone
    Tone,
    /// White noise
    Noise,
    Silence,
}

impl FromStr for Signal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sweep" => Ok(Self::Sweep),
            "tone" => Ok(Self::Tone),
            "noise" => Ok(Self::Noise),
            "silence" => Ok(Self::Silence),
            _ => bail!("unknown signal '{s}' (expected sweep, tone, noise or silence)"),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sweep => "sweep",
            Self::Tone => "tone",
            Self::Noise => "noise",
            Self::Silence => "silence",
        };
        f.write_str(name)
    }
}

/// Produces consecutive blocks of a [`Signal`] with continuous phase
pub struct SignalGenerator {
    signal: Signal,
    sample_rate: f64,
    amplitude: f64,
    tone_hz: f64,
    sweep_end_hz: f64,
    total_blocks: usize,
    block: usize,
    phase: f64,
    noise_state: u32,
}

impl SignalGenerator {
    pub fn new(
        signal: Signal,
        sample_rate: f64,
        amplitude: f64,
        tone_hz: f64,
        sweep_end_hz: f64,
        total_blocks: usize,
    ) -> Self {
        Self {
            signal,
            sample_rate,
            amplitude,
            tone_hz,
            sweep_end_hz: sweep_end_hz.max(SWEEP_START_HZ),
            total_blocks: total_blocks.max(1),
            block: 0,
            phase: 0.0,
            noise_state: 0x1234_5678,
        }
    }

    /// Frequency played during the current block
    pub fn current_frequency(&self) -> Option<f64> {
        match self.signal {
            Signal::Tone => Some(self.tone_hz),
            Signal::Sweep => {
                let t = self.block as f64 / self.total_blocks as f64;
                Some(SWEEP_START_HZ * (self.sweep_end_hz / SWEEP_START_HZ).powf(t))
            }
            Signal::Noise | Signal::Silence => None,
        }
    }

    /// Fill `out` with the next block
    pub fn next_block(&mut self, out: &mut [f64]) {
        match self.current_frequency() {
            Some(freq) => {
                let step = 2.0 * PI * freq / self.sample_rate;
                for sample in out.iter_mut() {
                    *sample = self.amplitude * self.phase.sin();
                    self.phase = (self.phase + step) % (2.0 * PI);
                }
            }
            None if self.signal == Signal::Noise => {
                for sample in out.iter_mut() {
                    *sample = self.amplitude * self.next_noise();
                }
            }
            None => out.fill(0.0),
        }
        self.block += 1;
    }

    /// Xorshift noise in -1.0..1.0
    fn next_noise(&mut self) -> f64 {
        let mut x = self.noise_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.noise_state = x;
        (x as f64 / u32::MAX as f64) * 2.0 - 1.0
    }
}

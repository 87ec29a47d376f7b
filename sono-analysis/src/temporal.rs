//! Temporal (across-frame) moving average

/// Number of frames kept for the moving average
pub const HISTORY_DEPTH: usize = 5;

/// Fixed-capacity ring of frame copies
struct History {
    frames: [Vec<f64>; HISTORY_DEPTH],
    write_pos: usize,
    len: usize,
}

impl History {
    fn new(band_count: usize) -> Self {
        Self {
            frames: std::array::from_fn(|_| vec![0.0; band_count]),
            write_pos: 0,
            len: 0,
        }
    }

    /// Store a copy of `frame`, overwriting the oldest entry once full
    fn push(&mut self, frame: &[f64]) {
        self.frames[self.write_pos].copy_from_slice(frame);
        self.write_pos = (self.write_pos + 1) % HISTORY_DEPTH;
        if self.len < HISTORY_DEPTH {
            self.len += 1;
        }
    }

    fn is_full(&self) -> bool {
        self.len == HISTORY_DEPTH
    }

    fn clear(&mut self) {
        for frame in &mut self.frames {
            frame.fill(0.0);
        }
        self.write_pos = 0;
        self.len = 0;
    }
}

/// Averages each bin over the last [`HISTORY_DEPTH`] frames.
///
/// While the history is filling up, frames are recorded and passed through
/// untouched. Averaging starts on the call after the history became full,
/// i.e. the sixth call on a fresh averager.
pub struct TemporalAverager {
    history: History,
}

impl TemporalAverager {
    pub fn new(band_count: usize) -> Self {
        Self {
            history: History::new(band_count),
        }
    }

    /// Record `frame` and, once warmed up, replace it with the moving average.
    ///
    /// Returns `true` if the frame was averaged.
    pub fn smooth(&mut self, frame: &mut [f64]) -> bool {
        let warmed_up = self.history.is_full();
        self.history.push(frame);
        if !warmed_up {
            return false;
        }

        let scale = HISTORY_DEPTH as f64;
        for (i, out) in frame.iter_mut().enumerate() {
            *out = self
                .history
                .frames
                .iter()
                .map(|past| past[i] / scale)
                .sum();
        }
        true
    }

    /// Number of frames currently held
    pub fn depth(&self) -> usize {
        self.history.len
    }

    /// Whether the next call will average
    pub fn is_active(&self) -> bool {
        self.history.is_full()
    }

    /// Forget all recorded frames
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_five_calls_pass_through() {
        let mut averager = TemporalAverager::new(3);
        for call in 1..=5 {
            let input = vec![call as f64, 10.0 * call as f64, 0.5];
            let mut frame = input.clone();
            assert!(!averager.smooth(&mut frame), "call {call} averaged");
            assert_eq!(frame, input, "call {call} modified the frame");
            assert_eq!(averager.depth(), call);
        }
        assert!(averager.is_active());
    }

    #[test]
    fn test_sixth_call_averages_last_five() {
        let mut averager = TemporalAverager::new(2);
        for call in 1..=5 {
            let mut frame = vec![call as f64, 0.0];
            averager.smooth(&mut frame);
        }

        // History is now {2, 3, 4, 5, 6}
        let mut frame = vec![6.0, 1.0];
        assert!(averager.smooth(&mut frame));
        assert!((frame[0] - 4.0).abs() < 1e-12, "got {}", frame[0]);
        assert!((frame[1] - 0.2).abs() < 1e-12);
        assert_eq!(averager.depth(), HISTORY_DEPTH);

        // {3, 4, 5, 6, 7}
        let mut frame = vec![7.0, 0.0];
        assert!(averager.smooth(&mut frame));
        assert!((frame[0] - 5.0).abs() < 1e-12);
        assert!((frame[1] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_history_stores_raw_frames_not_averages() {
        let mut averager = TemporalAverager::new(1);
        for _ in 0..5 {
            averager.smooth(&mut [0.0]);
        }
        for _ in 0..5 {
            averager.smooth(&mut [5.0]);
        }
        // Five raw 5.0 frames in history, regardless of earlier outputs
        let mut frame = [5.0];
        averager.smooth(&mut frame);
        assert!((frame[0] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset_restarts_warm_up() {
        let mut averager = TemporalAverager::new(1);
        for _ in 0..7 {
            averager.smooth(&mut [1.0]);
        }
        averager.reset();
        assert_eq!(averager.depth(), 0);
        assert!(!averager.is_active());

        let mut frame = [9.0];
        assert!(!averager.smooth(&mut frame));
        assert_eq!(frame, [9.0]);
    }
}

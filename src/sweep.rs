use crate::data::MAX_SAMPLES;
use crate::error::{Error, Result};
use std::f64::consts::PI;

// Keeps a little headroom below full scale
const AMPLITUDE: f64 = 0.99 * i16::MAX as f64;

/// Linear sine sweep, yields samples in the 16 bit range.
#[derive(Debug, Clone)]
pub struct Sweep {
    sample_rate: f64,
    start_hz: f64,
    delta_hz: f64,
    len: usize,
    index: usize,
}

impl Sweep {
    /// Sweep from `start_hz` to `end_hz` over `duration_secs`, rounded up to whole samples.
    pub fn new(sample_rate: u32, start_hz: f64, end_hz: f64, duration_secs: f64) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidSweep("sample rate must be positive"));
        }

        if !start_hz.is_finite() || !end_hz.is_finite() {
            return Err(Error::InvalidSweep("frequencies must be finite"));
        }

        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(Error::InvalidSweep("duration must be a non-negative number"));
        }

        let len = (duration_secs * sample_rate as f64).ceil();

        if len > MAX_SAMPLES as f64 {
            return Err(Error::InvalidSweep("duration is too long for a wav file"));
        }

        let len = len as usize;

        Ok(Sweep {
            sample_rate: sample_rate as f64,
            start_hz,
            delta_hz: end_hz - start_hz,
            len,
            index: 0,
        })
    }

    fn sample(&self, i: usize) -> i32 {
        let i = i as f64;
        let hz = self.start_hz + self.delta_hz * (i / self.len as f64);
        let v = (2.0 * PI * i * hz / self.sample_rate).sin();

        // Truncates towards zero
        (v * AMPLITUDE) as i32
    }
}

impl Iterator for Sweep {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.index >= self.len {
            return None;
        }

        let sample = self.sample(self.index);
        self.index += 1;

        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Sweep {}

//! Turns one frame's planned path into a fixed-length run of normalized
//! beam positions.

use crate::pixel_extractor::Point;

/// One instant of beam position. Channel 1 carries `x` (the pixel row),
/// channel 2 carries `y` (the pixel column), both divided by the configured
/// coordinate maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Normalized row coordinate.
    pub x: f32,
    /// Normalized column coordinate.
    pub y: f32,
}

/// Per-frame sample generator. Holds the timing and normalization settings
/// for the frame being encoded, plus the resolved parked-beam coordinate.
#[derive(Debug, Clone)]
pub struct SampleEncoder {
    sample_count: usize,
    point_repeat: usize,
    max_val: f64,
    fallback: (f64, f64),
}

impl SampleEncoder {
    /// Builds an encoder. `point_repeat` must be at least 1 and `max_val`
    /// positive; both are enforced upstream by config validation.
    pub fn new(
        sample_count: usize,
        point_repeat: usize,
        max_val: f64,
        fallback: (f64, f64),
    ) -> Self {
        SampleEncoder {
            sample_count,
            point_repeat,
            max_val,
            fallback,
        }
    }

    /// Emits exactly `sample_count` samples for the given path.
    ///
    /// Sample `t` draws the path position `(t / point_repeat) % path.len()`,
    /// so each position is held for `point_repeat` consecutive samples. An
    /// empty path parks the beam on the fallback coordinate for the whole
    /// frame instead of failing.
    ///
    /// Coordinates are divided by `max_val` and NOT clamped: callers must
    /// pass the true coordinate maximum, or out-of-range values propagate
    /// into the waveform.
    pub fn encode(&self, points: &[Point], path: &[usize]) -> Vec<Sample> {
        if path.is_empty() {
            let parked = Sample {
                x: (self.fallback.0 / self.max_val) as f32,
                y: (self.fallback.1 / self.max_val) as f32,
            };
            return vec![parked; self.sample_count];
        }

        let mut samples = Vec::with_capacity(self.sample_count);
        for t in 0..self.sample_count {
            let position = (t / self.point_repeat) % path.len();
            let point = points[path[position]];
            samples.push(Sample {
                x: (f64::from(point.row) / self.max_val) as f32,
                y: (f64::from(point.col) / self.max_val) as f32,
            });
        }
        samples
    }
}

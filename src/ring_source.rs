//! A synthetic frame source that needs no files on disk: a white ring whose
//! radius pulses through one cosine cycle over the animation. Useful for
//! demoing the converter (`scopetrace synth`) and for exercising the whole
//! pipeline in tests. With `noise` at zero the frames are fully
//! deterministic; a non-zero noise probability speckles random pixels ON.

use crate::frame_source::{Frame, FrameError, FrameSource};

use rand::prelude::*;
use std::f64::consts::TAU;

/// Generates `frames` square frames of `size`×`size` pixels.
pub struct RingSource {
    size: u32,
    total: usize,
    emitted: usize,
    radius_min: f64,
    radius_max: f64,
    noise: f64,
}

impl RingSource {
    /// A ring animation on a `size`×`size` canvas lasting `frames` frames,
    /// sweeping between 30% and 80% of the half-canvas by default.
    pub fn new(size: u32, frames: usize) -> Self {
        let half = f64::from(size) / 2.0;
        RingSource {
            size,
            total: frames,
            emitted: 0,
            radius_min: half * 0.3,
            radius_max: half * 0.8,
            noise: 0.0,
        }
    }

    /// Overrides the radius sweep, in pixels.
    pub fn radius_sweep(mut self, min: f64, max: f64) -> Self {
        self.radius_min = min;
        self.radius_max = max;
        self
    }

    /// Probability, per pixel and frame, of speckle noise turning a pixel ON.
    pub fn noise(mut self, probability: f64) -> Self {
        self.noise = probability.clamp(0.0, 1.0);
        self
    }

    fn render(&self, tick: usize) -> Result<Frame, FrameError> {
        let phase = if self.total <= 1 {
            0.0
        } else {
            tick as f64 / self.total as f64 * TAU
        };
        let radius = self.radius_min + (self.radius_max - self.radius_min) * (0.5 - 0.5 * phase.cos());
        ring_frame(self.size, radius, self.noise)
    }
}

fn set_white(data: &mut [u8], size: u32, row: u32, col: u32) {
    let idx = ((row * size + col) * 4) as usize;
    data[idx] = 255;
    data[idx + 1] = 255;
    data[idx + 2] = 255;
}

fn ring_frame(size: u32, radius: f64, noise: f64) -> Result<Frame, FrameError> {
    let mut data = vec![0u8; size as usize * size as usize * 4];
    for pixel in data.chunks_exact_mut(4) {
        pixel[3] = 255;
    }

    let center = f64::from(size) / 2.0;
    let steps = (radius * TAU).ceil().max(16.0) as usize;
    for k in 0..steps {
        let angle = k as f64 / steps as f64 * TAU;
        let row = center + radius * angle.sin();
        let col = center + radius * angle.cos();
        if (0.0..f64::from(size)).contains(&row) && (0.0..f64::from(size)).contains(&col) {
            set_white(&mut data, size, row as u32, col as u32);
        }
    }

    if noise > 0.0 {
        let mut rng = thread_rng();
        for pixel in 0..size * size {
            if rng.gen_bool(noise) {
                set_white(&mut data, size, pixel / size, pixel % size);
            }
        }
    }

    Frame::from_rgba(size, size, data)
}

impl Iterator for RingSource {
    type Item = Result<Frame, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.emitted == self.total {
            return None;
        }
        let frame = self.render(self.emitted);
        self.emitted += 1;
        Some(frame)
    }
}

impl FrameSource for RingSource {
    fn frame_count(&self) -> Option<usize> {
        Some(self.total - self.emitted)
    }
}

//! Wires the per-frame stages together: frames stream in from a
//! [`FrameSource`], a [`FrameConverter`] worker turns each one into its
//! sample run, and the results are assembled into the two-channel waveform.
//!
//! The converter runs on its own thread (fed over a channel, the same
//! arrangement every pipeline stage here uses), so decoding the next frame
//! overlaps with planning the current one. A single worker drains its input
//! in FIFO order, which is what guarantees the assembler sees frames in
//! their original sequence order. All frame-local data (point set, distance
//! matrix, path) lives and dies inside the worker.

use crate::component::{run_component, Component, ComponentError};
use crate::config::{ConversionConfig, ErrorPolicy};
use crate::distance_matrix::DistanceMatrix;
use crate::frame_source::{Frame, FrameError, FrameSource};
use crate::path_planner::plan_path;
use crate::pixel_extractor::extract_points;
use crate::sample_encoder::{Sample, SampleEncoder};
use crate::waveform_assembler::WaveformAssembler;

use log::{debug, info, warn};
use std::fmt;
use std::sync::mpsc::channel;

/// A fatal pipeline failure.
#[derive(Debug)]
pub enum PipelineError {
    /// A frame failed to decode or validate, under the fail-fast policy.
    Frame {
        /// Position of the offending frame in the source sequence.
        index: usize,
        /// What went wrong with it.
        source: FrameError,
    },
    /// The converter worker disappeared mid-run.
    WorkerExited,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::Frame { index, source } => {
                write!(f, "frame {index} failed: {source}")
            }
            PipelineError::WorkerExited => write!(f, "frame converter exited unexpectedly"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Frame { source, .. } => Some(source),
            PipelineError::WorkerExited => None,
        }
    }
}

/// The per-frame processing stage: threshold, distance matrix, path plan,
/// sample encoding. Stateless between frames apart from the shared config.
pub struct FrameConverter {
    config: ConversionConfig,
}

impl FrameConverter {
    /// A converter using the given (already validated) settings.
    pub fn new(config: ConversionConfig) -> Self {
        FrameConverter { config }
    }
}

impl Component for FrameConverter {
    type InData = (usize, Frame);
    type OutData = (usize, Vec<Sample>);

    fn convert(&mut self, (index, frame): (usize, Frame)) -> (usize, Vec<Sample>) {
        let points = extract_points(&frame, self.config.threshold);
        let matrix = DistanceMatrix::from_points(&points);
        let path = plan_path(&matrix);

        // parked-beam position: configured, or this frame's canvas midpoint
        let fallback = self.config.center_fallback.unwrap_or((
            f64::from(frame.height()) / 2.0,
            f64::from(frame.width()) / 2.0,
        ));
        let encoder = SampleEncoder::new(
            self.config.samples_per_frame(),
            self.config.point_repeat,
            self.config.max_val,
            fallback,
        );
        (index, encoder.encode(&points, &path))
    }

    fn finalize(&mut self) -> Result<(), ComponentError> {
        Ok(())
    }
}

impl fmt::Display for FrameConverter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FrameConverter")
    }
}

/// The outcome of a conversion run.
#[derive(Debug)]
pub struct Conversion {
    /// The assembled waveform: (channel 1, channel 2), equal lengths.
    pub channels: (Vec<f32>, Vec<f32>),
    /// Frames that contributed samples.
    pub frames_converted: usize,
    /// Frames skipped under the best-effort policy, with their errors.
    pub failed_frames: Vec<(usize, FrameError)>,
}

/// Runs the whole pipeline over `source` and returns the assembled
/// waveform.
///
/// Frame failures follow `config.error_policy`: fail-fast aborts on the
/// first bad frame (identified by index), best-effort logs it, records it
/// in the result and keeps going. A frame with no ON pixels is not a
/// failure; it contributes parked-beam samples.
pub fn convert<S: FrameSource>(
    source: S,
    config: &ConversionConfig,
) -> Result<Conversion, PipelineError> {
    if let Some(count) = source.frame_count() {
        info!(
            "converting {count} frames at {} samples per frame",
            config.samples_per_frame()
        );
    }

    let (frame_tx, frame_rx) = channel();
    let (sample_tx, sample_rx) = channel();
    let converter = Box::new(FrameConverter::new(config.clone()));
    let worker = run_component(converter, frame_rx, sample_tx);

    let mut failed_frames = Vec::new();
    let mut feed_error = None;
    for (index, frame) in source.enumerate() {
        match frame {
            Ok(frame) => {
                if frame_tx.send((index, frame)).is_err() {
                    feed_error = Some(PipelineError::WorkerExited);
                    break;
                }
            }
            Err(source) => match config.error_policy {
                ErrorPolicy::FailFast => {
                    feed_error = Some(PipelineError::Frame { index, source });
                    break;
                }
                ErrorPolicy::BestEffort => {
                    warn!("skipping frame {index}: {source}");
                    failed_frames.push((index, source));
                }
            },
        }
    }
    // closing the channel lets the worker drain and terminate
    drop(frame_tx);

    let mut assembler = WaveformAssembler::new();
    let mut frames_converted = 0;
    for (index, samples) in sample_rx {
        debug!("frame {index}: {} samples", samples.len());
        assembler.push_frame(&samples);
        frames_converted += 1;
    }

    if worker.join().is_err() {
        return Err(PipelineError::WorkerExited);
    }
    if let Some(error) = feed_error {
        return Err(error);
    }

    info!(
        "assembled {} samples per channel ({:.2} s)",
        assembler.len(),
        assembler.duration_secs(config.sample_rate)
    );

    Ok(Conversion {
        channels: assembler.into_channels(),
        frames_converted,
        failed_frames,
    })
}

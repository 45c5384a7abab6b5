//! A wrapper for the hound library that writes the assembled two-channel
//! waveform to the user-specified output file.

use crate::component::{Component, ComponentError};
use hound::{SampleFormat, WavSpec, WavWriter};

use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// The WavSpec every scopetrace output uses: two float channels at the
/// configured sample rate.
pub fn stereo_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    }
}

/// A sink wrapper for the hound WavWriter that writes out the finished
/// X-Y waveform.
pub struct HoundWriter {
    writer: Option<WavWriter<BufWriter<File>>>,
}

impl HoundWriter {
    /// Creates the output file and a HoundWriter around it.
    pub fn create(path: impl AsRef<Path>, spec: WavSpec) -> Result<Self, hound::Error> {
        let writer = WavWriter::create(path, spec)?;
        Ok(HoundWriter {
            writer: Some(writer),
        })
    }
}

impl Component for HoundWriter {
    type InData = (Vec<f32>, Vec<f32>);
    type OutData = Result<(), ComponentError>;

    /// Appends the channel pair to the output WAV file, interleaved, then
    /// flushes so the header stays consistent on disk.
    fn convert(&mut self, input: (Vec<f32>, Vec<f32>)) -> Result<(), ComponentError> {
        let (ch1, ch2) = input;
        let writer = self.writer.as_mut().ok_or(ComponentError::Finalized)?;

        for (x, y) in std::iter::zip(ch1, ch2) {
            writer.write_sample(x)?;
            writer.write_sample(y)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Closes out the WAV file. This happens automatically when the
    /// WavWriter is dropped, but calling this gives us controlled error
    /// checking.
    fn finalize(&mut self) -> Result<(), ComponentError> {
        match self.writer.take() {
            Some(writer) => writer.finalize().map_err(ComponentError::from),
            None => Ok(()),
        }
    }
}

impl fmt::Display for HoundWriter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "HoundWriter")
    }
}

//! The conversion settings, collected into one validated struct that is
//! built once at startup and passed by reference into the pipeline. The
//! on-disk representation is RON via serde, so a settings file can stand in
//! for (or be overridden by) command-line flags.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;

/// What the pipeline does when a frame fails to decode or validate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ErrorPolicy {
    /// Abort the run on the first failed frame. The explicit default.
    #[default]
    FailFast,
    /// Log and record the failure, skip the frame, keep converting.
    BestEffort,
}

/// All tunables of a conversion run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Luminance cutoff for ON/OFF pixel classification, 0-255.
    pub threshold: u8,
    /// Audio samples per second of the output waveform.
    pub sample_rate: u32,
    /// Seconds each frame occupies in the output waveform.
    pub frame_length: f64,
    /// Output samples held per path position; 1 advances every sample.
    pub point_repeat: usize,
    /// Normalization divisor mapping pixel coordinates to voltages. Must be
    /// the true coordinate maximum; values are not clamped downstream.
    pub max_val: f64,
    /// Beam position for frames with no ON pixels, in pixel coordinates.
    /// `None` parks the beam on the canvas midpoint of each frame.
    pub center_fallback: Option<(f64, f64)>,
    /// Frame failure handling for the whole run.
    pub error_policy: ErrorPolicy,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        ConversionConfig {
            threshold: 127,
            sample_rate: 44100,
            frame_length: 3.0 / 60.0,
            point_repeat: 1,
            max_val: 255.0,
            center_fallback: None,
            error_policy: ErrorPolicy::FailFast,
        }
    }
}

/// Invalid numeric configuration or a failure loading the settings file.
/// All of these are fatal at startup, before any frame is touched.
#[derive(Debug)]
pub enum ConfigError {
    /// `sample_rate` is zero.
    ZeroSampleRate,
    /// `frame_length` is not a positive finite number.
    BadFrameLength(f64),
    /// `point_repeat` is zero.
    ZeroPointRepeat,
    /// `max_val` is not a positive finite number.
    BadMaxVal(f64),
    /// `sample_rate * frame_length` truncates to zero samples per frame.
    ZeroSamplesPerFrame,
    /// The settings file could not be read.
    Io(std::io::Error),
    /// The settings file could not be parsed as RON.
    Ron(ron::de::SpannedError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ConfigError as CE;
        let msg = match self {
            CE::ZeroSampleRate => Cow::from("sample_rate must be positive"),
            CE::BadFrameLength(v) => Cow::from(format!(
                "frame_length must be a positive finite number of seconds, got {v}"
            )),
            CE::ZeroPointRepeat => Cow::from("point_repeat must be at least 1"),
            CE::BadMaxVal(v) => Cow::from(format!("max_val must be positive and finite, got {v}")),
            CE::ZeroSamplesPerFrame => {
                Cow::from("sample_rate * frame_length yields zero samples per frame")
            }
            CE::Io(error) => Cow::from(format!("could not read settings file: {error}")),
            CE::Ron(error) => Cow::from(format!("could not parse settings file: {error}")),
        };

        write!(f, "{msg}")
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::Io(error)
    }
}

impl From<ron::de::SpannedError> for ConfigError {
    fn from(error: ron::de::SpannedError) -> Self {
        ConfigError::Ron(error)
    }
}

impl ConversionConfig {
    /// Loads a config from a RON settings file. Fields absent from the file
    /// keep their defaults. The result is not yet validated.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }

    /// Checks every numeric field, so the pipeline can assume a sane config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if !self.frame_length.is_finite() || self.frame_length <= 0.0 {
            return Err(ConfigError::BadFrameLength(self.frame_length));
        }
        if self.point_repeat == 0 {
            return Err(ConfigError::ZeroPointRepeat);
        }
        if !self.max_val.is_finite() || self.max_val <= 0.0 {
            return Err(ConfigError::BadMaxVal(self.max_val));
        }
        if self.samples_per_frame() == 0 {
            return Err(ConfigError::ZeroSamplesPerFrame);
        }
        Ok(())
    }

    /// How many output samples each frame occupies, truncating toward zero.
    pub fn samples_per_frame(&self) -> usize {
        (f64::from(self.sample_rate) * self.frame_length) as usize
    }
}

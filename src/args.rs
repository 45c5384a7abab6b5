// Commandline argument parser using clap for scopetrace

use crate::config::{ConversionConfig, ErrorPolicy};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level command line of the scopetrace converter.
#[derive(Debug, Parser, Clone)]
#[clap(version, about)]
pub struct ScopeArgs {
    /// Which task to perform, converting frames on disk or rendering the
    /// built-in demo animation
    #[command(subcommand)]
    pub command: CommandTask,
}

/// The available subcommands.
#[derive(Debug, Subcommand, Clone)]
pub enum CommandTask {
    /// Convert a directory of PNG frames into an X-Y oscilloscope WAV
    #[command(about)]
    Convert(ConvertCommand),

    /// Render the built-in ring animation straight to an X-Y WAV
    #[command(about)]
    Synth(SynthCommand),
}

/// Arguments of the `convert` subcommand.
#[derive(Debug, Args, Clone)]
#[command(version, about)]
pub struct ConvertCommand {
    /// Directory holding the animation frames, one PNG per frame
    #[arg(short = 'd', long = "dir")]
    pub frame_dir: PathBuf,

    /// Filename for the stereo waveform to be written to
    #[arg(short = 'o', long = "out")]
    pub outfile: PathBuf,

    /// Optional RON settings file; the flags below override its values
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Waveform tunables shared by both subcommands
    #[command(flatten)]
    pub wave: WaveOpts,
}

/// Arguments of the `synth` subcommand.
#[derive(Debug, Args, Clone)]
#[command(version, about)]
pub struct SynthCommand {
    /// Filename for the stereo waveform to be written to
    #[arg(short = 'o', long = "out")]
    pub outfile: PathBuf,

    /// Number of demo frames to render
    #[arg(short = 'n', long = "frames", default_value_t = 120)]
    pub frames: usize,

    /// Canvas edge length in pixels
    #[arg(long = "size", default_value_t = 64)]
    pub size: u32,

    /// Per-pixel probability of speckle noise in each frame
    #[arg(long = "noise", default_value_t = 0.0)]
    pub noise: f64,

    /// Waveform tunables shared by both subcommands
    #[command(flatten)]
    pub wave: WaveOpts,
}

/// Optional overrides for every [`ConversionConfig`] field. Unset flags
/// leave the config (defaults or settings file) untouched.
#[derive(Debug, Args, Clone, Default)]
pub struct WaveOpts {
    /// Sample rate of the output file, in samples per second. Will often be 44100
    #[arg(short = 's', long = "samp")]
    pub sample_rate: Option<u32>,

    /// Seconds each frame occupies in the output waveform
    #[arg(short = 'l', long = "frame-length")]
    pub frame_length: Option<f64>,

    /// Luminance cutoff for ON pixels, 0-255
    #[arg(short = 't', long = "threshold")]
    pub threshold: Option<u8>,

    /// Number of output samples held per path position
    #[arg(short = 'r', long = "repeat")]
    pub point_repeat: Option<usize>,

    /// Normalization divisor for pixel coordinates
    #[arg(short = 'm', long = "max-val")]
    pub max_val: Option<f64>,

    /// Beam parking coordinate for blank frames
    #[arg(long = "center", num_args = 2, value_names = ["ROW", "COL"])]
    pub center: Option<Vec<f64>>,

    /// Keep converting when a frame fails, instead of aborting the run
    #[arg(long = "best-effort")]
    pub best_effort: bool,
}

impl WaveOpts {
    /// Applies the set flags on top of `config`.
    pub fn apply(&self, config: &mut ConversionConfig) {
        if let Some(sample_rate) = self.sample_rate {
            config.sample_rate = sample_rate;
        }
        if let Some(frame_length) = self.frame_length {
            config.frame_length = frame_length;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(point_repeat) = self.point_repeat {
            config.point_repeat = point_repeat;
        }
        if let Some(max_val) = self.max_val {
            config.max_val = max_val;
        }
        if let Some(center) = &self.center {
            // clap's num_args = 2 guarantees exactly two values
            config.center_fallback = Some((center[0], center[1]));
        }
        if self.best_effort {
            config.error_policy = ErrorPolicy::BestEffort;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_flags_override_the_config() {
        let args = ScopeArgs::try_parse_from([
            "scopetrace",
            "convert",
            "--dir",
            "frames",
            "--out",
            "out.wav",
            "--samp",
            "22050",
            "--threshold",
            "90",
            "--center",
            "32",
            "32",
            "--best-effort",
        ])
        .unwrap();

        let CommandTask::Convert(cmd) = args.command else {
            panic!("expected the convert subcommand");
        };
        let mut config = ConversionConfig::default();
        cmd.wave.apply(&mut config);

        assert_eq!(config.sample_rate, 22050);
        assert_eq!(config.threshold, 90);
        assert_eq!(config.center_fallback, Some((32.0, 32.0)));
        assert_eq!(config.error_policy, ErrorPolicy::BestEffort);
        // untouched fields keep their defaults
        assert_eq!(config.point_repeat, 1);
    }

    #[test]
    fn unset_flags_leave_the_config_alone() {
        let config_before = ConversionConfig::default();
        let mut config = config_before.clone();
        WaveOpts::default().apply(&mut config);
        assert_eq!(config, config_before);
    }

    #[test]
    fn synth_defaults() {
        let args =
            ScopeArgs::try_parse_from(["scopetrace", "synth", "--out", "demo.wav"]).unwrap();
        let CommandTask::Synth(cmd) = args.command else {
            panic!("expected the synth subcommand");
        };
        assert_eq!(cmd.frames, 120);
        assert_eq!(cmd.size, 64);
        assert_eq!(cmd.noise, 0.0);
    }
}

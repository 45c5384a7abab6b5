//! Command-line entry point: picks a frame source, runs the conversion
//! pipeline, and writes the stereo WAV.

use clap::Parser;
use log::{error, info, warn};
use scopetrace::{
    args::{CommandTask, ConvertCommand, ScopeArgs, SynthCommand},
    component::Component,
    config::ConversionConfig,
    frame_source::FrameSource,
    hound_writer::{stereo_spec, HoundWriter},
    pipeline,
    png_source::DirectorySource,
    ring_source::RingSource,
};
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

// Example:
// RUST_LOG=info scopetrace convert --dir frames/ --out ring_animation.wav
//                                  --samp 44100 --frame-length 0.05

fn main() -> ExitCode {
    env_logger::init();
    let args = ScopeArgs::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: ScopeArgs) -> Result<(), Box<dyn Error>> {
    match args.command {
        CommandTask::Convert(cmd) => convert_directory(cmd),
        CommandTask::Synth(cmd) => synth_demo(cmd),
    }
}

fn convert_directory(cmd: ConvertCommand) -> Result<(), Box<dyn Error>> {
    let mut config = match &cmd.config {
        Some(path) => ConversionConfig::from_path(path)?,
        None => ConversionConfig::default(),
    };
    cmd.wave.apply(&mut config);
    config.validate()?;

    let source = DirectorySource::new(&cmd.frame_dir)?;
    write_waveform(source, &config, &cmd.outfile)
}

fn synth_demo(cmd: SynthCommand) -> Result<(), Box<dyn Error>> {
    let mut config = ConversionConfig::default();
    // the demo ring lives on its own canvas, so normalize by that instead
    // of the image-brightness default
    config.max_val = f64::from(cmd.size.max(1));
    cmd.wave.apply(&mut config);
    config.validate()?;

    let source = RingSource::new(cmd.size, cmd.frames).noise(cmd.noise);
    write_waveform(source, &config, &cmd.outfile)
}

fn write_waveform<S: FrameSource>(
    source: S,
    config: &ConversionConfig,
    outfile: &Path,
) -> Result<(), Box<dyn Error>> {
    let conversion = pipeline::convert(source, config)?;
    for (index, err) in &conversion.failed_frames {
        warn!("frame {index} was skipped: {err}");
    }

    let samples = conversion.channels.0.len();
    let mut writer = HoundWriter::create(outfile, stereo_spec(config.sample_rate))?;
    writer.convert(conversion.channels)?;
    writer.finalize()?;

    info!(
        "wrote {} frames as {} samples per channel ({:.2} s) to {}",
        conversion.frames_converted,
        samples,
        samples as f64 / f64::from(config.sample_rate),
        outfile.display()
    );
    Ok(())
}

//! Synthetic capture generation command.

use super::common::load_settings;
use clap::Args;
use narrowband_core::{CaptureSource, Tone, ToneSource};
use narrowband_io::write_adc;
use std::path::{Path, PathBuf};

/// Write a synthetic multi-tone capture.
#[derive(Args)]
pub struct GenerateArgs {
    /// Output .adc file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Samples per channel
    #[arg(long, default_value = "16384")]
    samples: usize,

    /// Tone frequency in cycles per record, one per channel (repeats if fewer)
    #[arg(long, value_name = "C", default_values_t = [1001.0])]
    cycles: Vec<f64>,

    /// Peak amplitude in codes (default: 90% of full scale)
    #[arg(long)]
    amplitude: Option<f64>,

    /// Add a harmonic of each tone as ORDER:AMPLITUDE (repeatable)
    #[arg(long, value_name = "ORDER:AMP", value_parser = parse_harmonic)]
    harmonic: Vec<(usize, f64)>,

    /// Gaussian noise RMS in codes
    #[arg(long, default_value = "0.0")]
    noise: f64,

    /// Noise generator seed
    #[arg(long)]
    seed: Option<u32>,

    /// Number of channels (default: from settings)
    #[arg(long)]
    channels: Option<usize>,
}

fn parse_harmonic(s: &str) -> Result<(usize, f64), String> {
    let (order, amplitude) = s
        .split_once(':')
        .ok_or_else(|| format!("Invalid harmonic '{s}' (expected ORDER:AMPLITUDE)"))?;
    let order: usize = order
        .parse()
        .map_err(|_| format!("Invalid harmonic order '{order}'"))?;
    if order < 2 {
        return Err(format!("Harmonic order must be at least 2, got {order}"));
    }
    let amplitude: f64 = amplitude
        .parse()
        .map_err(|_| format!("Invalid harmonic amplitude '{amplitude}'"))?;
    Ok((order, amplitude))
}

/// Run the generate command.
pub fn run(args: GenerateArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let settings = load_settings(config)?;
    let mut adc = settings.adc;
    if let Some(channels) = args.channels {
        adc.num_channels = channels;
    }
    if args.samples == 0 {
        anyhow::bail!("--samples must be at least 1");
    }

    let amplitude = args
        .amplitude
        .unwrap_or(0.9 * adc.full_scale_amplitude());

    let mut source = ToneSource::new(adc.clone()).with_noise(args.noise);
    for &cycles in &args.cycles {
        source = source.with_tone(Tone::cycles(cycles, args.samples, amplitude));
    }
    for &(order, level) in &args.harmonic {
        source = source.with_harmonic(order, level);
    }
    if let Some(seed) = args.seed {
        source = source.with_seed(seed);
    }

    let capture = source.capture(args.samples)?;
    write_adc(&args.output, &capture, source.config())?;

    println!(
        "Generated {} channel(s) x {} samples ({} bits, {} MHz)",
        capture.num_channels(),
        capture.num_samples(),
        adc.bits,
        adc.sample_rate_mhz
    );
    println!("Saved to {}", args.output.display());
    Ok(())
}

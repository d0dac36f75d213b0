//! Batch spectrum export command.

use super::common::{load_capture, load_settings, resolve_bits, resolve_window};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use narrowband_analysis::{WindowKind, analyze_capture};
use narrowband_io::{fft_path_for, write_fft};
use std::path::{Path, PathBuf};

/// Compute dBFS spectra for `.adc` captures and write them next to the input.
#[derive(Args)]
pub struct FftArgs {
    /// Input .adc files
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Window function (Hann, Hamming, Blackman, BlackmanExact,
    /// BlackmanHarris70, FlatTop, BlackmanHarris92)
    #[arg(short, long)]
    window: Option<WindowKind>,

    /// ADC resolution in bits (default: from file header)
    #[arg(short, long)]
    bits: Option<u32>,
}

/// Run the fft command.
pub fn run(args: FftArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let settings = load_settings(config)?;
    let window = resolve_window(args.window, &settings)?;

    let pb = if args.inputs.len() > 1 {
        let pb = ProgressBar::new(args.inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("##-"),
        );
        Some(pb)
    } else {
        None
    };

    for input in &args.inputs {
        if let Some(pb) = &pb {
            pb.set_message(input.display().to_string());
        }

        let loaded = load_capture(input)?;
        let bits = resolve_bits(args.bits, &loaded.record, &settings);
        let spectra = analyze_capture(&loaded.capture, bits, window)?;

        let output = fft_path_for(input);
        write_fft(
            &output,
            &spectra,
            loaded.capture.num_samples(),
            loaded.record.header.sample_rate_mhz,
        )?;

        match &pb {
            Some(pb) => pb.inc(1),
            None => println!("Wrote {} ({window} window, {bits} bits)", output.display()),
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("done");
        println!(
            "Wrote {} .fft files ({window} window)",
            args.inputs.len()
        );
    }
    Ok(())
}

//! Spectral peak listing command.

use super::common::{format_db, format_hz, load_capture, load_settings, resolve_bits, resolve_window};
use clap::Args;
use narrowband_analysis::{WindowKind, analyze_capture, find_peaks, frequency_axis};
use narrowband_io::{FileKind, read_record};
use std::path::{Path, PathBuf};

/// List the strongest peaks of each channel's dBFS spectrum.
#[derive(Args)]
pub struct SpectrumArgs {
    /// Input .adc capture or .fft spectrum file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Window function for .adc input
    #[arg(short, long)]
    window: Option<WindowKind>,

    /// ADC resolution in bits for .adc input (default: from file header)
    #[arg(short, long)]
    bits: Option<u32>,

    /// Number of peaks to list
    #[arg(short, long, default_value = "5")]
    peaks: usize,

    /// Only this channel (zero-based)
    #[arg(short, long)]
    channel: Option<usize>,
}

/// Run the spectrum command.
pub fn run(args: SpectrumArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let settings = load_settings(config)?;

    let (spectra, freqs) = match FileKind::from_path(&args.input) {
        FileKind::Fft => {
            let record = read_record(&args.input)?;
            let freqs = record.axis.values().to_vec();
            (record.data.channels().to_vec(), freqs)
        }
        FileKind::Adc => {
            let window = resolve_window(args.window, &settings)?;
            let loaded = load_capture(&args.input)?;
            let bits = resolve_bits(args.bits, &loaded.record, &settings);
            println!(
                "Analyzing {} ({} samples, {window} window, {bits} bits)",
                args.input.display(),
                loaded.capture.num_samples()
            );
            let spectra = analyze_capture(&loaded.capture, bits, window)?;
            let bins = spectra.first().map_or(0, Vec::len);
            let freqs = frequency_axis(bins, loaded.record.header.sample_rate_hz());
            (spectra, freqs)
        }
    };

    let channels: Vec<usize> = match args.channel {
        Some(ch) if ch < spectra.len() => vec![ch],
        Some(ch) => anyhow::bail!(
            "channel {ch} out of range (file has {} channels)",
            spectra.len()
        ),
        None => (0..spectra.len()).collect(),
    };

    for ch in channels {
        println!("\nChannel {ch}: top {} peaks", args.peaks);
        println!("  {:>6}  {:>14}  {:>10}", "Bin", "Frequency", "Level");
        println!("  {:>6}  {:>14}  {:>10}", "---", "---------", "-----");
        for (bin, level) in find_peaks(&spectra[ch], args.peaks) {
            let freq = freqs.get(bin).copied().unwrap_or(0.0);
            println!(
                "  {:>6}  {:>14}  {:>10}",
                bin,
                format_hz(freq),
                format!("{} dBFS", format_db(level))
            );
        }
    }
    Ok(())
}

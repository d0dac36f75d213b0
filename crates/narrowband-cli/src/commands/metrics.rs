//! ADC quality metrics command.

use super::common::{format_db, load_capture, load_settings, resolve_bits};
use clap::Args;
use narrowband_analysis::{QualityMetrics, QualityReport, assess};
use std::path::{Path, PathBuf};

/// Report single-tone quality metrics for every channel of a capture.
#[derive(Args)]
pub struct MetricsArgs {
    /// Input .adc capture
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// ADC resolution in bits (default: from file header)
    #[arg(short, long)]
    bits: Option<u32>,

    /// Also write the results as JSON
    #[arg(long, value_name = "OUT")]
    json: Option<PathBuf>,
}

/// Run the metrics command.
pub fn run(args: MetricsArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let settings = load_settings(config)?;
    let loaded = load_capture(&args.input)?;
    let bits = resolve_bits(args.bits, &loaded.record, &settings);

    println!(
        "Metrics for {} ({} samples, {bits} bits)",
        args.input.display(),
        loaded.capture.num_samples()
    );

    let mut reports = Vec::with_capacity(loaded.capture.num_channels());
    for (ch, samples) in loaded.capture.channels().iter().enumerate() {
        let report = assess(samples, bits)?;
        println!("\nChannel {ch}");
        match &report {
            QualityReport::Signal { metrics, .. } => print_summary(metrics),
            QualityReport::NoSignal => println!("No AC Signal Detected"),
        }
        reports.push(report);
    }

    if let Some(output_path) = args.json {
        let channels: Vec<serde_json::Value> = reports
            .iter()
            .enumerate()
            .map(|(ch, report)| report_json(ch, report))
            .collect();
        let json = serde_json::json!({
            "input": args.input.display().to_string(),
            "bits": bits,
            "num_samples": loaded.capture.num_samples(),
            "channels": channels,
        });
        std::fs::write(&output_path, serde_json::to_string_pretty(&json)?)?;
        println!("\nWrote metrics to {}", output_path.display());
    }

    Ok(())
}

fn print_summary(m: &QualityMetrics) {
    println!("F1 BIN:   {}", m.fundamental_bin);
    println!("F1 Amp:   {} dBFS", format_db(m.fundamental_dbfs));
    for (i, level) in m.harmonic_dbfs.iter().enumerate() {
        println!("F{} Amp:   {} dBFS", i + 2, format_db(*level));
    }
    println!();
    println!("SNR:      {} dB", format_db(m.snr_db));
    println!("SINAD:    {} dB", format_db(m.sinad_db));
    println!("THD:      {} dB", format_db(m.thd_db));
    println!("SFDR:     {} dB", format_db(m.sfdr_db));
    println!("ENOB:     {:.1} bits", m.enob_bits);
    println!("Max:      {}", m.max_code);
    println!("Min:      {}", m.min_code);
    println!("DC Level: {:.1}", m.dc_level);
    println!("Floor:    {} dBFS", format_db(m.floor_dbfs));
}

/// Non-finite values (`-inf` harmonics, `+inf` SFDR) become `null`.
fn report_json(channel: usize, report: &QualityReport) -> serde_json::Value {
    match report {
        QualityReport::Signal { harmonics, metrics } => {
            let table: Vec<serde_json::Value> = harmonics
                .iter()
                .map(|(h, entry)| {
                    serde_json::json!({
                        "harmonic": h,
                        "bin": entry.bin,
                        "power": entry.power,
                        "dbfs": metrics.harmonic(h),
                    })
                })
                .collect();
            serde_json::json!({
                "channel": channel,
                "signal": true,
                "fundamental_bin": metrics.fundamental_bin,
                "fundamental_dbfs": metrics.fundamental_dbfs,
                "harmonics": table,
                "snr_db": metrics.snr_db,
                "thd_db": metrics.thd_db,
                "sinad_db": metrics.sinad_db,
                "sfdr_db": metrics.sfdr_db,
                "enob_bits": metrics.enob_bits,
                "floor_dbfs": metrics.floor_dbfs,
                "max_code": metrics.max_code,
                "min_code": metrics.min_code,
                "dc_level": metrics.dc_level,
            })
        }
        QualityReport::NoSignal => serde_json::json!({
            "channel": channel,
            "signal": false,
        }),
    }
}

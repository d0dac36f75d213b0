//! Display PScope file metadata.

use clap::Args;
use narrowband_io::{FileKind, read_header};

/// Display PScope file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the .adc or .fft file
    pub file: std::path::PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let header = read_header(&args.file)?;

    let kind = match header.kind {
        FileKind::Adc => "ADC capture",
        FileKind::Fft => "FFT magnitude (dBFS)",
    };

    println!("File:        {}", args.file.display());
    println!("Kind:        {kind}");
    println!("Channels:    {}", header.num_channels);
    println!("Samples:     {}", header.num_samples());
    println!("Sample Rate: {} MHz", header.sample_rate_mhz);
    if let Some(bits) = header.bits {
        println!("Resolution:  {bits} bits");
    }
    if let (Some(min), Some(max)) = (header.min_code, header.max_code) {
        println!("Code Range:  [{min}, {max})");
    }
    if let (Some(board), Some(device)) = (&header.demo_board, &header.device) {
        println!("Board:       {board} / {device}");
    }
    let duration = header.num_samples() as f64 / header.sample_rate_hz();
    println!("Duration:    {:.3} us", duration * 1e6);

    let file_size = std::fs::metadata(&args.file)?.len();
    println!("File Size:   {}", format_bytes(file_size));

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

//! Narrowband CLI - capture files, spectra and ADC quality metrics.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "narrowband")]
#[command(author, version, about = "Narrowband receiver capture and analysis CLI", long_about = None)]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the header of a PScope .adc or .fft file
    Info(commands::info::InfoArgs),

    /// Write a synthetic capture as a PScope .adc file
    Generate(commands::generate::GenerateArgs),

    /// Compute dBFS spectra and write sibling .fft files
    Fft(commands::fft::FftArgs),

    /// Print the strongest spectral peaks of a capture or .fft file
    Spectrum(commands::spectrum::SpectrumArgs),

    /// Report SNR, THD, SINAD, SFDR and ENOB per channel
    Metrics(commands::metrics::MetricsArgs),

    /// Show or initialize the settings file
    Config(commands::config::ConfigArgs),
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
    tracing_log::LogTracer::init().ok();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Generate(args) => commands::generate::run(args, config),
        Commands::Fft(args) => commands::fft::run(args, config),
        Commands::Spectrum(args) => commands::spectrum::run(args, config),
        Commands::Metrics(args) => commands::metrics::run(args, config),
        Commands::Config(args) => commands::config::run(args, config),
    }
}

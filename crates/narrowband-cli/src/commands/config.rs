//! Settings inspection command.

use clap::Args;
use narrowband_config::{Settings, default_config_path, ensure_user_config_dir};
use std::path::Path;

/// Print the effective settings, or write a default settings file.
#[derive(Args)]
pub struct ConfigArgs {
    /// Write default settings to the --config path (or the user config file)
    #[arg(long)]
    init: bool,

    /// Overwrite an existing file with --init
    #[arg(long, requires = "init")]
    force: bool,
}

/// Run the config command.
pub fn run(args: ConfigArgs, config: Option<&Path>) -> anyhow::Result<()> {
    if args.init {
        let target = match config {
            Some(path) => path.to_path_buf(),
            None => {
                ensure_user_config_dir()?;
                default_config_path()
            }
        };
        if target.exists() && !args.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                target.display()
            );
        }
        Settings::default().save(&target)?;
        println!("Wrote default settings to {}", target.display());
        return Ok(());
    }

    let source = Settings::locate(config);
    let settings = Settings::load_or_default(config)?;
    match &source {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => println!(
            "# No settings file found; defaults shown (expected at {})",
            default_config_path().display()
        ),
    }
    print!("{}", settings.to_toml()?);
    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use fieldrot_core::derotate::BorderStamp;
use fieldrot_core::observer::Observer;
use fieldrot_core::pipeline::config::SessionConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save a full default SessionConfig as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let mut config = SessionConfig::default();
    config.derotation.border = Some(BorderStamp::default());
    config
        .places
        .insert("melbourne".to_string(), Observer::fallback());
    let toml_str = toml::to_string_pretty(&config)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}

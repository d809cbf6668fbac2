//! gsdconv - Combine GSD trajectory logs into one normalized CSV
//!
//! Scans an input directory for GSD files, converts them in sorted order
//! and appends every row to a single CSV in the output directory.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use gsdconv::ConvertSettings;

#[derive(Parser, Debug)]
#[command(name = "gsdconv", version, about)]
struct Args {
    /// Settings JSON file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory scanned for GSD files
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Glob pattern for input files, relative to the input directory
    #[arg(short, long)]
    pattern: Option<String>,

    /// Directory for the combined CSV
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// File name of the combined CSV
    #[arg(long)]
    output_file: Option<String>,

    /// Append to an existing CSV instead of replacing it
    #[arg(long, overrides_with = "no_append")]
    append: bool,

    /// Replace the CSV even when the settings file enables appending
    #[arg(long, overrides_with = "append")]
    no_append: bool,

    /// Skip unreadable inputs instead of aborting
    #[arg(long, overrides_with = "no_skip_unreadable")]
    skip_unreadable: bool,

    /// Abort on unreadable inputs even when the settings file skips them
    #[arg(long, overrides_with = "skip_unreadable")]
    no_skip_unreadable: bool,

    /// Save the effective settings to the default config location
    #[arg(long)]
    save_settings: bool,
}

/// Resolve a `--flag`/`--no-flag` pair; `None` when neither was given
fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl Args {
    fn into_settings(self) -> Result<(ConvertSettings, bool)> {
        let settings = match &self.config {
            Some(path) => ConvertSettings::load_from(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => ConvertSettings::load(),
        };
        Ok(self.apply(settings))
    }

    /// Override loaded settings with the flags given on the command line
    fn apply(self, mut settings: ConvertSettings) -> (ConvertSettings, bool) {
        if let Some(dir) = self.input_dir {
            settings.input_dir = dir;
        }
        if let Some(pattern) = self.pattern {
            settings.pattern = pattern;
        }
        if let Some(dir) = self.output_dir {
            settings.output_dir = dir;
        }
        if let Some(file) = self.output_file {
            settings.output_file = file;
        }
        if let Some(append) = toggle(self.append, self.no_append) {
            settings.append = append;
        }
        if let Some(skip) = toggle(self.skip_unreadable, self.no_skip_unreadable) {
            settings.skip_unreadable = skip;
        }

        (settings, self.save_settings)
    }
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let (settings, save) = Args::parse().into_settings()?;

    if save {
        let path = settings.save().context("Failed to save settings")?;
        tracing::info!("Saved settings to {}", path.display());
    }

    let summary = gsdconv::run(&settings).context("Conversion failed")?;

    if !summary.skipped.is_empty() {
        tracing::warn!("{} input files were skipped", summary.skipped.len());
    }

    Ok(())
}

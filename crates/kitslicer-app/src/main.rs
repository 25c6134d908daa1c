//! kitslicer: detect and label drum slices in a WAV file, print them as JSON

mod cli;

use anyhow::Context;
use clap::Parser;
use kitslicer_core::SliceSet;
use kitslicer_services::{config, read_wav};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays pure JSON
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("kitslicer=debug".parse()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = config::load_config();
    cli.apply_to(&mut config);
    if cli.save_config {
        config::save_config(&config).context("failed to save config")?;
        tracing::info!(path = %config::config_path().display(), "Saved config");
    }

    let prefix = config.kit_prefix();
    tracing::info!(input = %cli.input.display(), %prefix, "Starting kitslicer");

    let audio = read_wav(&cli.input)
        .with_context(|| format!("failed to decode {}", cli.input.display()))?;

    let mut slices = SliceSet::new(prefix);
    slices.detect_all(&audio, config.detection);

    let json = serde_json::to_string_pretty(slices.slices())?;
    println!("{json}");
    Ok(())
}

//! Command line arguments

use std::path::PathBuf;

use clap::Parser;
use kitslicer_services::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "kitslicer", version, about = "Detect and label drum slices in a WAV file")]
pub struct Cli {
    /// WAV file to slice
    pub input: PathBuf,

    /// Kit name; slice names use its initials as prefix
    pub kit_name: Option<String>,

    /// Onset sensitivity (0.01-0.5), overrides the config file
    #[arg(short, long)]
    pub sensitivity: Option<f64>,

    /// Minimum seconds between onsets (0.01-0.5), overrides the config file
    #[arg(short, long)]
    pub min_distance: Option<f64>,

    /// Explicit slice-name prefix, wins over the kit name
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Write the resulting settings back to the config file
    #[arg(long)]
    pub save_config: bool,
}

impl Cli {
    /// Layer the command line over the loaded config.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(sensitivity) = self.sensitivity {
            config.detection.sensitivity = sensitivity;
        }
        if let Some(min_distance) = self.min_distance {
            config.detection.min_distance = min_distance;
        }
        config.detection = config.detection.clamped();

        if let Some(name) = &self.kit_name {
            config.kit.name = Some(name.clone());
            config.kit.prefix = None;
        }
        if let Some(prefix) = &self.prefix {
            config.kit.prefix = Some(prefix.clone());
        }
    }
}

//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::error::Result;
use crate::i18n::Language;
use crate::params::MeterConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Sound Meter")]
#[command(about = "Real-time microphone volume, frequency and sound source meter", long_about = None)]
pub struct Args {
    /// Display language (overrides the config file)
    #[arg(long, value_enum, value_name = "LANG")]
    pub language: Option<Language>,

    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Input device index (overrides the config file; default: host default input)
    #[arg(long, value_name = "INDEX")]
    pub device: Option<usize>,
}

impl Args {
    /// Load the config file (if any) and apply command-line overrides
    pub fn resolve_config(&self) -> Result<MeterConfig> {
        let mut config = MeterConfig::load(self.config.as_deref())?;
        if let Some(language) = self.language {
            config.language = language;
        }
        if let Some(index) = self.device {
            config.capture.device_index = Some(index);
        }
        Ok(config)
    }
}

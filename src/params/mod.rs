//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (Hz, samples, pixels)
//! - Documented ranges and meanings
//! - Defaults that can be overridden from a TOML file

mod analysis;
mod capture;
mod render;

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::i18n::Language;

// Re-export all types
pub use analysis::{analysis_constants, AnalysisConfig};
pub use capture::CaptureConfig;
pub use render::RenderConfig;

/// Complete application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// Initial display language
    pub language: Language,

    pub analysis: AnalysisConfig,

    pub capture: CaptureConfig,

    pub render: RenderConfig,
}

impl MeterConfig {
    /// Load configuration from a TOML file, or use defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                let config = Self::from_toml(&contents)?;
                info!("Configuration loaded from {}", path.display());
                config
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text (missing keys fall back to defaults)
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        self.capture.validate()?;
        self.render.validate()
    }
}

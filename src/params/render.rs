//! Window and background configuration.

use serde::Deserialize;

use crate::error::{MeterError, Result};

/// Rendering configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Window width (logical pixels)
    pub window_width: u32,

    /// Window height (logical pixels)
    pub window_height: u32,

    /// Background gradient start, top-left (sRGB hex, blue-50)
    pub background_start: [u8; 3],

    /// Background gradient end, bottom-right (sRGB hex, purple-50)
    pub background_end: [u8; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 720,
            window_height: 860,
            background_start: [0xef, 0xf6, 0xff],
            background_end: [0xfa, 0xf5, 0xff],
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(MeterError::invalid_config(format!(
                "Window size must be non-zero, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        Ok(())
    }
}

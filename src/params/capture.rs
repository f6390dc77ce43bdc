//! Microphone capture configuration.

use serde::Deserialize;

use crate::error::{MeterError, Result};

/// Input device and buffering parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Input device index (None = host default input)
    pub device_index: Option<usize>,

    /// Maximum samples held between frames before the oldest are dropped
    /// 16384 ≈ 340ms @ 48kHz, several frames of slack at 60 FPS
    pub max_pending_samples: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_index: None,
            max_pending_samples: 16384,
        }
    }
}

impl CaptureConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_pending_samples == 0 {
            return Err(MeterError::invalid_config(
                "max_pending_samples must be > 0",
            ));
        }
        Ok(())
    }
}

//! Error types for the sound meter

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MeterError>;

#[derive(Error, Debug)]
pub enum MeterError {
    /// Microphone access was denied or no usable input device exists
    #[error("Audio capture unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(String),
}

impl MeterError {
    pub fn capture<S: Into<String>>(msg: S) -> Self {
        Self::CaptureUnavailable(msg.into())
    }

    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn render<S: Into<String>>(msg: S) -> Self {
        Self::Render(msg.into())
    }
}

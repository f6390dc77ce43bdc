//! Sound meter library - microphone volume, dominant frequency and sound source heuristics

pub mod audio;
pub mod classify;
pub mod cli;
pub mod error;
pub mod i18n;
pub mod install;
pub mod meter;
pub mod params;
pub mod rendering;
pub mod ui;

pub use error::{MeterError, Result};

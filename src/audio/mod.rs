//! Microphone capture and per-frame spectrum analysis.
//!
//! Capture runs on cpal's audio thread; everything else runs on the frame
//! loop, once per redraw.

mod analyser;
mod capture;
mod frame;

// Re-export public types
pub use analyser::{blackman_window, Analyser};
pub use capture::{CaptureBackend, CaptureSession, CpalBackend, CpalSession};
pub use frame::{
    analyze_frame, band_energies, dominant_bin, dominant_frequency, volume_percent,
    BandEnergies, FrameReading,
};

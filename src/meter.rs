//! Capture controller and per-frame meter state.
//!
//! `MeterController` owns the one capture session, the analyser that processes
//! it, and every value the UI displays. The frame loop calls [`MeterController::tick`]
//! once per redraw; the `recording` flag is checked at the start of each tick,
//! so a stop takes effect on the next frame.

use tracing::{error, info, warn};

use crate::audio::{analyze_frame, Analyser, BandEnergies, CaptureBackend, CaptureSession, FrameReading};
use crate::classify::{SoundSource, SoundType};
use crate::error::Result;
use crate::i18n::{Language, Translations};
use crate::params::AnalysisConfig;

/// Transient state for the current session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeterState {
    /// True while a capture session is open
    pub recording: bool,

    /// Volume percentage [0, 100]
    pub volume: u8,

    /// Dominant frequency (Hz)
    pub frequency_hz: u32,

    pub bands: BandEnergies,

    pub source: SoundSource,

    /// Diagnostic text of the last failed start or lost stream, cleared by a successful start
    pub capture_error: Option<String>,

    pub language: Language,
}

impl MeterState {
    pub fn sound_type(&self) -> SoundType {
        SoundType::from_frequency(self.frequency_hz)
    }

    fn apply(&mut self, reading: &FrameReading) {
        self.volume = reading.volume;
        self.frequency_hz = reading.frequency_hz;
        self.bands = reading.bands;
        self.source = reading.source;
    }

    fn reset_readings(&mut self) {
        self.volume = 0;
        self.frequency_hz = 0;
        self.bands = BandEnergies::default();
        self.source = SoundSource::Unknown;
    }
}

/// Open session plus the processing context built for it
struct ActiveCapture<S> {
    session: S,
    analyser: Analyser,
    time_data: Vec<u8>,
    spectrum: Vec<f32>,
}

/// Controller owning capture, analysis and meter state
pub struct MeterController<B: CaptureBackend> {
    backend: B,
    config: AnalysisConfig,
    state: MeterState,
    active: Option<ActiveCapture<B::Session>>,
    incoming: Vec<f32>,
}

impl<B: CaptureBackend> MeterController<B> {
    /// Create an idle controller (analysis config must be validated)
    pub fn new(backend: B, config: AnalysisConfig, language: Language) -> Self {
        Self {
            backend,
            config,
            state: MeterState {
                language,
                ..Default::default()
            },
            active: None,
            incoming: Vec::new(),
        }
    }

    /// Open the microphone and begin analysis.
    ///
    /// A denied or unavailable device sets the capture error and leaves every
    /// reading as it was. Calling this while recording keeps the open session.
    pub fn start(&mut self) -> Result<()> {
        if self.active.is_some() {
            warn!("Already recording, ignoring start request");
            return Ok(());
        }

        let session = match self.backend.open() {
            Ok(session) => session,
            Err(e) => {
                error!("Error accessing microphone: {}", e);
                self.state.capture_error = Some(e.to_string());
                return Err(e);
            }
        };

        let analyser = Analyser::new(session.sample_rate(), &self.config);
        info!(
            "Capture started: {} Hz, {}-point analysis window",
            analyser.sample_rate(),
            analyser.fft_size()
        );

        self.active = Some(ActiveCapture {
            time_data: vec![0; analyser.fft_size()],
            spectrum: vec![0.0; analyser.frequency_bin_count()],
            session,
            analyser,
        });
        self.state.recording = true;
        self.state.capture_error = None;
        Ok(())
    }

    /// Release the input stream and analyser, then zero every reading
    pub fn stop(&mut self) {
        if self.active.take().is_some() {
            info!("Capture stopped");
        }
        self.incoming.clear();
        self.state.recording = false;
        self.state.reset_readings();
    }

    /// Stop when recording, start otherwise
    pub fn toggle(&mut self) -> Result<()> {
        if self.state.recording {
            self.stop();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Run one analysis frame; `None` when not recording.
    ///
    /// A stream that failed since the last frame stops the session and sets the
    /// capture error.
    pub fn tick(&mut self) -> Option<FrameReading> {
        if !self.state.recording {
            return None;
        }
        let active = self.active.as_mut()?;

        if let Some(reason) = active.session.take_failure() {
            error!("Audio input lost: {}", reason);
            self.stop();
            self.state.capture_error = Some(reason);
            return None;
        }

        self.incoming.clear();
        active.session.drain_samples(&mut self.incoming);
        active.analyser.push_samples(&self.incoming);

        active.analyser.byte_time_domain_data(&mut active.time_data);
        active.analyser.float_frequency_data(&mut active.spectrum);

        let reading = analyze_frame(
            &active.time_data,
            &active.spectrum,
            active.analyser.sample_rate(),
            &self.config,
        );
        self.state.apply(&reading);
        Some(reading)
    }

    pub fn state(&self) -> &MeterState {
        &self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state.recording
    }

    pub fn language(&self) -> Language {
        self.state.language
    }

    /// Change the display language; readings are unaffected
    pub fn set_language(&mut self, language: Language) {
        self.state.language = language;
    }

    pub fn translations(&self) -> &'static Translations {
        self.state.language.translations()
    }

    /// Localized banner text while the last start attempt failed
    pub fn error_message(&self) -> Option<&'static str> {
        self.state
            .capture_error
            .as_ref()
            .map(|_| self.translations().error)
    }

    /// Localized label for the current sound source
    pub fn source_label(&self) -> &'static str {
        self.state.source.label(self.translations())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeterError;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::f32::consts::PI;
    use std::rc::Rc;

    const SAMPLE_RATE: u32 = 48000;

    struct FakeSession {
        feed: Rc<RefCell<Vec<f32>>>,
        failure: Rc<RefCell<Option<String>>>,
    }

    impl CaptureSession for FakeSession {
        fn sample_rate(&self) -> u32 {
            SAMPLE_RATE
        }

        fn drain_samples(&mut self, out: &mut Vec<f32>) {
            out.append(&mut *self.feed.borrow_mut());
        }

        fn take_failure(&mut self) -> Option<String> {
            self.failure.borrow_mut().take()
        }
    }

    /// Backend answering each open with the next scripted grant or denial
    struct ScriptedBackend {
        grants: VecDeque<bool>,
        opened: Rc<Cell<usize>>,
        feed: Rc<RefCell<Vec<f32>>>,
        failure: Rc<RefCell<Option<String>>>,
    }

    impl CaptureBackend for ScriptedBackend {
        type Session = FakeSession;

        fn open(&mut self) -> Result<FakeSession> {
            self.opened.set(self.opened.get() + 1);
            if self.grants.pop_front().unwrap_or(true) {
                Ok(FakeSession {
                    feed: Rc::clone(&self.feed),
                    failure: Rc::clone(&self.failure),
                })
            } else {
                Err(MeterError::capture("Permission denied"))
            }
        }
    }

    struct Harness {
        meter: MeterController<ScriptedBackend>,
        opened: Rc<Cell<usize>>,
        feed: Rc<RefCell<Vec<f32>>>,
        failure: Rc<RefCell<Option<String>>>,
    }

    fn harness(grants: &[bool]) -> Harness {
        let opened = Rc::new(Cell::new(0));
        let feed = Rc::new(RefCell::new(Vec::new()));
        let failure = Rc::new(RefCell::new(None));
        let backend = ScriptedBackend {
            grants: grants.iter().copied().collect(),
            opened: Rc::clone(&opened),
            feed: Rc::clone(&feed),
            failure: Rc::clone(&failure),
        };
        Harness {
            meter: MeterController::new(backend, AnalysisConfig::default(), Language::En),
            opened,
            feed,
            failure,
        }
    }

    fn sine(frequency_hz: f32, amplitude: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * frequency_hz * i as f32 / SAMPLE_RATE as f32).sin())
            .collect()
    }

    #[test]
    fn test_starts_idle() {
        let h = harness(&[]);
        let state = h.meter.state();
        assert!(!state.recording);
        assert_eq!(state.volume, 0);
        assert_eq!(state.source, SoundSource::Unknown);
        assert_eq!(h.meter.error_message(), None);
        assert_eq!(h.opened.get(), 0);
    }

    #[test]
    fn test_denied_start_sets_error_and_keeps_readings() {
        let mut h = harness(&[false]);
        let before = h.meter.state().clone();

        let result = h.meter.start();
        assert!(matches!(result, Err(MeterError::CaptureUnavailable(_))));
        assert!(!h.meter.is_recording());
        assert_eq!(h.meter.error_message(), Some("Please grant microphone access"));

        let after = h.meter.state();
        assert_eq!(after.volume, before.volume);
        assert_eq!(after.frequency_hz, before.frequency_hz);
        assert_eq!(after.bands, before.bands);
        assert_eq!(after.source, before.source);
        assert_eq!(h.meter.tick(), None);
    }

    #[test]
    fn test_successful_retry_clears_error() {
        let mut h = harness(&[false, true]);
        assert!(h.meter.start().is_err());
        assert!(h.meter.error_message().is_some());

        h.meter.start().unwrap();
        assert!(h.meter.is_recording());
        assert_eq!(h.meter.error_message(), None);
        assert_eq!(h.opened.get(), 2);
    }

    #[test]
    fn test_tick_reads_voice_band_tone() {
        let mut h = harness(&[true]);
        h.meter.start().unwrap();
        h.feed.borrow_mut().extend(sine(150.0, 0.5, 2048));

        let reading = h.meter.tick().unwrap();
        assert_eq!(reading.source, SoundSource::Human);
        assert!((85..=255).contains(&reading.frequency_hz));
        assert!(reading.volume > 0 && reading.volume <= 100);
        assert!(reading.bands.mid > reading.bands.high);

        let state = h.meter.state();
        assert_eq!(state.volume, reading.volume);
        assert_eq!(state.frequency_hz, reading.frequency_hz);
        assert_eq!(h.meter.source_label(), "Human Voice");
    }

    #[test]
    fn test_tick_on_silence_is_zero() {
        let mut h = harness(&[true]);
        h.meter.start().unwrap();

        let reading = h.meter.tick().unwrap();
        assert_eq!(reading.volume, 0);
        assert_eq!(reading.frequency_hz, 0);
        assert_eq!(reading.source, SoundSource::Unknown);
    }

    #[test]
    fn test_stop_resets_readings() {
        let mut h = harness(&[true]);
        h.meter.start().unwrap();
        h.feed.borrow_mut().extend(sine(3000.0, 0.8, 2048));
        h.meter.tick().unwrap();
        assert_eq!(h.meter.state().source, SoundSource::Bird);

        h.meter.stop();
        let state = h.meter.state();
        assert!(!state.recording);
        assert_eq!(state.volume, 0);
        assert_eq!(state.frequency_hz, 0);
        assert_eq!(state.bands, BandEnergies::default());
        assert_eq!(state.source, SoundSource::Unknown);

        // Loop quiesces once the flag is cleared
        h.feed.borrow_mut().extend(sine(3000.0, 0.8, 2048));
        assert_eq!(h.meter.tick(), None);
    }

    #[test]
    fn test_lost_stream_stops_and_reports() {
        let mut h = harness(&[true, true]);
        h.meter.start().unwrap();
        h.feed.borrow_mut().extend(sine(3000.0, 0.8, 2048));
        h.meter.tick().unwrap();
        assert!(h.meter.state().volume > 0);

        *h.failure.borrow_mut() = Some("device disconnected".to_string());
        assert_eq!(h.meter.tick(), None);

        let state = h.meter.state();
        assert!(!state.recording);
        assert_eq!(state.volume, 0);
        assert_eq!(state.frequency_hz, 0);
        assert_eq!(state.source, SoundSource::Unknown);
        assert_eq!(state.capture_error.as_deref(), Some("device disconnected"));
        assert_eq!(h.meter.error_message(), Some("Please grant microphone access"));

        // Restarting opens a fresh session and clears the banner
        h.meter.start().unwrap();
        assert_eq!(h.opened.get(), 2);
        assert_eq!(h.meter.error_message(), None);
    }

    #[test]
    fn test_stop_when_idle_is_harmless() {
        let mut h = harness(&[]);
        h.meter.stop();
        assert!(!h.meter.is_recording());
        assert_eq!(h.opened.get(), 0);
    }

    #[test]
    fn test_second_start_keeps_session() {
        let mut h = harness(&[true, true]);
        h.meter.start().unwrap();
        h.meter.start().unwrap();
        assert_eq!(h.opened.get(), 1);
        assert!(h.meter.is_recording());
    }

    #[test]
    fn test_toggle() {
        let mut h = harness(&[true]);
        h.meter.toggle().unwrap();
        assert!(h.meter.is_recording());
        h.meter.toggle().unwrap();
        assert!(!h.meter.is_recording());
    }

    #[test]
    fn test_language_switch_only_changes_strings() {
        let mut h = harness(&[true]);
        h.meter.start().unwrap();
        h.feed.borrow_mut().extend(sine(3000.0, 0.8, 2048));
        h.meter.tick().unwrap();

        let before = h.meter.state().clone();
        let label_en = h.meter.source_label();

        h.meter.set_language(Language::Ru);
        let after = h.meter.state();

        assert_eq!(after.recording, before.recording);
        assert_eq!(after.volume, before.volume);
        assert_eq!(after.frequency_hz, before.frequency_hz);
        assert_eq!(after.bands, before.bands);
        assert_eq!(after.source, before.source);
        assert_eq!(label_en, "Bird");
        assert_eq!(h.meter.source_label(), "Птица");
    }

    #[test]
    fn test_error_text_follows_language() {
        let mut h = harness(&[false]);
        let _ = h.meter.start();
        assert_eq!(h.meter.error_message(), Some("Please grant microphone access"));
        h.meter.set_language(Language::Ru);
        assert_eq!(
            h.meter.error_message(),
            Some("Пожалуйста, предоставьте доступ к микрофону")
        );
    }
}

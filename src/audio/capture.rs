//! Microphone capture sessions.
//!
//! The cpal callback runs on the audio thread and appends mono samples to a
//! shared buffer; the frame loop drains that buffer once per redraw.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::error::{MeterError, Result};
use crate::params::CaptureConfig;

/// Source of capture sessions (the platform microphone, or a test double)
pub trait CaptureBackend {
    type Session: CaptureSession;

    /// Request microphone access and open a running input stream
    fn open(&mut self) -> Result<Self::Session>;
}

/// An open input stream; dropping it releases the device
pub trait CaptureSession {
    fn sample_rate(&self) -> u32;

    /// Move every sample captured since the last call into `out`
    fn drain_samples(&mut self, out: &mut Vec<f32>);

    /// Reason the stream stopped delivering audio, reported once
    fn take_failure(&mut self) -> Option<String>;
}

/// Samples shared between the audio callback and the frame loop
#[derive(Clone)]
struct PendingSamples {
    buffer: Arc<Mutex<Vec<f32>>>,
    capacity: usize,
}

impl PendingSamples {
    fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Vec::with_capacity(capacity))),
            capacity,
        }
    }

    /// Append the first channel of each interleaved frame, dropping the oldest on overflow
    fn push_interleaved<T>(&self, data: &[T], channels: usize)
    where
        T: Sample,
        f32: FromSample<T>,
    {
        let mut buf = self.buffer.lock();
        buf.extend(
            data.chunks(channels.max(1))
                .map(|frame| frame[0].to_sample::<f32>()),
        );
        if buf.len() > self.capacity {
            let excess = buf.len() - self.capacity;
            buf.drain(..excess);
        }
    }

    fn drain_into(&self, out: &mut Vec<f32>) {
        out.append(&mut *self.buffer.lock());
    }
}

/// First error raised by the stream's error callback
#[derive(Clone, Default)]
struct StreamFailure(Arc<Mutex<Option<String>>>);

impl StreamFailure {
    fn record(&self, reason: String) {
        self.0.lock().get_or_insert(reason);
    }

    fn take(&self) -> Option<String> {
        self.0.lock().take()
    }
}

/// Capture backend using the default cpal host
pub struct CpalBackend {
    config: CaptureConfig,
}

impl CpalBackend {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    fn select_device(&self, host: &cpal::Host) -> Result<cpal::Device> {
        match self.config.device_index {
            Some(index) => host
                .input_devices()
                .map_err(|e| MeterError::capture(format!("Failed to enumerate devices: {}", e)))?
                .nth(index)
                .ok_or_else(|| MeterError::capture(format!("Input device {} not found", index))),
            None => host
                .default_input_device()
                .ok_or_else(|| MeterError::capture("No audio input device found")),
        }
    }
}

impl CaptureBackend for CpalBackend {
    type Session = CpalSession;

    fn open(&mut self) -> Result<CpalSession> {
        let host = cpal::default_host();
        let device = self.select_device(&host)?;

        let supported = device
            .default_input_config()
            .map_err(|e| MeterError::capture(format!("Failed to get input config: {}", e)))?;

        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        let sample_format = supported.sample_format();
        let stream_config: cpal::StreamConfig = supported.into();

        info!(
            "Audio input: {} @ {}Hz, {} channel(s), {:?}",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels,
            sample_format
        );

        let pending = PendingSamples::new(self.config.max_pending_samples);
        let failure = StreamFailure::default();

        let stream = match sample_format {
            SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, channels, &pending, &failure)
            }
            SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, channels, &pending, &failure)
            }
            SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, channels, &pending, &failure)
            }
            SampleFormat::I32 => {
                build_stream::<i32>(&device, &stream_config, channels, &pending, &failure)
            }
            other => Err(MeterError::capture(format!(
                "Unsupported sample format {:?}",
                other
            ))),
        }?;

        stream
            .play()
            .map_err(|e| MeterError::capture(format!("Failed to start audio stream: {}", e)))?;

        Ok(CpalSession {
            sample_rate,
            pending,
            failure,
            _stream: stream,
        })
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    pending: &PendingSamples,
    failure: &StreamFailure,
) -> Result<cpal::Stream>
where
    T: SizedSample + Send + 'static,
    f32: FromSample<T>,
{
    let pending = pending.clone();
    let failure = failure.clone();
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                pending.push_interleaved(data, channels);
            },
            move |err| {
                error!("Audio stream error: {}", err);
                failure.record(err.to_string());
            },
            None,
        )
        .map_err(|e| MeterError::capture(format!("Failed to build audio stream: {}", e)))
}

/// Running cpal input stream (kept alive until dropped)
pub struct CpalSession {
    sample_rate: u32,
    pending: PendingSamples,
    failure: StreamFailure,
    _stream: cpal::Stream,
}

impl CaptureSession for CpalSession {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn drain_samples(&mut self, out: &mut Vec<f32>) {
        self.pending.drain_into(out);
    }

    fn take_failure(&mut self) -> Option<String> {
        self.failure.take()
    }
}

impl Drop for CpalSession {
    fn drop(&mut self) {
        debug!("Releasing audio input stream");
    }
}

//! Microphone capture and loudness analysis.
//!
//! `cpal::Stream` is not `Send`, so the stream lives and dies on a dedicated
//! capture thread. The device callback mixes input to mono, keeps a rolling
//! 256-sample window, and at ~60 Hz runs a Hann-windowed FFT whose per-bin
//! dB values (mapped from a fixed [-100, -30] dB window into [0, 1]) are
//! averaged into one normalized loudness figure. That figure drives the
//! [`BlowDetector`]; pulses and levels flow back over an mpsc channel.
//!
//! Startup failure (no device, permission denied) is reported once over the
//! channel and the card keeps running click-only.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use cake_core::blow::BlowDetector;

/// Analysis window length in samples.
pub const FFT_SIZE: usize = 256;

/// Target analysis cadence, matching a display refresh.
const ANALYSIS_HZ: u32 = 60;

// Per-bin dB window mapped onto [0, 1]; magnitudes below the floor read as
// silence, everything above the ceiling saturates.
const DB_FLOOR: f32 = -100.0;
const DB_CEIL: f32 = -30.0;

#[derive(Debug, Error)]
pub enum MicError {
    #[error("no input device available")]
    NoDevice,
    #[error("unsupported sample format {0}")]
    UnsupportedFormat(SampleFormat),
    #[error(transparent)]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error(transparent)]
    Build(#[from] cpal::BuildStreamError),
    #[error(transparent)]
    Play(#[from] cpal::PlayStreamError),
}

/// What the capture thread reports back to the event loop.
#[derive(Debug, Clone)]
pub enum AudioUpdate {
    Started { device: String, sample_rate: u32 },
    /// One analysis frame: normalized loudness + current pulse state.
    Frame { level: f32, blowing: bool },
    /// Rising edge of the blowing pulse — extinguishes candles.
    Blow,
    Failed(String),
}

// ── Spectrum analysis (pure, device-free) ─────────────────────────────────────

/// Rolling mono window + FFT loudness, decimated to [`ANALYSIS_HZ`].
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buf: VecDeque<f32>,
    scratch: Vec<Complex<f32>>,
    hop: usize,
    since_last: usize,
}

impl SpectrumAnalyzer {
    pub fn new(sample_rate: u32) -> Self {
        let window = (0..FFT_SIZE)
            .map(|i| {
                let t = i as f32 / (FFT_SIZE - 1) as f32;
                0.5 - 0.5 * (std::f32::consts::TAU * t).cos()
            })
            .collect();
        Self {
            fft: FftPlanner::new().plan_fft_forward(FFT_SIZE),
            window,
            buf: VecDeque::with_capacity(FFT_SIZE),
            scratch: vec![Complex::default(); FFT_SIZE],
            hop: (sample_rate / ANALYSIS_HZ).max(1) as usize,
            since_last: 0,
        }
    }

    /// Feed one interleaved device buffer. Returns a normalized loudness
    /// figure when an analysis frame is due, `None` otherwise.
    pub fn feed(&mut self, samples: &[f32], channels: usize) -> Option<f32> {
        if channels == 0 || samples.is_empty() {
            return None;
        }
        let inv = 1.0 / channels as f32;
        for frame in samples.chunks_exact(channels) {
            let mono: f32 = frame.iter().sum::<f32>() * inv;
            if self.buf.len() == FFT_SIZE {
                self.buf.pop_front();
            }
            self.buf.push_back(mono);
        }
        self.since_last += samples.len() / channels;

        if self.since_last >= self.hop && self.buf.len() == FFT_SIZE {
            self.since_last -= self.hop;
            Some(self.level())
        } else {
            None
        }
    }

    /// Mean normalized bin loudness of the current window.
    fn level(&mut self) -> f32 {
        for (i, (&s, &w)) in self.buf.iter().zip(self.window.iter()).enumerate() {
            self.scratch[i] = Complex::new(s * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let bins = FFT_SIZE / 2;
        let scale = 2.0 / FFT_SIZE as f32;
        let mut sum = 0.0f32;
        for bin in self.scratch.iter().take(bins) {
            let mag = bin.norm() * scale;
            let db = 20.0 * mag.max(1.0e-9).log10();
            sum += ((db - DB_FLOOR) / (DB_CEIL - DB_FLOOR)).clamp(0.0, 1.0);
        }
        sum / bins as f32
    }
}

// ── Capture thread ────────────────────────────────────────────────────────────

/// Owns the microphone for one start/stop cycle. Dropping the handle (or
/// calling [`stop`](Self::stop)) releases the device.
pub struct AudioMonitor {
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl AudioMonitor {
    /// Spawn the capture thread. Failures to open the device are reported
    /// asynchronously as [`AudioUpdate::Failed`], never as a panic.
    pub fn spawn(
        threshold: f32,
        cooldown: Duration,
        tx: mpsc::Sender<AudioUpdate>,
    ) -> anyhow::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = shutdown.clone();
        // A graceful exit is always app-initiated (stop/drop), so the thread
        // only reports failures; the app updates its own state on stop.
        let handle = thread::Builder::new().name("mic".into()).spawn(move || {
            if let Err(e) = run_capture(threshold, cooldown, flag, tx.clone()) {
                warn!("microphone unavailable: {e}");
                let _ = tx.try_send(AudioUpdate::Failed(e.to_string()));
            }
        })?;
        Ok(Self {
            shutdown,
            handle: Some(handle),
        })
    }

    /// Stop sampling and release the device. Idempotent.
    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AudioMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Open the default input device and pump analysis frames until shutdown.
/// The stream is dropped (tracks stopped) on every exit path.
fn run_capture(
    threshold: f32,
    cooldown: Duration,
    shutdown: Arc<AtomicBool>,
    tx: mpsc::Sender<AudioUpdate>,
) -> Result<(), MicError> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or(MicError::NoDevice)?;
    let device_name = device
        .name()
        .unwrap_or_else(|_| "unknown input".to_string());

    let config = device.default_input_config()?;
    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;
    info!(
        "mic: {} @ {} Hz, {} ch, {:?}",
        device_name,
        sample_rate,
        channels,
        config.sample_format()
    );

    if config.sample_format() != SampleFormat::F32 {
        return Err(MicError::UnsupportedFormat(config.sample_format()));
    }

    let mut analyzer = SpectrumAnalyzer::new(sample_rate);
    let mut detector = BlowDetector::new(threshold, cooldown);
    let frame_tx = tx.clone();

    let stream = device.build_input_stream(
        &config.into(),
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            if let Some(level) = analyzer.feed(data, channels) {
                let now = Instant::now();
                let edge = detector.update(level, now);
                // try_send: the UI coalesces frames, losing one is harmless
                let _ = frame_tx.try_send(AudioUpdate::Frame {
                    level,
                    blowing: detector.blowing(now),
                });
                if edge {
                    let _ = frame_tx.try_send(AudioUpdate::Blow);
                }
            }
        },
        move |err| {
            error!("input stream error: {err}");
        },
        None,
    )?;
    stream.play()?;

    let _ = tx.try_send(AudioUpdate::Started {
        device: device_name,
        sample_rate,
    });

    while !shutdown.load(Ordering::Relaxed) {
        thread::sleep(Duration::from_millis(50));
    }
    drop(stream);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn silence_reads_as_zero_loudness() {
        let mut analyzer = SpectrumAnalyzer::new(48_000);
        let mut level = None;
        // a second of digital silence, 512-sample buffers, stereo
        let buf = vec![0.0f32; 1024];
        for _ in 0..94 {
            if let Some(l) = analyzer.feed(&buf, 2) {
                level = Some(l);
            }
        }
        let level = level.expect("analysis frames due");
        assert!(level < 0.01, "silence leveled at {level}");
    }

    #[test]
    fn loud_broadband_input_crosses_the_blow_threshold() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut analyzer = SpectrumAnalyzer::new(48_000);
        let mut level = None;
        for _ in 0..20 {
            let buf: Vec<f32> = (0..1024).map(|_| rng.gen_range(-0.5..0.5)).collect();
            if let Some(l) = analyzer.feed(&buf, 1) {
                level = Some(l);
            }
        }
        let level = level.expect("analysis frames due");
        assert!(level > 0.15, "broadband noise leveled at {level}");
    }

    #[test]
    fn frames_are_decimated_to_the_analysis_cadence() {
        let mut analyzer = SpectrumAnalyzer::new(48_000);
        // 48000 samples = 1 s of mono audio → ~60 frames
        let buf = vec![0.1f32; 480];
        let frames = (0..100).filter(|_| analyzer.feed(&buf, 1).is_some()).count();
        assert!((55..=62).contains(&frames), "{frames} frames in one second");
    }

    #[test]
    fn short_buffers_accumulate_before_the_first_frame() {
        let mut analyzer = SpectrumAnalyzer::new(48_000);
        // fewer than FFT_SIZE samples in total: never a frame
        assert!(analyzer.feed(&[0.2f32; 100], 1).is_none());
        assert!(analyzer.feed(&[0.2f32; 100], 1).is_none());
    }
}

//! AppState — shared read-only data passed to all components during render/event.
//!
//! Components read this, but never mutate it. The App event-loop is the only
//! thing that writes to AppState; in particular the candle set is mutated
//! exclusively through `App::dispatch`.

use cake_core::candles::CandleSet;

/// Microphone lifecycle, as visible to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum MicStatus {
    /// Not running (disabled in config, or stopped with `m`).
    Off,
    /// Thread spawned, stream not confirmed yet.
    Starting,
    /// Capturing from `device`.
    Live { device: String, sample_rate: u32 },
    /// Device missing or permission denied — click-only mode.
    Failed(String),
}

/// The full shared state of the application.
pub struct AppState {
    /// Name shown in the banner and celebration overlay.
    pub greeting_name: String,

    // ── Candles ─────────────────────────────────────────────────────────────
    pub cake: CandleSet,

    // ── Audio ───────────────────────────────────────────────────────────────
    /// Normalized loudness [0, 1] from the last analysis frame.
    pub audio_level: f32,
    /// Debounced blowing pulse, mirrored from the detector.
    pub blowing: bool,
    pub mic: MicStatus,

    // ── Celebration ─────────────────────────────────────────────────────────
    /// True while the celebration window is open.
    pub celebrating: bool,

    // ── Pointer / animation ─────────────────────────────────────────────────
    /// Last seen pointer cell, for the banner proximity effect.
    pub pointer: Option<(u16, u16)>,
    /// Animation frame counter; drives flame flicker and confetti.
    pub frame: u64,
}

impl AppState {
    pub fn new(greeting_name: String, mic: MicStatus) -> Self {
        Self {
            greeting_name,
            cake: CandleSet::new(),
            audio_level: 0.0,
            blowing: false,
            mic,
            celebrating: false,
            pointer: None,
            frame: 0,
        }
    }

    pub fn lit_count(&self) -> usize {
        self.cake.lit_count()
    }
}

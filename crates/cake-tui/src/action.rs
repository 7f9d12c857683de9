//! Action enum — all user-initiated intents and internal events.

/// Unique identifier for a drawable panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Banner,
    Bubbles,
    Cake,
    Counter,
    MicMeter,
    CelebrationOverlay,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Candles ──────────────────────────────────────────────────────────────
    /// Place a lit candle at a logical cake-space position (already snapped
    /// onto the silhouette by the click mapper).
    AddCandle { x: f64, y: f64 },
    /// One debounced blow pulse (microphone edge or the `b` key).
    Blow,
    RelightAll,

    // ── Celebration ──────────────────────────────────────────────────────────
    /// The lit count just hit zero — overlays react (confetti burst).
    Celebrate,

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleHelp,
    /// Start the microphone when stopped, stop it when running.
    ToggleMic,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Resize(u16, u16),
}

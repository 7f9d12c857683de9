//! Blow detection — turns a normalized loudness signal into debounced pulses.
//!
//! Every sample above the threshold pushes the revert deadline out by one
//! cool-down, so rapid crossings extend a single `blowing` window instead of
//! stacking overlapping timers. The pulse edge (false → true) fires at most
//! once per window; that edge is what extinguishes candles.

use std::time::{Duration, Instant};

/// Normalized loudness above which a breath is registered.
pub const BLOW_THRESHOLD: f32 = 0.15;

/// How long `blowing` stays high after the most recent crossing.
pub const BLOW_COOLDOWN: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct BlowDetector {
    threshold: f32,
    cooldown: Duration,
    level: f32,
    deadline: Option<Instant>,
}

impl BlowDetector {
    pub fn new(threshold: f32, cooldown: Duration) -> Self {
        Self {
            threshold,
            cooldown,
            level: 0.0,
            deadline: None,
        }
    }

    /// Feed one loudness sample. Returns `true` on the false → true edge of
    /// the blowing pulse; crossings inside an active window only extend it.
    pub fn update(&mut self, level: f32, now: Instant) -> bool {
        self.level = level.clamp(0.0, 1.0);
        let was_blowing = self.blowing(now);
        if self.level > self.threshold {
            self.deadline = Some(now + self.cooldown);
        }
        self.blowing(now) && !was_blowing
    }

    /// Most recent loudness sample, [0, 1].
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn blowing(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now < d)
    }

    /// Back to silence, e.g. when the microphone is released.
    pub fn reset(&mut self) {
        self.level = 0.0;
        self.deadline = None;
    }
}

impl Default for BlowDetector {
    fn default() -> Self {
        Self::new(BLOW_THRESHOLD, BLOW_COOLDOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn crossing_raises_the_pulse_and_cooldown_reverts_it() {
        let mut det = BlowDetector::default();
        let t0 = Instant::now();

        assert!(!det.update(0.05, t0));
        assert!(!det.blowing(t0));

        assert!(det.update(0.20, t0));
        assert!(det.blowing(t0));
        assert!(det.blowing(t0 + ms(999)));
        assert!(!det.blowing(t0 + ms(1000)));
    }

    #[test]
    fn recrossing_extends_the_window_without_a_second_edge() {
        let mut det = BlowDetector::default();
        let t0 = Instant::now();

        assert!(det.update(0.20, t0));
        // second crossing at +500ms: no new edge, revert moves to +1500ms
        assert!(!det.update(0.20, t0 + ms(500)));
        assert!(det.blowing(t0 + ms(1400)));
        assert!(!det.blowing(t0 + ms(1500)));
    }

    #[test]
    fn a_new_window_fires_a_new_edge_after_the_revert() {
        let mut det = BlowDetector::default();
        let t0 = Instant::now();

        assert!(det.update(0.20, t0));
        assert!(!det.update(0.05, t0 + ms(400)));
        assert!(det.update(0.30, t0 + ms(1100)));
        assert!(det.blowing(t0 + ms(2000)));
    }

    #[test]
    fn quiet_samples_never_raise_the_pulse() {
        let mut det = BlowDetector::default();
        let t0 = Instant::now();
        for i in 0..100 {
            assert!(!det.update(0.14, t0 + ms(i * 16)));
        }
        assert!(!det.blowing(t0 + ms(2000)));
    }

    #[test]
    fn reset_clears_level_and_window() {
        let mut det = BlowDetector::default();
        let t0 = Instant::now();
        det.update(0.9, t0);
        det.reset();
        assert_eq!(det.level(), 0.0);
        assert!(!det.blowing(t0));
    }
}

//! Celebration window — fires when the last flame goes out.

use std::time::{Duration, Instant};

/// How long the "all candles out" state is shown.
pub const CELEBRATION_WINDOW: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Default)]
pub struct Celebration {
    last_lit: Option<usize>,
    until: Option<Instant>,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current lit-candle count after every candle-set mutation.
    /// Returns `true` exactly when a celebration starts: the count just went
    /// from positive to zero. Repeated zeros don't re-trigger; re-entry needs
    /// a relight first.
    pub fn observe(&mut self, lit: usize, now: Instant) -> bool {
        let fired = lit == 0 && matches!(self.last_lit, Some(prev) if prev > 0);
        self.last_lit = Some(lit);
        if fired {
            self.until = Some(now + CELEBRATION_WINDOW);
        }
        fired
    }

    pub fn active(&self, now: Instant) -> bool {
        self.until.is_some_and(|u| now < u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_transition_fires_exactly_once_per_transition() {
        let mut cel = Celebration::new();
        let t0 = Instant::now();

        let activations: usize = [1, 1, 0, 0, 0, 1, 0]
            .iter()
            .enumerate()
            .filter(|&(i, &lit)| cel.observe(lit, t0 + Duration::from_millis(i as u64 * 10)))
            .count();
        assert_eq!(activations, 2);
    }

    #[test]
    fn first_observation_of_zero_does_not_fire() {
        // never saw a positive count, so there is no transition
        let mut cel = Celebration::new();
        assert!(!cel.observe(0, Instant::now()));
    }

    #[test]
    fn window_expires_after_three_seconds() {
        let mut cel = Celebration::new();
        let t0 = Instant::now();
        cel.observe(3, t0);
        assert!(cel.observe(0, t0));
        assert!(cel.active(t0));
        assert!(cel.active(t0 + Duration::from_millis(2999)));
        assert!(!cel.active(t0 + Duration::from_millis(3000)));
    }

    #[test]
    fn zeros_inside_the_window_do_not_rearm_it() {
        let mut cel = Celebration::new();
        let t0 = Instant::now();
        cel.observe(1, t0);
        assert!(cel.observe(0, t0));
        assert!(!cel.observe(0, t0 + Duration::from_millis(2000)));
        // the deadline stayed at t0 + 3000
        assert!(!cel.active(t0 + Duration::from_millis(3001)));
    }
}

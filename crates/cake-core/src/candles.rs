//! The candle set — the single owner of every candle on the cake.
//!
//! All mutation goes through this type; `lit_count` is derived from the list
//! on demand, so observers can never see a stale count.

use rand::Rng;

use crate::surface;

/// Maximum number of candles the cake can hold.
pub const MAX_CANDLES: usize = 21;

/// Probability that one lit candle goes out on a single blow pulse.
pub const EXTINGUISH_P: f64 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub id: u32,
    pub lit: bool,
    /// Base position in logical cake space (y down).
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct CandleSet {
    candles: Vec<Candle>,
    next_id: u32,
}

impl CandleSet {
    /// A fresh cake: one lit candle at the apex.
    pub fn new() -> Self {
        let (x, y) = surface::APEX;
        Self {
            candles: vec![Candle {
                id: 1,
                lit: true,
                x,
                y,
            }],
            next_id: 2,
        }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn lit_count(&self) -> usize {
        self.candles.iter().filter(|c| c.lit).count()
    }

    pub fn all_out(&self) -> bool {
        self.lit_count() == 0
    }

    /// Add a lit candle at a (pre-snapped) position. Silently ignored at the
    /// cap; returns the new candle's id when one was added.
    pub fn add(&mut self, x: f64, y: f64) -> Option<u32> {
        if self.candles.len() >= MAX_CANDLES {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.candles.push(Candle {
            id,
            lit: true,
            x,
            y,
        });
        Some(id)
    }

    /// One blow pulse: each lit candle goes out independently with
    /// [`EXTINGUISH_P`]. Returns how many flames went out.
    pub fn blow(&mut self, rng: &mut impl Rng) -> usize {
        self.extinguish_with(EXTINGUISH_P, rng)
    }

    /// Like [`blow`](Self::blow) with an explicit probability.
    pub fn extinguish_with(&mut self, p: f64, rng: &mut impl Rng) -> usize {
        let mut out = 0;
        for candle in self.candles.iter_mut().filter(|c| c.lit) {
            if rng.gen_bool(p.clamp(0.0, 1.0)) {
                candle.lit = false;
                out += 1;
            }
        }
        out
    }

    pub fn relight_all(&mut self) {
        for candle in &mut self.candles {
            candle.lit = true;
        }
    }
}

impl Default for CandleSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn starts_with_one_lit_candle_at_the_apex() {
        let set = CandleSet::new();
        assert_eq!(set.len(), 1);
        assert_eq!(set.lit_count(), 1);
        let first = &set.candles()[0];
        assert_eq!(first.id, 1);
        assert_eq!((first.x, first.y), surface::APEX);
    }

    #[test]
    fn add_beyond_cap_is_a_no_op() {
        let mut set = CandleSet::new();
        for i in 0..40 {
            let x = 80.0 + i as f64;
            set.add(x, surface::top_y(x));
        }
        assert_eq!(set.len(), MAX_CANDLES);
        assert_eq!(set.add(150.0, 130.0), None);
        assert_eq!(set.len(), MAX_CANDLES);
    }

    #[test]
    fn ids_are_unique_and_stable() {
        let mut set = CandleSet::new();
        let a = set.add(100.0, surface::top_y(100.0)).unwrap();
        let b = set.add(200.0, surface::top_y(200.0)).unwrap();
        assert_ne!(a, b);
        let mut rng = StdRng::seed_from_u64(7);
        set.extinguish_with(1.0, &mut rng);
        set.relight_all();
        assert_eq!(set.candles()[1].id, a);
        assert_eq!(set.candles()[2].id, b);
    }

    #[test]
    fn relight_lights_everything() {
        let mut set = CandleSet::new();
        for i in 0..10 {
            let x = 90.0 + 10.0 * i as f64;
            set.add(x, surface::top_y(x));
        }
        let mut rng = StdRng::seed_from_u64(42);
        set.extinguish_with(1.0, &mut rng);
        assert_eq!(set.lit_count(), 0);
        set.relight_all();
        assert_eq!(set.lit_count(), set.len());
    }

    #[test]
    fn blow_never_increases_the_lit_count() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut set = CandleSet::new();
        for i in 0..15 {
            let x = 80.0 + 9.0 * i as f64;
            set.add(x, surface::top_y(x));
        }
        for _ in 0..50 {
            let before = set.lit_count();
            set.blow(&mut rng);
            assert!(set.lit_count() <= before);
            if set.all_out() {
                set.relight_all();
            }
        }
    }

    #[test]
    fn forced_probabilities_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut set = CandleSet::new();
        set.add(120.0, surface::top_y(120.0));
        set.add(180.0, surface::top_y(180.0));

        assert_eq!(set.extinguish_with(0.0, &mut rng), 0);
        assert_eq!(set.lit_count(), 3);

        assert_eq!(set.extinguish_with(1.0, &mut rng), 3);
        assert_eq!(set.lit_count(), 0);

        // already out — nothing left to extinguish
        assert_eq!(set.extinguish_with(1.0, &mut rng), 0);
    }
}

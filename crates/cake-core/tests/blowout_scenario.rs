//! End-to-end model scenario: one breath empties the cake, the celebration
//! window opens, and three seconds later it closes on its own.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use cake_core::candles::CandleSet;
use cake_core::celebration::Celebration;
use cake_core::surface;

#[test]
fn one_forced_breath_triggers_and_ends_a_celebration() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut cake = CandleSet::new();
    let mut celebration = Celebration::new();
    let t0 = Instant::now();

    celebration.observe(cake.lit_count(), t0);
    assert_eq!(cake.lit_count(), 1);

    // forced probability 1.0 stands in for a strong breath
    cake.extinguish_with(1.0, &mut rng);
    assert_eq!(cake.lit_count(), 0);

    assert!(celebration.observe(cake.lit_count(), t0));
    assert!(celebration.active(t0 + Duration::from_millis(1500)));
    assert!(!celebration.active(t0 + Duration::from_millis(3000)));
}

#[test]
fn relight_and_reblow_opens_a_second_window() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut cake = CandleSet::new();
    let mut celebration = Celebration::new();
    let t0 = Instant::now();

    for i in 0..5 {
        let x = 100.0 + 20.0 * i as f64;
        cake.add(x, surface::top_y(x));
    }
    celebration.observe(cake.lit_count(), t0);

    cake.extinguish_with(1.0, &mut rng);
    assert!(celebration.observe(cake.lit_count(), t0));

    cake.relight_all();
    let t1 = t0 + Duration::from_secs(5);
    assert!(!celebration.observe(cake.lit_count(), t1));
    assert!(!celebration.active(t1));

    cake.extinguish_with(1.0, &mut rng);
    assert!(celebration.observe(cake.lit_count(), t1));
    assert!(celebration.active(t1 + Duration::from_millis(2999)));
}

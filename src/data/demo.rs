//! Synthetic activity for running without a data file.
//!
//! Perlin noise gives slow "busy stretches" across the year, weekends dip,
//! and a seeded RNG adds day-to-day scatter. The same seed always yields
//! the same year.

use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::calendar::ContributionDay;

/// Noise frequency in cycles per day.
const SEASON_FREQUENCY: f64 = 1.0 / 45.0;

/// Expected count on the busiest stretch.
const PEAK_RATE: f64 = 14.0;

/// Chance a weekday is skipped entirely.
const IDLE_CHANCE: f64 = 0.18;

const WEEKEND_FACTOR: f64 = 0.3;

/// Generate `days` days of activity, oldest first.
pub fn demo_year(seed: u64, days: usize) -> Vec<ContributionDay> {
    let perlin = Perlin::new(seed as u32);
    let mut rng = StdRng::seed_from_u64(seed);

    (0..days)
        .map(|day| {
            // Perlin output is roughly [-1, 1].
            let season = (perlin.get([day as f64 * SEASON_FREQUENCY, 0.5]) + 1.0) / 2.0;
            let weekend = matches!(day % 7, 0 | 6);

            let mut rate = season.clamp(0.0, 1.0).powi(2) * PEAK_RATE;
            if weekend {
                rate *= WEEKEND_FACTOR;
            }

            let count = if rng.gen_bool(IDLE_CHANCE) {
                0.0
            } else {
                (rate * rng.gen_range(0.0..2.0)).floor()
            };

            ContributionDay::new(count, format!("day {}", day + 1))
        })
        .collect()
}

//! Seeded synthetic rate data
//!
//! Mirrors the demo dataset the dashboard ships with: for each region a
//! starting offset plus a cumulative sum of small annual increases.

use super::{RateTable, Record, Region};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// First year of the synthetic series
pub const FIRST_YEAR: i32 = 2000;

/// Last year of the synthetic series (inclusive)
pub const LAST_YEAR: i32 = 2025;

/// Seed used by the bundled dataset
pub const DEFAULT_SEED: u64 = 42;

/// Generate a rate table for every region over `FIRST_YEAR..=LAST_YEAR`.
///
/// Records are grouped by region, then ordered by year. Each annual step
/// is a uniform integer in [1, 4]; each region's offset is in [5, 14].
pub fn synthetic_rates(seed: u64) -> RateTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut table = RateTable::new();

    for region in Region::ALL {
        let steps: Vec<u32> = (FIRST_YEAR..=LAST_YEAR).map(|_| rng.gen_range(1..5)).collect();
        let offset: u32 = rng.gen_range(5..15);

        let mut cumulative = 0;
        for (year, step) in (FIRST_YEAR..=LAST_YEAR).zip(steps) {
            cumulative += step;
            // Non-negative by construction
            if let Some(record) = Record::new(year, region, f64::from(cumulative + offset)) {
                table.push(record);
            }
        }
    }

    table
}

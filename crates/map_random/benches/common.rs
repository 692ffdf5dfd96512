#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const SAMPLE_SIZE: usize = 30;
pub const WARM_UP: Duration = Duration::from_millis(500);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

/// One element per grid cell visited.
pub fn cells_throughput(columns: usize, rows: usize) -> Throughput {
    Throughput::Elements(columns.saturating_mul(rows).max(1) as u64)
}

/// One element per value drawn or resolved.
pub fn draws_throughput(draws: usize) -> Throughput {
    Throughput::Elements(draws.max(1) as u64)
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

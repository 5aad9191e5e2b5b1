//! Shared helpers for segstream benchmarks.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use segstream_testkit::fixtures::CatalogRecord;

/// Builds a seeded catalog with randomized variant fan-out.
///
/// Deterministic across runs so benchmark numbers stay comparable.
#[must_use]
pub fn bench_catalog(n: u64, seed: u64) -> Vec<CatalogRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|position| {
            let mut record = CatalogRecord::at(position);
            record.variant_count = rng.gen_range(0..6);
            record.price_cents = rng.gen_range(100..100_000);
            record
        })
        .collect()
}

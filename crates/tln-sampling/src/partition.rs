//! Exact uniform random integer partitions.
//!
//! The sampler walks the standard recurrence for the number of partitions
//! of `q` into exactly `n` positive parts,
//!
//! ```text
//! p(q, n) = p(q-1, n-1) + p(q-n, n)
//! ```
//!
//! choosing at each step between "smallest part is 1" and "subtract 1 from
//! every part" with probability proportional to the two branch counts. The
//! draw is exact and unbiased; counts are tabulated in `u128` and the build
//! fails with a `Computation` error if a count overflows.

use rand::{Rng, RngCore};
use tln_core::traits::{PartitionDraw, PartitionSampler};
use tln_core::{Error, Result};

/// Table of `p(q, n)` for `0 <= q <= q_max`, `0 <= n <= n_max`.
#[derive(Debug, Clone)]
pub struct CountTable {
    n_max: u64,
    counts: Vec<u128>,
}

impl CountTable {
    /// Tabulate partition counts up to `(q_max, n_max)`.
    pub fn build(q_max: u64, n_max: u64) -> Result<Self> {
        let rows = (q_max + 1) as usize;
        let cols = (n_max + 1) as usize;
        let mut counts = vec![0u128; rows * cols];
        counts[0] = 1; // p(0, 0)

        for q in 1..=q_max as usize {
            let n_hi = (q as u64).min(n_max) as usize;
            for n in 1..=n_hi {
                let with_one = counts[(q - 1) * cols + (n - 1)];
                let shifted = if q >= n { counts[(q - n) * cols + n] } else { 0 };
                counts[q * cols + n] = with_one.checked_add(shifted).ok_or_else(|| {
                    Error::Computation(format!("partition count overflow at p({q}, {n})"))
                })?;
            }
        }
        Ok(Self { n_max, counts })
    }

    /// `p(q, n)`: the number of partitions of `q` into exactly `n` positive parts.
    pub fn count(&self, q: u64, n: u64) -> u128 {
        let cols = (self.n_max + 1) as usize;
        self.counts[q as usize * cols + n as usize]
    }
}

/// Draw one uniform partition of `q` into exactly `n` positive parts,
/// returned in descending order.
fn sample_exact<R: Rng + ?Sized>(rng: &mut R, table: &CountTable, q: u64, n: u64) -> Vec<u64> {
    let mut parts = Vec::with_capacity(n as usize);
    let mut shift = 0u64;
    let (mut q, mut m) = (q, n);
    while m > 0 {
        let total = table.count(q, m);
        debug_assert!(total > 0, "unreachable state q={q} m={m}");
        let u = rng.random_range(0..total);
        if u < table.count(q - 1, m - 1) {
            // Smallest remaining part is exactly 1 (plus accumulated shift).
            parts.push(1 + shift);
            q -= 1;
            m -= 1;
        } else {
            // All remaining parts are >= 2: peel one unit off each.
            q -= m;
            shift += 1;
        }
    }
    // Parts were emitted smallest-first.
    parts.reverse();
    parts
}

/// Exact uniform partition sampler backed by a [`CountTable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CountTableSampler;

/// Prepared state for one (Q, N) shape: the tabulated counts plus the
/// zeros-mode shift applied to each draw.
#[derive(Debug, Clone)]
pub struct PreparedPartitions {
    table: CountTable,
    q_eff: u64,
    n: u64,
    zeros: bool,
}

impl PartitionDraw for PreparedPartitions {
    fn draw(&self, rng: &mut dyn RngCore) -> Vec<u64> {
        let mut parts = sample_exact(rng, &self.table, self.q_eff, self.n);
        if self.zeros {
            for p in &mut parts {
                *p -= 1;
            }
        }
        parts
    }
}

impl PartitionSampler for CountTableSampler {
    fn prepare(&self, q: u64, n: u64, zeros: bool) -> Result<Box<dyn PartitionDraw>> {
        if n == 0 {
            return Err(Error::Validation("partition needs at least 1 part".to_string()));
        }
        if !zeros && q < n {
            return Err(Error::Validation(format!(
                "no partitions of {q} into {n} positive parts"
            )));
        }

        // Zeros-allowed partitions of q into at most n parts biject onto
        // partitions of q + n into exactly n positive parts.
        let q_eff = if zeros { q + n } else { q };
        let table = CountTable::build(q_eff, n)?;
        Ok(Box::new(PreparedPartitions { table, q_eff, n, zeros }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    #[test]
    fn count_table_matches_known_values() {
        let table = CountTable::build(12, 12).unwrap();
        assert_eq!(table.count(0, 0), 1);
        assert_eq!(table.count(5, 2), 2); // 4+1, 3+2
        assert_eq!(table.count(6, 3), 3); // 4+1+1, 3+2+1, 2+2+2
        assert_eq!(table.count(10, 3), 8);
        for q in 1..=12u64 {
            assert_eq!(table.count(q, 1), 1);
            assert_eq!(table.count(q, q), 1);
        }
        // Row sums give the unrestricted partition numbers.
        let p7: u128 = (1..=7).map(|n| table.count(7, n)).sum();
        assert_eq!(p7, 15);
    }

    #[test]
    fn samples_are_valid_descending_positive_partitions() {
        let mut rng = StdRng::seed_from_u64(11);
        let parts = CountTableSampler
            .sample_uniform_partitions(&mut rng, 20, 4, 100, false)
            .unwrap();
        assert_eq!(parts.len(), 100);
        for part in &parts {
            assert_eq!(part.len(), 4);
            assert_eq!(part.iter().sum::<u64>(), 20);
            assert!(part.iter().all(|&p| p >= 1));
            assert!(part.windows(2).all(|w| w[0] >= w[1]), "not descending: {part:?}");
        }
    }

    #[test]
    fn all_partitions_of_small_case_are_reached() {
        let mut rng = StdRng::seed_from_u64(5);
        let draws = CountTableSampler
            .sample_uniform_partitions(&mut rng, 6, 3, 500, false)
            .unwrap();
        let seen: BTreeSet<Vec<u64>> = draws.into_iter().collect();
        let expected: BTreeSet<Vec<u64>> =
            [vec![4, 1, 1], vec![3, 2, 1], vec![2, 2, 2]].into_iter().collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn zeros_mode_pads_with_zero_parts() {
        let mut rng = StdRng::seed_from_u64(9);
        let draws = CountTableSampler
            .sample_uniform_partitions(&mut rng, 4, 3, 400, true)
            .unwrap();
        let seen: BTreeSet<Vec<u64>> = draws.into_iter().collect();
        let expected: BTreeSet<Vec<u64>> = [
            vec![4, 0, 0],
            vec![3, 1, 0],
            vec![2, 2, 0],
            vec![2, 1, 1],
        ]
        .into_iter()
        .collect();
        assert_eq!(seen, expected);
        for part in &seen {
            assert_eq!(part.iter().sum::<u64>(), 4);
        }
    }

    #[test]
    fn prepared_drawer_is_reusable_across_draws() {
        let mut rng = StdRng::seed_from_u64(3);
        let drawer = CountTableSampler.prepare(10, 3, false).unwrap();
        for _ in 0..50 {
            let part = drawer.draw(&mut rng);
            assert_eq!(part.len(), 3);
            assert_eq!(part.iter().sum::<u64>(), 10);
        }
    }

    #[test]
    fn q_below_n_without_zeros_is_an_error() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(CountTableSampler
            .sample_uniform_partitions(&mut rng, 2, 5, 1, false)
            .is_err());
        // With zeros it is fine: 2 into at most 5 parts.
        let draws = CountTableSampler
            .sample_uniform_partitions(&mut rng, 2, 5, 10, true)
            .unwrap();
        for part in &draws {
            assert_eq!(part.len(), 5);
            assert_eq!(part.iter().sum::<u64>(), 2);
        }
    }
}

//! Uniform random weak compositions.
//!
//! A weak composition of Q into N parts is an ordered sequence of N
//! non-negative integers summing to Q. Sampling works by dropping N-1
//! cut-points uniformly into `[0, Q)` and taking successive differences;
//! repeated cut-points collapse into zero-length parts, which is how
//! zero-valued parts arise.

use std::collections::BTreeSet;

use rand::Rng;
use tln_core::{Error, Result};

/// Draw one uniform weak composition of `q` into `n` parts.
///
/// `q = 0` yields all-zero parts. `n = 0` is a validation error.
pub fn random_weak_composition<R: Rng + ?Sized>(rng: &mut R, q: u64, n: u64) -> Result<Vec<u64>> {
    if n == 0 {
        return Err(Error::Validation("composition needs at least 1 part".to_string()));
    }
    if q == 0 {
        return Ok(vec![0; n as usize]);
    }

    let mut cuts: Vec<u64> = (0..n - 1).map(|_| rng.random_range(0..q)).collect();
    cuts.sort_unstable();

    let mut parts = Vec::with_capacity(n as usize);
    let mut prev = 0u64;
    for &cut in &cuts {
        parts.push(cut - prev);
        prev = cut;
    }
    parts.push(q - prev);
    Ok(parts)
}

/// Draw `target` weak compositions of `q` into `n` parts and return the
/// distinct ones, each sorted in descending order.
///
/// Deduplication happens after the raw draws, so the returned set may be
/// smaller than `target`: the nominal sample size is an upper bound, not a
/// guarantee. Every raw draw is checked against its own postcondition
/// (length `n`, sum `q`); a violation is a bug in the sampler and panics.
///
/// `zeros` records whether the caller permits zero-valued parts; the weak
/// composition draw always does, so the flag only labels diagnostics.
pub fn distinct_compositions<R: Rng + ?Sized>(
    rng: &mut R,
    q: u64,
    n: u64,
    target: usize,
    zeros: bool,
) -> Result<Vec<Vec<u64>>> {
    let mut raw: Vec<Vec<u64>> = Vec::with_capacity(target);
    while raw.len() < target {
        let mut comp = random_weak_composition(rng, q, n)?;
        let sum: u64 = comp.iter().sum();
        assert!(
            comp.len() == n as usize && sum == q,
            "composition postcondition violated (zeros={zeros}): q={q} sum={sum} n={n} len={}",
            comp.len()
        );
        comp.sort_unstable_by(|a, b| b.cmp(a));
        raw.push(comp);
    }

    let distinct: BTreeSet<Vec<u64>> = raw.into_iter().collect();
    Ok(distinct.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn composition_has_n_parts_summing_to_q() {
        let mut rng = StdRng::seed_from_u64(7);
        for q in [0u64, 1, 5, 10, 100] {
            for n in [1u64, 2, 3, 7] {
                for _ in 0..50 {
                    let comp = random_weak_composition(&mut rng, q, n).unwrap();
                    assert_eq!(comp.len(), n as usize, "q={q} n={n}");
                    assert_eq!(comp.iter().sum::<u64>(), q, "q={q} n={n}");
                }
            }
        }
    }

    #[test]
    fn zero_total_gives_all_zero_parts() {
        let mut rng = StdRng::seed_from_u64(1);
        let comp = random_weak_composition(&mut rng, 0, 4).unwrap();
        assert_eq!(comp, vec![0, 0, 0, 0]);
    }

    #[test]
    fn single_part_is_the_total() {
        let mut rng = StdRng::seed_from_u64(1);
        let comp = random_weak_composition(&mut rng, 9, 1).unwrap();
        assert_eq!(comp, vec![9]);
    }

    #[test]
    fn zero_parts_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(random_weak_composition(&mut rng, 5, 0).is_err());
    }

    #[test]
    fn distinct_set_size_is_bounded_by_target() {
        let mut rng = StdRng::seed_from_u64(42);
        let comps = distinct_compositions(&mut rng, 10, 3, 200, true).unwrap();
        assert!(!comps.is_empty());
        assert!(comps.len() <= 200);
        for comp in &comps {
            assert_eq!(comp.len(), 3);
            assert_eq!(comp.iter().sum::<u64>(), 10);
            assert!(comp.windows(2).all(|w| w[0] >= w[1]), "not descending: {comp:?}");
        }
    }

    #[test]
    fn distinct_set_collapses_duplicates() {
        // Q=1, N=2 has only two weak compositions; descending-sorted they
        // collapse to the single multiset {1, 0}.
        let mut rng = StdRng::seed_from_u64(3);
        let comps = distinct_compositions(&mut rng, 1, 2, 50, true).unwrap();
        assert_eq!(comps, vec![vec![1, 0]]);
    }
}

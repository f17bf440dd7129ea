//! Core traits for tlnull
//!
//! The partition-generation capability is an external collaborator from the
//! analysis pipeline's point of view: the variance sampling engine only
//! assumes "given Q, N, and a count, return uniformly-sampled partitions".
//! This trait is that seam.

use rand::RngCore;

use crate::Result;

/// Uniform random partition sampling capability.
///
/// Implementations must be unbiased and exact (no approximate sampling).
/// Sampling is split into a per-(Q, N) [`prepare`](PartitionSampler::prepare)
/// step and per-draw calls on the returned [`PartitionDraw`], so callers
/// drawing many partitions of the same shape pay any tabulation cost once.
pub trait PartitionSampler {
    /// Validate `(q, n)` and build the per-combination sampling state.
    ///
    /// With `zeros = false` parts are strictly positive (requires `q >= n`);
    /// with `zeros = true` parts may be zero (partitions of `q` into at most
    /// `n` parts, padded with zeros to length `n`).
    fn prepare(&self, q: u64, n: u64, zeros: bool) -> Result<Box<dyn PartitionDraw>>;

    /// Draw `count` partitions of `q` into `n` parts, uniformly at random.
    fn sample_uniform_partitions(
        &self,
        rng: &mut dyn RngCore,
        q: u64,
        n: u64,
        count: usize,
        zeros: bool,
    ) -> Result<Vec<Vec<u64>>> {
        let drawer = self.prepare(q, n, zeros)?;
        Ok((0..count).map(|_| drawer.draw(rng)).collect())
    }
}

/// Per-(Q, N) sampling state produced by [`PartitionSampler::prepare`].
///
/// Each call yields one partition, sorted in descending order and summing
/// to exactly the prepared `q`.
pub trait PartitionDraw {
    /// Draw one uniform partition.
    fn draw(&self, rng: &mut dyn RngCore) -> Vec<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantSampler;

    struct ConstantDraw {
        part: Vec<u64>,
    }

    impl PartitionDraw for ConstantDraw {
        fn draw(&self, _rng: &mut dyn RngCore) -> Vec<u64> {
            self.part.clone()
        }
    }

    impl PartitionSampler for ConstantSampler {
        fn prepare(&self, q: u64, n: u64, _zeros: bool) -> Result<Box<dyn PartitionDraw>> {
            let mut part = vec![q - n + 1];
            part.extend(std::iter::repeat(1).take((n - 1) as usize));
            Ok(Box::new(ConstantDraw { part }))
        }
    }

    #[test]
    fn trait_is_object_safe() {
        let sampler: &dyn PartitionSampler = &ConstantSampler;
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let parts = sampler.sample_uniform_partitions(&mut rng, 5, 3, 2, false).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].iter().sum::<u64>(), 5);
    }
}

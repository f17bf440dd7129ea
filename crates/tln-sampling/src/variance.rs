//! Deadline-bounded variance sampling engine.
//!
//! For one (Q, N) combination the engine repeatedly draws a single sample
//! from the null model (a uniform partition or a uniform weak composition)
//! and records its sample variance. The whole operation runs under an
//! explicit monotonic-clock deadline checked once per draw: when the
//! deadline expires the variances accumulated so far are returned as a
//! partial result, so the worst-case overrun is the cost of one draw.
//! Callers must treat any result shorter than `sample_size` as "this (Q, N)
//! combination was skipped".

use std::time::{Duration, Instant};

use rand::RngCore;
use tln_core::traits::PartitionSampler;
use tln_core::types::AnalysisMode;
use tln_core::Result;

use crate::composition::distinct_compositions;

/// Sample variance with Bessel's correction (divide by n - 1).
///
/// Returns `NaN` for fewer than two values, matching the upstream
/// convention that such combinations are filtered before analysis.
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    ss / (n - 1.0)
}

/// Draw up to `sample_size` null-model samples for one (Q, N) combination
/// and return the sample variance of each.
///
/// The result is shorter than `sample_size` exactly when the `t_limit`
/// deadline expired first; `t_limit = 0` returns an empty vector.
pub fn variances_for_qn(
    rng: &mut dyn RngCore,
    partitions: &dyn PartitionSampler,
    q: u64,
    n: u64,
    sample_size: usize,
    t_limit: Duration,
    mode: AnalysisMode,
) -> Result<Vec<f64>> {
    let deadline = Instant::now() + t_limit;
    let mut variances = Vec::with_capacity(sample_size);

    // Tabulation happens once per (Q, N) shape, outside the draw loop.
    let drawer = match mode {
        AnalysisMode::Partition => Some(partitions.prepare(q, n, true)?),
        AnalysisMode::Composition => None,
    };

    for _ in 0..sample_size {
        if Instant::now() >= deadline {
            tracing::warn!(q, n, drawn = variances.len(), %mode, "deadline expired, partial result");
            return Ok(variances);
        }
        let parts = match &drawer {
            Some(d) => d.draw(rng),
            None => {
                let mut drawn = distinct_compositions(rng, q, n, 1, true)?;
                drawn.swap_remove(0)
            }
        };
        let values: Vec<f64> = parts.iter().map(|&p| p as f64).collect();
        variances.push(sample_variance(&values));
    }
    Ok(variances)
}

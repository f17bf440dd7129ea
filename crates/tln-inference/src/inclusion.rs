//! Inclusion criteria deciding which empirical studies enter the analysis.

use tln_core::types::QnRecord;

use crate::regress::fit_loglog;

/// Thresholds for study admission. Defaults match the published analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InclusionConfig {
    /// Minimum Q for a (Q, N) pair to count.
    pub q_min: u64,
    /// Minimum N for a (Q, N) pair to count.
    pub n_min: u64,
    /// Minimum number of qualifying pairs.
    pub min_points: usize,
    /// Whether the empirical regression must be significant (p < 0.05).
    pub require_significance: bool,
}

impl Default for InclusionConfig {
    fn default() -> Self {
        Self { q_min: 5, n_min: 3, min_points: 5, require_significance: false }
    }
}

/// Decide whether a study qualifies for analysis.
///
/// The significance test runs on the regression over *all* pairs, while the
/// count threshold applies to the pairs surviving the Q/N filter. That
/// asymmetry is inherited from the source analysis and preserved on
/// purpose. A study whose regression cannot be fit (fewer than three rows,
/// or non-positive inputs) is never significant, so it is excluded rather
/// than treated as an error.
pub fn meets_inclusion_criteria(records: &[QnRecord], config: &InclusionConfig) -> bool {
    let qualifying =
        records.iter().filter(|r| r.n >= config.n_min && r.q >= config.q_min).count();
    if qualifying < config.min_points {
        return false;
    }
    if !config.require_significance {
        return true;
    }

    let means: Vec<f64> = records.iter().map(|r| r.mean).collect();
    let vars: Vec<f64> = records.iter().map(|r| r.var).collect();
    match fit_loglog(&means, &vars) {
        Ok(fit) => fit.p_value < 0.05,
        Err(err) => {
            tracing::warn!(%err, "degenerate empirical regression, study excluded");
            false
        }
    }
}

//! # tln-inference
//!
//! Statistical comparison of empirical Taylor's Law fits against the
//! null-model distribution built from random partitions or compositions.
//!
//! All functions here are pure computation producing record values; the
//! append-mode output sinks live in `tln-cli`.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Study admission thresholds and decision.
pub mod inclusion;
/// Retrospective and forward null-model comparators.
pub mod nullmodel;
/// Log-log OLS regression with slope significance.
pub mod regress;
/// Means, medians, percentiles, z-scores.
pub mod summary;

pub use inclusion::{meets_inclusion_criteria, InclusionConfig};
pub use nullmodel::{sample_study_variances, tl_analysis_study, tl_from_sample};
pub use regress::{fit_loglog, linregress, LinFit};
pub use summary::{mean, median, quantile_linear, z_score};

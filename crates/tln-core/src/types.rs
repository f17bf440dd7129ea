//! Common data types for tlnull

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Which null model the sampling engine draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisMode {
    /// Uniform random partitions of Q into N parts.
    Partition,
    /// Uniform random weak compositions of Q into N parts.
    Composition,
}

impl AnalysisMode {
    /// Suffix used in output file names (`taylor_QN_var_predicted_<analysis>.txt` etc.).
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Partition => "partition",
            AnalysisMode::Composition => "composition",
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnalysisMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "partition" => Ok(AnalysisMode::Partition),
            "composition" => Ok(AnalysisMode::Composition),
            other => Err(Error::Validation(format!(
                "unknown analysis mode '{other}' (expected 'partition' or 'composition')"
            ))),
        }
    }
}

/// One row of the QN-mean-variance table: a (Q, N) combination observed in
/// one empirical study, with the abundance mean and variance across parts.
///
/// Immutable once read from source data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QnRecord {
    /// Study identifier.
    pub study: String,
    /// Total abundance Q.
    pub q: u64,
    /// Number of parts N.
    pub n: u64,
    /// Empirical mean abundance per part.
    pub mean: f64,
    /// Empirical variance of abundance across parts.
    pub var: f64,
}

impl QnRecord {
    /// Check the Q >= N invariant required for partitioning Q into N positive parts.
    pub fn validate(&self) -> Result<()> {
        if self.q < self.n {
            return Err(Error::Validation(format!(
                "study '{}': Q={} < N={}",
                self.study, self.q, self.n
            )));
        }
        Ok(())
    }
}

/// One row of the study metadata table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyInfo {
    /// Study identifier.
    pub study: String,
    /// Taxon covered by the study.
    pub taxon: String,
    /// Study type (spatial or temporal).
    #[serde(rename = "type")]
    pub kind: String,
}

/// One row of the variance-sample table: a [`QnRecord`] followed by the
/// `sample_size` simulated variance columns written by `sample-var`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarSampleRow {
    /// The empirical (Q, N) combination.
    pub record: QnRecord,
    /// Simulated variances, one per null-model draw (`sample1..sampleK`).
    pub samples: Vec<f64>,
}

/// Per-(Q, N) summary of the simulated variance distribution.
///
/// Column order matches `taylor_QN_var_predicted_<analysis>.txt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceSummary {
    /// Study identifier.
    pub study: String,
    /// Total abundance Q.
    pub q: u64,
    /// Number of parts N.
    pub n: u64,
    /// Mean of the simulated variances.
    pub mean: f64,
    /// Median of the simulated variances.
    pub median: f64,
    /// 2.5th percentile of the simulated variances.
    pub lower: f64,
    /// 97.5th percentile of the simulated variances.
    pub upper: f64,
}

/// Per-study comparison of the empirical Taylor's Law fit against the
/// null-model distribution of fits, from pre-computed variance samples.
///
/// Column order matches `TL_form_<analysis>.txt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TlFormRecord {
    /// Study identifier.
    pub study: String,
    /// Empirical slope b.
    pub emp_b: f64,
    /// Empirical intercept.
    pub emp_inter: f64,
    /// Empirical R².
    pub emp_r2: f64,
    /// Empirical p-value.
    pub emp_p: f64,
    /// Mean slope across simulations.
    pub sim_b_mean: f64,
    /// Mean intercept across simulations.
    pub sim_inter_mean: f64,
    /// Mean R² across simulations.
    pub sim_r2_mean: f64,
    /// Fraction of simulations with p < 0.05.
    pub p_sig: f64,
    /// Z-score of the empirical slope against the simulated slopes.
    pub z_b: f64,
    /// 2.5th percentile of simulated slopes.
    pub b_lower: f64,
    /// 97.5th percentile of simulated slopes.
    pub b_upper: f64,
    /// Z-score of the empirical intercept against the simulated intercepts.
    pub z_inter: f64,
    /// 2.5th percentile of simulated intercepts.
    pub inter_lower: f64,
    /// 97.5th percentile of simulated intercepts.
    pub inter_upper: f64,
}

/// Per-study summary of the null-model Taylor's Law form from freshly
/// sampled variance vectors.
///
/// Column order matches `taylor_form_predicted_<analysis>.txt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TlFormPredictedRecord {
    /// Study identifier.
    pub study: String,
    /// Fraction of simulations with p < 0.05.
    pub p_sig: f64,
    /// Mean R² across simulations.
    pub r2_mean: f64,
    /// Mean slope across simulations.
    pub b_mean: f64,
    /// Median slope across simulations.
    pub b_median: f64,
    /// 2.5th percentile of simulated slopes.
    pub b_lower: f64,
    /// 97.5th percentile of simulated slopes.
    pub b_upper: f64,
    /// Mean intercept across simulations.
    pub inter_mean: f64,
    /// Median intercept across simulations.
    pub inter_median: f64,
    /// 2.5th percentile of simulated intercepts.
    pub inter_lower: f64,
    /// 97.5th percentile of simulated intercepts.
    pub inter_upper: f64,
}

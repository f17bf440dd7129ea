//! Null-model comparators for Taylor's Law.
//!
//! Two variants, both pure (no file I/O; sinks live in the CLI):
//!
//! - [`tl_from_sample`]: retrospective comparison over a table of
//!   pre-computed variance columns (one regression per simulation column).
//! - [`tl_analysis_study`]: forward comparison over freshly sampled
//!   per-(Q, N) variance vectors, producing per-combination summaries plus
//!   one per-study form record.
//!
//! A study whose sampling is incomplete (any (Q, N) combination cut short
//! by the deadline) is skipped entirely; [`sample_study_variances`] returns
//! `None` in that case and no partial output is ever produced.

use std::time::Duration;

use rand::RngCore;
use tln_core::traits::PartitionSampler;
use tln_core::types::{
    AnalysisMode, QnRecord, TlFormPredictedRecord, TlFormRecord, VarSampleRow, VarianceSummary,
};
use tln_core::{Error, Result};
use tln_sampling::variance::variances_for_qn;

use crate::regress::{fit_loglog, LinFit};
use crate::summary::{mean, median, quantile_linear, z_score};

/// Significance level for counting significant simulated fits.
pub const ALPHA: f64 = 0.05;
/// Lower percentile of the simulated distributions (2.5%).
pub const PCT_LOWER: f64 = 0.025;
/// Upper percentile of the simulated distributions (97.5%).
pub const PCT_UPPER: f64 = 0.975;

/// Slope/intercept/R²/significance accumulated across simulated fits.
#[derive(Debug, Default)]
struct SimAccumulator {
    b: Vec<f64>,
    inter: Vec<f64>,
    r2: Vec<f64>,
    n_sig: usize,
}

impl SimAccumulator {
    fn push(&mut self, fit: &LinFit) {
        self.b.push(fit.slope);
        self.inter.push(fit.intercept);
        self.r2.push(fit.r2);
        if fit.p_value < ALPHA {
            self.n_sig += 1;
        }
    }

    fn p_sig(&self, n_sims: usize) -> f64 {
        self.n_sig as f64 / n_sims as f64
    }
}

/// Regress one simulation's variances against the empirical means.
///
/// Rows whose simulated variance is not strictly positive are dropped
/// first; this removes both zero variances (constant draws) and NaN
/// variances (N = 1 combinations, where a single part has no variance).
fn fit_simulated_column(means: &[f64], sim_vars: &[f64]) -> Result<LinFit> {
    let mut m = Vec::with_capacity(means.len());
    let mut v = Vec::with_capacity(sim_vars.len());
    for (&mi, &vi) in means.iter().zip(sim_vars) {
        if vi > 0.0 {
            m.push(mi);
            v.push(vi);
        }
    }
    fit_loglog(&m, &v)
}

/// Per-study retrospective comparison from a variance-sample table.
///
/// Groups rows by study (sorted order), fits the empirical log-log
/// regression across the study's (Q, N) rows, re-fits each simulation
/// column independently, and emits one [`TlFormRecord`] per study. A study
/// whose regressions are degenerate (fewer than three usable rows, or
/// non-positive inputs) is skipped with a warning so the rest of the batch
/// still runs.
pub fn tl_from_sample(rows: &[VarSampleRow]) -> Vec<TlFormRecord> {
    let mut studies: Vec<&str> = rows.iter().map(|r| r.record.study.as_str()).collect();
    studies.sort_unstable();
    studies.dedup();

    let mut out = Vec::with_capacity(studies.len());
    for study in studies {
        let study_rows: Vec<&VarSampleRow> =
            rows.iter().filter(|r| r.record.study == study).collect();
        match study_form_record(study, &study_rows) {
            Ok(record) => out.push(record),
            Err(err) => tracing::warn!(%study, %err, "study skipped"),
        }
    }
    out
}

fn study_form_record(study: &str, study_rows: &[&VarSampleRow]) -> Result<TlFormRecord> {
    let n_sims = study_rows[0].samples.len();
    if study_rows.iter().any(|r| r.samples.len() != n_sims) {
        return Err(Error::Validation(format!(
            "study '{study}': inconsistent sample column counts"
        )));
    }

    let means: Vec<f64> = study_rows.iter().map(|r| r.record.mean).collect();
    let vars: Vec<f64> = study_rows.iter().map(|r| r.record.var).collect();
    let emp = fit_loglog(&means, &vars)?;

    let mut acc = SimAccumulator::default();
    for k in 0..n_sims {
        let sim_vars: Vec<f64> = study_rows.iter().map(|r| r.samples[k]).collect();
        let fit = fit_simulated_column(&means, &sim_vars)?;
        acc.push(&fit);
    }

    Ok(TlFormRecord {
        study: study.to_string(),
        emp_b: emp.slope,
        emp_inter: emp.intercept,
        emp_r2: emp.r2,
        emp_p: emp.p_value,
        sim_b_mean: mean(&acc.b),
        sim_inter_mean: mean(&acc.inter),
        sim_r2_mean: mean(&acc.r2),
        p_sig: acc.p_sig(n_sims),
        z_b: z_score(emp.slope, &acc.b),
        b_lower: quantile_linear(&acc.b, PCT_LOWER),
        b_upper: quantile_linear(&acc.b, PCT_UPPER),
        z_inter: z_score(emp.intercept, &acc.inter),
        inter_lower: quantile_linear(&acc.inter, PCT_LOWER),
        inter_upper: quantile_linear(&acc.inter, PCT_UPPER),
    })
}

/// Draw `sample_size` variances for every (Q, N) combination of one study.
///
/// Returns `None` as soon as any combination comes back short of
/// `sample_size` (deadline expiry): the whole study is skipped and no
/// partial result leaks downstream.
pub fn sample_study_variances(
    rng: &mut dyn RngCore,
    partitions: &dyn PartitionSampler,
    combos: &[QnRecord],
    sample_size: usize,
    t_limit: Duration,
    mode: AnalysisMode,
) -> Result<Option<Vec<Vec<f64>>>> {
    let mut var_parts = Vec::with_capacity(combos.len());
    for rec in combos {
        let vars =
            variances_for_qn(rng, partitions, rec.q, rec.n, sample_size, t_limit, mode)?;
        if vars.len() < sample_size {
            tracing::warn!(
                study = %rec.study,
                q = rec.q,
                n = rec.n,
                drawn = vars.len(),
                "incomplete sampling, skipping study"
            );
            return Ok(None);
        }
        tracing::debug!(study = %rec.study, q = rec.q, n = rec.n, "combination sampled");
        var_parts.push(vars);
    }
    Ok(Some(var_parts))
}

/// Per-combination forward comparison for one fully sampled study.
///
/// `var_parts[i]` holds the `sample_size` simulated variances for
/// `combos[i]`. Produces the per-combination distribution summaries and the
/// per-study form record. The reported median slope is `median(b_list)`
/// across simulations (see DESIGN notes on the defect fixed here).
pub fn tl_analysis_study(
    combos: &[QnRecord],
    var_parts: &[Vec<f64>],
) -> Result<(Vec<VarianceSummary>, TlFormPredictedRecord)> {
    if combos.is_empty() {
        return Err(Error::Validation("tl_analysis_study needs at least one combination".into()));
    }
    if combos.len() != var_parts.len() {
        return Err(Error::Validation(format!(
            "combos and variance vectors disagree: {} vs {}",
            combos.len(),
            var_parts.len()
        )));
    }
    let sample_size = var_parts[0].len();
    if sample_size == 0 || var_parts.iter().any(|v| v.len() != sample_size) {
        return Err(Error::Validation("variance vectors must share a positive length".into()));
    }

    let summaries: Vec<VarianceSummary> = combos
        .iter()
        .zip(var_parts)
        .map(|(rec, vars)| VarianceSummary {
            study: rec.study.clone(),
            q: rec.q,
            n: rec.n,
            mean: mean(vars),
            median: median(vars),
            lower: quantile_linear(vars, PCT_LOWER),
            upper: quantile_linear(vars, PCT_UPPER),
        })
        .collect();

    let means: Vec<f64> = combos.iter().map(|r| r.mean).collect();
    let mut acc = SimAccumulator::default();
    for i in 0..sample_size {
        let sim_vars: Vec<f64> = var_parts.iter().map(|vp| vp[i]).collect();
        let fit = fit_simulated_column(&means, &sim_vars)?;
        acc.push(&fit);
    }

    let record = TlFormPredictedRecord {
        study: combos[0].study.clone(),
        p_sig: acc.p_sig(sample_size),
        r2_mean: mean(&acc.r2),
        b_mean: mean(&acc.b),
        b_median: median(&acc.b),
        b_lower: quantile_linear(&acc.b, PCT_LOWER),
        b_upper: quantile_linear(&acc.b, PCT_UPPER),
        inter_mean: mean(&acc.inter),
        inter_median: median(&acc.inter),
        inter_lower: quantile_linear(&acc.inter, PCT_LOWER),
        inter_upper: quantile_linear(&acc.inter, PCT_UPPER),
    };

    Ok((summaries, record))
}

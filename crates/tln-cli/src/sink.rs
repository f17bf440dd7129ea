//! Append-mode tab-delimited output sinks.
//!
//! Each function opens its file, appends, flushes, and closes — one call
//! per logical unit of work (per study), so partial runs stay resumable by
//! re-invocation. Re-running appends rows rather than overwriting; callers
//! deduplicate or truncate externally.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tln_core::types::{
    AnalysisMode, TlFormPredictedRecord, TlFormRecord, VarSampleRow, VarianceSummary,
};

/// `taylor_QN_var_predicted_<analysis>_full.txt`
pub fn var_full_path(out_dir: &Path, mode: AnalysisMode) -> PathBuf {
    out_dir.join(format!("taylor_QN_var_predicted_{mode}_full.txt"))
}

/// `TL_form_<analysis>.txt`
pub fn tl_form_path(out_dir: &Path, mode: AnalysisMode) -> PathBuf {
    out_dir.join(format!("TL_form_{mode}.txt"))
}

/// `taylor_QN_var_predicted_<analysis>.txt`
pub fn var_predicted_path(out_dir: &Path, mode: AnalysisMode) -> PathBuf {
    out_dir.join(format!("taylor_QN_var_predicted_{mode}.txt"))
}

/// `taylor_form_predicted_<analysis>.txt`
pub fn form_predicted_path(out_dir: &Path, mode: AnalysisMode) -> PathBuf {
    out_dir.join(format!("taylor_form_predicted_{mode}.txt"))
}

fn append_writer(path: &Path) -> Result<csv::Writer<File>> {
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("failed to open {} for append", path.display()))?;
    Ok(csv::WriterBuilder::new().delimiter(b'\t').has_headers(false).from_writer(file))
}

/// Append one study's full variance rows (study, Q, N, mean, var, samples...).
pub fn append_var_rows(path: &Path, rows: &[VarSampleRow]) -> Result<()> {
    let mut wtr = append_writer(path)?;
    for row in rows {
        let mut fields = vec![
            row.record.study.clone(),
            row.record.q.to_string(),
            row.record.n.to_string(),
            row.record.mean.to_string(),
            row.record.var.to_string(),
        ];
        fields.extend(row.samples.iter().map(|v| v.to_string()));
        wtr.write_record(&fields)?;
    }
    wtr.flush().context("failed to flush variance rows")?;
    Ok(())
}

/// Append one study's per-combination variance summaries.
pub fn append_variance_summaries(path: &Path, rows: &[VarianceSummary]) -> Result<()> {
    let mut wtr = append_writer(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().context("failed to flush variance summaries")?;
    Ok(())
}

/// Append one study's retrospective form record.
pub fn append_tl_form(path: &Path, record: &TlFormRecord) -> Result<()> {
    let mut wtr = append_writer(path)?;
    wtr.serialize(record)?;
    wtr.flush().context("failed to flush TL form record")?;
    Ok(())
}

/// Append one study's forward form record.
pub fn append_form_predicted(path: &Path, record: &TlFormPredictedRecord) -> Result<()> {
    let mut wtr = append_writer(path)?;
    wtr.serialize(record)?;
    wtr.flush().context("failed to flush predicted form record")?;
    Ok(())
}

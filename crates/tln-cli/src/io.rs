//! Tab-delimited input tables.
//!
//! The source data files carry no header row; columns are fixed by
//! position (study, Q, N, mean, var — plus the `sample1..sampleK` variance
//! columns in the variance-sample table).

use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tln_core::types::{QnRecord, StudyInfo, VarSampleRow};

fn tsv_reader(path: &Path, flexible: bool) -> Result<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(flexible)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))
}

/// Read the QN-mean-variance table (study, Q, N, mean, var).
pub fn read_qn_table(path: &Path) -> Result<Vec<QnRecord>> {
    let mut rdr = tsv_reader(path, false)?;
    let mut out = Vec::new();
    for (i, row) in rdr.deserialize::<QnRecord>().enumerate() {
        let rec = row.with_context(|| format!("bad QN row {} in {}", i + 1, path.display()))?;
        rec.validate()
            .with_context(|| format!("bad QN row {} in {}", i + 1, path.display()))?;
        out.push(rec);
    }
    if out.is_empty() {
        bail!("{} contains no data rows", path.display());
    }
    Ok(out)
}

/// Read the study metadata table (study, taxon, type).
pub fn read_study_info(path: &Path) -> Result<Vec<StudyInfo>> {
    let mut rdr = tsv_reader(path, false)?;
    let mut out = Vec::new();
    for (i, row) in rdr.deserialize::<StudyInfo>().enumerate() {
        let rec =
            row.with_context(|| format!("bad study row {} in {}", i + 1, path.display()))?;
        out.push(rec);
    }
    Ok(out)
}

/// Read a variance-sample table as written by `sample-var`: the five QN
/// columns followed by one float column per simulation.
pub fn read_var_sample_table(path: &Path) -> Result<Vec<VarSampleRow>> {
    let mut rdr = tsv_reader(path, true)?;
    let mut out = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row.with_context(|| format!("bad row {} in {}", i + 1, path.display()))?;
        if row.len() < 6 {
            bail!(
                "row {} in {} has {} columns; need study, Q, N, mean, var and at least one sample",
                i + 1,
                path.display(),
                row.len()
            );
        }
        let parse_ctx = |col: &str| format!("row {} column {col} in {}", i + 1, path.display());
        let record = QnRecord {
            study: row[0].to_string(),
            q: row[1].parse().with_context(|| parse_ctx("Q"))?,
            n: row[2].parse().with_context(|| parse_ctx("N"))?,
            mean: row[3].parse().with_context(|| parse_ctx("mean"))?,
            var: row[4].parse().with_context(|| parse_ctx("var"))?,
        };
        let samples = row
            .iter()
            .skip(5)
            .map(|s| s.parse::<f64>())
            .collect::<std::result::Result<Vec<f64>, _>>()
            .with_context(|| parse_ctx("sample"))?;
        out.push(VarSampleRow { record, samples });
    }
    if out.is_empty() {
        bail!("{} contains no data rows", path.display());
    }
    Ok(out)
}

/// Sorted unique study identifiers of a QN table.
pub fn study_list(records: &[QnRecord]) -> Vec<String> {
    let mut studies: Vec<String> = records.iter().map(|r| r.study.clone()).collect();
    studies.sort_unstable();
    studies.dedup();
    studies
}

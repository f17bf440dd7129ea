//! Subcommand drivers wiring input tables, the sampling engine, the
//! comparators, and the append-mode sinks together.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tln_core::types::{AnalysisMode, QnRecord, VarSampleRow};
use tln_inference::inclusion::{meets_inclusion_criteria, InclusionConfig};
use tln_inference::nullmodel::{sample_study_variances, tl_analysis_study, tl_from_sample};
use tln_sampling::partition::CountTableSampler;

use crate::{io, sink};

/// Shared knobs for the sampling-driven commands.
pub struct SamplingArgs {
    /// Draws per (Q, N) combination.
    pub sample_size: usize,
    /// Per-combination wall-clock budget in seconds.
    pub t_limit: u64,
    /// Null model to draw from.
    pub analysis: AnalysisMode,
    /// RNG seed.
    pub seed: u64,
}

fn studies_to_run(records: &[QnRecord], only: &[String]) -> Vec<String> {
    let all = io::study_list(records);
    if only.is_empty() {
        all
    } else {
        all.into_iter().filter(|s| only.contains(s)).collect()
    }
}

/// `sample-var`: draw variances per (Q, N) and append full per-row samples.
pub fn cmd_sample_var(
    input: &Path,
    out_dir: &Path,
    only_studies: &[String],
    args: &SamplingArgs,
) -> Result<()> {
    let data = io::read_qn_table(input)?;
    let mut rng = StdRng::seed_from_u64(args.seed);
    let out_path = sink::var_full_path(out_dir, args.analysis);
    let t_limit = Duration::from_secs(args.t_limit);

    for study in studies_to_run(&data, only_studies) {
        let combos: Vec<QnRecord> =
            data.iter().filter(|r| r.study == study).cloned().collect();
        let sampled = sample_study_variances(
            &mut rng,
            &CountTableSampler,
            &combos,
            args.sample_size,
            t_limit,
            args.analysis,
        )?;
        match sampled {
            Some(var_parts) => {
                let rows: Vec<VarSampleRow> = combos
                    .into_iter()
                    .zip(var_parts)
                    .map(|(record, samples)| VarSampleRow { record, samples })
                    .collect();
                sink::append_var_rows(&out_path, &rows)?;
                tracing::info!(%study, rows = rows.len(), "variance samples written");
            }
            None => tracing::warn!(%study, "study skipped (incomplete sampling)"),
        }
    }
    Ok(())
}

/// `tl-analysis`: forward comparison against freshly sampled null variances.
///
/// (Q, N) combinations with N <= 2 are removed up front; the variance of a
/// two-part sample carries no information about the TL form.
pub fn cmd_tl_analysis(
    input: &Path,
    out_dir: &Path,
    only_studies: &[String],
    args: &SamplingArgs,
) -> Result<()> {
    let data = io::read_qn_table(input)?;
    let mut rng = StdRng::seed_from_u64(args.seed);
    let summary_path = sink::var_predicted_path(out_dir, args.analysis);
    let form_path = sink::form_predicted_path(out_dir, args.analysis);
    let t_limit = Duration::from_secs(args.t_limit);

    for study in studies_to_run(&data, only_studies) {
        let combos: Vec<QnRecord> =
            data.iter().filter(|r| r.study == study && r.n > 2).cloned().collect();
        if combos.is_empty() {
            tracing::warn!(%study, "no (Q, N) combinations with N > 2");
            continue;
        }
        let sampled = sample_study_variances(
            &mut rng,
            &CountTableSampler,
            &combos,
            args.sample_size,
            t_limit,
            args.analysis,
        )?;
        match sampled {
            Some(var_parts) => match tl_analysis_study(&combos, &var_parts) {
                Ok((summaries, record)) => {
                    sink::append_variance_summaries(&summary_path, &summaries)?;
                    sink::append_form_predicted(&form_path, &record)?;
                    tracing::info!(%study, combos = summaries.len(), "TL analysis written");
                }
                Err(err) => tracing::warn!(%study, %err, "study skipped (degenerate regression)"),
            },
            None => tracing::warn!(%study, "study skipped (incomplete sampling)"),
        }
    }
    Ok(())
}

/// `tl-from-sample`: retrospective comparison over a variance-sample file.
pub fn cmd_tl_from_sample(input: &Path, out_dir: &Path, analysis: AnalysisMode) -> Result<()> {
    let rows = io::read_var_sample_table(input)?;
    let records = tl_from_sample(&rows);
    let out_path = sink::tl_form_path(out_dir, analysis);
    for record in &records {
        sink::append_tl_form(&out_path, record)?;
        tracing::info!(study = %record.study, "TL form written");
    }
    Ok(())
}

/// `check-inclusion`: print the admission decision per study to stdout.
pub fn cmd_check_inclusion(
    input: &Path,
    info: Option<&PathBuf>,
    config: &InclusionConfig,
) -> Result<()> {
    let data = io::read_qn_table(input)?;
    let info = match info {
        Some(path) => io::read_study_info(path)?,
        None => Vec::new(),
    };

    for study in io::study_list(&data) {
        let records: Vec<QnRecord> =
            data.iter().filter(|r| r.study == study).cloned().collect();
        let included = meets_inclusion_criteria(&records, config);
        match info.iter().find(|s| s.study == study) {
            Some(meta) => {
                println!("{study}\t{}\t{}\t{included}", meta.taxon, meta.kind);
            }
            None => println!("{study}\t{included}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_qn_table(dir: &Path, rows: &str) -> PathBuf {
        let path = dir.join("qn.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(rows.as_bytes()).unwrap();
        path
    }

    fn fast_args(mode: AnalysisMode) -> SamplingArgs {
        SamplingArgs { sample_size: 10, t_limit: 600, analysis: mode, seed: 9 }
    }

    #[test]
    fn sample_var_writes_one_row_per_combination() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_qn_table(
            dir.path(),
            "a\t10\t3\t3.33\t4.0\na\t12\t4\t3.0\t2.5\nb\t8\t3\t2.67\t1.0\n",
        );
        let args = fast_args(AnalysisMode::Composition);
        cmd_sample_var(&input, dir.path(), &[], &args).unwrap();

        let out = sink::var_full_path(dir.path(), AnalysisMode::Composition);
        let rows = io::read_var_sample_table(&out).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.samples.len() == 10));
        // Studies appear in sorted order, combinations in input order.
        assert_eq!(rows[0].record.study, "a");
        assert_eq!(rows[2].record.study, "b");
    }

    #[test]
    fn sample_var_honors_study_filter() {
        let dir = tempfile::tempdir().unwrap();
        let input =
            write_qn_table(dir.path(), "a\t10\t3\t3.33\t4.0\nb\t8\t3\t2.67\t1.0\n");
        let args = fast_args(AnalysisMode::Composition);
        cmd_sample_var(&input, dir.path(), &["b".to_string()], &args).unwrap();

        let out = sink::var_full_path(dir.path(), AnalysisMode::Composition);
        let rows = io::read_var_sample_table(&out).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.study, "b");
    }

    #[test]
    fn zero_time_limit_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_qn_table(dir.path(), "a\t10\t3\t3.33\t4.0\n");
        let args = SamplingArgs {
            sample_size: 10,
            t_limit: 0,
            analysis: AnalysisMode::Composition,
            seed: 1,
        };
        cmd_sample_var(&input, dir.path(), &[], &args).unwrap();
        assert!(!sink::var_full_path(dir.path(), AnalysisMode::Composition).exists());
    }

    #[test]
    fn tl_analysis_drops_low_n_combinations_and_writes_per_study_rows() {
        let dir = tempfile::tempdir().unwrap();
        // Four N>2 combos plus one N=2 combo that must be ignored.
        let input = write_qn_table(
            dir.path(),
            "a\t48\t4\t12.0\t144.0\na\t80\t4\t20.0\t400.0\na\t120\t4\t30.0\t900.0\na\t200\t4\t50.0\t2500.0\na\t10\t2\t5.0\t2.0\n",
        );
        let args = fast_args(AnalysisMode::Partition);
        cmd_tl_analysis(&input, dir.path(), &[], &args).unwrap();

        let summaries =
            std::fs::read_to_string(sink::var_predicted_path(dir.path(), AnalysisMode::Partition))
                .unwrap();
        assert_eq!(summaries.lines().count(), 4);
        assert!(summaries.lines().all(|l| l.starts_with("a\t")));

        let form =
            std::fs::read_to_string(sink::form_predicted_path(dir.path(), AnalysisMode::Partition))
                .unwrap();
        assert_eq!(form.lines().count(), 1);
    }

    #[test]
    fn tl_from_sample_round_trips_through_the_sink() {
        let dir = tempfile::tempdir().unwrap();
        // Two studies, power-law rows with three sample columns each.
        let mut content = String::new();
        for study in ["a", "b"] {
            for m in [1.0f64, 2.0, 4.0, 8.0] {
                content.push_str(&format!(
                    "{study}\t{}\t4\t{m}\t{}\t{}\t{}\t{}\n",
                    (m * 10.0) as u64,
                    m * m,
                    m * m,
                    2.0 * m * m,
                    3.0 * m * m,
                ));
            }
        }
        let input = dir.path().join("samples.txt");
        std::fs::write(&input, content).unwrap();

        cmd_tl_from_sample(&input, dir.path(), AnalysisMode::Composition).unwrap();
        let out =
            std::fs::read_to_string(sink::tl_form_path(dir.path(), AnalysisMode::Composition))
                .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("a\t"));
        assert!(lines[1].starts_with("b\t"));
    }

    #[test]
    fn tl_from_sample_skips_two_row_studies_and_keeps_going() {
        let dir = tempfile::tempdir().unwrap();
        // Study "a" has only two rows (no regression possible); study "b"
        // is complete and must still be written.
        let mut content = String::from("a\t10\t3\t1.0\t1.0\t1.0\na\t20\t3\t2.0\t4.0\t4.0\n");
        for m in [1.0f64, 2.0, 4.0, 8.0] {
            content.push_str(&format!("b\t{}\t4\t{m}\t{}\t{}\n", (m * 10.0) as u64, m * m, m * m));
        }
        let input = dir.path().join("samples.txt");
        std::fs::write(&input, content).unwrap();

        cmd_tl_from_sample(&input, dir.path(), AnalysisMode::Partition).unwrap();
        let out =
            std::fs::read_to_string(sink::tl_form_path(dir.path(), AnalysisMode::Partition))
                .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("b\t"));
    }
}

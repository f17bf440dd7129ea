//! tlnull CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tln_core::types::AnalysisMode;
use tln_inference::inclusion::InclusionConfig;

mod io;
mod pipeline;
mod sink;

use pipeline::SamplingArgs;

#[derive(Parser)]
#[command(name = "tlnull")]
#[command(about = "tlnull - Taylor's Law null-model analysis")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample null-model variances per (Q, N) and record the full rows
    SampleVar {
        /// QN-mean-variance table (tab-delimited: study, Q, N, mean, var)
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the append-mode output files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Restrict the run to these studies (repeatable). Default: all.
        #[arg(long = "study")]
        studies: Vec<String>,

        /// Number of samples per (Q, N) combination
        #[arg(long, default_value = "1000")]
        sample_size: usize,

        /// Wall-clock budget per (Q, N) combination, in seconds
        #[arg(long, default_value = "7200")]
        t_limit: u64,

        /// Null model: partition or composition
        #[arg(long, default_value = "partition")]
        analysis: AnalysisMode,

        /// RNG seed
        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Compare the empirical TL form against freshly sampled null variances
    TlAnalysis {
        /// QN-mean-variance table (tab-delimited: study, Q, N, mean, var)
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the append-mode output files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Restrict the run to these studies (repeatable). Default: all.
        #[arg(long = "study")]
        studies: Vec<String>,

        /// Number of samples per (Q, N) combination
        #[arg(long, default_value = "1000")]
        sample_size: usize,

        /// Wall-clock budget per (Q, N) combination, in seconds
        #[arg(long, default_value = "7200")]
        t_limit: u64,

        /// Null model: partition or composition
        #[arg(long, default_value = "partition")]
        analysis: AnalysisMode,

        /// RNG seed
        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Re-run the TL comparison from a recorded variance-sample file
    TlFromSample {
        /// Variance-sample table written by sample-var
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the append-mode output file
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Analysis label used in the output file name
        #[arg(long, default_value = "partition")]
        analysis: AnalysisMode,
    },

    /// Report which studies meet the inclusion criteria
    CheckInclusion {
        /// QN-mean-variance table (tab-delimited: study, Q, N, mean, var)
        #[arg(short, long)]
        input: PathBuf,

        /// Optional study metadata table (study, taxon, type)
        #[arg(long)]
        info: Option<PathBuf>,

        /// Minimum Q for a (Q, N) pair to count
        #[arg(long, default_value = "5")]
        q_min: u64,

        /// Minimum N for a (Q, N) pair to count
        #[arg(long, default_value = "3")]
        n_min: u64,

        /// Minimum number of qualifying pairs
        #[arg(long, default_value = "5")]
        min_points: usize,

        /// Require the empirical regression to be significant (p < 0.05)
        #[arg(long)]
        sig: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::SampleVar { input, out_dir, studies, sample_size, t_limit, analysis, seed } => {
            let args = SamplingArgs { sample_size, t_limit, analysis, seed };
            pipeline::cmd_sample_var(&input, &out_dir, &studies, &args)
        }
        Commands::TlAnalysis { input, out_dir, studies, sample_size, t_limit, analysis, seed } => {
            let args = SamplingArgs { sample_size, t_limit, analysis, seed };
            pipeline::cmd_tl_analysis(&input, &out_dir, &studies, &args)
        }
        Commands::TlFromSample { input, out_dir, analysis } => {
            pipeline::cmd_tl_from_sample(&input, &out_dir, analysis)
        }
        Commands::CheckInclusion { input, info, q_min, n_min, min_points, sig } => {
            let config = InclusionConfig {
                q_min,
                n_min,
                min_points,
                require_significance: sig,
            };
            pipeline::cmd_check_inclusion(&input, info.as_ref(), &config)
        }
    }
}

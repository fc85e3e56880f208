//! UBKE command line
//!
//! Usage:
//!   ubke enhance   - Enhance a directory of WAV files, write an RTF table
//!   ubke metrics   - Score enhanced files against clean references
//!   ubke tables    - Summary statistics of a metrics CSV
//!   ubke demo      - Synthetic noisy/enhanced pair
//!   ubke stream    - Run one file through the block-based enhancer
//!
//! Set `RUST_LOG` to change verbosity (default `info`).

mod batch;
mod demo;
mod report;
mod signals;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ubke", about = "UBKE causal speech enhancement", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enhance every WAV in a directory
    Enhance {
        /// Enhancement config (YAML)
        #[arg(long)]
        config: PathBuf,
        /// Directory of noisy WAV files
        #[arg(long)]
        input_dir: PathBuf,
        /// Directory for enhanced WAV files
        #[arg(long)]
        output_dir: PathBuf,
        /// Per-file RTF and mean fusion weight
        #[arg(long, default_value = "results/rtf.csv")]
        rtf_csv: PathBuf,
    },
    /// Compute objective metrics against clean references
    Metrics {
        /// Evaluation config (YAML)
        #[arg(long)]
        eval_config: PathBuf,
        /// Directory of clean WAV files
        #[arg(long)]
        clean_dir: PathBuf,
        /// Directory of enhanced WAV files with matching names
        #[arg(long)]
        enhanced_dir: PathBuf,
        /// Output CSV
        #[arg(long)]
        out_csv: PathBuf,
    },
    /// Summarize a metrics CSV
    Tables {
        /// Metrics CSV from `ubke metrics`
        #[arg(long)]
        metrics_csv: PathBuf,
        /// Output directory
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Enhance a synthetic noisy signal
    Demo {
        /// Enhancement config (YAML)
        #[arg(long)]
        config: PathBuf,
        /// Output directory
        #[arg(long, default_value = "results/demo")]
        out_dir: PathBuf,
        /// Noise seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Enhance one file block by block, compensating the stream latency
    Stream {
        /// Enhancement config (YAML)
        #[arg(long)]
        config: PathBuf,
        /// Input WAV
        #[arg(long)]
        input: PathBuf,
        /// Output WAV
        #[arg(long)]
        output: PathBuf,
        /// Samples per block
        #[arg(long, default_value_t = 256)]
        block_size: usize,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Enhance {
            config,
            input_dir,
            output_dir,
            rtf_csv,
        } => batch::enhance_dir(&config, &input_dir, &output_dir, &rtf_csv).map(|_| ()),
        Commands::Metrics {
            eval_config,
            clean_dir,
            enhanced_dir,
            out_csv,
        } => batch::metrics_dir(&eval_config, &clean_dir, &enhanced_dir, &out_csv).map(|_| ()),
        Commands::Tables {
            metrics_csv,
            out_dir,
        } => report::make_tables(&metrics_csv, &out_dir).map(|_| ()),
        Commands::Demo {
            config,
            out_dir,
            seed,
        } => {
            let outcome = demo::run_demo(&config, &out_dir, seed)?;
            log::info!(
                "Demo complete. RTF={:.3}, mean alpha={:.3}, LSD {:.3} -> {:.3}",
                outcome.real_time_factor,
                outcome.mean_alpha,
                outcome.lsd_noisy,
                outcome.lsd_enhanced
            );
            log::info!(
                "Outputs written to {}, {} and {}",
                outcome.clean.display(),
                outcome.noisy.display(),
                outcome.enhanced.display()
            );
            Ok(())
        }
        Commands::Stream {
            config,
            input,
            output,
            block_size,
        } => batch::stream_file(&config, &input, &output, block_size),
    }
}

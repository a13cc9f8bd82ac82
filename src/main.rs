//! Forage CLI - Command-line interface for running foraging simulations.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use forage::runner::DEFAULT_MAX_TICKS;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Forage - Helper vs. selfish agents on a toroidal grid
#[derive(Parser, Debug)]
#[command(name = "forage")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single simulation and export its history
    Run {
        /// Maximum ticks (default: 1000)
        #[arg(short, long, default_value_t = DEFAULT_MAX_TICKS)]
        ticks: u64,

        /// Initial number of agents (default: 1500)
        #[arg(short, long)]
        agents: Option<usize>,

        /// Random seed (default: 42)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Directory for the CSV exports
        #[arg(short, long, default_value = ".")]
        out_dir: std::path::PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Skip writing CSV files
        #[arg(long)]
        no_export: bool,
    },

    /// Run many seeds in parallel and aggregate strategy statistics
    Batch {
        /// Number of runs (default: 100)
        #[arg(short, long, default_value = "100")]
        runs: u64,

        /// Starting seed (increments for each run)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum ticks per run (default: 1000)
        #[arg(short, long, default_value_t = DEFAULT_MAX_TICKS)]
        ticks: u64,

        /// Initial number of agents per run (default: 1500)
        #[arg(short, long)]
        agents: Option<usize>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::BatchFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            ticks,
            agents,
            seed,
            out_dir,
            format,
            no_export,
        } => cli::run::execute(ticks, agents, seed, &out_dir, format, no_export),

        Commands::Batch {
            runs,
            seed,
            ticks,
            agents,
            threads,
            format,
            progress,
        } => cli::batch::execute(runs, seed, ticks, agents, threads, format, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

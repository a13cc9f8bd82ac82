//! Batch command implementation.

use std::time::Instant;

use forage::{SimConfig, run_batch};
use indicatif::{ProgressBar, ProgressStyle};

use super::output::{BatchStats, JsonBatchResult, format_batch_csv, format_batch_text};
use super::{BatchFormat, CliError};

/// Execute the batch command.
///
/// # Errors
///
/// Returns an error if no runs are requested or the overrides produce an
/// invalid configuration.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    runs: u64,
    seed: Option<u64>,
    ticks: u64,
    agents: Option<usize>,
    threads: Option<usize>,
    format: BatchFormat,
    progress: bool,
) -> Result<(), CliError> {
    if runs == 0 {
        return Err(CliError::Usage("at least one run is required".to_string()));
    }

    let mut config = SimConfig::default();
    if let Some(a) = agents {
        config.initial_agents = a;
    }

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    // Consecutive seeds from the base seed
    let base_seed = seed.unwrap_or(config.seed);
    let seeds: Vec<u64> = (0..runs).map(|i| base_seed.wrapping_add(i)).collect();

    let pb = progress.then(|| {
        let pb = ProgressBar::new(runs);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} runs ({per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        pb.set_style(style);
        pb
    });

    let start = Instant::now();
    let summaries = run_batch(config, &seeds, ticks, |_| {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    })?;
    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }
    let duration = start.elapsed();

    let stats = BatchStats::from_summaries(&summaries);
    match format {
        BatchFormat::Text => {
            println!();
            print!("{}", format_batch_text(&stats));
            println!();
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        BatchFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonBatchResult::new(&stats, &summaries))?;
            println!("{json}");
        }
        BatchFormat::Csv => print!("{}", format_batch_csv(&summaries)),
    }

    Ok(())
}

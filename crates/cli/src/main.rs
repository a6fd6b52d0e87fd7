//! Merge-Bench CLI
//!
//! Command-line interface for evaluating LLMs on merge conflict resolution.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use merge_bench_cli::commands::{cache, run};
use merge_bench_common::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "merge-bench")]
#[command(author, version, about = "Merge conflict resolution benchmark")]
#[command(long_about = "Evaluate LLMs on resolving real-world merge conflicts.\n\n\
    Runs a model over a per-language conflict dataset, caches raw responses, \
    and scores resolutions for exact and semantic equivalence.")]
#[command(propagate_version = true)]
struct Cli {
    /// Default log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info", env = "MERGE_BENCH_LOG_LEVEL")]
    log_level: String,

    /// Emit logs as newline-delimited JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a model on one language split
    #[command(alias = "r")]
    Run {
        /// Model identifier, e.g. openai/gpt-4o
        #[arg(short, long)]
        model: String,

        /// Language to evaluate, e.g. java or c++
        #[arg(short, long)]
        language: String,

        /// Directory holding the per-language dataset directories
        #[arg(long, env = "MERGE_BENCH_DATASET_ROOT")]
        dataset_root: PathBuf,

        /// Directory for run artifacts
        #[arg(short, long, default_value = "eval_outputs")]
        output_dir: PathBuf,

        /// Dataset split to evaluate
        #[arg(long, default_value = "test")]
        split: String,

        /// Maximum examples in flight at once
        #[arg(long, default_value = "32")]
        max_workers: usize,

        /// Evaluate at most this many examples
        #[arg(long)]
        max_samples: Option<usize>,

        /// Per-query timeout in seconds
        #[arg(long, default_value = "300")]
        timeout_secs: u64,

        /// Re-query every example even when a cached response exists
        #[arg(long)]
        refresh_cache: bool,

        /// Response cache directory
        #[arg(long, default_value = "query_cache", env = "MERGE_BENCH_CACHE_DIR")]
        cache_dir: PathBuf,

        /// Log prompts and raw responses
        #[arg(short, long)]
        verbose: bool,
    },

    /// Inspect or maintain the response cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand, Debug)]
enum CacheCommands {
    /// Count valid and malformed entries for a model
    Scan {
        /// Model identifier
        #[arg(short, long)]
        model: String,

        /// Response cache directory
        #[arg(long, default_value = "query_cache", env = "MERGE_BENCH_CACHE_DIR")]
        cache_dir: PathBuf,
    },

    /// Delete malformed entries for a model
    Purge {
        /// Model identifier
        #[arg(short, long)]
        model: String,

        /// Response cache directory
        #[arg(long, default_value = "query_cache", env = "MERGE_BENCH_CACHE_DIR")]
        cache_dir: PathBuf,
    },

    /// Delete every cached entry for a model
    Wipe {
        /// Model identifier
        #[arg(short, long)]
        model: String,

        /// Response cache directory
        #[arg(long, default_value = "query_cache", env = "MERGE_BENCH_CACHE_DIR")]
        cache_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs)?;

    match cli.command {
        Commands::Run {
            model,
            language,
            dataset_root,
            output_dir,
            split,
            max_workers,
            max_samples,
            timeout_secs,
            refresh_cache,
            cache_dir,
            verbose,
        } => {
            run::execute(run::RunOptions {
                model,
                language,
                dataset_root,
                output_dir,
                split,
                max_workers,
                max_samples,
                timeout_secs,
                refresh_cache,
                cache_dir,
                verbose,
            })
            .await
        }

        Commands::Cache { command } => match command {
            CacheCommands::Scan { model, cache_dir } => cache::scan(&cache_dir, &model),
            CacheCommands::Purge { model, cache_dir } => cache::purge(&cache_dir, &model),
            CacheCommands::Wipe { model, cache_dir } => cache::wipe(&cache_dir, &model),
        },
    }
}

//! Run an evaluation for one (model, language) pair.

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{info, warn};

use merge_bench_application::report::{append_summary_log, write_results_file};
use merge_bench_application::{render_summary, EvalScheduler, SchedulerConfig};
use merge_bench_common::retry::RetryConfig;
use merge_bench_domain::Language;
use merge_bench_infrastructure::models::validate_model_id;
use merge_bench_infrastructure::{load_examples, OpenRouterClient, ResponseCache};

/// Parameters for one evaluation run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub model: String,
    pub language: String,
    pub dataset_root: PathBuf,
    pub output_dir: PathBuf,
    pub split: String,
    pub max_workers: usize,
    pub max_samples: Option<usize>,
    pub timeout_secs: u64,
    pub refresh_cache: bool,
    pub cache_dir: PathBuf,
    pub verbose: bool,
}

/// Evaluate a model over one language split and write the run artifacts.
pub async fn execute(opts: RunOptions) -> Result<()> {
    let language: Language = opts
        .language
        .parse()
        .with_context(|| format!("Unsupported language '{}'", opts.language))?;
    validate_model_id(&opts.model)
        .with_context(|| format!("Unsupported model '{}'", opts.model))?;

    let examples = load_examples(&opts.dataset_root, language, &opts.split, opts.max_samples)
        .with_context(|| {
            format!(
                "Failed to load {language} examples (split '{}') from {}",
                opts.split,
                opts.dataset_root.display()
            )
        })?;

    println!(
        "{}",
        format!("Evaluating {} on {} ({} split)", opts.model, language, opts.split)
            .bold()
            .cyan()
    );
    println!("{}", "=".repeat(60));
    println!("Examples: {}", examples.len());
    println!();

    let client = OpenRouterClient::from_env(&opts.model, Duration::from_secs(opts.timeout_secs))
        .context("Failed to construct the OpenRouter client")?;
    let cache = Arc::new(ResponseCache::new(&opts.cache_dir));

    let config = SchedulerConfig {
        max_workers: opts.max_workers,
        retry: RetryConfig::default(),
        force_refresh: opts.refresh_cache,
        verbose: opts.verbose,
    };
    let scheduler = EvalScheduler::new(Arc::new(client), cache, config);

    // First ctrl-c stops issuing queries; in-flight cache writes complete.
    let cancel = scheduler.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing in-flight queries");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let total = examples.len();
    let (outcomes, metrics) = scheduler.run(language, examples).await;

    if outcomes.len() < total {
        warn!(
            evaluated = outcomes.len(),
            total, "Run was interrupted before every example was evaluated"
        );
    }

    let run_dir = opts
        .output_dir
        .join(language.as_str())
        .join(&opts.split)
        .join(&opts.model);
    let responses_dir = run_dir.join("responses");
    std::fs::create_dir_all(&responses_dir)
        .with_context(|| format!("Failed to create {}", responses_dir.display()))?;

    for outcome in &outcomes {
        let path = responses_dir.join(format!("{}.txt", outcome.example_id));
        std::fs::write(&path, &outcome.raw_response)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let counts = match metrics.get(&opts.model, language) {
        Some(counts) => *counts,
        None => {
            println!("No examples were evaluated.");
            return Ok(());
        }
    };

    append_summary_log(&run_dir.join("eval.log"), &counts)
        .context("Failed to append the evaluation log")?;
    write_results_file(
        &run_dir.join("results.txt"),
        &opts.model,
        language,
        &opts.split,
        &counts,
    )
    .context("Failed to write the results file")?;

    info!(
        model = %opts.model,
        %language,
        attempted = counts.attempted,
        output = %run_dir.display(),
        "Evaluation complete"
    );

    println!();
    println!("{}", "Results".bold().cyan());
    println!("{}", "=".repeat(60));
    print!("{}", render_summary(&counts));
    println!("Artifacts written to {}", run_dir.display().to_string().bold());

    Ok(())
}

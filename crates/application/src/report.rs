//! Fixed-format summary emission.
//!
//! Downstream report generation pattern-matches on the exact label strings
//! emitted here and takes the last occurrence of each line in a log as
//! authoritative, which supports incremental runs appending to one file.
//! The labels and the trailing `%` are a compatibility contract; do not
//! reword them.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::metrics::BucketCounts;
use merge_bench_domain::Language;

/// Render the four contract summary lines for one (model, language) pair.
pub fn render_summary(counts: &BucketCounts) -> String {
    format!(
        "Percentage correctly resolved merges: {:.2}%\n\
         Percentage semantically correctly resolved merges: {:.2}%\n\
         Percentage correctly raising merge conflict: {:.2}%\n\
         Percentage with valid markdown format: {:.2}%\n",
        counts.pct_exact(),
        counts.pct_semantic(),
        counts.pct_conflict_preserved(),
        counts.pct_markdown_valid(),
    )
}

/// Append a summary block to an evaluation log.
///
/// Appending (rather than truncating) is what lets downstream tooling take
/// the last occurrence of each line as the authoritative one.
pub fn append_summary_log(path: &Path, counts: &BucketCounts) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(render_summary(counts).as_bytes())?;
    Ok(())
}

/// Write the full results file for one run.
///
/// Includes the contract lines plus run context and the error/invalid
/// fractions, so a low score is distinguishable from a broken run.
pub fn write_results_file(
    path: &Path,
    model: &str,
    language: Language,
    split: &str,
    counts: &BucketCounts,
) -> std::io::Result<()> {
    let body = format!(
        "Model: {model}\n\
         Language: {language}\n\
         Split: {split}\n\
         Total merges evaluated: {}\n\
         Percentage with valid thinking format: {:.2}%\n\
         {}\
         Percentage terminal errors: {:.2}%\n\
         Percentage different resolutions: {:.2}%\n",
        counts.attempted,
        counts.pct_thinking_valid(),
        render_summary(counts),
        counts.pct_error(),
        counts.pct_different(),
    );
    std::fs::write(path, body)
}

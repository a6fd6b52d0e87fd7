//! Response cache maintenance commands.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use merge_bench_infrastructure::ResponseCache;

/// Report entry counts for one model's cache directory.
pub fn scan(cache_dir: &Path, model: &str) -> Result<()> {
    let cache = ResponseCache::new(cache_dir);
    let scan = cache
        .scan_model(model)
        .with_context(|| format!("Failed to scan the cache for '{model}'"))?;

    println!("{}", format!("Cache entries for {model}").bold().cyan());
    println!("  Valid entries:     {}", scan.valid);
    println!("  Malformed entries: {}", scan.malformed.len());
    for path in &scan.malformed {
        println!("    {}", path.display().to_string().red());
    }
    Ok(())
}

/// Delete unreadable entries so the next run re-queries them.
pub fn purge(cache_dir: &Path, model: &str) -> Result<()> {
    let cache = ResponseCache::new(cache_dir);
    let removed = cache
        .purge_malformed(model)
        .with_context(|| format!("Failed to purge the cache for '{model}'"))?;
    println!("Removed {removed} malformed entries for {model}");
    Ok(())
}

/// Delete every cached response for a model.
pub fn wipe(cache_dir: &Path, model: &str) -> Result<()> {
    let cache = ResponseCache::new(cache_dir);
    let removed = cache
        .wipe_model(model)
        .with_context(|| format!("Failed to wipe the cache for '{model}'"))?;
    println!("Removed {removed} cached entries for {model}");
    Ok(())
}

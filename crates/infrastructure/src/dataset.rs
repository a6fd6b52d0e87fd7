//! Dataset loading.
//!
//! Datasets are directory-organized per language:
//! `<root>/<language-dataset>/<split>.json`, each file a JSON array of
//! records with the conflicted text and ground-truth resolution. The format
//! is owned by the external dataset builder; this loader only requires the
//! fields the engine consumes. Any load failure is fatal, since a run
//! without valid examples cannot produce meaningful results.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use merge_bench_domain::errors::DatasetError;
use merge_bench_domain::{Language, MergeExample, Provenance};

/// One record as written by the dataset builder.
///
/// Accepts both the builder's `question`/`answer` field names and the
/// engine's `conflict`/`resolution` names.
#[derive(Debug, Deserialize)]
struct DatasetRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(alias = "conflict")]
    question: String,
    #[serde(alias = "resolution")]
    answer: String,
    #[serde(default)]
    provenance: Option<Provenance>,
}

/// Load the examples for one (language, split) pair.
///
/// `max_samples` truncates the dataset after loading, which keeps sampled
/// runs deterministic: the first N examples are always the same N.
pub fn load_examples(
    root: &Path,
    language: Language,
    split: &str,
    max_samples: Option<usize>,
) -> Result<Vec<MergeExample>, DatasetError> {
    let path = root.join(language.dataset_dir()).join(format!("{split}.json"));

    if !path.exists() {
        return Err(DatasetError::NotFound {
            path,
            language: language.to_string(),
        });
    }

    let text = fs::read_to_string(&path).map_err(|source| DatasetError::Unreadable {
        path: path.clone(),
        source,
    })?;

    let records: Vec<DatasetRecord> =
        serde_json::from_str(&text).map_err(|source| DatasetError::Malformed {
            path: path.clone(),
            source,
        })?;

    if records.is_empty() {
        return Err(DatasetError::Empty { path });
    }

    let mut examples: Vec<MergeExample> = records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            let id = record.id.unwrap_or_else(|| format!("example_{idx}"));
            let mut example = MergeExample::new(id, language, record.question, record.answer);
            if let Some(provenance) = record.provenance {
                example = example.with_provenance(provenance);
            }
            example
        })
        .collect();

    if let Some(max) = max_samples {
        if max < examples.len() {
            examples.truncate(max);
            info!(language = %language, max_samples = max, "Limited dataset");
        }
    }

    info!(
        language = %language,
        split,
        count = examples.len(),
        path = %path.display(),
        "Loaded dataset"
    );

    Ok(examples)
}

//! Merge conflict examples.

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// A single merge conflict example with its ground-truth resolution.
///
/// Examples are produced by the external dataset builder and are immutable
/// once loaded; the evaluation engine only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeExample {
    /// Stable identifier, unique within one (language, split) dataset.
    pub id: String,

    /// Target language of the conflicted source.
    pub language: Language,

    /// Conflicted source text containing three-way conflict markers.
    pub conflict: String,

    /// Ground-truth resolved text.
    pub resolution: String,

    /// Provenance of the underlying merge, when the dataset records it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

/// Repository and commit the conflict was mined from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Source repository (e.g. `owner/name`).
    pub repository: String,

    /// Merge commit the conflict was extracted from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

impl MergeExample {
    /// Create an example without provenance.
    pub fn new(
        id: impl Into<String>,
        language: Language,
        conflict: impl Into<String>,
        resolution: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            language,
            conflict: conflict.into(),
            resolution: resolution.into(),
            provenance: None,
        }
    }

    /// Attach provenance metadata.
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }
}

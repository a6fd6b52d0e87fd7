//! Per-example evaluation outcomes.

use serde::{Deserialize, Serialize};

/// The canonical three-way conflict marker prefixes.
///
/// A text containing any of these is considered to still carry an
/// unresolved conflict region.
pub const CONFLICT_MARKERS: [&str; 4] = ["<<<<<<<", "=======", "|||||||", ">>>>>>>"];

/// Check whether a text still contains conflict markers.
pub fn has_conflict_markers(text: &str) -> bool {
    CONFLICT_MARKERS.iter().any(|marker| text.contains(marker))
}

/// The single bucket an evaluated example lands in.
///
/// Verdicts are assigned in a fixed tie-break order (exact, then semantic,
/// then conflict-preserved, then the rest), so every example lands in
/// exactly one bucket and per-bucket percentages sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Candidate is byte-identical to the ground truth.
    ExactMatch,
    /// Candidate equals the ground truth after language-aware normalization.
    SemanticMatch,
    /// The model declined to resolve: conflict markers survive in the output.
    ConflictPreserved,
    /// A well-formed candidate that matches nothing above.
    Different,
    /// No fenced code block could be extracted from the response.
    InvalidMarkdown,
    /// The model query failed terminally after exhausting retries.
    Error,
}

impl Verdict {
    /// Whether this verdict counts as a correct resolution (exact only).
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::ExactMatch)
    }

    /// Whether this verdict counts as a semantically correct resolution.
    ///
    /// Exact matches are semantically correct by construction.
    pub fn is_semantic(&self) -> bool {
        matches!(self, Self::ExactMatch | Self::SemanticMatch)
    }

    /// Whether the model preserved the conflict instead of resolving it.
    pub fn is_conflict_preserved(&self) -> bool {
        matches!(self, Self::ConflictPreserved)
    }
}

/// The full result of evaluating one example against one model.
///
/// Computed once per example per run and folded into the aggregate; it is
/// not persisted beyond log emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    /// Identifier of the originating example.
    pub example_id: String,

    /// Raw model response text, before any parsing.
    pub raw_response: String,

    /// Candidate resolution extracted from the fenced code block, if any.
    pub candidate: Option<String>,

    /// Whether a fenced code block was successfully extracted.
    pub markdown_valid: bool,

    /// Whether the response carried the expected reasoning format, with a
    /// `</think>` close separating reasoning from answer.
    pub thinking_valid: bool,

    /// The bucket this example landed in.
    pub verdict: Verdict,
}

impl EvaluationOutcome {
    /// Build a terminal-error outcome for an example whose model query
    /// exhausted its retry budget.
    pub fn terminal_error(example_id: impl Into<String>) -> Self {
        Self {
            example_id: example_id.into(),
            raw_response: String::new(),
            candidate: None,
            markdown_valid: false,
            thinking_valid: false,
            verdict: Verdict::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_conflict_markers() {
        assert!(has_conflict_markers("<<<<<<< ours\na\n=======\nb\n>>>>>>> theirs"));
        assert!(has_conflict_markers("||||||| base"));
        assert!(!has_conflict_markers("fn main() {}"));
        // Shorter runs are not markers.
        assert!(!has_conflict_markers("a == b; <<< >>>"));
    }

    #[test]
    fn exact_implies_semantic() {
        assert!(Verdict::ExactMatch.is_semantic());
        assert!(Verdict::SemanticMatch.is_semantic());
        assert!(!Verdict::ConflictPreserved.is_semantic());
    }

    #[test]
    fn semantic_and_conflict_preserved_are_exclusive() {
        for verdict in [
            Verdict::ExactMatch,
            Verdict::SemanticMatch,
            Verdict::ConflictPreserved,
            Verdict::Different,
            Verdict::InvalidMarkdown,
            Verdict::Error,
        ] {
            assert!(!(verdict.is_semantic() && verdict.is_conflict_preserved()));
        }
    }
}

//! The equivalence engine.
//!
//! Assigns each response exactly one verdict, in fixed tie-break order:
//! exact match, then semantic match, then conflict-preserved, then
//! different (or invalid markdown when no code block was found). Running
//! the exact check first makes `exact implies semantic` hold by
//! construction, and checking conflict markers only after the equality
//! checks keeps semantic-match and conflict-preserved mutually exclusive.

use tracing::debug;

use crate::normalize::normalize_code;
use crate::parser::{extract_answer, has_thinking_format, parse_candidate};
use merge_bench_domain::outcome::has_conflict_markers;
use merge_bench_domain::{EvaluationOutcome, MergeExample, Verdict};

/// Evaluate one raw model response against an example's ground truth.
pub fn evaluate_response(example: &MergeExample, raw: &str) -> EvaluationOutcome {
    let candidate = parse_candidate(raw);
    let ground_truth = example.resolution.trim();

    let verdict = match candidate.as_deref() {
        Some(code) => {
            if code == ground_truth {
                Verdict::ExactMatch
            } else if normalize_code(code, example.language)
                == normalize_code(ground_truth, example.language)
            {
                Verdict::SemanticMatch
            } else if has_conflict_markers(code) {
                Verdict::ConflictPreserved
            } else {
                Verdict::Different
            }
        }
        // No fenced block: the response is invalid markdown, but an
        // unresolved model may still emit conflict markers without fencing
        // them, so fall back to scanning the answer portion. The reasoning
        // prelude is excluded, just as it is on the fenced path.
        None if has_conflict_markers(extract_answer(raw)) => Verdict::ConflictPreserved,
        None => Verdict::InvalidMarkdown,
    };

    debug!(
        example_id = %example.id,
        language = %example.language,
        verdict = ?verdict,
        markdown_valid = candidate.is_some(),
        "Evaluated response"
    );

    EvaluationOutcome {
        example_id: example.id.clone(),
        raw_response: raw.to_string(),
        markdown_valid: candidate.is_some(),
        thinking_valid: has_thinking_format(raw),
        candidate,
        verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use merge_bench_domain::Language;

    fn example(ground_truth: &str) -> MergeExample {
        MergeExample::new("ex", Language::Java, "conflicted", ground_truth)
    }

    fn fenced(code: &str) -> String {
        format!("```java\n{code}\n```")
    }

    #[test]
    fn identical_candidate_is_exact_match() {
        let outcome = evaluate_response(&example("return a + b;"), &fenced("return a + b;"));
        assert_eq!(outcome.verdict, Verdict::ExactMatch);
        assert!(outcome.verdict.is_semantic());
        assert!(!outcome.verdict.is_conflict_preserved());
        assert!(outcome.markdown_valid);
    }

    #[test]
    fn comment_difference_is_semantic_match() {
        let outcome = evaluate_response(&example("return a + b;"), &fenced("return a + b; // sum"));
        assert_eq!(outcome.verdict, Verdict::SemanticMatch);
        assert!(!outcome.verdict.is_exact());
        assert!(outcome.verdict.is_semantic());
    }

    #[test]
    fn surviving_markers_are_conflict_preserved() {
        let raw = fenced("<<<<<<< ours\nreturn a;\n=======\nreturn b;\n>>>>>>> theirs");
        let outcome = evaluate_response(&example("return a + b;"), &raw);
        assert_eq!(outcome.verdict, Verdict::ConflictPreserved);
        assert!(!outcome.verdict.is_exact());
        assert!(!outcome.verdict.is_semantic());
    }

    #[test]
    fn no_code_block_is_invalid_markdown() {
        let outcome = evaluate_response(&example("return a + b;"), "I cannot resolve this.");
        assert_eq!(outcome.verdict, Verdict::InvalidMarkdown);
        assert!(!outcome.markdown_valid);
        assert!(outcome.candidate.is_none());
    }

    #[test]
    fn unfenced_markers_in_raw_text_still_count_as_conflict_preserved() {
        let raw = "<<<<<<< ours\nreturn a;\n=======\nreturn b;\n>>>>>>> theirs";
        let outcome = evaluate_response(&example("return a + b;"), raw);
        assert_eq!(outcome.verdict, Verdict::ConflictPreserved);
        assert!(!outcome.markdown_valid);
    }

    #[test]
    fn unrelated_candidate_is_different() {
        let outcome = evaluate_response(&example("return a + b;"), &fenced("return a - b;"));
        assert_eq!(outcome.verdict, Verdict::Different);
    }

    #[test]
    fn ground_truth_is_compared_trimmed() {
        let outcome = evaluate_response(&example("\nreturn a + b;\n\n"), &fenced("return a + b;"));
        assert_eq!(outcome.verdict, Verdict::ExactMatch);
    }

    #[test]
    fn reasoning_prelude_is_ignored() {
        let raw = format!("<think>\nI will merge both sides.\n</think>\n{}", fenced("return a + b;"));
        let outcome = evaluate_response(&example("return a + b;"), &raw);
        assert_eq!(outcome.verdict, Verdict::ExactMatch);
    }

    #[test]
    fn markers_only_inside_reasoning_do_not_leak() {
        // The reasoning mentions markers but the answer resolves them.
        let raw = format!(
            "<think>\nthe input had <<<<<<< and >>>>>>> markers\n</think>\n{}",
            fenced("return a + b;")
        );
        let outcome = evaluate_response(&example("return a + b;"), &raw);
        assert_eq!(outcome.verdict, Verdict::ExactMatch);
    }

    #[test]
    fn marker_mentions_in_reasoning_without_code_block_are_invalid_markdown() {
        // The reasoning discusses the markers; the answer itself has neither
        // a code block nor markers.
        let raw = "<think>\nthe input had <<<<<<< and >>>>>>> markers\n</think>\nI cannot resolve this.";
        let outcome = evaluate_response(&example("return a + b;"), raw);
        assert_eq!(outcome.verdict, Verdict::InvalidMarkdown);
        assert!(!outcome.markdown_valid);
    }

    #[test]
    fn unfenced_markers_in_the_answer_portion_still_count() {
        let raw = "<think>\nundecided\n</think>\n<<<<<<< ours\nreturn a;\n=======\nreturn b;\n>>>>>>> theirs";
        let outcome = evaluate_response(&example("return a + b;"), raw);
        assert_eq!(outcome.verdict, Verdict::ConflictPreserved);
    }

    #[test]
    fn thinking_format_is_recorded() {
        let with_think = format!("<think>\nreasoning\n</think>\n{}", fenced("return a + b;"));
        let outcome = evaluate_response(&example("return a + b;"), &with_think);
        assert!(outcome.thinking_valid);

        let outcome = evaluate_response(&example("return a + b;"), &fenced("return a + b;"));
        assert!(!outcome.thinking_valid);
    }

    #[test]
    fn python_whitespace_difference_is_not_semantic() {
        let example = MergeExample::new("ex", Language::Python, "c", "def f():\n    return 1");
        let raw = "```python\ndef f():\n        return 1\n```";
        let outcome = evaluate_response(&example, raw);
        assert_eq!(outcome.verdict, Verdict::Different);
    }
}

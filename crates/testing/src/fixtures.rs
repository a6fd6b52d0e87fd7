//! Merge example fixtures.

use merge_bench_domain::{Language, MergeExample};

/// Build a conflicted snippet in canonical three-way form.
pub fn conflict_snippet(ours: &str, theirs: &str) -> String {
    format!("<<<<<<< ours\n{ours}\n=======\n{theirs}\n>>>>>>> theirs\n")
}

/// Wrap code in a markdown fence tagged for the language.
pub fn fenced(language: Language, code: &str) -> String {
    format!("```{}\n{}\n```", language.fence_tag(), code)
}

/// Build an example whose conflict merges `ours` and `theirs` into
/// `resolution`.
pub fn sample_example(
    id: impl Into<String>,
    language: Language,
    ours: &str,
    theirs: &str,
    resolution: &str,
) -> MergeExample {
    MergeExample::new(id, language, conflict_snippet(ours, theirs), resolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_contains_all_three_markers() {
        let snippet = conflict_snippet("a", "b");
        assert!(snippet.contains("<<<<<<<"));
        assert!(snippet.contains("======="));
        assert!(snippet.contains(">>>>>>>"));
    }

    #[test]
    fn fenced_uses_language_tag() {
        assert!(fenced(Language::Rust, "fn f() {}").starts_with("```rust\n"));
    }
}

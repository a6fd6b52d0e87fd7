//! Prompt construction for conflict resolution queries.
//!
//! The prompt text is part of the cache identity: two prompts that differ
//! by a single byte address different cache entries, so the preamble must
//! stay byte-stable across releases.

use crate::example::MergeExample;

/// Fixed preamble prepended to every conflicted snippet.
pub const QUERY_PROMPT: &str = "You are a semantic merge conflict resolution expert. Below is a snippet \
of code with surrounding context that includes a merge conflict.\n\
Return the entire snippet (including full context) in markdown code syntax \
as provided, make sure you do not modify the context at all and preserve \
the spacing as is.\n\
Think in terms of intent and semantics that both sides of the merge are \
trying to achieve.\n\
If you are not sure on how to resolve the conflict or if the intent is \
ambiguous, please return the same snippet with the conflict.\n\
Here is the code snippet:\n";

/// Build the full prompt for one example.
pub fn build_prompt(example: &MergeExample) -> String {
    format!("{}{}", QUERY_PROMPT, example.conflict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    #[test]
    fn prompt_is_preamble_plus_conflict() {
        let example = MergeExample::new("ex", Language::Rust, "CONFLICT BODY", "resolved");
        let prompt = build_prompt(&example);
        assert!(prompt.starts_with(QUERY_PROMPT));
        assert!(prompt.ends_with("CONFLICT BODY"));
    }

    #[test]
    fn identical_examples_produce_identical_prompts() {
        let a = MergeExample::new("a", Language::Go, "same", "x");
        let b = MergeExample::new("b", Language::Go, "same", "y");
        // The prompt depends only on the conflicted text.
        assert_eq!(build_prompt(&a), build_prompt(&b));
    }
}

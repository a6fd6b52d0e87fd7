//! Response parsing.
//!
//! Models answer with prose around a fenced code block, optionally preceded
//! by a `<think>...</think>` reasoning prelude. Parsing extracts the answer
//! portion and then the body of the first fenced block, whatever its info
//! string; if no block exists the response is recorded as invalid markdown
//! and only conflict-marker detection applies downstream.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a fenced code block with any (or no) info string. The body is
/// captured lazily so only the first block is taken.
static CODE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[^\n]*\n((?s).*?)\n```").expect("valid code block regex"));

/// Whether a completion carries the expected reasoning format: a
/// `</think>` close on its own line separating reasoning from answer.
pub fn has_thinking_format(text: &str) -> bool {
    text.contains("\n</think>\n")
}

/// Extract the answer portion of a completion.
///
/// Reasoning models emit `<think> ... </think> answer`; everything up to
/// and including the last `</think>` is discarded. Completions without the
/// marker are returned unchanged.
pub fn extract_answer(text: &str) -> &str {
    match text.rsplit_once("</think>") {
        Some((_, answer)) => answer,
        None => text,
    }
}

/// Extract the body of the first fenced code block, trimmed of surrounding
/// whitespace. Returns `None` when the text contains no fenced block.
pub fn extract_code_block(text: &str) -> Option<String> {
    CODE_BLOCK_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

/// Parse a raw completion into a candidate resolution: strip the reasoning
/// prelude, then extract the fenced block.
pub fn parse_candidate(raw: &str) -> Option<String> {
    extract_code_block(extract_answer(raw))
}

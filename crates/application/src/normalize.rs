//! Language-aware code normalization.
//!
//! Semantic comparison ignores comments and, where the language permits,
//! whitespace layout. The rules (comment grammar and whitespace
//! sensitivity) live in the [`Language`] table, so this module stays a single
//! generic pass with no per-language branching beyond that table lookup.
//!
//! The grammar is deliberately approximate: comment delimiters inside
//! string literals are stripped too. This matches the observed benchmark
//! behavior and errs toward treating candidates as equivalent.

use once_cell::sync::Lazy;
use regex::Regex;

use merge_bench_domain::{CommentStyle, Language};

static BLOCK_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\*(?s).*?\*/").expect("valid block comment regex"));
static LINE_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"//[^\n]*").expect("valid line comment regex"));
static HASH_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[^\n]*").expect("valid hash comment regex"));
static TRIPLE_DQUOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""""(?s).*?""""#).expect("valid triple double quote regex"));
static TRIPLE_SQUOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'''(?s).*?'''").expect("valid triple single quote regex"));
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Normalize code for semantic comparison in the given language.
///
/// Strips comments per the language's grammar, then collapses whitespace
/// runs for whitespace-insensitive languages or trims the ends for
/// sensitive ones. Line endings are normalized in both cases.
pub fn normalize_code(code: &str, language: Language) -> String {
    let code = code.replace("\r\n", "\n");

    let without_comments = match language.comment_style() {
        CommentStyle::CStyle => {
            let code = BLOCK_COMMENT_RE.replace_all(&code, "");
            LINE_COMMENT_RE.replace_all(&code, "").into_owned()
        }
        CommentStyle::Hash => {
            let code = HASH_COMMENT_RE.replace_all(&code, "");
            let code = TRIPLE_DQUOTE_RE.replace_all(&code, "");
            TRIPLE_SQUOTE_RE.replace_all(&code, "").into_owned()
        }
    };

    if language.whitespace_sensitive() {
        // Line structure is significant; only trailing whitespace per line
        // (often left behind by comment stripping) is insignificant.
        without_comments
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    } else {
        WHITESPACE_RE
            .replace_all(&without_comments, " ")
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_c_style_line_comments() {
        let normalized = normalize_code("return a + b; // sum", Language::Java);
        assert_eq!(normalized, "return a + b;");
    }

    #[test]
    fn strips_c_style_block_comments() {
        let normalized = normalize_code("int x /* count */ = 1;", Language::C);
        assert_eq!(normalized, "int x = 1;");
    }

    #[test]
    fn strips_multiline_block_comments() {
        let code = "a();\n/* first\nsecond */\nb();";
        assert_eq!(normalize_code(code, Language::Cpp), "a(); b();");
    }

    #[test]
    fn collapses_whitespace_for_insensitive_languages() {
        let normalized = normalize_code("fn   main()\n\n{\n    body();\n}", Language::Rust);
        assert_eq!(normalized, "fn main() { body(); }");
    }

    #[test]
    fn preserves_layout_for_python() {
        let code = "def f():\n    return 1  # comment\n";
        let normalized = normalize_code(code, Language::Python);
        assert_eq!(normalized, "def f():\n    return 1");
    }

    #[test]
    fn strips_python_docstrings() {
        let code = "def f():\n    \"\"\"docs\"\"\"\n    return 1";
        let normalized = normalize_code(code, Language::Python);
        assert!(!normalized.contains("docs"));
        assert!(normalized.contains("return 1"));
    }

    #[test]
    fn go_strips_c_comments_but_keeps_layout() {
        let code = "func f() {\n\treturn // done\n}";
        let normalized = normalize_code(code, Language::Go);
        assert_eq!(normalized, "func f() {\n\treturn\n}");
    }

    #[test]
    fn ruby_hash_comments() {
        let code = "x = 1 # set x\ny = 2";
        assert_eq!(normalize_code(code, Language::Ruby), "x = 1\ny = 2");
    }

    #[test]
    fn normalizes_crlf_line_endings() {
        let a = normalize_code("def f():\r\n    pass", Language::Python);
        let b = normalize_code("def f():\n    pass", Language::Python);
        assert_eq!(a, b);
    }

    #[test]
    fn comment_only_difference_is_normalized_away() {
        let left = normalize_code("return a + b;", Language::JavaScript);
        let right = normalize_code("return a + b; // sum", Language::JavaScript);
        assert_eq!(left, right);
    }
}

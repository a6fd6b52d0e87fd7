//! Supported languages and their evaluation rules.
//!
//! Each language carries, as data, everything the evaluation pipeline needs
//! to treat it correctly: the markdown fence tag models are asked to use,
//! the comment grammar applied during normalization, whether whitespace is
//! structurally significant, and the dataset directory that holds its
//! examples. Centralizing these rules here keeps the equivalence engine
//! free of per-language branching.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ConfigError;

/// A programming language supported by the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C
    C,
    /// C++
    Cpp,
    /// C#
    CSharp,
    /// Go
    Go,
    /// Java
    Java,
    /// JavaScript
    JavaScript,
    /// PHP
    Php,
    /// Python
    Python,
    /// Ruby
    Ruby,
    /// Rust
    Rust,
    /// TypeScript
    TypeScript,
}

/// Comment grammar used when stripping comments during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `//` line comments and `/* ... */` block comments.
    CStyle,
    /// `#` line comments; triple-quoted strings may act as block comments.
    Hash,
}

impl Language {
    /// All supported languages, in canonical order.
    pub const ALL: [Language; 11] = [
        Language::C,
        Language::Cpp,
        Language::CSharp,
        Language::Go,
        Language::Java,
        Language::JavaScript,
        Language::Php,
        Language::Python,
        Language::Ruby,
        Language::Rust,
        Language::TypeScript,
    ];

    /// Canonical lowercase name, matching CLI arguments and dataset tags.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::CSharp => "csharp",
            Self::Go => "go",
            Self::Java => "java",
            Self::JavaScript => "javascript",
            Self::Php => "php",
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::Rust => "rust",
            Self::TypeScript => "typescript",
        }
    }

    /// Markdown fence tag models are expected to use for this language.
    pub fn fence_tag(&self) -> &'static str {
        // Fence tags coincide with canonical names for every supported
        // language today, but downstream code must not rely on that.
        self.as_str()
    }

    /// Comment grammar applied during code normalization.
    pub fn comment_style(&self) -> CommentStyle {
        match self {
            Self::Python | Self::Ruby => CommentStyle::Hash,
            _ => CommentStyle::CStyle,
        }
    }

    /// Whether whitespace carries structural meaning.
    ///
    /// For these languages normalization only trims the ends of the text;
    /// collapsing interior whitespace would change program structure.
    pub fn whitespace_sensitive(&self) -> bool {
        matches!(self, Self::Python | Self::Ruby | Self::Go)
    }

    /// Dataset directory name for this language under the dataset root.
    pub fn dataset_dir(&self) -> &'static str {
        match self {
            Self::C => "repos_reaper_c",
            Self::Cpp => "repos_reaper_cpp",
            Self::CSharp => "repos_reaper_csharp",
            Self::Go => "repos_github_go",
            Self::Java => "repos_github_java",
            Self::JavaScript => "repos_github_javascript",
            Self::Php => "repos_reaper_php",
            Self::Python => "repos_reaper_python",
            Self::Ruby => "repos_reaper_ruby",
            Self::Rust => "repos_github_rust",
            Self::TypeScript => "repos_github_typescript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" => Ok(Self::C),
            "cpp" | "c++" => Ok(Self::Cpp),
            "csharp" | "c#" => Ok(Self::CSharp),
            "go" => Ok(Self::Go),
            "java" => Ok(Self::Java),
            "javascript" | "js" => Ok(Self::JavaScript),
            "php" => Ok(Self::Php),
            "python" => Ok(Self::Python),
            "ruby" => Ok(Self::Ruby),
            "rust" => Ok(Self::Rust),
            "typescript" | "ts" => Ok(Self::TypeScript),
            other => Err(ConfigError::UnknownLanguage(other.to_string())),
        }
    }
}

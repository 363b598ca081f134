//! The closed set of languages a review can be tagged with.
//!
//! The tag only annotates the prompt and the report. Nothing here selects a
//! parser; the remote service does all of the analysis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReviewError;

/// A supported source language.
///
/// Serialized as its lowercase tag (`"csharp"`, `"cpp"`, ...), which is also
/// the string interpolated into the prompt and report header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    JavaScript,
    Jsx,
    TypeScript,
    Html,
    Css,
    Python,
    Java,
    CSharp,
    Cpp,
    Php,
    Swift,
    Go,
    Ruby,
    Rust,
}

/// Extensions accepted by the file loader that do not imply a language.
pub const PLAIN_TEXT_EXTENSIONS: &[&str] = &["txt"];

impl Language {
    /// All languages in picker order.
    pub const ALL: [Language; 14] = [
        Language::JavaScript,
        Language::Jsx,
        Language::TypeScript,
        Language::Html,
        Language::Css,
        Language::Python,
        Language::Java,
        Language::CSharp,
        Language::Cpp,
        Language::Php,
        Language::Swift,
        Language::Go,
        Language::Ruby,
        Language::Rust,
    ];

    /// Machine tag, e.g. `"python"`.
    pub fn tag(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Jsx => "jsx",
            Language::TypeScript => "typescript",
            Language::Html => "html",
            Language::Css => "css",
            Language::Python => "python",
            Language::Java => "java",
            Language::CSharp => "csharp",
            Language::Cpp => "cpp",
            Language::Php => "php",
            Language::Swift => "swift",
            Language::Go => "go",
            Language::Ruby => "ruby",
            Language::Rust => "rust",
        }
    }

    /// Human-readable label shown in the picker.
    pub fn label(self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::Jsx => "React (JSX)",
            Language::TypeScript => "TypeScript",
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::CSharp => "C#",
            Language::Cpp => "C++",
            Language::Php => "PHP",
            Language::Swift => "Swift",
            Language::Go => "Go",
            Language::Ruby => "Ruby",
            Language::Rust => "Rust",
        }
    }

    /// Canonical file extension, without the dot.
    ///
    /// Used for upload detection and to pick a syntect syntax for snippets.
    pub fn extension(self) -> &'static str {
        match self {
            Language::JavaScript => "js",
            Language::Jsx => "jsx",
            Language::TypeScript => "ts",
            Language::Html => "html",
            Language::Css => "css",
            Language::Python => "py",
            Language::Java => "java",
            Language::CSharp => "cs",
            Language::Cpp => "cpp",
            Language::Php => "php",
            Language::Swift => "swift",
            Language::Go => "go",
            Language::Ruby => "rb",
            Language::Rust => "rs",
        }
    }

    /// Maps a file extension (case-insensitive, no dot) to its language.
    pub fn from_extension(ext: &str) -> Option<Language> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL.into_iter().find(|lang| lang.extension() == ext)
    }

    /// True if the loader accepts files with this extension.
    pub fn is_allowed_extension(ext: &str) -> bool {
        Self::from_extension(ext).is_some()
            || PLAIN_TEXT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
    }

    /// Position of `self` in [`Language::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&l| l == self).unwrap_or(0)
    }

    /// Comma-separated list of every tag, for error messages and `--help`.
    pub fn supported_tags() -> String {
        Self::ALL.iter().map(|l| l.tag()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.tag() == wanted)
            .ok_or_else(|| ReviewError::UnknownLanguage(s.to_owned(), Self::supported_tags()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_back_case_insensitively() {
        for lang in Language::ALL {
            assert_eq!(lang.tag().parse::<Language>().unwrap(), lang);
            assert_eq!(lang.tag().to_uppercase().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = "cobol".parse::<Language>().unwrap_err();
        assert!(matches!(err, ReviewError::UnknownLanguage(ref tag, _) if tag == "cobol"));
        assert!(err.to_string().contains("rust"));
    }

    #[test]
    fn extension_lookup() {
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension("RB"), Some(Language::Ruby));
        assert_eq!(Language::from_extension("txt"), None);
        assert!(Language::is_allowed_extension("txt"));
        assert!(!Language::is_allowed_extension("exe"));
    }

    #[test]
    fn serde_uses_tag() {
        let json = serde_json::to_string(&Language::CSharp).unwrap();
        assert_eq!(json, "\"csharp\"");
    }

    #[test]
    fn index_matches_all_order() {
        assert_eq!(Language::JavaScript.index(), 0);
        assert_eq!(Language::Rust.index(), Language::ALL.len() - 1);
    }
}

use serde::{Deserialize, Serialize};

use crate::error::ReviewError;
use crate::language::Language;

/// One reviewer-reported suggestion plus an optional code excerpt.
///
/// `code_snippet` is the empty string when the suggestion is general.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub suggestion: String,
    pub code_snippet: String,
}

impl Finding {
    pub fn new(suggestion: impl Into<String>, code_snippet: impl Into<String>) -> Self {
        Self {
            suggestion: suggestion.into(),
            code_snippet: code_snippet.into(),
        }
    }

    pub fn has_snippet(&self) -> bool {
        !self.code_snippet.is_empty()
    }
}

/// The full structured output for one submitted source text.
///
/// List order is the priority the remote service reported and is preserved
/// verbatim for display and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResult {
    pub overall_assessment: String,
    pub readability: Vec<Finding>,
    pub modularity: Vec<Finding>,
    pub bugs: Vec<Finding>,
}

impl ReviewResult {
    pub fn findings(&self, category: Category) -> &[Finding] {
        match category {
            Category::Readability => &self.readability,
            Category::Modularity => &self.modularity,
            Category::Bugs => &self.bugs,
        }
    }
}

/// The three list-valued sections of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Readability,
    Modularity,
    Bugs,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Readability, Category::Modularity, Category::Bugs];

    /// JSON field name in the response schema.
    pub fn field(self) -> &'static str {
        match self {
            Category::Readability => "readability",
            Category::Modularity => "modularity",
            Category::Bugs => "bugs",
        }
    }

    /// Section heading used in the exported report.
    pub fn report_title(self) -> &'static str {
        match self {
            Category::Readability => "Readability",
            Category::Modularity => "Modularity & Structure",
            Category::Bugs => "Potential Bugs & Errors",
        }
    }
}

/// A validated submission: non-empty source text plus its language tag.
///
/// Built from the session at submit time and moved into the request task, so
/// later edits in the editor never reach an in-flight call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    source_text: String,
    language: Language,
}

impl ReviewRequest {
    /// # Errors
    ///
    /// Returns [`ReviewError::EmptySource`] if `source_text` is empty after trimming.
    pub fn new(source_text: impl Into<String>, language: Language) -> Result<Self, ReviewError> {
        let source_text = source_text.into();
        if source_text.trim().is_empty() {
            return Err(ReviewError::EmptySource);
        }
        Ok(Self {
            source_text,
            language,
        })
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

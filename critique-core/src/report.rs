//! Plain-text report export.

use std::io;
use std::path::{Path, PathBuf};

use crate::language::Language;
use crate::types::{Category, Finding, ReviewResult};

/// Fixed file name for exported reports.
pub const REPORT_FILENAME: &str = "code_review_report.txt";

const RULE: &str = "========================";
const EMPTY_CATEGORY: &str = "No specific issues found.";

/// Renders `result` as the fixed-layout text report.
///
/// Pure: the same inputs always yield byte-identical output.
pub fn build_report(result: &ReviewResult, language: Language) -> String {
    let mut out = format!("Code Review Report\nLanguage: {language}\n{RULE}\n\n");
    out.push_str(&format!("OVERALL ASSESSMENT:\n{}\n\n", result.overall_assessment));
    for category in Category::ALL {
        push_category(&mut out, category.report_title(), result.findings(category));
    }
    out.push_str(RULE);
    out.push('\n');
    out
}

fn push_category(out: &mut String, title: &str, items: &[Finding]) {
    out.push_str(&format!("{}:\n", title.to_uppercase()));
    if items.is_empty() {
        out.push_str(EMPTY_CATEGORY);
        out.push_str("\n\n");
        return;
    }
    for (idx, item) in items.iter().enumerate() {
        out.push_str(&format!("{}. Suggestion: {}\n", idx + 1, item.suggestion));
        if item.has_snippet() {
            out.push_str(&format!("   Code Snippet: {}\n", item.code_snippet));
        }
        out.push('\n');
    }
}

/// Writes the report to `dir/code_review_report.txt`, replacing any previous one.
///
/// Returns the path written.
pub fn write_report(dir: &Path, result: &ReviewResult, language: Language) -> io::Result<PathBuf> {
    let path = dir.join(REPORT_FILENAME);
    std::fs::write(&path, build_report(result, language))?;
    Ok(path)
}

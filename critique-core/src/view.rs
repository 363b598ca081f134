//! Per-tab view model.
//!
//! Turns a [`ReviewResult`] and the active [`Tab`] into the blocks a renderer
//! draws. The TUI styles these; the content decisions live here.

use crate::session::Tab;
use crate::types::{Category, Finding, ReviewResult};

/// Placeholder shown for a category with no findings.
pub const NO_ISSUES: &str = "No specific issues found in this category.";

/// What one tab displays.
#[derive(Debug, PartialEq, Eq)]
pub enum TabContent<'a> {
    /// The overall assessment, one entry per line of the assessment.
    Paragraphs(Vec<&'a str>),
    /// A non-empty category, in received order.
    Findings(&'a [Finding]),
    /// A category with no findings; render [`NO_ISSUES`].
    Empty,
}

impl Tab {
    /// The category backing a list tab; `None` for [`Tab::Overall`].
    pub fn category(self) -> Option<Category> {
        match self {
            Tab::Overall => None,
            Tab::Readability => Some(Category::Readability),
            Tab::Modularity => Some(Category::Modularity),
            Tab::Bugs => Some(Category::Bugs),
        }
    }
}

pub fn tab_content(result: &ReviewResult, tab: Tab) -> TabContent<'_> {
    match tab.category() {
        None => TabContent::Paragraphs(result.overall_assessment.split('\n').collect()),
        Some(category) => {
            let findings = result.findings(category);
            if findings.is_empty() {
                TabContent::Empty
            } else {
                TabContent::Findings(findings)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> ReviewResult {
        ReviewResult {
            overall_assessment: "Solid.\nNeeds tests.".to_owned(),
            readability: Vec::new(),
            modularity: vec![Finding::new("first", ""), Finding::new("second", "mod a;")],
            bugs: vec![Finding::new("no docstring", "def f():")],
        }
    }

    #[test]
    fn overall_splits_on_line_breaks() {
        assert_eq!(
            tab_content(&result(), Tab::Overall),
            TabContent::Paragraphs(vec!["Solid.", "Needs tests."])
        );
    }

    #[test]
    fn lists_keep_received_order() {
        let r = result();
        match tab_content(&r, Tab::Modularity) {
            TabContent::Findings(items) => {
                assert_eq!(items[0].suggestion, "first");
                assert_eq!(items[1].suggestion, "second");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_category_renders_placeholder() {
        assert_eq!(tab_content(&result(), Tab::Readability), TabContent::Empty);
    }
}

//! Fixed prompt text sent with every review.

use crate::language::Language;

/// System instruction describing the exact JSON object the model must return.
pub const SYSTEM_PROMPT: &str = r#"
You are an expert code reviewer. Analyze the user-provided code and return a JSON object.
Your response MUST be a valid JSON object with the following schema:
{
  "overallAssessment": "A brief summary of the code's quality.",
  "readability": [ { "suggestion": "A specific suggestion for improving readability.", "codeSnippet": "The relevant line(s) of code." } ],
  "modularity": [ { "suggestion": "A specific suggestion for improving modularity.", "codeSnippet": "The relevant line(s) of code." } ],
  "bugs": [ { "suggestion": "A specific potential bug found.", "codeSnippet": "The relevant line(s) of code." } ]
}
For each suggestion, provide the exact corresponding line(s) of code in the "codeSnippet" field. If a suggestion is general and doesn't apply to a specific line, you can leave the "codeSnippet" as an empty string. Do not include markdown or backticks inside the JSON string values.
"#;

/// Builds the user message: language tag plus the source, fenced, verbatim.
pub fn user_query(language: Language, source: &str) -> String {
    let tag = language.tag();
    format!("Review the following {tag} code:\n\n```{tag}\n{source}\n```")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_embeds_source_verbatim() {
        let source = "def f():\n  pass";
        let query = user_query(Language::Python, source);
        assert_eq!(query, "Review the following python code:\n\n```python\ndef f():\n  pass\n```");
        assert!(query.contains(source));
    }

    #[test]
    fn system_prompt_names_every_schema_field() {
        for field in crate::schema::REVIEW_FIELDS {
            assert!(SYSTEM_PROMPT.contains(field.name), "prompt is missing {}", field.name);
        }
    }
}

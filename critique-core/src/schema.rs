//! The review response schema.
//!
//! One table drives both directions: [`response_schema`] renders it as the
//! `responseSchema` sent with every request, and [`decode`] validates the
//! model's reply against the same table before handing it to serde. Adding a
//! field here changes both sides at once.

use serde_json::{json, Map, Value};

use crate::error::{Result, ReviewError};
use crate::types::ReviewResult;

/// Shape of one top-level field of the review object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A free-text string.
    Text,
    /// An ordered array of `{suggestion, codeSnippet}` objects.
    FindingList,
}

/// A named top-level field of the review object. Every field is required.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Top-level fields, in prompt order.
pub const REVIEW_FIELDS: [Field; 4] = [
    Field {
        name: "overallAssessment",
        kind: FieldKind::Text,
    },
    Field {
        name: "readability",
        kind: FieldKind::FindingList,
    },
    Field {
        name: "modularity",
        kind: FieldKind::FindingList,
    },
    Field {
        name: "bugs",
        kind: FieldKind::FindingList,
    },
];

/// String fields of each finding object. Both are required.
pub const FINDING_FIELDS: [&str; 2] = ["suggestion", "codeSnippet"];

fn finding_schema() -> Value {
    let properties: Map<String, Value> = FINDING_FIELDS
        .iter()
        .map(|name| ((*name).to_owned(), json!({ "type": "STRING" })))
        .collect();
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": FINDING_FIELDS,
    })
}

/// Renders the schema in the Gemini `responseSchema` dialect (OpenAPI subset,
/// upper-case type names).
pub fn response_schema() -> Value {
    let properties: Map<String, Value> = REVIEW_FIELDS
        .iter()
        .map(|field| {
            let schema = match field.kind {
                FieldKind::Text => json!({ "type": "STRING" }),
                FieldKind::FindingList => json!({ "type": "ARRAY", "items": finding_schema() }),
            };
            (field.name.to_owned(), schema)
        })
        .collect();
    let required: Vec<&str> = REVIEW_FIELDS.iter().map(|f| f.name).collect();
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

/// Checks `value` against [`REVIEW_FIELDS`].
///
/// Unknown extra fields are tolerated; missing or mistyped required fields are
/// reported with a path such as `bugs[2].codeSnippet`.
///
/// # Errors
///
/// Returns [`ReviewError::Schema`] describing the first mismatch.
pub fn validate(value: &Value) -> Result<()> {
    let object = value
        .as_object()
        .ok_or_else(|| ReviewError::Schema("top level is not an object".to_owned()))?;

    for field in REVIEW_FIELDS {
        let item = object
            .get(field.name)
            .ok_or_else(|| ReviewError::Schema(format!("missing field `{}`", field.name)))?;
        match field.kind {
            FieldKind::Text => {
                if !item.is_string() {
                    return Err(ReviewError::Schema(format!("`{}` is not a string", field.name)));
                }
            }
            FieldKind::FindingList => validate_findings(field.name, item)?,
        }
    }
    Ok(())
}

fn validate_findings(name: &str, value: &Value) -> Result<()> {
    let items = value
        .as_array()
        .ok_or_else(|| ReviewError::Schema(format!("`{name}` is not an array")))?;
    for (idx, item) in items.iter().enumerate() {
        let object = item
            .as_object()
            .ok_or_else(|| ReviewError::Schema(format!("`{name}[{idx}]` is not an object")))?;
        for key in FINDING_FIELDS {
            match object.get(key) {
                Some(Value::String(_)) => {}
                Some(_) => {
                    return Err(ReviewError::Schema(format!(
                        "`{name}[{idx}].{key}` is not a string"
                    )))
                }
                None => {
                    return Err(ReviewError::Schema(format!("missing field `{name}[{idx}].{key}`")))
                }
            }
        }
    }
    Ok(())
}

/// Parses the model's embedded JSON text into a [`ReviewResult`].
///
/// # Errors
///
/// [`ReviewError::Parse`] if `text` is not JSON, [`ReviewError::Schema`] if it
/// does not match [`REVIEW_FIELDS`].
pub fn decode(text: &str) -> Result<ReviewResult> {
    let value: Value = serde_json::from_str(text)?;
    validate(&value)?;
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Finding;

    #[test]
    fn schema_requires_every_field() {
        let schema = response_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(
            schema["required"],
            json!(["overallAssessment", "readability", "modularity", "bugs"])
        );
        let bugs = &schema["properties"]["bugs"];
        assert_eq!(bugs["type"], "ARRAY");
        assert_eq!(bugs["items"]["required"], json!(["suggestion", "codeSnippet"]));
        assert_eq!(bugs["items"]["properties"]["codeSnippet"]["type"], "STRING");
    }

    #[test]
    fn schema_field_names_match_serde_names() {
        let sample = ReviewResult {
            overall_assessment: String::new(),
            readability: vec![Finding::new("a", "b")],
            modularity: Vec::new(),
            bugs: Vec::new(),
        };
        let value = serde_json::to_value(&sample).unwrap();
        validate(&value).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), REVIEW_FIELDS.len());
    }

    #[test]
    fn decode_accepts_valid_review() {
        let result = decode(
            r#"{"overallAssessment":"Fine","readability":[],"modularity":[],"bugs":[]}"#,
        )
        .unwrap();
        assert_eq!(result.overall_assessment, "Fine");
        assert!(result.bugs.is_empty());
    }

    #[test]
    fn decode_reports_missing_field_path() {
        let reply = r#"{"overallAssessment":"x","readability":[{"suggestion":"s"}],
            "modularity":[],"bugs":[]}"#;
        let err = decode(reply).unwrap_err();
        let ReviewError::Schema(msg) = &err else {
            panic!("expected a schema error, got {err:?}");
        };
        assert!(msg.contains("readability[0].codeSnippet"), "{msg}");
    }

    #[test]
    fn decode_rejects_wrong_types() {
        let err = decode(r#"{"overallAssessment":3,"readability":[],"modularity":[],"bugs":[]}"#)
            .unwrap_err();
        assert!(matches!(err, ReviewError::Schema(_)));
        let err = decode(r#"{"overallAssessment":"x","readability":{},"modularity":[],"bugs":[]}"#)
            .unwrap_err();
        assert!(matches!(err, ReviewError::Schema(_)));
    }

    #[test]
    fn decode_rejects_non_json() {
        assert!(matches!(decode("not json").unwrap_err(), ReviewError::Parse(_)));
    }
}

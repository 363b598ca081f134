//! Gemini `generateContent` client.
//!
//! One POST per review, credential in the `key` query parameter, no retries.
//! The reply's first candidate text is decoded through [`crate::schema`].

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{Result, ReviewError};
use crate::prompt::{user_query, SYSTEM_PROMPT};
use crate::schema;
use crate::types::{ReviewRequest, ReviewResult};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for [`GeminiClient`].
#[derive(Clone)]
pub struct ClientConfig {
    /// Scheme and host, without the `/v1beta` path.
    pub endpoint: String,
    pub model: String,
    /// `None` is legal: every submission then fails with `MissingApiKey`.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Client for the remote review service. Cheap to clone.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl GeminiClient {
    pub fn new(config: ClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { http, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn has_credential(&self) -> bool {
        self.config.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Builds the JSON body for `request`.
    pub fn request_body(request: &ReviewRequest) -> Value {
        json!({
            "contents": [{
                "parts": [{ "text": user_query(request.language(), request.source_text()) }],
            }],
            "systemInstruction": { "parts": [{ "text": SYSTEM_PROMPT }] },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema::response_schema(),
            },
        })
    }

    /// Sends one review request and decodes the structured reply.
    ///
    /// # Errors
    ///
    /// - [`ReviewError::MissingApiKey`] before any network activity.
    /// - [`ReviewError::Api`] for a non-success status.
    /// - [`ReviewError::Transport`] for connection failures and timeouts.
    /// - [`ReviewError::NoValidReview`] when the candidate text is absent or blank.
    /// - [`ReviewError::Parse`] / [`ReviewError::Schema`] for a malformed review.
    pub async fn review(&self, request: &ReviewRequest) -> Result<ReviewResult> {
        let key = match self.config.api_key.as_deref() {
            Some(k) if !k.trim().is_empty() => k,
            _ => return Err(ReviewError::MissingApiKey),
        };

        tracing::debug!(
            model = %self.config.model,
            language = %request.language(),
            source_len = request.source_text().len(),
            "sending review request"
        );

        let response = self
            .http
            .post(self.url())
            .query(&[("key", key)])
            .header("Content-Type", "application/json")
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            tracing::warn!(%status, %message, "review request rejected");
            return Err(ReviewError::Api { message });
        }

        let envelope: GenerateContentResponse = serde_json::from_str(&body)?;
        let text = envelope
            .first_text()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ReviewError::NoValidReview)?;
        schema::decode(&text)
    }
}

/// Strips the request URL, which carries the key as a query parameter.
fn transport(err: reqwest::Error) -> ReviewError {
    ReviewError::Transport(err.without_url())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PATH: &str = "/v1beta/models/test-model:generateContent";

    fn client_for(server: &MockServer, key: Option<&str>) -> GeminiClient {
        client_with_timeout(&server.uri(), key, Duration::from_secs(5))
    }

    fn client_with_timeout(endpoint: &str, key: Option<&str>, timeout: Duration) -> GeminiClient {
        GeminiClient::new(ClientConfig {
            endpoint: endpoint.to_owned(),
            model: "test-model".to_owned(),
            api_key: key.map(str::to_owned),
            timeout,
        })
    }

    fn candidate(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    #[test]
    fn body_carries_prompt_and_schema() {
        let req = ReviewRequest::new("fn main() {}", Language::Rust).unwrap();
        let body = GeminiClient::request_body(&req);
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], SYSTEM_PROMPT);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"], schema::response_schema());
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("```rust\nfn main() {}\n```"));
    }

    #[test]
    fn debug_redacts_key() {
        let config = ClientConfig {
            api_key: Some("secret".to_owned()),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[tokio::test]
    async fn decodes_successful_review() {
        let server = MockServer::start().await;
        let review = r#"{"overallAssessment":"OK","readability":[],"modularity":[],
            "bugs":[{"suggestion":"no docstring","codeSnippet":"def f():"}]}"#;
        Mock::given(method("POST"))
            .and(path(PATH))
            .and(query_param("key", "k"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate(review)))
            .expect(1)
            .mount(&server)
            .await;

        let req = ReviewRequest::new("def f():\n  pass", Language::Python).unwrap();
        let result = client_for(&server, Some("k")).review(&req).await.unwrap();
        assert_eq!(result.overall_assessment, "OK");
        assert_eq!(result.bugs.len(), 1);
        assert_eq!(result.bugs[0].code_snippet, "def f():");
    }

    #[tokio::test]
    async fn error_status_uses_body_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PATH))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(json!({ "error": { "message": "quota exceeded" } })),
            )
            .mount(&server)
            .await;

        let req = ReviewRequest::new("x", Language::Go).unwrap();
        let err = client_for(&server, Some("k")).review(&req).await.unwrap_err();
        assert_eq!(err.to_string(), "API request failed: quota exceeded");
    }

    #[tokio::test]
    async fn error_status_without_body_is_generic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let req = ReviewRequest::new("x", Language::Go).unwrap();
        let err = client_for(&server, Some("k")).review(&req).await.unwrap_err();
        assert!(
            matches!(err, ReviewError::Api { ref message } if message.starts_with("HTTP 500"))
        );
    }

    #[tokio::test]
    async fn missing_candidate_text_is_no_valid_review() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let req = ReviewRequest::new("x", Language::Go).unwrap();
        let err = client_for(&server, Some("k")).review(&req).await.unwrap_err();
        assert!(matches!(err, ReviewError::NoValidReview));
    }

    #[tokio::test]
    async fn blank_candidate_text_is_no_valid_review() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate("")))
            .mount(&server)
            .await;

        let req = ReviewRequest::new("x", Language::Go).unwrap();
        let err = client_for(&server, Some("k")).review(&req).await.unwrap_err();
        assert!(matches!(err, ReviewError::NoValidReview));
    }

    #[tokio::test]
    async fn slow_reply_times_out_without_leaking_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate("{}"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client =
            client_with_timeout(&server.uri(), Some("SECRET-KEY-123"), Duration::from_secs(1));
        let req = ReviewRequest::new("x", Language::Go).unwrap();
        let err = client.review(&req).await.unwrap_err();
        assert!(matches!(err, ReviewError::Transport(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"));
        assert!(!format!("{err:?}").contains("SECRET-KEY-123"));
    }

    #[tokio::test]
    async fn refused_connection_does_not_leak_key() {
        let client = client_with_timeout(
            "http://127.0.0.1:9",
            Some("SECRET-KEY-123"),
            Duration::from_secs(5),
        );
        let req = ReviewRequest::new("x", Language::Go).unwrap();
        let err = client.review(&req).await.unwrap_err();
        assert!(matches!(err, ReviewError::Transport(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"));
    }

    #[tokio::test]
    async fn missing_key_never_reaches_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let req = ReviewRequest::new("x", Language::Go).unwrap();
        let err = client_for(&server, Some("  ")).review(&req).await.unwrap_err();
        assert!(matches!(err, ReviewError::MissingApiKey));
    }
}

//! Error taxonomy for a single review submission.
//!
//! Every variant renders as the one-line message shown in the error region.
//! The UI never distinguishes kinds; the split exists for logging and tests.

/// Everything that can stop a submission from producing a [`crate::ReviewResult`].
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    // Local validation: detected before any network activity.
    #[error("Please enter or upload some code to review.")]
    EmptySource,

    #[error("API key is not configured. Set GEMINI_API_KEY or api_key in the config file.")]
    MissingApiKey,

    #[error("A review is already in progress.")]
    Busy,

    #[error("Unknown language '{0}'. Supported: {1}")]
    UnknownLanguage(String, String),

    // Transport.
    #[error("API request failed: {message}")]
    Api { message: String },

    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    // Response shape.
    #[error("Failed to get a valid review from the model.")]
    NoValidReview,

    // Parse.
    #[error("Review is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Review does not match the expected schema: {0}")]
    Schema(String),
}

impl ReviewError {
    /// True for errors raised before the remote service was contacted.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ReviewError::EmptySource
                | ReviewError::MissingApiKey
                | ReviewError::Busy
                | ReviewError::UnknownLanguage(..)
        )
    }
}

pub type Result<T> = std::result::Result<T, ReviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_message_matches_display_contract() {
        let err = ReviewError::Api {
            message: "quota exceeded".to_owned(),
        };
        assert_eq!(err.to_string(), "API request failed: quota exceeded");
        assert!(!err.is_local());
    }

    #[test]
    fn validation_errors_are_local() {
        assert!(ReviewError::EmptySource.is_local());
        assert!(ReviewError::MissingApiKey.is_local());
        assert!(ReviewError::Busy.is_local());
        assert!(!ReviewError::NoValidReview.is_local());
    }
}

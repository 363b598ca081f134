//! Review session state machine.
//!
//! [`SessionState`] is the single owner of everything the review screen shows.
//! It only changes through [`SessionState::apply`], a pure function from
//! `(state, event)` to the next state, so the TUI and the headless runner share
//! one set of transition rules.
//!
//! The loading flag is raised by [`SessionEvent::ReviewStarted`] and lowered
//! only by the two completion events, so it is true exactly while a request
//! task is alive.

use serde::{Deserialize, Serialize};

use crate::client::GeminiClient;
use crate::error::{Result, ReviewError};
use crate::language::Language;
use crate::types::{ReviewRequest, ReviewResult};

/// The four mutually exclusive result views.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Overall,
    Readability,
    Modularity,
    Bugs,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overall, Tab::Readability, Tab::Modularity, Tab::Bugs];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overall => "Overall Assessment",
            Tab::Readability => "Readability",
            Tab::Modularity => "Modularity",
            Tab::Bugs => "Potential Bugs",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Overall => 0,
            Tab::Readability => 1,
            Tab::Modularity => 2,
            Tab::Bugs => 3,
        }
    }

    /// Next tab, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous tab, wrapping around.
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Everything that can happen to a session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Editor contents changed, or a loaded file replaced them.
    SourceReplaced(String),
    LanguageSelected(Language),
    TabSelected(Tab),
    /// A request task was spawned.
    ReviewStarted,
    ReviewCompleted(ReviewResult),
    /// A submission failed at any stage; carries the display message.
    ReviewFailed(String),
}

/// Serializable snapshot of one review session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub source_text: String,
    pub language: Language,
    pub current_result: Option<ReviewResult>,
    pub loading: bool,
    pub error_message: Option<String>,
    pub active_tab: Tab,
}

impl SessionState {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// Returns the state that follows `event`.
    pub fn apply(mut self, event: SessionEvent) -> Self {
        match event {
            SessionEvent::SourceReplaced(text) => self.source_text = text,
            SessionEvent::LanguageSelected(language) => self.language = language,
            SessionEvent::TabSelected(tab) => self.active_tab = tab,
            SessionEvent::ReviewStarted => {
                self.loading = true;
                self.current_result = None;
                self.error_message = None;
                self.active_tab = Tab::Overall;
            }
            SessionEvent::ReviewCompleted(result) => {
                self.loading = false;
                self.error_message = None;
                self.current_result = Some(result);
                self.active_tab = Tab::Overall;
            }
            SessionEvent::ReviewFailed(message) => {
                self.loading = false;
                self.current_result = None;
                self.error_message = Some(message);
            }
        }
        self
    }

    /// Checks local preconditions and snapshots the request to send.
    ///
    /// # Errors
    ///
    /// [`ReviewError::Busy`] while a request is in flight,
    /// [`ReviewError::EmptySource`] for blank input,
    /// [`ReviewError::MissingApiKey`] when `client` has no credential.
    pub fn prepare_submission(&self, client: &GeminiClient) -> Result<ReviewRequest> {
        if self.loading {
            return Err(ReviewError::Busy);
        }
        let request = ReviewRequest::new(self.source_text.clone(), self.language)?;
        if !client.has_credential() {
            return Err(ReviewError::MissingApiKey);
        }
        Ok(request)
    }
}

/// Maps the outcome of a request task onto the completion event.
pub fn completion_event(outcome: Result<ReviewResult>) -> SessionEvent {
    match outcome {
        Ok(result) => SessionEvent::ReviewCompleted(result),
        Err(err) => SessionEvent::ReviewFailed(err.to_string()),
    }
}

/// Runs one complete submission: validate, call, and fold the outcome back.
///
/// Local validation failures never touch the network. A `Busy` refusal leaves
/// the in-flight state untouched.
pub async fn submit_review(state: SessionState, client: &GeminiClient) -> SessionState {
    let request = match state.prepare_submission(client) {
        Ok(request) => request,
        Err(ReviewError::Busy) => return state,
        Err(err) => {
            log_failure(&err);
            return state.apply(SessionEvent::ReviewFailed(err.to_string()));
        }
    };

    let state = state.apply(SessionEvent::ReviewStarted);
    tracing::info!(language = %request.language(), "review started");
    let outcome = client.review(&request).await;
    match &outcome {
        Ok(result) => tracing::info!(
            readability = result.readability.len(),
            modularity = result.modularity.len(),
            bugs = result.bugs.len(),
            "review completed"
        ),
        Err(err) => log_failure(err),
    }
    state.apply(completion_event(outcome))
}

/// Input mistakes log at debug level; service and transport failures warn.
pub fn log_failure(err: &ReviewError) {
    if err.is_local() {
        tracing::debug!(error = %err, "review rejected before sending");
    } else {
        tracing::warn!(error = %err, "review failed");
    }
}

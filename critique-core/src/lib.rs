//! critique-core: the review pipeline behind the `critique` TUI.
//!
//! Everything that does not touch the terminal lives here: the language list,
//! the review data model, the response schema shared by request and decoder,
//! the Gemini client, the session state machine, the per-tab view model, and
//! the plain-text report builder.

pub mod client;
pub mod error;
pub mod language;
pub mod prompt;
pub mod report;
pub mod schema;
pub mod session;
pub mod types;
pub mod view;

pub use client::{ClientConfig, GeminiClient};
pub use error::{Result, ReviewError};
pub use language::Language;
pub use session::{log_failure, SessionEvent, SessionState, Tab};
pub use types::{Finding, ReviewRequest, ReviewResult};

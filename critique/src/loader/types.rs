//! Owned data types exchanged with the loader thread.

use std::path::PathBuf;

use critique_core::Language;

/// A request sent from the main loop to the loader thread.
#[derive(Debug)]
pub struct LoadRequest {
    pub path: PathBuf,
    /// When false the current language is kept even if the extension implies another.
    pub detect_language: bool,
}

/// A successfully decoded source file.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub contents: String,
    /// Language implied by the extension; `None` for `.txt` or when detection is off.
    pub language: Option<Language>,
}

/// Why a file could not become the active source text.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Unsupported file type '{0}'. Accepted: {1}")]
    Unsupported(String, String),

    #[error("{} is not valid UTF-8 text", .0.display())]
    NotUtf8(PathBuf),

    #[error("Could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

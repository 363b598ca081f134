//! Background thread that reads source files for the editor.
//!
//! Requests are handled in arrival order; if two loads are queued the later one
//! simply overwrites the editor when its result lands.

use std::path::{Path, PathBuf};

use crossbeam_channel::Receiver;
use critique_core::language::PLAIN_TEXT_EXTENSIONS;
use critique_core::Language;
use tokio::sync::mpsc::UnboundedSender;

use crate::event::AppEvent;
use crate::loader::types::{LoadError, LoadRequest, LoadedFile};

/// Entry point for the loader thread.
///
/// Loops until every `Sender<LoadRequest>` is dropped. Each outcome is posted
/// as `AppEvent::FileLoaded`.
pub fn loader_worker_loop(rx: Receiver<LoadRequest>, event_tx: UnboundedSender<AppEvent>) {
    for request in rx {
        let outcome = load_file(&request.path, request.detect_language);
        match &outcome {
            Ok(file) => tracing::info!(
                path = %file.path.display(),
                bytes = file.contents.len(),
                "loaded source file"
            ),
            Err(err) => tracing::warn!(error = %err, "source file rejected"),
        }
        if event_tx.send(AppEvent::FileLoaded(Box::new(outcome))).is_err() {
            break;
        }
    }
}

/// Every extension the loader accepts, dotted, for error messages.
pub fn accepted_extensions() -> String {
    Language::ALL
        .iter()
        .map(|l| l.extension())
        .chain(PLAIN_TEXT_EXTENSIONS.iter().copied())
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reads `path` as UTF-8 source text.
///
/// The extension must be on the allow-list. No size limit is applied.
///
/// # Errors
///
/// [`LoadError::Unsupported`] for other extensions, [`LoadError::NotUtf8`] for
/// undecodable bytes, [`LoadError::Io`] when the read fails.
pub fn load_file(path: &Path, detect_language: bool) -> Result<LoadedFile, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_owned();
    if !Language::is_allowed_extension(&ext) {
        let shown = if ext.is_empty() { "(none)".to_owned() } else { format!(".{ext}") };
        return Err(LoadError::Unsupported(shown, accepted_extensions()));
    }

    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let contents = String::from_utf8(bytes).map_err(|_| LoadError::NotUtf8(path.to_path_buf()))?;

    let language = if detect_language { Language::from_extension(&ext) } else { None };
    Ok(LoadedFile {
        path: PathBuf::from(path),
        contents,
        language,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn loads_and_detects_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "main.py", b"def f():\n  pass\n");
        let file = load_file(&path, true).unwrap();
        assert_eq!(file.contents, "def f():\n  pass\n");
        assert_eq!(file.language, Some(Language::Python));
    }

    #[test]
    fn txt_keeps_current_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "notes.txt", b"hello");
        assert_eq!(load_file(&path, true).unwrap().language, None);
    }

    #[test]
    fn detection_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "lib.rs", b"fn a() {}");
        assert_eq!(load_file(&path, false).unwrap().language, None);
    }

    #[test]
    fn rejects_unlisted_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "blob.bin", b"\x00\x01");
        let err = load_file(&path, true).unwrap_err();
        assert!(matches!(err, LoadError::Unsupported(ref ext, _) if ext == ".bin"));
        assert!(err.to_string().contains(".rs"));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "bad.go", &[0xff, 0xfe, 0x00]);
        assert!(matches!(load_file(&path, true).unwrap_err(), LoadError::NotUtf8(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("gone.rs"), true).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn worker_posts_results_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_temp(&dir, "a.rs", b"first");
        let b = write_temp(&dir, "b.rs", b"second");

        let (req_tx, req_rx) = crossbeam_channel::unbounded();
        let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
        for path in [a, b] {
            req_tx
                .send(LoadRequest {
                    path,
                    detect_language: true,
                })
                .unwrap();
        }
        drop(req_tx);
        loader_worker_loop(req_rx, event_tx);

        let mut seen = Vec::new();
        while let Ok(AppEvent::FileLoaded(outcome)) = event_rx.try_recv() {
            seen.push(outcome.unwrap().contents);
        }
        assert_eq!(seen, vec!["first", "second"]);
    }
}

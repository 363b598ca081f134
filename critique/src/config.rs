//! Configuration loading.
//!
//! Precedence, highest first: command-line flag, environment variable, config
//! file, built-in default. A missing or unparsable config file is a soft
//! failure: it is logged and defaults are used.

use std::path::{Path, PathBuf};
use std::time::Duration;

use critique_core::client::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use critique_core::{ClientConfig, Language};
use serde::Deserialize;

use crate::cli::Cli;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

/// Raw contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub theme: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub language: Option<String>,
    pub export_dir: Option<PathBuf>,
}

/// Fully resolved settings used by the rest of the binary.
#[derive(Debug)]
pub struct Settings {
    pub theme_name: String,
    pub client: ClientConfig,
    pub language: Language,
    pub export_dir: PathBuf,
}

/// Returns the path to the config file.
///
/// Prefers `$XDG_CONFIG_HOME/critique/config.toml`; falls back to
/// `~/.config/critique/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("critique").join("config.toml")
}

/// Reads and parses `path`. Returns defaults if the file is absent or invalid.
pub fn load_file_config(path: &Path) -> FileConfig {
    let raw = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return FileConfig::default();
        }
    };
    parse_file_config(&raw).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "config parse error, using defaults");
        FileConfig::default()
    })
}

pub fn parse_file_config(raw: &str) -> Result<FileConfig, toml::de::Error> {
    toml::from_str(raw)
}

/// Merges CLI flags, environment and file config into [`Settings`].
///
/// `env` is injected so tests do not depend on the process environment.
pub fn resolve(cli: &Cli, file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Settings {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let api_key = non_empty(env(API_KEY_ENV)).or_else(|| non_empty(file.api_key));
    let model = cli
        .model
        .clone()
        .or(file.model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_owned());
    let endpoint = file.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());
    let timeout = Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1));

    let file_language = file.language.and_then(|tag| match tag.parse::<Language>() {
        Ok(lang) => Some(lang),
        Err(err) => {
            tracing::warn!(error = %err, "ignoring language from config file");
            None
        }
    });
    let language = cli.language.or(file_language).unwrap_or_default();

    Settings {
        theme_name: file.theme.unwrap_or_else(|| DEFAULT_THEME.to_owned()),
        client: ClientConfig {
            endpoint,
            model,
            api_key,
            timeout,
        },
        language,
        export_dir: file.export_dir.unwrap_or_else(|| PathBuf::from(".")),
    }
}

/// Loads the config file named on the command line (or the default one) and
/// resolves it against the real environment.
pub fn load(cli: &Cli) -> Settings {
    let path = cli.config.clone().unwrap_or_else(config_path);
    let file = load_file_config(&path);
    resolve(cli, file, |name| std::env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("critique").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_without_any_input() {
        let settings = resolve(&cli(&[]), FileConfig::default(), |_| None);
        assert_eq!(settings.client.model, DEFAULT_MODEL);
        assert_eq!(settings.client.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.client.api_key, None);
        assert_eq!(settings.client.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(settings.language, Language::JavaScript);
        assert_eq!(settings.theme_name, DEFAULT_THEME);
        assert_eq!(settings.export_dir, PathBuf::from("."));
    }

    #[test]
    fn env_key_beats_file_key() {
        let file = FileConfig {
            api_key: Some("from-file".into()),
            ..Default::default()
        };
        let settings = resolve(&cli(&[]), file, |name| {
            (name == API_KEY_ENV).then(|| "from-env".to_owned())
        });
        assert_eq!(settings.client.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn blank_env_key_falls_through_to_file() {
        let file = FileConfig {
            api_key: Some("from-file".into()),
            ..Default::default()
        };
        let settings = resolve(&cli(&[]), file, |_| Some("  ".to_owned()));
        assert_eq!(settings.client.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn cli_language_and_model_beat_file() {
        let raw = r#"
            language = "go"
            model = "file-model"
            timeout_secs = 15
            theme = "dark"
        "#;
        let file = parse_file_config(raw).unwrap();
        let settings = resolve(&cli(&["-l", "rust", "--model", "cli-model"]), file, |_| None);
        assert_eq!(settings.language, Language::Rust);
        assert_eq!(settings.client.model, "cli-model");
        assert_eq!(settings.client.timeout, Duration::from_secs(15));
        assert_eq!(settings.theme_name, "dark");
    }

    #[test]
    fn bad_file_language_is_ignored() {
        let file = FileConfig {
            language: Some("cobol".into()),
            ..Default::default()
        };
        let settings = resolve(&cli(&[]), file, |_| None);
        assert_eq!(settings.language, Language::JavaScript);
    }

    #[test]
    fn unknown_keys_are_a_parse_error() {
        assert!(parse_file_config("colour = \"red\"").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = load_file_config(&dir.path().join("absent.toml"));
        assert!(file.api_key.is_none());
    }
}

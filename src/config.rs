//! Run configuration, assembled once in `main` and passed down by reference.
//!
//! Sources, later ones winning:
//! 1. built-in defaults (stop words)
//! 2. the optional YAML file given with `--config`
//! 3. command-line flags and their environment variables

use crate::analysis::StopWords;
use crate::cli::Cli;
use serde::Deserialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument, warn};
use url::Url;

/// Optional YAML settings.
///
/// ```yaml
/// # replaces the built-in list
/// stop_words: ["속보", "단독"]
/// # added on top of whichever list is in effect
/// extra_stop_words: ["정치"]
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub stop_words: Option<Vec<String>>,
    pub extra_stop_words: Vec<String>,
}

impl FileConfig {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to unit, not a map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }
}

/// Telegram destination.
#[derive(Debug, Clone)]
pub struct TelegramSettings {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

/// Gemini access.
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub model: String,
}

/// Immutable settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub board_url: Url,
    pub output_dir: PathBuf,
    pub request_timeout: Duration,
    pub top_n: usize,
    pub wordcloud_words: usize,
    pub stop_words: StopWords,
    pub font_path: Option<PathBuf>,
    pub telegram: TelegramSettings,
    pub gemini: GeminiSettings,
}

impl Config {
    /// Merge CLI arguments with the optional YAML file.
    #[instrument(level = "info", skip_all)]
    pub async fn load(cli: Cli) -> Result<Self, Box<dyn Error>> {
        let file = match &cli.config {
            Some(path) => read_file_config(path).await?,
            None => FileConfig::default(),
        };
        Self::from_parts(cli, file)
    }

    pub fn from_parts(cli: Cli, file: FileConfig) -> Result<Self, Box<dyn Error>> {
        let board_url = Url::parse(&cli.board_url)?;

        let mut stop_words = match file.stop_words {
            Some(words) => StopWords::new(words),
            None => StopWords::default(),
        };
        stop_words.extend(file.extra_stop_words);
        if stop_words.is_empty() {
            warn!("Stop-word list is empty; every title token will be counted");
        }

        let config = Self {
            board_url,
            output_dir: cli.output_dir,
            request_timeout: Duration::from_secs(cli.timeout_secs),
            top_n: cli.top_n,
            wordcloud_words: cli.wordcloud_words,
            stop_words,
            font_path: cli.font_path,
            telegram: TelegramSettings {
                bot_token: credential(cli.telegram_bot_token),
                chat_id: credential(cli.telegram_chat_id),
            },
            gemini: GeminiSettings {
                api_key: credential(cli.gemini_api_key),
                model: cli.gemini_model,
            },
        };

        info!(
            board = %config.board_url,
            output_dir = %config.output_dir.display(),
            stop_words = config.stop_words.len(),
            telegram = config.telegram.bot_token.is_some() && config.telegram.chat_id.is_some(),
            gemini = config.gemini.api_key.is_some(),
            "Configuration loaded"
        );
        Ok(config)
    }
}

async fn read_file_config(path: &Path) -> Result<FileConfig, Box<dyn Error>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("cannot read config file {}: {e}", path.display()))?;
    let file = FileConfig::from_yaml(&text)
        .map_err(|e| format!("invalid config file {}: {e}", path.display()))?;
    Ok(file)
}

/// Treat blank values and `.env.example` placeholders as unset.
fn credential(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !(v.starts_with("YOUR_") && v.ends_with("_HERE")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["clien_yesterday"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_placeholder_credentials_are_unset() {
        assert_eq!(credential(Some("YOUR_TELEGRAM_BOT_TOKEN_HERE".into())), None);
        assert_eq!(credential(Some("   ".into())), None);
        assert_eq!(credential(None), None);
        assert_eq!(credential(Some(" 123:abc ".into())), Some("123:abc".into()));
    }

    #[test]
    fn test_file_config_parsing() {
        let file = FileConfig::from_yaml("extra_stop_words: [\"정치\"]\n").unwrap();
        assert_eq!(file.stop_words, None);
        assert_eq!(file.extra_stop_words, vec!["정치".to_string()]);

        assert_eq!(FileConfig::from_yaml("").unwrap(), FileConfig::default());
        assert!(FileConfig::from_yaml("stop_words: 3").is_err());
    }

    #[test]
    fn test_stop_words_replace_then_extend() {
        let file = FileConfig {
            stop_words: Some(vec!["하나".into()]),
            extra_stop_words: vec!["둘".into()],
        };
        let config = Config::from_parts(cli(&["--board-url", "https://example.com/board"]), file).unwrap();

        assert!(config.stop_words.contains("하나"));
        assert!(config.stop_words.contains("둘"));
        assert!(!config.stop_words.contains("속보"));
        assert_eq!(config.board_url.as_str(), "https://example.com/board");
    }

    #[test]
    fn test_defaults_keep_builtin_stop_words() {
        let config = Config::from_parts(cli(&[]), FileConfig::default()).unwrap();
        assert!(config.stop_words.contains("속보"));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_board_url_is_rejected() {
        assert!(Config::from_parts(cli(&["--board-url", "not a url"]), FileConfig::default()).is_err());
    }

    #[test]
    fn test_empty_stop_word_list_is_kept() {
        let file = FileConfig::from_yaml("stop_words: []\n").unwrap();
        let config = Config::from_parts(cli(&[]), file).unwrap();
        assert!(config.stop_words.is_empty());
    }

    #[tokio::test]
    async fn test_load_reads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "stop_words: [\"오직\"]\n").unwrap();

        let config = Config::load(cli(&["-c", path.to_str().unwrap()])).await.unwrap();
        assert!(config.stop_words.contains("오직"));
        assert_eq!(config.stop_words.len(), 1);
    }
}

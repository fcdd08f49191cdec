//! Command-line interface definitions.
//!
//! Credentials are normally supplied through environment variables (or a
//! `.env` file loaded at startup) rather than flags.

use clap::Parser;
use std::path::PathBuf;

use crate::scrapers::clien::BOARD_URL;

/// Command-line arguments for the yesterday harvester.
///
/// # Examples
///
/// ```sh
/// # Write reports to ./data, deliver if TELEGRAM_* are set
/// clien_yesterday
///
/// # Custom output dir and stop-word file
/// clien_yesterday -o /var/lib/clien -c stopwords.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory receiving the CSV, text and image reports
    #[arg(short, long, default_value = "data")]
    pub output_dir: PathBuf,

    /// Optional YAML file with stop-word settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Board listing address
    #[arg(long, env = "CLIEN_BOARD_URL", default_value = BOARD_URL)]
    pub board_url: String,

    /// Number of ranked words and bigrams to keep
    #[arg(long, default_value_t = 20)]
    pub top_n: usize,

    /// Number of top words drawn in the word cloud
    #[arg(long, default_value_t = 10)]
    pub wordcloud_words: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// TrueType/OpenType font with Hangul glyphs for the word cloud
    #[arg(long, env = "WORDCLOUD_FONT")]
    pub font_path: Option<PathBuf>,

    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub telegram_bot_token: Option<String>,

    /// Telegram chat receiving the reports
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: Option<String>,

    /// Gemini API key for the issue summary
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-2.5-flash")]
    pub gemini_model: String,
}

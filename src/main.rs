//! # Clien Yesterday
//!
//! Collects every post published yesterday on the Clien community board,
//! ranks the words of their titles, and turns the result into reports that
//! are delivered to a Telegram chat.
//!
//! ## Features
//!
//! - Walks the newest-first listing page by page and keeps yesterday's posts
//! - Word and bigram frequencies over the titles, with stop-word filtering
//! - Full-text bundle of the posts about the top keyword, summarized by Gemini
//! - CSV, text and word-cloud outputs sent with the Telegram Bot API
//!
//! ## Usage
//!
//! ```sh
//! TELEGRAM_BOT_TOKEN=... TELEGRAM_CHAT_ID=... clien_yesterday -o ./data
//! ```
//!
//! ## Architecture
//!
//! 1. **Harvest**: page through the listing until the first post older than yesterday
//! 2. **Analyze**: tokenize titles and rank words and bigrams
//! 3. **Issue**: fetch the bodies of the posts containing the top keyword
//! 4. **Output**: write reports, summarize, render and deliver
//!
//! Delivery, summarization and the word cloud are optional; a missing
//! credential or font only skips that step.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod analysis;
mod api;
mod cli;
mod config;
mod error;
mod issues;
mod models;
mod notify;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;
mod wordcloud;

use api::Summarizer;
use cli::Cli;
use config::Config;
use notify::Notifier;
use pipeline::Collaborators;
use scrapers::clien::{ClienBoard, http_client};
use scrapers::paginator::collect_yesterdays_posts;
use utils::ensure_writable_dir;
use wordcloud::WordCloud;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env file is normal.
    let dotenv = dotenvy::dotenv().ok();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("clien_yesterday starting up");
    if let Some(path) = dotenv {
        debug!(path = %path.display(), "Loaded environment file");
    }

    let args = Cli::parse();
    debug!(?args.output_dir, ?args.config, "Parsed CLI arguments");

    let config = Config::load(args).await?;

    // Early check: the output directory must be writable before any request is made.
    if let Err(e) = ensure_writable_dir(&config.output_dir).await {
        error!(
            path = %config.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let client = http_client(config.request_timeout)?;
    let board = ClienBoard::new(client.clone(), config.board_url.clone());
    let services = Collaborators {
        notifier: Notifier::from_settings(&config.telegram, client.clone()),
        summarizer: Summarizer::from_settings(&config.gemini, client),
        wordcloud: WordCloud::from_font(config.font_path.as_deref()),
    };
    let harvest = collect_yesterdays_posts(&board).await;
    let report = pipeline::run(&board, &config, &services, harvest).await?;

    let elapsed = start_time.elapsed();
    info!(
        posts = report.posts,
        stop = %report.stop,
        top_keyword = ?report.top_keyword,
        files = report.written.len(),
        sent = report.sent,
        elapsed_secs = elapsed.as_secs_f64(),
        "clien_yesterday finished"
    );
    Ok(())
}


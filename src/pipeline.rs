//! One run, from the listing walk to the last Telegram upload.
//!
//! Steps run strictly in order. Only writing the posts CSV is fatal; every
//! later step logs its failure and the run moves on.

use crate::analysis::{compute_frequencies, top_keyword};
use crate::api::Summarizer;
use crate::config::Config;
use crate::issues::assemble_issue_bundle;
use crate::models::{Harvest, ScanState};
use crate::notify::Notifier;
use crate::outputs::issue::write_issue_text;
use crate::outputs::tables::{write_frequencies_csv, write_posts_csv};
use crate::outputs::{OutputPaths, date_suffix};
use crate::scrapers::Board;
use crate::wordcloud::WordCloud;
use std::error::Error;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

/// External services a run may use.
#[derive(Debug)]
pub struct Collaborators {
    pub notifier: Notifier,
    pub summarizer: Summarizer,
    pub wordcloud: WordCloud,
}

/// What a run produced.
#[derive(Debug)]
pub struct RunReport {
    pub posts: usize,
    pub stop: ScanState,
    pub top_keyword: Option<String>,
    /// Files written, in the order they were written.
    pub written: Vec<PathBuf>,
    /// Files delivered to Telegram.
    pub sent: usize,
}

/// Produce every report from a finished listing walk.
///
/// `board` is still needed to fetch the bodies of the issue posts.
#[instrument(level = "info", skip_all, fields(target = %harvest.target))]
pub async fn run<B: Board>(
    board: &B,
    config: &Config,
    services: &Collaborators,
    harvest: Harvest,
) -> Result<RunReport, Box<dyn Error>> {
    let target = harvest.target;
    info!(
        count = harvest.posts.len(),
        pages = harvest.pages_fetched,
        stop = %harvest.stop,
        "Listing walk finished"
    );

    let mut report = RunReport {
        posts: harvest.posts.len(),
        stop: harvest.stop,
        top_keyword: None,
        written: Vec::new(),
        sent: 0,
    };

    if harvest.posts.is_empty() {
        warn!("No posts were collected for the target day");
        return Ok(report);
    }

    let paths = OutputPaths::new(&config.output_dir, target);
    let suffix = date_suffix(target);
    let posts = harvest.posts;

    write_posts_csv(&posts, &paths.posts_csv).await?;
    report.written.push(paths.posts_csv.clone());

    let (words, bigrams) = compute_frequencies(&posts, &config.stop_words, config.top_n);
    let keyword = top_keyword(&words);
    report.top_keyword = keyword.map(str::to_string);

    match keyword {
        Some(keyword) => {
            info!(keyword, "Top keyword");
            match assemble_issue_bundle(board, keyword, &posts).await {
                Some(bundle) => match write_issue_text(&bundle, &paths.issue_txt).await {
                    Ok(text) => {
                        report.written.push(paths.issue_txt.clone());
                        let caption = format!("Top keyword posts: {keyword}");
                        deliver(services, &paths.issue_txt, &caption, &mut report).await;
                        summarize(services, keyword, &text, &paths.summary_txt, &mut report).await;
                    }
                    Err(e) => error!(error = %e, "Failed to write issue bundle"),
                },
                None => info!(keyword, "No issue bundle for the top keyword"),
            }
        }
        None => info!("No title words left after filtering; skipping issue bundle"),
    }

    match write_frequencies_csv(&words, &bigrams, &paths.frequencies_csv).await {
        Ok(()) => {
            report.written.push(paths.frequencies_csv.clone());
            let caption = format!("Clien yesterday({suffix}) title word frequencies");
            deliver(services, &paths.frequencies_csv, &caption, &mut report).await;
        }
        Err(e) => error!(error = %e, "Failed to write frequencies CSV"),
    }

    match services
        .wordcloud
        .render(&words, config.wordcloud_words, &paths.wordcloud_png)
    {
        Ok(()) => {
            info!(path = %paths.wordcloud_png.display(), "Rendered word cloud");
            report.written.push(paths.wordcloud_png.clone());
            let caption = format!("Clien yesterday({suffix}) top keywords word cloud");
            match services.notifier.send_photo(&paths.wordcloud_png, &caption).await {
                Ok(()) => report.sent += 1,
                Err(e) => skipped("photo", &e),
            }
        }
        Err(e) => skipped("word cloud", &e),
    }

    info!(
        written = report.written.len(),
        sent = report.sent,
        "Run finished"
    );
    Ok(report)
}

async fn summarize(
    services: &Collaborators,
    keyword: &str,
    issue_text: &str,
    path: &Path,
    report: &mut RunReport,
) {
    let summary = match services.summarizer.summarize(issue_text).await {
        Ok(summary) => summary,
        Err(e) => return skipped("summary", &e),
    };
    if let Err(e) = tokio::fs::write(path, &summary).await {
        error!(path = %path.display(), error = %e, "Failed to write summary");
        return;
    }
    info!(path = %path.display(), "Saved summary");
    report.written.push(path.to_path_buf());

    let caption = format!("Gemini Summary for yesterday's top keyword: {keyword}");
    deliver(services, path, &caption, report).await;
}

async fn deliver(services: &Collaborators, path: &Path, caption: &str, report: &mut RunReport) {
    match services.notifier.send_document(path, caption).await {
        Ok(()) => report.sent += 1,
        Err(e) => skipped("document", &e),
    }
}

fn skipped(step: &str, reason: &dyn Display) {
    warn!(step, reason = %reason, "Step skipped");
}

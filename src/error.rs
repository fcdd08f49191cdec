//! Error types for the fetch, delivery, summary and rendering steps.
//!
//! None of these abort a run on their own. The pipeline logs them and moves
//! on to the next step; a [`FetchError`] on a listing page ends pagination.

use std::path::PathBuf;
use thiserror::Error;

/// A listing or detail request that did not produce a usable body.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Why a file or photo was not delivered to the chat.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Telegram delivery skipped: {0}")]
    Unavailable(String),

    #[error("File does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Telegram rejected the upload ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Telegram request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Could not read upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Why no summary text came back.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Summarization skipped: {0}")]
    Unavailable(String),

    #[error("Gemini request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini returned an error ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Gemini response had no text: {0}")]
    EmptyResponse(String),
}

/// Why the word cloud image was not produced.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Word cloud skipped: {0}")]
    Unavailable(String),

    #[error("No word frequencies to render")]
    NoData,

    #[error("Word cloud could not be written: {0}")]
    Write(String),
}

//! Clien "모두의공원" board: HTTP transport and listing parser.
//!
//! The listing at `https://www.clien.net/service/board/park` is sorted newest
//! first. Each post is a `div.symph_row` inside `div.list_content`; pinned
//! notices carry the extra `list_notice` class and are skipped.
//!
//! # Listing query
//!
//! | Param | Value | Meaning |
//! |-------|-------|---------|
//! | `od` | `T31` | newest first |
//! | `category` | `0` | all categories |
//! | `po` | page index | zero-based |

use super::Board;
use crate::error::FetchError;
use crate::models::{Post, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Default listing address.
pub const BOARD_URL: &str = "https://www.clien.net/service/board/park";

/// Browser user agent; the site blocks the default reqwest agent.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

static ROW: Lazy<Selector> =
    Lazy::new(|| sel("div.list_content > div.symph_row:not(.list_notice)"));
static TIMESTAMP: Lazy<Selector> = Lazy::new(|| sel("div.list_time span.timestamp"));
static TITLE: Lazy<Selector> = Lazy::new(|| sel("span.subject_fixed"));
static SYMPH: Lazy<Selector> = Lazy::new(|| sel("div.list_symph span"));
static AUTHOR: Lazy<Selector> = Lazy::new(|| sel("div.list_author span.nickname span"));
static HIT: Lazy<Selector> = Lazy::new(|| sel("div.list_hit span.hit"));
static TIME: Lazy<Selector> = Lazy::new(|| sel("div.list_time span.time"));
static SUBJECT_LINK: Lazy<Selector> = Lazy::new(|| sel("a.list_subject"));
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| sel("div.list_title a"));

fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// Build the shared HTTP client: browser UA and a fixed per-request timeout.
pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// HTTP-backed [`Board`] for the Clien listing.
#[derive(Debug, Clone)]
pub struct ClienBoard {
    client: Client,
    base_url: Url,
}

impl ClienBoard {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    async fn get_text(&self, request: reqwest::RequestBuilder) -> Result<String, FetchError> {
        let body = request.send().await?.error_for_status()?.text().await?;
        Ok(body)
    }
}

impl Board for ClienBoard {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[instrument(level = "debug", skip(self))]
    async fn listing_page(&self, page: usize) -> Result<String, FetchError> {
        let page = page.to_string();
        let request = self.client.get(self.base_url.clone()).query(&[
            ("od", "T31"),
            ("category", "0"),
            ("po", page.as_str()),
        ]);
        let body = self.get_text(request).await?;
        debug!(bytes = body.len(), "Fetched listing page");
        Ok(body)
    }

    #[instrument(level = "debug", skip(self))]
    async fn detail_page(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::Url {
            url: url.to_string(),
            source,
        })?;
        self.get_text(self.client.get(parsed)).await
    }
}

/// One post row of a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingBlock {
    /// A row whose timestamp parsed.
    Dated(Post),
    /// A row with a missing or malformed timestamp.
    Undated,
}

/// Parse every non-notice post row of a listing page, in page order.
///
/// An empty result means the page carried no post rows at all, which the
/// paginator treats as the end of the listing.
pub fn parse_listing(html: &str, base: &Url) -> Vec<ListingBlock> {
    let document = Html::parse_document(html);
    document
        .select(&ROW)
        .map(|row| match parse_row(row, base) {
            Some(post) => ListingBlock::Dated(post),
            None => ListingBlock::Undated,
        })
        .collect()
}

fn parse_row(row: ElementRef<'_>, base: &Url) -> Option<Post> {
    let timestamp = first_text(row, &TIMESTAMP)?;
    let posted_at = NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT).ok()?;

    let title = first_text(row, &TITLE).unwrap_or_default();
    let recommendations = normalize_count(&first_text(row, &SYMPH).unwrap_or_default());
    let author = first_text(row, &AUTHOR).unwrap_or_default();
    let views = normalize_count(&first_text(row, &HIT).unwrap_or_default());

    // The time span holds the label as its first text node, followed by a
    // nested timestamp span.
    let display_time = row
        .select(&TIME)
        .next()
        .and_then(|span| span.children().next())
        .and_then(|node| node.value().as_text().map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| posted_at.format("%H:%M").to_string());

    let url = row
        .select(&SUBJECT_LINK)
        .next()
        .or_else(|| row.select(&TITLE_LINK).next())
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| base.join(href).ok())
        .map(|u| u.to_string())
        .unwrap_or_default();

    Some(Post {
        title,
        recommendations,
        views,
        author,
        posted_at,
        display_time,
        url,
    })
}

fn first_text(row: ElementRef<'_>, selector: &Selector) -> Option<String> {
    row.select(selector)
        .next()
        .map(|el| el.text().map(str::trim).collect())
}

/// Parse a noisy counter such as `"1,234"` or `"2.1k "` by keeping only digits.
///
/// Text without any digit counts as zero.
pub fn normalize_count(value: &str) -> u64 {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

//! Data models shared by the scraper, the analyzer and the output writers.
//!
//! - [`Post`]: one board post as read from a listing page
//! - [`Harvest`]: the posts collected for the target day plus why paging stopped
//! - [`IssueBundle`]: full texts of the posts matching the top keyword

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Timestamp format used by the listing's hidden `span.timestamp` element.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single board post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Post title as shown in the listing.
    pub title: String,
    /// Recommendation ("symph") count.
    pub recommendations: u64,
    /// View count.
    pub views: u64,
    /// Author nickname; empty when the listing shows an image nickname only.
    pub author: String,
    /// Full creation time, authoritative for date classification.
    pub posted_at: NaiveDateTime,
    /// Short time label shown in the listing (e.g. `"13:45"`).
    pub display_time: String,
    /// Absolute detail-page URL, or empty when the row has no link.
    pub url: String,
}

impl Post {
    /// One-line metadata summary used in the issue bundle and in logs.
    pub fn meta_line(&self) -> String {
        format!(
            "Rec {} / Views {} / Author {} / Time {}",
            self.recommendations, self.views, self.author, self.display_time
        )
    }
}

/// State of the pagination loop.
///
/// `Scanning` continues to the next page; the two stop states record which
/// termination predicate fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Scanning,
    /// A post older than the target day was seen.
    StopOlder,
    /// A page had no post rows, or could not be fetched.
    StopEmpty,
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScanState::Scanning => "scanning",
            ScanState::StopOlder => "stop_older",
            ScanState::StopEmpty => "stop_empty",
        };
        f.write_str(s)
    }
}

/// Result of walking the listing for one target day.
#[derive(Debug)]
pub struct Harvest {
    /// The day whose posts were collected.
    pub target: NaiveDate,
    /// Posts from the target day, in listing order.
    pub posts: Vec<Post>,
    /// The terminal state of the scan (never `Scanning`).
    pub stop: ScanState,
    /// Number of listing pages requested, including the terminating one.
    pub pages_fetched: usize,
}

/// One post of the issue bundle together with its body text.
#[derive(Debug, Clone)]
pub struct IssueEntry {
    /// 1-based position among the keyword-matching posts.
    pub index: usize,
    pub post: Post,
    pub body: String,
}

/// Full-text export of every post whose title contains the top keyword.
#[derive(Debug, Clone)]
pub struct IssueBundle {
    pub keyword: String,
    pub entries: Vec<IssueEntry>,
}

/// A ranked `(token, count)` list, highest count first.
pub type Ranking = Vec<(String, usize)>;

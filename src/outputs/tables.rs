//! CSV exports for the collected posts and the title frequencies.
//!
//! Both files start with a UTF-8 byte-order mark so spreadsheet tools pick
//! the right encoding for Hangul titles.

use crate::models::{Post, Ranking};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One row of the posts CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRow {
    #[serde(rename = "Rec")]
    pub recommendations: u64,
    #[serde(rename = "Views")]
    pub views: u64,
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "URL")]
    pub url: String,
}

impl From<&Post> for PostRow {
    fn from(post: &Post) -> Self {
        Self {
            recommendations: post.recommendations,
            views: post.views,
            author: post.author.clone(),
            time: post.display_time.clone(),
            title: post.title.clone(),
            url: post.url.clone(),
        }
    }
}

/// One row of the frequencies CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyRow {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Token")]
    pub token: String,
    #[serde(rename = "Count")]
    pub count: usize,
}

/// Write the posts in collection order as `Rec,Views,Author,Time,Title,URL`.
#[instrument(level = "info", skip(posts), fields(path = %path.display()))]
pub async fn write_posts_csv(posts: &[Post], path: &Path) -> Result<(), Box<dyn Error>> {
    let bytes = encode(posts.iter().map(PostRow::from))?;
    fs::write(path, bytes).await?;
    info!(count = posts.len(), "Wrote posts CSV");
    Ok(())
}

/// Write word rows followed by bigram rows as `Type,Token,Count`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_frequencies_csv(
    words: &Ranking,
    bigrams: &Ranking,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let rows = words
        .iter()
        .map(|w| ("word", w))
        .chain(bigrams.iter().map(|b| ("bigram", b)))
        .map(|(kind, (token, count))| FrequencyRow {
            kind: kind.to_string(),
            token: token.clone(),
            count: *count,
        });

    // A header is written even when both rankings are empty.
    let bytes = if words.is_empty() && bigrams.is_empty() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"Type,Token,Count\n");
        bytes
    } else {
        encode(rows)?
    };

    fs::write(path, bytes).await?;
    info!(words = words.len(), bigrams = bigrams.len(), "Wrote frequencies CSV");
    Ok(())
}

fn encode<R, I>(rows: I) -> Result<Vec<u8>, Box<dyn Error>>
where
    R: Serialize,
    I: IntoIterator<Item = R>,
{
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.error().to_string())?;
    Ok(bytes)
}

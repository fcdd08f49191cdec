//! Plain-text issue bundle.
//!
//! ```text
//! Top keyword: 환율
//!
//! [Post 1]
//! Title: ...
//! URL: ...
//! Rec 3 / Views 1200 / Author nick / Time 13:45
//!
//! body text
//!
//! --------------------------------------------------------------------------------
//!
//! [Post 3]
//! ...
//! ```

use crate::models::IssueBundle;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

const RULE_WIDTH: usize = 80;

/// Render the bundle as the text shipped to the chat and the summarizer.
pub fn render_issue_text(bundle: &IssueBundle) -> String {
    let separator = format!("\n\n{}\n\n", "-".repeat(RULE_WIDTH));
    let body = bundle
        .entries
        .iter()
        .map(|entry| {
            [
                format!("[Post {}]", entry.index),
                format!("Title: {}", entry.post.title),
                format!("URL: {}", entry.post.url),
                entry.post.meta_line(),
                String::new(),
                entry.body.clone(),
            ]
            .join("\n")
        })
        .collect::<Vec<_>>()
        .join(&separator);

    format!("Top keyword: {}\n\n{}", bundle.keyword, body)
}

/// Write the rendered bundle and return the text that was written.
#[instrument(level = "info", skip(bundle), fields(path = %path.display(), keyword = %bundle.keyword))]
pub async fn write_issue_text(bundle: &IssueBundle, path: &Path) -> Result<String, Box<dyn Error>> {
    let text = render_issue_text(bundle);
    fs::write(path, &text).await?;
    info!(entries = bundle.entries.len(), bytes = text.len(), "Wrote issue bundle");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IssueEntry, Post};
    use chrono::NaiveDateTime;

    fn entry(index: usize, title: &str, body: &str) -> IssueEntry {
        IssueEntry {
            index,
            post: Post {
                title: title.to_string(),
                recommendations: 2,
                views: 345,
                author: "닉".to_string(),
                posted_at: NaiveDateTime::parse_from_str("2026-10-18 08:09:10", "%Y-%m-%d %H:%M:%S")
                    .unwrap(),
                display_time: "08:09".to_string(),
                url: format!("https://www.clien.net/service/board/park/{index}"),
            },
            body: body.to_string(),
        }
    }

    #[test]
    fn test_render_single_entry() {
        let bundle = IssueBundle {
            keyword: "환율".to_string(),
            entries: vec![entry(1, "환율 급등", "본문 첫 줄\n둘째 줄")],
        };

        assert_eq!(
            render_issue_text(&bundle),
            "Top keyword: 환율\n\n\
             [Post 1]\n\
             Title: 환율 급등\n\
             URL: https://www.clien.net/service/board/park/1\n\
             Rec 2 / Views 345 / Author 닉 / Time 08:09\n\
             \n\
             본문 첫 줄\n둘째 줄"
        );
    }

    #[test]
    fn test_entries_separated_by_rule() {
        let bundle = IssueBundle {
            keyword: "k".to_string(),
            entries: vec![entry(1, "k a", "one"), entry(4, "k b", "two")],
        };

        let text = render_issue_text(&bundle);
        let rule = format!("one\n\n{}\n\n[Post 4]", "-".repeat(80));
        assert!(text.contains(&rule));
        assert!(text.ends_with("\n\ntwo"));
    }

    #[tokio::test]
    async fn test_write_issue_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("issue.txt");
        let bundle = IssueBundle {
            keyword: "k".to_string(),
            entries: vec![entry(1, "k", "body")],
        };

        let written = write_issue_text(&bundle, &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), written);
    }
}

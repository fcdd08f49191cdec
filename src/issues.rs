//! Issue bundle assembly: full texts of the posts about the top keyword.

use crate::analysis::posts_with_keyword;
use crate::models::{IssueBundle, IssueEntry, Post};
use crate::scrapers::Board;
use crate::scrapers::content::fetch_detail_text;
use tracing::{debug, info, instrument};

/// Fetch the body of every post whose title contains `keyword`.
///
/// Posts are visited in collection order and numbered from 1 among the
/// matches. A post whose body cannot be fetched is dropped and its number is
/// not reused. Returns `None` when no body was fetched.
#[instrument(level = "info", skip(board, posts))]
pub async fn assemble_issue_bundle<B: Board>(
    board: &B,
    keyword: &str,
    posts: &[Post],
) -> Option<IssueBundle> {
    let matches = posts_with_keyword(posts, keyword);
    debug!(candidates = matches.len(), "Posts matching top keyword");

    let mut entries = Vec::new();
    for (index, post) in matches.into_iter().enumerate() {
        let index = index + 1;
        match fetch_detail_text(board, &post.url).await {
            Some(body) => entries.push(IssueEntry {
                index,
                post: post.clone(),
                body,
            }),
            None => debug!(index, url = %post.url, "No body for issue post; skipping"),
        }
    }

    if entries.is_empty() {
        info!("No issue post bodies could be fetched");
        return None;
    }

    info!(count = entries.len(), "Assembled issue bundle");
    Some(IssueBundle {
        keyword: keyword.to_string(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::fake::FakeBoard;
    use chrono::NaiveDateTime;

    fn post(title: &str, url: &str) -> Post {
        Post {
            title: title.to_string(),
            recommendations: 1,
            views: 10,
            author: "a".to_string(),
            posted_at: NaiveDateTime::parse_from_str("2026-10-18 12:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            display_time: "12:00".to_string(),
            url: url.to_string(),
        }
    }

    const P1: &str = "https://www.clien.net/service/board/park/1";
    const P2: &str = "https://www.clien.net/service/board/park/2";
    const P3: &str = "https://www.clien.net/service/board/park/3";

    #[tokio::test]
    async fn test_failed_fetches_are_dropped_and_numbering_kept() {
        let board = FakeBoard::new(vec![])
            .with_detail(P1, r#"<div class="post_article">첫 본문</div>"#)
            .with_detail(P3, r#"<div class="post_article">셋째 본문</div>"#);
        let posts = vec![
            post("환율 급등", P1),
            post("날씨 이야기", P2),
            post("환율 전망", P2),
            post("환율 정리", P3),
        ];

        let bundle = assemble_issue_bundle(&board, "환율", &posts).await.unwrap();
        assert_eq!(bundle.keyword, "환율");
        let summary: Vec<_> = bundle
            .entries
            .iter()
            .map(|e| (e.index, e.post.title.as_str(), e.body.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![(1, "환율 급등", "첫 본문"), (3, "환율 정리", "셋째 본문")]
        );
    }

    #[tokio::test]
    async fn test_no_matching_posts_yields_none() {
        let board = FakeBoard::new(vec![]).with_detail(P1, "<p>본문</p>");
        let posts = vec![post("날씨 이야기", P1)];

        assert!(assemble_issue_bundle(&board, "환율", &posts).await.is_none());
    }

    #[tokio::test]
    async fn test_all_fetches_failing_yields_none() {
        let board = FakeBoard::new(vec![]);
        let posts = vec![post("환율 급등", P1), post("환율", "")];

        assert!(assemble_issue_bundle(&board, "환율", &posts).await.is_none());
    }
}

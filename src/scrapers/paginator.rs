//! Target-day pagination over the newest-first listing.
//!
//! The board offers neither a date filter nor a total count, so the walk
//! relies on ordering alone:
//!
//! - posts newer than the target day sit at the top and are skipped;
//! - posts from the target day are collected, page after page;
//! - the first post older than the target day proves nothing further down can
//!   match, and ends the walk ([`ScanState::StopOlder`]);
//! - a page that fails to load or has no post rows ends the walk as well
//!   ([`ScanState::StopEmpty`]). This is the only guard against an endless
//!   loop, since there is no page cap.
//!
//! A page without any target-day post does not stop the walk: the target day
//! can start mid-page or on the next page.

use super::Board;
use super::clien::{ListingBlock, parse_listing};
use crate::models::{Harvest, Post, ScanState};
use chrono::{Duration, Local, NaiveDate};
use std::cmp::Ordering;
use tracing::{debug, info, instrument, warn};

/// The calendar day before today, in local time.
pub fn yesterday() -> NaiveDate {
    Local::now().date_naive() - Duration::days(1)
}

/// Collect every post from yesterday.
///
/// The target day is fixed once at the start of the run.
pub async fn collect_yesterdays_posts<B: Board>(board: &B) -> Harvest {
    collect_posts(board, yesterday()).await
}

/// Walk listing pages from index 0 and collect the posts dated `target`.
#[instrument(level = "info", skip(board), fields(%target))]
pub async fn collect_posts<B: Board>(board: &B, target: NaiveDate) -> Harvest {
    let mut posts = Vec::new();
    let mut page = 0usize;

    loop {
        let blocks = match board.listing_page(page).await {
            Ok(html) => parse_listing(&html, board.base_url()),
            Err(e) => {
                warn!(page, error = %e, "Listing page request failed; treating as end of listing");
                Vec::new()
            }
        };

        let state = scan_page(blocks, target, &mut posts);
        match state {
            ScanState::Scanning => {
                debug!(page, collected = posts.len(), "Completed listing page");
                page += 1;
            }
            ScanState::StopOlder => {
                info!(page, count = posts.len(), "Reached posts older than the target day");
                return Harvest { target, posts, stop: state, pages_fetched: page + 1 };
            }
            ScanState::StopEmpty => {
                info!(page, count = posts.len(), "Listing page had no posts");
                return Harvest { target, posts, stop: state, pages_fetched: page + 1 };
            }
        }
    }
}

/// Classify one page of rows against `target`, appending matches to `posts`.
///
/// Returns the state the loop moves to after this page.
pub fn scan_page(blocks: Vec<ListingBlock>, target: NaiveDate, posts: &mut Vec<Post>) -> ScanState {
    if blocks.is_empty() {
        return ScanState::StopEmpty;
    }

    let mut found_on_page = false;
    for block in blocks {
        let ListingBlock::Dated(post) = block else {
            continue;
        };
        match post.posted_at.date().cmp(&target) {
            Ordering::Less => return ScanState::StopOlder,
            Ordering::Equal => {
                found_on_page = true;
                posts.push(post);
            }
            Ordering::Greater => continue,
        }
    }

    if !found_on_page {
        debug!("No target-day posts on this page; continuing");
    }
    ScanState::Scanning
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::fake::{FakeBoard, listing_html, notice_row, post_row};

    fn target() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn page(rows: &[(&str, &str)]) -> Option<String> {
        let rows: Vec<String> = rows
            .iter()
            .map(|(title, ts)| post_row(title, ts, Some("/service/board/park/1")))
            .collect();
        Some(listing_html(&rows))
    }

    fn titles(harvest: &Harvest) -> Vec<&str> {
        harvest.posts.iter().map(|p| p.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_stops_at_first_older_post_and_excludes_it() {
        let board = FakeBoard::new(vec![
            page(&[
                ("today a", "2026-10-19 08:00:00"),
                ("yday a", "2026-10-18 23:50:00"),
            ]),
            page(&[
                ("yday b", "2026-10-18 10:00:00"),
                ("older", "2026-10-17 23:59:59"),
                ("yday late straggler", "2026-10-18 09:00:00"),
            ]),
            page(&[("never fetched", "2026-10-18 01:00:00")]),
        ]);

        let harvest = collect_posts(&board, target()).await;
        assert_eq!(harvest.stop, ScanState::StopOlder);
        assert_eq!(harvest.pages_fetched, 2);
        assert_eq!(titles(&harvest), vec!["yday a", "yday b"]);
    }

    #[tokio::test]
    async fn test_page_of_only_newer_posts_continues() {
        let board = FakeBoard::new(vec![
            page(&[
                ("today a", "2026-10-19 08:00:00"),
                ("today b", "2026-10-19 00:01:00"),
            ]),
            page(&[
                ("yday", "2026-10-18 22:00:00"),
                ("older", "2026-10-17 22:00:00"),
            ]),
        ]);

        let harvest = collect_posts(&board, target()).await;
        assert_eq!(harvest.stop, ScanState::StopOlder);
        assert_eq!(titles(&harvest), vec!["yday"]);
    }

    #[tokio::test]
    async fn test_empty_page_stops_collection() {
        let board = FakeBoard::new(vec![
            page(&[("yday", "2026-10-18 22:00:00")]),
            Some(listing_html(&[])),
            page(&[("unreached", "2026-10-18 21:00:00")]),
        ]);

        let harvest = collect_posts(&board, target()).await;
        assert_eq!(harvest.stop, ScanState::StopEmpty);
        assert_eq!(harvest.pages_fetched, 2);
        assert_eq!(titles(&harvest), vec!["yday"]);
    }

    #[tokio::test]
    async fn test_empty_first_page_yields_nothing() {
        let board = FakeBoard::new(vec![Some(listing_html(&[]))]);

        let harvest = collect_posts(&board, target()).await;
        assert_eq!(harvest.stop, ScanState::StopEmpty);
        assert!(harvest.posts.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_treated_as_end_of_listing() {
        let board = FakeBoard::new(vec![page(&[("yday", "2026-10-18 12:00:00")]), None]);

        let harvest = collect_posts(&board, target()).await;
        assert_eq!(harvest.stop, ScanState::StopEmpty);
        assert_eq!(titles(&harvest), vec!["yday"]);

        let unreachable = FakeBoard::new(vec![None]);
        let harvest = collect_posts(&unreachable, target()).await;
        assert_eq!(harvest.stop, ScanState::StopEmpty);
        assert!(harvest.posts.is_empty());
    }

    #[tokio::test]
    async fn test_today_page_followed_by_empty_page_ends_empty() {
        let board = FakeBoard::new(vec![
            page(&[("today", "2026-10-19 01:00:00")]),
            Some(listing_html(&[])),
        ]);

        let harvest = collect_posts(&board, target()).await;
        assert_eq!(harvest.stop, ScanState::StopEmpty);
        assert!(harvest.posts.is_empty());
    }

    #[test]
    fn test_scan_page_skips_undated_and_notice_rows() {
        let base = url::Url::parse("https://www.clien.net/service/board/park").unwrap();
        let html = listing_html(&[
            notice_row("공지"),
            post_row("broken", "not a date", None),
            post_row("yday", "2026-10-18 05:00:00", None),
        ]);

        let mut posts = Vec::new();
        let state = scan_page(parse_listing(&html, &base), target(), &mut posts);
        assert_eq!(state, ScanState::Scanning);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "yday");
    }

    #[test]
    fn test_scan_page_of_only_undated_rows_keeps_scanning() {
        let mut posts = Vec::new();
        let state = scan_page(vec![ListingBlock::Undated], target(), &mut posts);
        assert_eq!(state, ScanState::Scanning);
        assert!(posts.is_empty());
    }

    #[test]
    fn test_scan_page_keeps_posts_from_earlier_pages_on_stop() {
        let mut posts = vec![];
        let base = url::Url::parse("https://www.clien.net/service/board/park").unwrap();
        let first = listing_html(&[post_row("a", "2026-10-18 20:00:00", None)]);
        let second = listing_html(&[
            post_row("b", "2026-10-18 19:00:00", None),
            post_row("old", "2026-10-16 19:00:00", None),
        ]);

        assert_eq!(scan_page(parse_listing(&first, &base), target(), &mut posts), ScanState::Scanning);
        assert_eq!(scan_page(parse_listing(&second, &base), target(), &mut posts), ScanState::StopOlder);
        let collected: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(collected, vec!["a", "b"]);
    }
}

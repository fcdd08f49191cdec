//! Post body extraction.
//!
//! Post pages have changed layout over time, so the body is looked up in a
//! fixed list of known containers before falling back to the whole `<body>`.

use super::Board;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

/// Known body containers, most specific first.
const CONTENT_SELECTORS: &[&str] = &[
    "div.post_content",
    "div.post_article",
    "div.post_body",
    "div.post_view",
    "div.view_content",
    "article.post_article",
    "div.content_view",
];

static CONTENT: Lazy<Vec<Selector>> = Lazy::new(|| {
    CONTENT_SELECTORS
        .iter()
        .map(|css| Selector::parse(css).unwrap())
        .collect()
});
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

/// Fetch a post page and return its body text.
///
/// Returns `None` for an empty URL, a failed request, or a page without any
/// text. Failures are logged at debug level only; callers skip the post.
#[instrument(level = "info", skip(board))]
pub async fn fetch_detail_text<B: Board>(board: &B, url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }

    let html = match board.detail_page(url).await {
        Ok(html) => html,
        Err(e) => {
            debug!(error = %e, "Detail fetch failed");
            return None;
        }
    };

    let text = extract_detail_text(&html);
    debug!(found = text.is_some(), "Parsed post body");
    text
}

/// Pull the main text out of a post page.
///
/// Only the first element matching each known selector is considered; the
/// first one with non-empty text wins.
pub fn extract_detail_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    CONTENT
        .iter()
        .chain(std::iter::once(&*BODY))
        .filter_map(|selector| document.select(selector).next())
        .map(block_text)
        .find(|text| !text.is_empty())
}

/// Elements whose text is never page content.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript"];

/// Text of an element with one line per non-blank text node.
///
/// Text inside `script`, `style` and `noscript` is skipped.
fn block_text(element: ElementRef<'_>) -> String {
    element
        .descendants()
        .filter(|node| {
            !node.ancestors().any(|parent| {
                parent
                    .value()
                    .as_element()
                    .is_some_and(|el| NON_CONTENT_TAGS.contains(&el.name()))
            })
        })
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .filter(|t| !t.is_empty())
        .join("\n")
}

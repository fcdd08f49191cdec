//! Board scraping: transport, listing parsing, pagination and detail text.
//!
//! The work is split in three layers:
//!
//! 1. **Transport** ([`Board`]): fetch raw HTML for a listing page index or a
//!    detail URL. [`clien::ClienBoard`] is the HTTP implementation.
//! 2. **Paging** ([`paginator`]): walk listing pages newest first and keep the
//!    posts from the target day.
//! 3. **Detail text** ([`content`]): pull the body text out of a post page.
//!
//! Requests are made one at a time. A failed request is final: nothing here
//! retries.

pub mod clien;
pub mod content;
pub mod paginator;

use crate::error::FetchError;
use url::Url;

/// Source of raw board HTML.
///
/// Implementors only move bytes; all parsing lives in [`clien`] and
/// [`content`] so that fakes can serve canned pages.
pub trait Board {
    /// Base address of the listing, used to resolve relative post links.
    fn base_url(&self) -> &Url;

    /// Fetch the listing page with the given zero-based index.
    async fn listing_page(&self, page: usize) -> Result<String, FetchError>;

    /// Fetch an absolute detail-page URL.
    async fn detail_page(&self, url: &str) -> Result<String, FetchError>;
}

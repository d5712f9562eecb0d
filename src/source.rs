use async_trait::async_trait;

use crate::error::ScrapeError;
use crate::models::{DetailPage, ItemSummary};

/// Everything the collector needs from the listing site.
///
/// `BrowserSession` drives a real browser; tests substitute an in-memory fake.
#[async_trait]
pub trait ListingSource {
    async fn open_listing(&mut self, url: &str) -> Result<(), ScrapeError>;

    /// Waits for the current listing page and returns how many cards it renders.
    async fn card_count(&mut self) -> Result<usize, ScrapeError>;

    /// Scrolls card `index` (DOM order) into view and reads its summary fields.
    async fn item_summary(&mut self, index: usize) -> Result<ItemSummary, ScrapeError>;

    /// Visits a product page and returns its raw text, leaving focus on the listing.
    async fn item_details(&mut self, detail_url: &str) -> Result<DetailPage, ScrapeError>;

    /// Moves to the next listing page. `false` when there is no next page.
    async fn next_page(&mut self) -> Result<bool, ScrapeError>;
}

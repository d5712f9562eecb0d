use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::ScrapeError;
use crate::models::{DetailPage, ItemSummary};
use crate::parser;
use crate::source::ListingSource;

const LISTING_SELECTOR: &str = "ul[data-testid='product-card-list']";
const CARD_SELECTOR: &str = "li[data-testid='productCard']";
const NEXT_PAGE_SELECTOR: &str = "a[data-testid='page-next']";
const BREADCRUMB_SELECTOR: &str = "nav[data-component='BreadcrumbsNavigation']";
const INFO_PANEL_SELECTOR: &str = "div[data-component='InnerPanel']";
const ADD_TO_BAG_SELECTOR: &str = "button[data-component='AddToBag']";
const HEADING_SELECTOR: &str = "h2[data-component='PageTitleHeading']";

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A WebDriver session pointed at the product listing.
pub struct BrowserSession {
    client: Client,
    timeout: Duration,
    /// Cards found by the last `card_count`, in DOM order.
    cards: Vec<Element>,
}

impl BrowserSession {
    pub async fn connect(config: &Config) -> Result<Self, ScrapeError> {
        let capabilities = serde_json::from_value(json!({
            "goog:chromeOptions": {
                "args": ["--no-sandbox", "--disable-dev-shm-usage"]
            }
        }))?;

        info!(webdriver = %config.webdriver_url, "connecting to webdriver");
        let client = ClientBuilder::native()
            .capabilities(capabilities)
            .connect(&config.webdriver_url)
            .await?;

        Ok(BrowserSession {
            client,
            timeout: config.wait_timeout,
            cards: Vec::new(),
        })
    }

    /// Ends the session and closes every window it opened.
    pub async fn quit(self) -> Result<(), ScrapeError> {
        info!("closing browser session");
        self.client.close().await?;
        Ok(())
    }

    async fn wait_for(&self, css: &str) -> Result<Element, ScrapeError> {
        Ok(self
            .client
            .wait()
            .at_most(self.timeout)
            .for_element(Locator::Css(css))
            .await?)
    }

    async fn read_detail(&self) -> Result<DetailPage, ScrapeError> {
        let breadcrumb = self.wait_for(BREADCRUMB_SELECTOR).await?.text().await?;
        let url = self.client.current_url().await?.to_string();
        let info_panel = self.wait_for(INFO_PANEL_SELECTOR).await?.text().await?;
        let action_label = self
            .client
            .find(Locator::Css(ADD_TO_BAG_SELECTOR))
            .await?
            .text()
            .await?;

        let heading = match self.client.find(Locator::Css(HEADING_SELECTOR)).await {
            Ok(elem) => elem.text().await.ok(),
            Err(_) => None,
        };

        Ok(DetailPage {
            url,
            breadcrumb,
            info_panel,
            action_label,
            heading,
        })
    }
}

#[async_trait]
impl ListingSource for BrowserSession {
    async fn open_listing(&mut self, url: &str) -> Result<(), ScrapeError> {
        info!(url, "opening listing");
        self.client.goto(url).await?;
        Ok(())
    }

    async fn card_count(&mut self) -> Result<usize, ScrapeError> {
        self.wait_for(LISTING_SELECTOR).await?;
        self.cards = self.client.find_all(Locator::Css(CARD_SELECTOR)).await?;
        debug!(cards = self.cards.len(), "listing cards rendered");
        Ok(self.cards.len())
    }

    async fn item_summary(&mut self, index: usize) -> Result<ItemSummary, ScrapeError> {
        let card = self.cards.get(index).ok_or_else(|| {
            ScrapeError::missing(&format!("{CARD_SELECTOR}:nth-child({})", index + 1))
        })?;

        // Image URLs are only filled in once the card has been on screen.
        self.client
            .execute(
                "arguments[0].scrollIntoView();",
                vec![serde_json::to_value(card)?],
            )
            .await?;
        let html = card.html(false).await?;
        let base = self.client.current_url().await?;
        parser::parse_card(&html, &base)
    }

    async fn item_details(&mut self, detail_url: &str) -> Result<DetailPage, ScrapeError> {
        let listing = self.client.window().await?;
        let tab = self.client.new_window(true).await?;
        self.client.switch_to_window(tab.handle).await?;
        self.client.goto(detail_url).await?;

        let detail = self.read_detail().await;

        self.client.close_window().await?;
        self.client.switch_to_window(listing).await?;
        detail
    }

    async fn next_page(&mut self) -> Result<bool, ScrapeError> {
        match self.client.find(Locator::Css(NEXT_PAGE_SELECTOR)).await {
            Ok(next) => {
                let before = self.client.current_url().await?;
                next.click().await?;

                let client = &self.client;
                let before = &before;
                wait_until(self.timeout, "next listing page", || async move {
                    Ok::<_, ScrapeError>(client.current_url().await? != *before)
                })
                .await?;
                Ok(true)
            }
            Err(e) if e.is_no_such_element() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Re-runs `check` every poll interval until it reports `true` or `timeout` passes.
async fn wait_until<F, Fut>(timeout: Duration, what: &str, mut check: F) -> Result<(), ScrapeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, ScrapeError>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if check().await? {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(ScrapeError::Timeout(what.to_string()));
        }
        sleep(POLL_INTERVAL).await;
    }
}

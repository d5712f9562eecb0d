use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::ScrapeError;
use crate::models::Table;
use crate::parser;
use crate::source::ListingSource;

/// Rows gathered by one capture run, plus the error that cut it short, if any.
#[derive(Debug)]
pub struct Capture {
    pub table: Table,
    pub pages: usize,
    pub failure: Option<ScrapeError>,
}

/// Paginates the listing until `config.target_rows` records are held.
///
/// Stops early when there is no next page or the page cap is hit. An error
/// ends the run; rows appended before it are kept in the returned capture.
pub async fn collect<S>(source: &mut S, config: &Config) -> Capture
where
    S: ListingSource + Send + ?Sized,
{
    let mut table = Table::new();
    let mut pages = 0;

    let failure = match paginate(source, config, &mut table, &mut pages).await {
        Ok(()) => None,
        Err(e) => {
            error!(rows = table.len(), pages, "capture aborted: {e}");
            Some(e)
        }
    };

    Capture {
        table,
        pages,
        failure,
    }
}

async fn paginate<S>(
    source: &mut S,
    config: &Config,
    table: &mut Table,
    pages: &mut usize,
) -> Result<(), ScrapeError>
where
    S: ListingSource + Send + ?Sized,
{
    if config.target_rows == 0 {
        return Ok(());
    }

    source.open_listing(&config.start_url).await?;

    loop {
        *pages += 1;
        let cards = source.card_count().await?;
        info!(page = *pages, cards, "listing page loaded");

        for index in 0..cards {
            let summary = source.item_summary(index).await?;
            let detail = source.item_details(&summary.detail_url).await?;
            let record = parser::build_record(&summary, &detail, config)?;
            debug!(index, id = %record.id, "item captured");
            table.push(record);

            if table.len() >= config.target_rows {
                info!(rows = table.len(), "target row count reached");
                return Ok(());
            }
        }

        if config.max_pages.is_some_and(|max| *pages >= max) {
            warn!(pages = *pages, rows = table.len(), "page cap reached");
            return Ok(());
        }

        if !source.next_page().await? {
            warn!(pages = *pages, rows = table.len(), "no more listing pages");
            return Ok(());
        }
    }
}

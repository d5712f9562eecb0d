mod archiver;
mod collector;
mod config;
mod error;
mod feed;
mod fetcher;
mod models;
mod parser;
mod source;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::fetcher::BrowserSession;
use crate::models::Table;

/// `true` captures a fresh table from the site, `false` re-exports `Config::table_path`.
const SCRAPE_LIVE: bool = false;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::default();

    let table = if SCRAPE_LIVE {
        capture(&config).await?
    } else {
        archiver::load(&config.table_path)
            .with_context(|| format!("loading {}", config.table_path.display()))?
    };

    let feed = feed::to_feed(
        &table,
        &config.feed_root,
        &config.feed_row,
        &config.feed_description,
    )?;
    feed::write_feed(&feed, &config.feed_path)
        .with_context(|| format!("writing {}", config.feed_path.display()))?;

    info!(items = table.len(), "feed exported");
    Ok(())
}

async fn capture(config: &Config) -> Result<Table> {
    let mut session = BrowserSession::connect(config)
        .await
        .context("starting browser session")?;

    let capture = collector::collect(&mut session, config).await;
    info!(
        rows = capture.table.len(),
        pages = capture.pages,
        "capture finished"
    );

    if let Err(e) = session.quit().await {
        warn!("browser did not shut down cleanly: {e}");
    }

    if let Some(failure) = capture.failure {
        bail!(
            "capture aborted after {} of {} rows: {failure}",
            capture.table.len(),
            config.target_rows
        );
    }

    let saved = archiver::save_if_complete(&capture.table, config)
        .with_context(|| format!("saving {}", config.table_path.display()))?;
    if !saved {
        warn!(
            rows = capture.table.len(),
            target = config.target_rows,
            "listing ran out before the target; table not saved"
        );
    }

    Ok(capture.table)
}

use thiserror::Error;

/// Errors raised while capturing items from the live site.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("could not start browser session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("browser command failed: {0}")]
    Browser(#[from] fantoccini::error::CmdError),

    #[error("element not found: {selector}")]
    MissingElement { selector: String },

    #[error("no FARFETCH ID in info panel")]
    MissingId,

    #[error("no gender mapping for breadcrumb token {token:?}")]
    UnknownGender { token: String },

    #[error("unrecognised price text {0:?}")]
    BadPrice(String),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("webdriver json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("timed out waiting for {0}")]
    Timeout(String),
}

impl ScrapeError {
    pub fn missing(selector: &str) -> Self {
        ScrapeError::MissingElement {
            selector: selector.to_string(),
        }
    }
}

/// Errors raised while reading or writing the CSV table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("table file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),

    #[error("unexpected table columns: {found:?}")]
    Schema { found: Vec<String> },
}

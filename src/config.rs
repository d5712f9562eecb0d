use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

pub const SITE_URL: &str = "https://www.farfetch.com/ca/shopping/women/dresses-1/items.aspx";
pub const WEBDRIVER_URL: &str = "http://localhost:9515";

/// Run settings shared by the collector, the table store and the feed exporter.
#[derive(Debug, Clone)]
pub struct Config {
    pub start_url: String,
    pub webdriver_url: String,
    pub target_rows: usize,
    /// Optional cap on listing pages; `None` paginates until the listing runs out.
    pub max_pages: Option<usize>,
    pub wait_timeout: Duration,
    /// Written to both `item_group_id` and `mpn` for every record.
    pub item_group_id: String,
    pub google_product_category: String,
    pub age_group: String,
    pub gender_map: BTreeMap<String, String>,
    pub table_path: PathBuf,
    pub feed_path: PathBuf,
    pub feed_root: String,
    pub feed_row: String,
    pub feed_description: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            start_url: SITE_URL.to_string(),
            webdriver_url: WEBDRIVER_URL.to_string(),
            target_rows: 120,
            max_pages: None,
            wait_timeout: Duration::from_secs(80),
            item_group_id: "1".to_string(),
            google_product_category: "2271".to_string(),
            age_group: "adult".to_string(),
            gender_map: BTreeMap::from([("Women".to_string(), "female".to_string())]),
            table_path: PathBuf::from("farfetch_item_120_2024_05_12.csv"),
            feed_path: PathBuf::from("farfetch_dresses_feed.xml"),
            feed_root: "channel".to_string(),
            feed_row: "item".to_string(),
            feed_description: "FarFetch".to_string(),
        }
    }
}

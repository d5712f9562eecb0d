use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::Config;
use crate::error::ScrapeError;
use crate::models::{Availability, DetailPage, ItemRecord, ItemSummary};

pub const BRAND_SELECTOR: &str = "p[data-component='ProductCardBrandName']";
pub const DESCRIPTION_SELECTOR: &str = "p[data-component='ProductCardDescription']";
pub const PRICE_SELECTOR: &str = "p[data-component='Price']";
pub const IMAGE_SELECTOR: &str = "img[data-component='ProductCardImagePrimary']";
pub const LINK_SELECTOR: &str = "a[data-component='ProductCardLink']";

const PREORDER_LABEL: &str = "Pre-order";
const OUT_OF_STOCK_HEADING: &str = "Sorry, this piece is currently out of stock";
const BREADCRUMB_SEPARATOR: &str = " &gt; ";

static FARFETCH_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"FARFETCH\s+ID:\s+(\d+)").unwrap());

/// Reads the summary fields out of a listing card's outer HTML.
///
/// Relative `href`/`src` values are resolved against `base`, the listing URL.
pub fn parse_card(html: &str, base: &Url) -> Result<ItemSummary, ScrapeError> {
    let doc = Html::parse_fragment(html);
    let root = doc.root_element();

    let image = attr(root, IMAGE_SELECTOR, "src")?;
    let href = attr(root, LINK_SELECTOR, "href")?;

    Ok(ItemSummary {
        brand: text(root, BRAND_SELECTOR)?,
        description: text(root, DESCRIPTION_SELECTOR)?,
        price: text(root, PRICE_SELECTOR)?,
        image_link: base.join(&image)?.to_string(),
        detail_url: base.join(&href)?.to_string(),
    })
}

fn select_first<'a>(root: ElementRef<'a>, css: &str) -> Result<ElementRef<'a>, ScrapeError> {
    let selector = Selector::parse(css).map_err(|_| ScrapeError::missing(css))?;
    root.select(&selector)
        .next()
        .ok_or_else(|| ScrapeError::missing(css))
}

fn text(root: ElementRef<'_>, css: &str) -> Result<String, ScrapeError> {
    let elem = select_first(root, css)?;
    Ok(elem.text().collect::<String>().trim().to_string())
}

fn attr(root: ElementRef<'_>, css: &str, name: &str) -> Result<String, ScrapeError> {
    select_first(root, css)?
        .value()
        .attr(name)
        .map(|v| v.trim().to_string())
        .ok_or_else(|| ScrapeError::missing(&format!("{css}[{name}]")))
}

pub fn title(brand: &str, description: &str) -> String {
    format!("{brand} - {description}")
}

/// `"$1,234"` becomes `"1234.00 USD"`.
pub fn format_price(raw: &str) -> Result<String, ScrapeError> {
    let amount: String = raw
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .chars()
        .filter(|c| *c != ',')
        .collect();

    if amount.is_empty() || !amount.chars().all(|c| c.is_ascii_digit()) {
        return Err(ScrapeError::BadPrice(raw.to_string()));
    }
    Ok(format!("{amount}.00 USD"))
}

pub fn extract_id(info_panel: &str) -> Result<String, ScrapeError> {
    FARFETCH_ID
        .captures(info_panel)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(ScrapeError::MissingId)
}

/// Breadcrumb lines joined with an entity-encoded `>`.
pub fn product_type(breadcrumb: &str) -> String {
    breadcrumb
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(BREADCRUMB_SEPARATOR)
}

pub fn gender(breadcrumb: &str, map: &BTreeMap<String, String>) -> Result<String, ScrapeError> {
    let token = breadcrumb.split_whitespace().next().unwrap_or_default();
    map.get(token)
        .cloned()
        .ok_or_else(|| ScrapeError::UnknownGender {
            token: token.to_string(),
        })
}

pub fn availability(action_label: &str, heading: Option<&str>) -> Availability {
    if action_label.trim() == PREORDER_LABEL {
        Availability::Preorder
    } else if heading.map(str::trim) == Some(OUT_OF_STOCK_HEADING) {
        Availability::OutOfStock
    } else {
        Availability::InStock
    }
}

/// Combines card and detail-page reads into a finished row.
pub fn build_record(
    summary: &ItemSummary,
    detail: &DetailPage,
    config: &Config,
) -> Result<ItemRecord, ScrapeError> {
    Ok(ItemRecord {
        id: extract_id(&detail.info_panel)?,
        item_group_id: config.item_group_id.clone(),
        mpn: config.item_group_id.clone(),
        title: title(&summary.brand, &summary.description),
        description: summary.description.clone(),
        image_link: summary.image_link.clone(),
        link: detail.url.clone(),
        gender: gender(&detail.breadcrumb, &config.gender_map)?,
        age_group: config.age_group.clone(),
        brand: summary.brand.clone(),
        availability: Some(availability(&detail.action_label, detail.heading.as_deref())),
        price: format_price(&summary.price)?,
        product_type: product_type(&detail.breadcrumb),
        google_product_category: config.google_product_category.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = r#"
        <li data-testid="productCard">
          <a data-component="ProductCardLink" href="/ca/shopping/women/acme-slip-dress-item-123456.aspx">
            <img data-component="ProductCardImagePrimary" src="https://cdn-images.farfetch-contents.com/123456_1.jpg">
            <p data-component="ProductCardBrandName">Acme</p>
            <p data-component="ProductCardDescription"> Slip Dress </p>
            <p data-component="Price">$1,234</p>
          </a>
        </li>"#;

    fn listing_url() -> Url {
        Url::parse("https://www.farfetch.com/ca/shopping/women/dresses-1/items.aspx").unwrap()
    }

    fn detail() -> DetailPage {
        DetailPage {
            url: "https://www.farfetch.com/ca/shopping/women/acme-slip-dress-item-123456.aspx"
                .to_string(),
            breadcrumb: "Women\nDresses\nMaxi".to_string(),
            info_panel: "Highlights\nFARFETCH ID: 123456\nBrand style ID: AB-1".to_string(),
            action_label: "Add To Bag".to_string(),
            heading: None,
        }
    }

    #[test]
    fn card_fields_and_absolute_links() {
        let summary = parse_card(CARD, &listing_url()).unwrap();
        assert_eq!(summary.brand, "Acme");
        assert_eq!(summary.description, "Slip Dress");
        assert_eq!(summary.price, "$1,234");
        assert_eq!(
            summary.image_link,
            "https://cdn-images.farfetch-contents.com/123456_1.jpg"
        );
        assert_eq!(
            summary.detail_url,
            "https://www.farfetch.com/ca/shopping/women/acme-slip-dress-item-123456.aspx"
        );
    }

    #[test]
    fn card_without_brand_is_an_error() {
        let html = CARD.replace("ProductCardBrandName", "Other");
        let err = parse_card(&html, &listing_url()).unwrap_err();
        assert!(matches!(err, ScrapeError::MissingElement { .. }));
    }

    #[test]
    fn id_from_info_panel() {
        assert_eq!(extract_id("FARFETCH ID: 123456").unwrap(), "123456");
        assert_eq!(extract_id(&detail().info_panel).unwrap(), "123456");
        assert!(matches!(
            extract_id("Brand style ID: AB-1"),
            Err(ScrapeError::MissingId)
        ));
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price("$1,234").unwrap(), "1234.00 USD");
        assert_eq!(format_price("$45").unwrap(), "45.00 USD");
        assert!(matches!(format_price("Sold out"), Err(ScrapeError::BadPrice(_))));
    }

    #[test]
    fn breadcrumb_to_product_type_and_gender() {
        let map = Config::default().gender_map;
        assert_eq!(
            product_type("Women\nDresses\nMaxi"),
            "Women &gt; Dresses &gt; Maxi"
        );
        assert_eq!(gender("Women\nDresses\nMaxi", &map).unwrap(), "female");
    }

    #[test]
    fn unmapped_gender_token_fails() {
        let map = Config::default().gender_map;
        let err = gender("Men\nShirts", &map).unwrap_err();
        match err {
            ScrapeError::UnknownGender { token } => assert_eq!(token, "Men"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn availability_rules() {
        assert_eq!(availability("Pre-order", None), Availability::Preorder);
        assert_eq!(
            availability("Add To Bag", Some("Sorry, this piece is currently out of stock")),
            Availability::OutOfStock
        );
        assert_eq!(availability("Add To Bag", Some("Dresses")), Availability::InStock);
        assert_eq!(availability("Add To Bag", None), Availability::InStock);
        assert_eq!(
            availability("Pre-order", Some("Sorry, this piece is currently out of stock")),
            Availability::Preorder
        );
    }

    #[test]
    fn record_from_card_and_detail() {
        let config = Config::default();
        let summary = parse_card(CARD, &listing_url()).unwrap();
        let record = build_record(&summary, &detail(), &config).unwrap();

        assert_eq!(record.id, "123456");
        assert_eq!(record.item_group_id, "1");
        assert_eq!(record.mpn, "1");
        assert_eq!(record.title, "Acme - Slip Dress");
        assert_eq!(record.price, "1234.00 USD");
        assert_eq!(record.age_group, "adult");
        assert_eq!(record.link, detail().url);
        assert_eq!(record.gender, "female");
        assert_eq!(record.availability, Some(Availability::InStock));
        assert_eq!(record.product_type, "Women &gt; Dresses &gt; Maxi");
        assert_eq!(record.google_product_category, "2271");
    }
}

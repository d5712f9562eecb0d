use std::fmt;

use serde::{Deserialize, Serialize};

/// Column order of the table and of each feed item.
pub const COLUMNS: [&str; 14] = [
    "id",
    "item_group_id",
    "mpn",
    "title",
    "description",
    "image_link",
    "link",
    "gender",
    "age_group",
    "brand",
    "availability",
    "price",
    "product_type",
    "google_product_category",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    InStock,
    OutOfStock,
    Preorder,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::InStock => "in_stock",
            Availability::OutOfStock => "out_of_stock",
            Availability::Preorder => "preorder",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product row. Field order must follow `COLUMNS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    pub item_group_id: String,
    pub mpn: String,
    pub title: String,
    pub description: String,
    pub image_link: String,
    pub link: String,
    pub gender: String,
    pub age_group: String,
    pub brand: String,
    /// Empty in tables loaded from a CSV whose cell was blank.
    pub availability: Option<Availability>,
    pub price: String,
    pub product_type: String,
    pub google_product_category: String,
}

impl ItemRecord {
    /// Values paired with their column names, in `COLUMNS` order.
    pub fn fields(&self) -> [(&'static str, &str); 14] {
        [
            (COLUMNS[0], self.id.as_str()),
            (COLUMNS[1], self.item_group_id.as_str()),
            (COLUMNS[2], self.mpn.as_str()),
            (COLUMNS[3], self.title.as_str()),
            (COLUMNS[4], self.description.as_str()),
            (COLUMNS[5], self.image_link.as_str()),
            (COLUMNS[6], self.link.as_str()),
            (COLUMNS[7], self.gender.as_str()),
            (COLUMNS[8], self.age_group.as_str()),
            (COLUMNS[9], self.brand.as_str()),
            (COLUMNS[10], self.availability.map_or("", |a| a.as_str())),
            (COLUMNS[11], self.price.as_str()),
            (COLUMNS[12], self.product_type.as_str()),
            (COLUMNS[13], self.google_product_category.as_str()),
        ]
    }
}

/// Append-only list of records in scrape order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<ItemRecord>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ItemRecord) {
        self.rows.push(record);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[ItemRecord] {
        &self.rows
    }
}

impl From<Vec<ItemRecord>> for Table {
    fn from(rows: Vec<ItemRecord>) -> Self {
        Table { rows }
    }
}

/// Fields read from a listing card before the detail page is visited.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSummary {
    pub brand: String,
    pub description: String,
    pub price: String,
    pub image_link: String,
    pub detail_url: String,
}

/// Raw text read from a product detail tab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailPage {
    pub url: String,
    pub breadcrumb: String,
    pub info_panel: String,
    pub action_label: String,
    /// Page title heading, absent on most in-stock pages.
    pub heading: Option<String>,
}

#[cfg(test)]
pub(crate) fn sample_record(id: &str) -> ItemRecord {
    ItemRecord {
        id: id.to_string(),
        item_group_id: "1".to_string(),
        mpn: "1".to_string(),
        title: "Acme - Slip Dress".to_string(),
        description: "Slip Dress".to_string(),
        image_link: "https://cdn-images.farfetch-contents.com/1.jpg".to_string(),
        link: format!("https://www.farfetch.com/ca/shopping/women/item-{id}.aspx"),
        gender: "female".to_string(),
        age_group: "adult".to_string(),
        brand: "Acme".to_string(),
        availability: Some(Availability::InStock),
        price: "99.00 USD".to_string(),
        product_type: "Women &gt; Dresses &gt; Maxi".to_string(),
        google_product_category: "2271".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_follow_column_order() {
        let record = sample_record("42");
        let names: Vec<&str> = record.fields().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, COLUMNS);
        assert_eq!(record.fields()[10].1, "in_stock");
    }

    #[test]
    fn serde_header_matches_columns() {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(sample_record("42")).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let header = out.lines().next().unwrap();
        assert_eq!(header, COLUMNS.join(","));
    }
}

//! Product records produced by the extraction stage.
//!
//! Internally every field is a [`FieldValue`] and every record carries a
//! [`RecordOutcome`]; the "N/A" and "Error" sentinels only appear once a
//! record is flattened into a [`ProductRow`] for output.

use serde::{Deserialize, Serialize};

/// Placeholder written for a field whose markup element was absent.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder written into every column of a record whose fetch failed.
pub const FETCH_ERROR: &str = "Error";

/// Number of breadcrumb levels kept as subcategories.
pub const SUBCATEGORY_DEPTH: usize = 3;

/// Output columns, in order.
pub const PRODUCT_COLUMNS: [&str; 10] = [
    "subcategory1",
    "subcategory2",
    "subcategory3",
    "product_name",
    "brand_name",
    "rating",
    "review_count",
    "price",
    "ingredients",
    "product_url",
];

/// A single extracted value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    Present(String),
    #[default]
    Missing,
}

impl FieldValue {
    /// Build from an optional selector match.
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            Some(v) => Self::Present(v),
            None => Self::Missing,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Present(v) => Some(v.as_str()),
            Self::Missing => None,
        }
    }

    /// Render for output, substituting the "N/A" sentinel when missing.
    pub fn display_or_na(&self) -> &str {
        self.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Present(value.to_string())
    }
}

/// Named fields of a product page (everything except the URL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Subcategory1,
    Subcategory2,
    Subcategory3,
    ProductName,
    BrandName,
    Rating,
    ReviewCount,
    Price,
    Ingredients,
}

impl ProductField {
    pub const ALL: [ProductField; 9] = [
        Self::Subcategory1,
        Self::Subcategory2,
        Self::Subcategory3,
        Self::ProductName,
        Self::BrandName,
        Self::Rating,
        Self::ReviewCount,
        Self::Price,
        Self::Ingredients,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subcategory1 => "subcategory1",
            Self::Subcategory2 => "subcategory2",
            Self::Subcategory3 => "subcategory3",
            Self::ProductName => "product_name",
            Self::BrandName => "brand_name",
            Self::Rating => "rating",
            Self::ReviewCount => "review_count",
            Self::Price => "price",
            Self::Ingredients => "ingredients",
        }
    }
}

impl std::fmt::Display for ProductField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields parsed from a successfully fetched product page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductFields {
    pub subcategories: [FieldValue; SUBCATEGORY_DEPTH],
    pub product_name: FieldValue,
    pub brand_name: FieldValue,
    pub rating: FieldValue,
    pub review_count: FieldValue,
    pub price: FieldValue,
    pub ingredients: FieldValue,
}

impl ProductFields {
    /// Fill the subcategory slots from breadcrumb texts.
    ///
    /// Only the first three crumbs are kept; missing levels stay `Missing`.
    pub fn set_breadcrumbs<I>(&mut self, crumbs: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.subcategories = Default::default();
        for (slot, crumb) in self.subcategories.iter_mut().zip(crumbs) {
            *slot = FieldValue::Present(crumb);
        }
    }

    pub fn get(&self, field: ProductField) -> &FieldValue {
        match field {
            ProductField::Subcategory1 => &self.subcategories[0],
            ProductField::Subcategory2 => &self.subcategories[1],
            ProductField::Subcategory3 => &self.subcategories[2],
            ProductField::ProductName => &self.product_name,
            ProductField::BrandName => &self.brand_name,
            ProductField::Rating => &self.rating,
            ProductField::ReviewCount => &self.review_count,
            ProductField::Price => &self.price,
            ProductField::Ingredients => &self.ingredients,
        }
    }

    /// Fields whose element was not found on the page.
    pub fn missing_fields(&self) -> Vec<ProductField> {
        ProductField::ALL
            .into_iter()
            .filter(|f| !self.get(*f).is_present())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        ProductField::ALL.iter().all(|f| self.get(*f).is_present())
    }
}

/// What happened when a product URL was processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The page was fetched; individual fields may still be missing.
    Extracted(ProductFields),
    /// The fetch failed; carries the transport error description.
    FetchFailed(String),
}

/// Coarse classification of a record, for summaries and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Success,
    PartialSuccess,
    FetchFailed,
}

/// One row of extraction output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub product_url: String,
    pub outcome: RecordOutcome,
}

impl ProductRecord {
    pub fn extracted(product_url: impl Into<String>, fields: ProductFields) -> Self {
        Self {
            product_url: product_url.into(),
            outcome: RecordOutcome::Extracted(fields),
        }
    }

    pub fn fetch_failed(product_url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            product_url: product_url.into(),
            outcome: RecordOutcome::FetchFailed(reason.into()),
        }
    }

    pub fn status(&self) -> RecordStatus {
        match &self.outcome {
            RecordOutcome::Extracted(fields) if fields.is_complete() => RecordStatus::Success,
            RecordOutcome::Extracted(_) => RecordStatus::PartialSuccess,
            RecordOutcome::FetchFailed(_) => RecordStatus::FetchFailed,
        }
    }

    pub fn fields(&self) -> Option<&ProductFields> {
        match &self.outcome {
            RecordOutcome::Extracted(fields) => Some(fields),
            RecordOutcome::FetchFailed(_) => None,
        }
    }

    /// Flatten into the sentinel-based output row.
    pub fn to_row(&self) -> ProductRow {
        ProductRow::from(self)
    }
}

/// Flat string rendering of a [`ProductRecord`], in output column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    pub subcategory1: String,
    pub subcategory2: String,
    pub subcategory3: String,
    pub product_name: String,
    pub brand_name: String,
    pub rating: String,
    pub review_count: String,
    pub price: String,
    pub ingredients: String,
    pub product_url: String,
}

impl ProductRow {
    fn filled(product_url: &str, value: &str) -> Self {
        Self {
            subcategory1: value.to_string(),
            subcategory2: value.to_string(),
            subcategory3: value.to_string(),
            product_name: value.to_string(),
            brand_name: value.to_string(),
            rating: value.to_string(),
            review_count: value.to_string(),
            price: value.to_string(),
            ingredients: value.to_string(),
            product_url: product_url.to_string(),
        }
    }

    /// Values in column order, for display.
    pub fn values(&self) -> [&str; 10] {
        [
            &self.subcategory1,
            &self.subcategory2,
            &self.subcategory3,
            &self.product_name,
            &self.brand_name,
            &self.rating,
            &self.review_count,
            &self.price,
            &self.ingredients,
            &self.product_url,
        ]
    }
}

impl From<&ProductRecord> for ProductRow {
    fn from(record: &ProductRecord) -> Self {
        let fields = match &record.outcome {
            RecordOutcome::FetchFailed(_) => {
                return Self::filled(&record.product_url, FETCH_ERROR);
            }
            RecordOutcome::Extracted(fields) => fields,
        };

        let text = |value: &FieldValue| value.display_or_na().to_string();
        Self {
            subcategory1: text(&fields.subcategories[0]),
            subcategory2: text(&fields.subcategories[1]),
            subcategory3: text(&fields.subcategories[2]),
            product_name: text(&fields.product_name),
            brand_name: text(&fields.brand_name),
            rating: text(&fields.rating),
            review_count: text(&fields.review_count),
            price: text(&fields.price),
            ingredients: text(&fields.ingredients),
            product_url: record.product_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crumbs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_breadcrumbs_padding_and_truncation() {
        let cases: [(&[&str], [&str; 3]); 5] = [
            (&[], ["N/A", "N/A", "N/A"]),
            (&["Makeup"], ["Makeup", "N/A", "N/A"]),
            (&["Makeup", "Face"], ["Makeup", "Face", "N/A"]),
            (&["Makeup", "Face", "Primer"], ["Makeup", "Face", "Primer"]),
            (
                &["Makeup", "Face", "Primer", "Mini", "Travel"],
                ["Makeup", "Face", "Primer"],
            ),
        ];

        for (input, expected) in cases {
            let mut fields = ProductFields::default();
            fields.set_breadcrumbs(crumbs(input));
            let row = ProductRecord::extracted("https://x/p", fields).to_row();
            assert_eq!(
                [
                    row.subcategory1.as_str(),
                    row.subcategory2.as_str(),
                    row.subcategory3.as_str()
                ],
                expected,
                "breadcrumbs {:?}",
                input
            );
        }
    }

    #[test]
    fn test_fetch_failed_row_is_all_error_except_url() {
        let url = "https://shop.example/p/lipstick?skuId=123";
        let row = ProductRecord::fetch_failed(url, "HTTP 500").to_row();

        let values = row.values();
        for (column, value) in PRODUCT_COLUMNS.iter().zip(values.iter()).take(9) {
            assert_eq!(*value, FETCH_ERROR, "column {}", column);
        }
        assert_eq!(row.product_url, url);
    }

    #[test]
    fn test_status_classification() {
        let mut full = ProductFields::default();
        full.set_breadcrumbs(crumbs(&["A", "B", "C"]));
        full.product_name = "Name".into();
        full.brand_name = "Brand".into();
        full.rating = "4.5".into();
        full.review_count = "10".into();
        full.price = "$5.00".into();
        full.ingredients = "Water".into();
        assert_eq!(
            ProductRecord::extracted("u", full.clone()).status(),
            RecordStatus::Success
        );

        full.ingredients = FieldValue::Missing;
        let partial = ProductRecord::extracted("u", full);
        assert_eq!(partial.status(), RecordStatus::PartialSuccess);
        assert_eq!(
            partial.fields().unwrap().missing_fields(),
            vec![ProductField::Ingredients]
        );

        assert_eq!(
            ProductRecord::fetch_failed("u", "boom").status(),
            RecordStatus::FetchFailed
        );
    }

    #[test]
    fn test_missing_field_renders_na() {
        let mut fields = ProductFields::default();
        fields.product_name = "Glow Serum".into();
        let row = ProductRecord::extracted("u", fields).to_row();
        assert_eq!(row.product_name, "Glow Serum");
        assert_eq!(row.price, NOT_AVAILABLE);
        assert_eq!(row.ingredients, NOT_AVAILABLE);
    }

    #[test]
    fn test_product_field_names_match_columns() {
        for (field, column) in ProductField::ALL.iter().zip(PRODUCT_COLUMNS.iter()) {
            assert_eq!(field.as_str(), *column);
        }
    }
}

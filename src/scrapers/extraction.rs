//! Product detail extraction over plain HTTP.

use scraper::Html;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, ExtractionConfig};
use crate::models::{FieldValue, ProductFields, ProductRecord};
use crate::scrapers::http_client::HttpClient;
use crate::scrapers::selectors::{CompiledField, CompiledSelectors, SelectorConfig};
use crate::utils::element_text;

/// Fetches product pages one at a time and turns each into a record.
pub struct ProductExtractor {
    client: HttpClient,
    selectors: CompiledSelectors,
}

impl ProductExtractor {
    /// Build an extractor with the configured headers, timeout and selectors.
    pub fn new(config: &ExtractionConfig, selectors: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            client: HttpClient::new(config)?,
            selectors: selectors.compile()?,
        })
    }

    /// Fetch and parse one product page.
    ///
    /// Never fails: a transport error or non-2xx response becomes a
    /// fetch-failed record for `url`.
    pub async fn extract_one(&self, url: &str, index: usize) -> ProductRecord {
        info!("Extracting info for index: {}", index);

        match self.client.get_text(url).await {
            Ok(body) => {
                ProductRecord::extracted(url, parse_product_page(&body, url, &self.selectors))
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                ProductRecord::fetch_failed(url, e.to_string())
            }
        }
    }

    /// Extract every URL in order, one record per URL.
    pub async fn extract_all<S: AsRef<str>>(&self, urls: &[S]) -> Vec<ProductRecord> {
        self.extract_all_with(urls, |_, _| {}).await
    }

    /// Like [`extract_all`](Self::extract_all), calling `on_record` after each
    /// URL with its index and record.
    pub async fn extract_all_with<S, F>(&self, urls: &[S], mut on_record: F) -> Vec<ProductRecord>
    where
        S: AsRef<str>,
        F: FnMut(usize, &ProductRecord),
    {
        let mut records = Vec::with_capacity(urls.len());
        for (index, url) in urls.iter().enumerate() {
            let record = self.extract_one(url.as_ref(), index).await;
            on_record(index, &record);
            records.push(record);
        }
        records
    }
}

/// Pull the product fields out of a product page.
///
/// Each field is read on its own; anything not found is `Missing`.
pub fn parse_product_page(html: &str, url: &str, selectors: &CompiledSelectors) -> ProductFields {
    let document = Html::parse_document(html);
    let read = |name: &str, field: &CompiledField| {
        let value = FieldValue::from_option(field.read_from(&document));
        if !value.is_present() {
            debug!("{} not found on {}", name, url);
        }
        value
    };

    let mut fields = ProductFields {
        product_name: read("product_name", &selectors.product_name),
        brand_name: read("brand_name", &selectors.brand_name),
        rating: read("rating", &selectors.rating),
        review_count: read("review_count", &selectors.review_count),
        price: read("price", &selectors.price),
        ingredients: read("ingredients", &selectors.ingredients),
        ..Default::default()
    };
    fields.set_breadcrumbs(document.select(&selectors.breadcrumb).map(|el| element_text(&el)));

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductField, RecordStatus};

    const URL: &str = "https://shop.example/p/glow-serum";

    fn selectors() -> CompiledSelectors {
        SelectorConfig::default().compile().unwrap()
    }

    fn crumbs(names: &[&str]) -> String {
        names
            .iter()
            .map(|n| format!(r#"<div class="breadcrumb-element"><a>{n}</a></div>"#))
            .collect()
    }

    fn product_page(breadcrumbs: &[&str], with_ingredients: bool) -> String {
        let ingredients = if with_ingredients {
            r#"<div class="ingredients-content">
                 <p>Water,</p>
                 <p> Glycerin</p>
               </div>"#
        } else {
            ""
        };
        format!(
            r#"<html><head>
                 <meta itemprop="reviewCount" content="128">
               </head><body>
                 {}
                 <h1><span class="product-name product-name-bold">
                     Glow Serum
                 </span></h1>
                 <span class="brand-name" itemprop="name">Lumen</span>
                 <span itemprop="ratingValue">4.6</span>
                 <span class="price-sales price-sales-standard">$24.00</span>
                 {}
               </body></html>"#,
            crumbs(breadcrumbs),
            ingredients
        )
    }

    #[test]
    fn test_parse_complete_page() {
        let html = product_page(&["Skincare", "Serums", "Face Serums"], true);
        let fields = parse_product_page(&html, URL, &selectors());

        assert_eq!(fields.subcategories[0], FieldValue::from("Skincare"));
        assert_eq!(fields.subcategories[1], FieldValue::from("Serums"));
        assert_eq!(fields.subcategories[2], FieldValue::from("Face Serums"));
        assert_eq!(fields.product_name, FieldValue::from("Glow Serum"));
        assert_eq!(fields.brand_name, FieldValue::from("Lumen"));
        assert_eq!(fields.rating, FieldValue::from("4.6"));
        assert_eq!(fields.review_count, FieldValue::from("128"));
        assert_eq!(fields.price, FieldValue::from("$24.00"));
        assert_eq!(fields.ingredients, FieldValue::from("Water,Glycerin"));
        assert!(fields.is_complete());
    }

    #[test]
    fn test_missing_ingredients_only() {
        let html = product_page(&["Skincare", "Serums", "Face Serums"], false);
        let fields = parse_product_page(&html, URL, &selectors());

        assert_eq!(fields.missing_fields(), vec![ProductField::Ingredients]);
        let record = ProductRecord::extracted(URL, fields);
        assert_eq!(record.status(), RecordStatus::PartialSuccess);
        let row = record.to_row();
        assert_eq!(row.ingredients, "N/A");
        assert_eq!(row.product_name, "Glow Serum");
    }

    #[test]
    fn test_breadcrumb_depths() {
        let cases: [(&[&str], [&str; 3]); 5] = [
            (&[], ["N/A", "N/A", "N/A"]),
            (&["A"], ["A", "N/A", "N/A"]),
            (&["A", "B"], ["A", "B", "N/A"]),
            (&["A", "B", "C"], ["A", "B", "C"]),
            (&["A", "B", "C", "D", "E"], ["A", "B", "C"]),
        ];

        for (input, expected) in cases {
            let html = product_page(input, true);
            let row = ProductRecord::extracted(URL, parse_product_page(&html, URL, &selectors()))
                .to_row();
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
    fn test_meta_without_content_is_missing() {
        let html = r#"<meta itemprop="reviewCount"><span itemprop="ratingValue">5</span>"#;
        let fields = parse_product_page(html, URL, &selectors());
        assert_eq!(fields.review_count, FieldValue::Missing);
        assert_eq!(fields.rating, FieldValue::from("5"));
    }

    #[test]
    fn test_only_first_match_is_used() {
        let html = r#"
            <span class="price-sales price-sales-standard">$10.00</span>
            <span class="price-sales price-sales-standard">$99.00</span>
        "#;
        let fields = parse_product_page(html, URL, &selectors());
        assert_eq!(fields.price, FieldValue::from("$10.00"));
    }

    #[test]
    fn test_empty_document_is_all_missing() {
        let fields = parse_product_page("", URL, &selectors());
        assert_eq!(fields, ProductFields::default());
    }

    #[test]
    fn test_new_rejects_bad_header() {
        let mut config = ExtractionConfig::default();
        config
            .headers
            .insert("Bad Header".to_string(), "x".to_string());
        let result = ProductExtractor::new(&config, &SelectorConfig::default());
        assert!(matches!(result, Err(ConfigError::InvalidHeader { .. })));
    }
}

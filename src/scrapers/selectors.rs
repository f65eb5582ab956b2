//! CSS selectors for listing tiles and product page fields.
//!
//! Defaults match the catalog markup this tool was written against; every
//! selector can be overridden from the config file.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::utils::{first_attr, first_text};

/// How to read one field: a CSS selector, and optionally an attribute to
/// take instead of the element text.
///
/// In config files a bare string is shorthand for `{ css = "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldSelectorRepr")]
pub struct FieldSelector {
    pub css: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl FieldSelector {
    pub fn text(css: &str) -> Self {
        Self {
            css: css.to_string(),
            attribute: None,
        }
    }

    pub fn attr(css: &str, attribute: &str) -> Self {
        Self {
            css: css.to_string(),
            attribute: Some(attribute.to_string()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldSelectorRepr {
    Css(String),
    Full {
        css: String,
        #[serde(default)]
        attribute: Option<String>,
    },
}

impl From<FieldSelectorRepr> for FieldSelector {
    fn from(repr: FieldSelectorRepr) -> Self {
        match repr {
            FieldSelectorRepr::Css(css) => Self {
                css,
                attribute: None,
            },
            FieldSelectorRepr::Full { css, attribute } => Self { css, attribute },
        }
    }
}

/// Selector configuration for both stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// The "see more products" control on the listing page.
    pub see_more_button: String,
    /// One product tile on the listing page.
    pub product_tile: String,
    /// The product link inside a tile.
    pub product_link: String,
    /// Each breadcrumb element on a product page.
    pub breadcrumb: String,
    pub product_name: FieldSelector,
    pub brand_name: FieldSelector,
    pub rating: FieldSelector,
    pub review_count: FieldSelector,
    pub price: FieldSelector,
    pub ingredients: FieldSelector,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            see_more_button: ".see-more-button".to_string(),
            product_tile: "div.product-tile".to_string(),
            product_link: "a.product-tile-link".to_string(),
            breadcrumb: "div.breadcrumb-element".to_string(),
            product_name: FieldSelector::text("span.product-name.product-name-bold"),
            brand_name: FieldSelector::text(r#"span.brand-name[itemprop="name"]"#),
            rating: FieldSelector::text(r#"span[itemprop="ratingValue"]"#),
            review_count: FieldSelector::attr(r#"meta[itemprop="reviewCount"]"#, "content"),
            price: FieldSelector::text("span.price-sales.price-sales-standard"),
            ingredients: FieldSelector::text("div.ingredients-content"),
        }
    }
}

impl SelectorConfig {
    /// Parse every selector, failing on the first invalid one.
    pub fn compile(&self) -> Result<CompiledSelectors, ConfigError> {
        Ok(CompiledSelectors {
            see_more_button: self.see_more_button.clone(),
            product_tile: parse("product_tile", &self.product_tile)?,
            product_link: parse("product_link", &self.product_link)?,
            breadcrumb: parse("breadcrumb", &self.breadcrumb)?,
            product_name: CompiledField::new("product_name", &self.product_name)?,
            brand_name: CompiledField::new("brand_name", &self.brand_name)?,
            rating: CompiledField::new("rating", &self.rating)?,
            review_count: CompiledField::new("review_count", &self.review_count)?,
            price: CompiledField::new("price", &self.price)?,
            ingredients: CompiledField::new("ingredients", &self.ingredients)?,
        })
    }
}

fn parse(name: &'static str, css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css).map_err(|e| ConfigError::InvalidSelector {
        name,
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// A parsed field selector.
#[derive(Debug, Clone)]
pub struct CompiledField {
    selector: Selector,
    attribute: Option<String>,
}

impl CompiledField {
    fn new(name: &'static str, field: &FieldSelector) -> Result<Self, ConfigError> {
        Ok(Self {
            selector: parse(name, &field.css)?,
            attribute: field.attribute.clone(),
        })
    }

    /// Read the field from the first matching element.
    pub fn read_from(&self, document: &Html) -> Option<String> {
        match self.attribute.as_deref() {
            Some(attr) => first_attr(document, &self.selector, attr),
            None => first_text(document, &self.selector),
        }
    }
}

/// Selectors ready for use.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    /// Kept as text: it is handed to the browser, not to `scraper`.
    pub see_more_button: String,
    pub product_tile: Selector,
    pub product_link: Selector,
    pub breadcrumb: Selector,
    pub product_name: CompiledField,
    pub brand_name: CompiledField,
    pub rating: CompiledField,
    pub review_count: CompiledField,
    pub price: CompiledField,
    pub ingredients: CompiledField,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_compile() {
        SelectorConfig::default().compile().unwrap();
    }

    #[test]
    fn test_invalid_selector_reports_field() {
        let config = SelectorConfig {
            price: FieldSelector::text("span[[price"),
            ..Default::default()
        };
        let err = config.compile().unwrap_err();
        match err {
            ConfigError::InvalidSelector { name, selector, .. } => {
                assert_eq!(name, "price");
                assert_eq!(selector, "span[[price");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_field_selector_shorthand_and_table() {
        let toml_src = r#"
rating = "span.stars"
review_count = { css = "span.reviews", attribute = "data-count" }
"#;
        let config: SelectorConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(config.rating, FieldSelector::text("span.stars"));
        assert_eq!(
            config.review_count,
            FieldSelector::attr("span.reviews", "data-count")
        );
        assert_eq!(config.product_tile, "div.product-tile");
    }

    #[test]
    fn test_read_text_and_attribute() {
        let compiled = SelectorConfig::default().compile().unwrap();
        let doc = Html::parse_document(
            r#"<span itemprop="ratingValue"> 4.3 </span>
               <meta itemprop="reviewCount" content="87">"#,
        );
        assert_eq!(compiled.rating.read_from(&doc), Some("4.3".to_string()));
        assert_eq!(compiled.review_count.read_from(&doc), Some("87".to_string()));
        assert_eq!(compiled.price.read_from(&doc), None);
    }
}

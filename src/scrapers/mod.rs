//! Scrapers for catalog listing pages and product detail pages.
//!
//! - `discovery`: browser-driven collection of product URLs
//! - `extraction`: HTTP fetch and parse of each product page
//! - `browser`: Chrome session management over CDP
//! - `selectors`: configurable CSS selectors for both stages

pub mod browser;
pub mod discovery;
pub mod extraction;
mod http_client;
pub mod selectors;

pub use browser::{BrowserEngineConfig, BrowserSession};
pub use discovery::{DiscoveryError, ListingPage};
pub use extraction::{parse_product_page, ProductExtractor};
pub use http_client::{resolve_user_agent, FetchError, HttpClient, DEFAULT_USER_AGENT};
pub use selectors::{CompiledSelectors, FieldSelector, SelectorConfig};

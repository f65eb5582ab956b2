//! catalogscrape - product URL discovery and product detail extraction for
//! e-commerce catalogs.
//!
//! Discovery drives a real browser over a lazy-loaded category listing and
//! collects product URLs. Extraction fetches each product page over plain
//! HTTP and parses a fixed set of fields into a flat table.

pub mod cli;
pub mod config;
pub mod models;
pub mod scrapers;
pub mod storage;
pub mod utils;

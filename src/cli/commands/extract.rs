//! Product detail extraction command.

use std::path::Path;

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::icons::{dim_arrow, error, success, warn};
use crate::config::Config;
use crate::models::{ProductRecord, RecordStatus};
use crate::scrapers::ProductExtractor;
use crate::storage;

/// Extract product details for every URL in `input`.
pub async fn cmd_extract(config: &Config, input: &Path, limit: usize) -> anyhow::Result<()> {
    let mut urls = storage::read_urls(input)
        .with_context(|| format!("Failed to load URL table {}", input.display()))?;
    if limit > 0 {
        urls.truncate(limit);
    }

    extract_urls(config, &urls).await
}

pub(super) async fn extract_urls(config: &Config, urls: &[String]) -> anyhow::Result<()> {
    if urls.is_empty() {
        println!("{} No product URLs to process", warn());
        storage::write_records(&config.extraction.output, &[])?;
        return Ok(());
    }

    let extractor = ProductExtractor::new(&config.extraction, &config.selectors)
        .context("Invalid extraction settings")?;

    println!(
        "{} Extracting {} products",
        style("→").cyan(),
        urls.len()
    );

    let pb = ProgressBar::new(urls.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let records = extractor
        .extract_all_with(urls, |_, record| {
            pb.set_message(truncate(&record.product_url, 50));
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();

    storage::write_records(&config.extraction.output, &records)?;
    print_summary(&records);
    println!(
        "  {} Saved to {}",
        dim_arrow(),
        config.extraction.output.display()
    );

    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    success: usize,
    partial: usize,
    failed: usize,
}

fn summarize(records: &[ProductRecord]) -> Summary {
    let mut summary = Summary::default();
    for record in records {
        match record.status() {
            RecordStatus::Success => summary.success += 1,
            RecordStatus::PartialSuccess => summary.partial += 1,
            RecordStatus::FetchFailed => summary.failed += 1,
        }
    }
    summary
}

fn print_summary(records: &[ProductRecord]) {
    let summary = summarize(records);
    println!(
        "{} Extracted {} products",
        success(),
        records.len()
    );
    println!("  {} Complete: {}", dim_arrow(), summary.success);
    if summary.partial > 0 {
        println!("  {} Missing fields: {}", warn(), summary.partial);
    }
    if summary.failed > 0 {
        println!("  {} Fetch failed: {}", error(), summary.failed);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldValue, ProductFields};

    #[test]
    fn test_summarize_counts_each_status() {
        let complete = ProductFields {
            subcategories: [
                FieldValue::from("a"),
                FieldValue::from("b"),
                FieldValue::from("c"),
            ],
            product_name: FieldValue::from("n"),
            brand_name: FieldValue::from("b"),
            rating: FieldValue::from("4"),
            review_count: FieldValue::from("2"),
            price: FieldValue::from("$1"),
            ingredients: FieldValue::from("water"),
        };
        let records = vec![
            ProductRecord::extracted("u1", complete),
            ProductRecord::extracted("u2", ProductFields::default()),
            ProductRecord::fetch_failed("u3", "HTTP 404"),
            ProductRecord::fetch_failed("u4", "timed out"),
        ];

        assert_eq!(
            summarize(&records),
            Summary {
                success: 1,
                partial: 1,
                failed: 2
            }
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("https://shop.example/p/123", 10), "https:/...");
    }
}

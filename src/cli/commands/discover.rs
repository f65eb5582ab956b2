//! Product URL discovery command.

use console::style;

use crate::cli::icons::{dim_arrow, success, warn};
use crate::config::Config;
use crate::models::UrlTable;
use crate::scrapers::discovery;

/// Discover product URLs on `url` and write them to the configured output.
pub async fn cmd_discover(config: &Config, url: &str) -> anyhow::Result<()> {
    discover_urls(config, url).await.map(|_| ())
}

pub(super) async fn discover_urls(config: &Config, url: &str) -> anyhow::Result<UrlTable> {
    let plan = &config.discovery;
    println!(
        "{} Discovering up to {} products on {}",
        style("→").cyan(),
        plan.target_count,
        style(url).bold()
    );

    let urls = discovery::run(config, url).await?;

    if urls.len() < plan.target_count {
        println!(
            "{} Found {} of {} requested products",
            warn(),
            urls.len(),
            plan.target_count
        );
    } else {
        println!("{} Found {} products", success(), urls.len());
    }
    println!("  {} Saved to {}", dim_arrow(), plan.output.display());

    Ok(urls)
}

//! Discovery followed by extraction.

use super::{discover, extract};
use crate::config::Config;

/// Run both stages: the URL table from discovery feeds extraction.
pub async fn cmd_run(config: &Config, url: &str) -> anyhow::Result<()> {
    let urls = discover::discover_urls(config, url).await?;
    println!();
    extract::extract_urls(config, urls.urls()).await
}

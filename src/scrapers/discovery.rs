//! Product URL discovery on lazy-loaded listing pages.
//!
//! The listing is driven through [`ListingPage`]: optionally click the
//! "show more" control, then scroll to the bottom repeatedly and harvest
//! product links from each rendered snapshot until enough distinct URLs have
//! been seen or the page stops yielding new ones.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{Config, ConfigError, DiscoveryConfig};
use crate::models::UrlTable;
use crate::scrapers::browser::BrowserSession;
use crate::scrapers::selectors::CompiledSelectors;
use crate::storage::{self, StorageError};
use crate::utils::resolve_link;

/// Scroll pauses longer than this stop the loop after a single pass.
pub const MAX_SCROLL_PAUSE: Duration = Duration::from_secs(60);

/// A rendered listing page that can be scrolled, clicked and snapshotted.
#[async_trait]
pub trait ListingPage: Send + Sync {
    /// Scroll the viewport to the bottom of the document.
    async fn scroll_to_bottom(&self) -> anyhow::Result<()>;

    /// Current rendered markup.
    async fn markup(&self) -> anyhow::Result<String>;

    /// Wait up to `timeout` for `selector` to be visible, then click it.
    async fn click_when_visible(&self, selector: &str, timeout: Duration) -> anyhow::Result<()>;
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Browser session failed: {0:#}")]
    Session(anyhow::Error),
    #[error("Listing page failed: {0:#}")]
    Page(anyhow::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Product links from one listing snapshot, in document order.
///
/// Each tile contributes its first product link with a non-empty `href`.
/// Relative links are resolved against `base` when given.
pub fn parse_product_links(
    html: &str,
    selectors: &CompiledSelectors,
    base: Option<&Url>,
) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&selectors.product_tile)
        .filter_map(|tile| tile.select(&selectors.product_link).next())
        .filter_map(|link| link.value().attr("href"))
        .filter(|href| !href.trim().is_empty())
        .map(|href| resolve_link(base, href))
        .collect()
}

/// Click the "show more" control if it shows up within `timeout`.
///
/// Failure is logged and otherwise ignored. Returns whether the click
/// happened.
pub async fn expand_listing<P: ListingPage + ?Sized>(
    page: &P,
    selector: &str,
    timeout: Duration,
    settle: Duration,
) -> bool {
    match page.click_when_visible(selector, timeout).await {
        Ok(()) => {
            debug!("Clicked {}, waiting {:?} for tiles", selector, settle);
            tokio::time::sleep(settle).await;
            true
        }
        Err(e) => {
            warn!("Could not expand listing via {}: {:#}", selector, e);
            false
        }
    }
}

/// Scroll and harvest until one of the stop conditions holds.
///
/// Stops when `plan.target_count` URLs are collected, after one pass when the
/// scroll pause exceeds [`MAX_SCROLL_PAUSE`], or after
/// `plan.max_stalled_scrolls` consecutive passes without a new URL (0 keeps
/// scrolling).
pub async fn collect_urls<P: ListingPage + ?Sized>(
    page: &P,
    selectors: &CompiledSelectors,
    plan: &DiscoveryConfig,
    base: Option<&Url>,
) -> Result<UrlTable, DiscoveryError> {
    let pause = plan.scroll_pause();
    let mut urls = UrlTable::new();
    let mut stalled = 0usize;

    while urls.len() < plan.target_count {
        page.scroll_to_bottom().await.map_err(DiscoveryError::Page)?;
        tokio::time::sleep(pause).await;

        let html = page.markup().await.map_err(DiscoveryError::Page)?;
        let added = urls.extend_new(parse_product_links(&html, selectors, base));
        info!("Products loaded: {}", urls.len());

        if pause > MAX_SCROLL_PAUSE {
            warn!(
                "Scroll pause {:?} exceeds {:?}, stopping after one pass",
                pause, MAX_SCROLL_PAUSE
            );
            break;
        }

        if added > 0 {
            stalled = 0;
            continue;
        }
        stalled += 1;
        if plan.max_stalled_scrolls > 0 && stalled >= plan.max_stalled_scrolls {
            warn!(
                "No new products after {} scrolls, stopping at {} of {}",
                stalled,
                urls.len(),
                plan.target_count
            );
            break;
        }
    }

    Ok(urls)
}

/// Write discovered URLs to `path` and hand the table back.
pub fn persist_urls(urls: UrlTable, path: &Path) -> Result<UrlTable, DiscoveryError> {
    storage::write_urls(path, &urls)?;
    info!("Wrote {} URLs to {}", urls.len(), path.display());
    Ok(urls)
}

/// Expand (if enabled) and collect on an already opened page.
pub async fn discover_on<P: ListingPage + ?Sized>(
    page: &P,
    selectors: &CompiledSelectors,
    plan: &DiscoveryConfig,
    base: Option<&Url>,
) -> Result<UrlTable, DiscoveryError> {
    if plan.expand {
        expand_listing(
            page,
            &selectors.see_more_button,
            plan.expand_timeout(),
            plan.settle_delay(),
        )
        .await;
    }
    collect_urls(page, selectors, plan, base).await
}

/// Run the whole discovery stage against `url` and write the URL table to
/// `config.discovery.output`.
///
/// The browser is shut down on every path out of this function.
#[cfg(feature = "browser")]
pub async fn run(config: &Config, url: &str) -> Result<UrlTable, DiscoveryError> {
    let selectors = config.selectors.compile()?;
    let base = Url::parse(url).ok();

    let session = BrowserSession::launch(&config.browser)
        .await
        .map_err(DiscoveryError::Session)?;

    let result = match session.open(url).await {
        Ok(page) => {
            let collected =
                discover_on(&page, &selectors, &config.discovery, base.as_ref()).await;
            page.close().await;
            collected
        }
        Err(e) => Err(DiscoveryError::Session(e)),
    };
    session.close().await;

    persist_urls(result?, &config.discovery.output)
}

/// Without browser support the session cannot start, so this always fails.
#[cfg(not(feature = "browser"))]
pub async fn run(config: &Config, _url: &str) -> Result<UrlTable, DiscoveryError> {
    config.selectors.compile()?;
    let session = BrowserSession::launch(&config.browser)
        .await
        .map_err(DiscoveryError::Session)?;
    session.close().await;
    Ok(UrlTable::new())
}

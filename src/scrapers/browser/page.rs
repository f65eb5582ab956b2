//! chromiumoxide-backed listing page.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::layout::Point;
use chromiumoxide::Page;
use tracing::debug;

use crate::scrapers::discovery::ListingPage;

/// How often to re-check for an element while waiting for it to appear.
const VISIBILITY_POLL: Duration = Duration::from_millis(250);

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// An open browser tab.
pub struct BrowserPage {
    page: Page,
}

impl BrowserPage {
    pub(super) fn new(page: Page) -> Self {
        Self { page }
    }

    /// Poll until `selector` matches an element with a clickable box.
    async fn wait_visible(&self, selector: &str) -> Point {
        loop {
            if let Ok(element) = self.page.find_element(selector).await {
                if element.scroll_into_view().await.is_ok() {
                    if let Ok(point) = element.clickable_point().await {
                        return point;
                    }
                }
            }
            tokio::time::sleep(VISIBILITY_POLL).await;
        }
    }

    /// Close the tab.
    pub async fn close(self) {
        if let Err(e) = self.page.close().await {
            debug!("Failed to close tab: {}", e);
        }
    }
}

#[async_trait]
impl ListingPage for BrowserPage {
    async fn scroll_to_bottom(&self) -> Result<()> {
        self.page
            .evaluate(SCROLL_TO_BOTTOM)
            .await
            .context("Failed to scroll page")?;
        Ok(())
    }

    async fn markup(&self) -> Result<String> {
        self.page
            .content()
            .await
            .context("Failed to read page content")
    }

    async fn click_when_visible(&self, selector: &str, timeout: Duration) -> Result<()> {
        let point = tokio::time::timeout(timeout, self.wait_visible(selector))
            .await
            .map_err(|_| anyhow::anyhow!("{} not visible after {:?}", selector, timeout))?;

        self.page
            .move_mouse(point)
            .await
            .context("Failed to move pointer")?;
        self.page.click(point).await.context("Failed to click")?;
        Ok(())
    }
}

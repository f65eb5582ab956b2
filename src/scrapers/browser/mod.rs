//! Browser session for rendering lazy-loaded listing pages.
//!
//! Uses chromiumoxide (CDP) to launch a local Chrome/Chromium or attach to
//! a remote DevTools endpoint.

mod config;
#[cfg(feature = "browser")]
mod page;

pub use config::{default_headless, default_timeout, BrowserEngineConfig};
#[cfg(feature = "browser")]
pub use page::BrowserPage;

#[cfg(feature = "browser")]
use std::path::PathBuf;
#[cfg(feature = "browser")]
use std::time::Duration;

#[cfg(feature = "browser")]
use anyhow::Context;
use anyhow::Result;
#[cfg(feature = "browser")]
use tokio::task::JoinHandle;
#[cfg(feature = "browser")]
use tracing::{debug, info, warn};

#[cfg(feature = "browser")]
use chromiumoxide::{Browser, BrowserConfig};
#[cfg(feature = "browser")]
use futures::StreamExt;

/// A running (or attached) browser.
///
/// Call [`BrowserSession::close`] when done. Dropping the session without
/// closing it still stops the CDP handler task, and chromiumoxide kills a
/// launched child process on drop.
#[cfg(feature = "browser")]
pub struct BrowserSession {
    config: BrowserEngineConfig,
    browser: Browser,
    handler: JoinHandle<()>,
    /// True if we spawned the process (and so should shut it down).
    launched: bool,
}

#[cfg(feature = "browser")]
impl BrowserSession {
    /// Common Chrome executable paths to check.
    const CHROME_PATHS: &'static [&'static str] = &[
        // Linux
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        // macOS
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        // Common install locations
        "/opt/google/chrome/google-chrome",
    ];

    /// Executable names searched for in PATH.
    const CHROME_COMMANDS: &'static [&'static str] = &[
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
    ];

    /// Launch a browser, or connect to the configured remote one.
    pub async fn launch(config: &BrowserEngineConfig) -> Result<Self> {
        if let Some(remote_url) = config.remote_url.as_deref() {
            return Self::connect_remote(config, remote_url).await;
        }

        info!("Launching browser (headless={})", config.headless);

        let chrome_path = Self::find_chrome(config)?;
        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .request_timeout(config.page_timeout());

        // with_head means NOT headless
        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(ref proxy) = config.proxy {
            builder = builder.arg(format!("--proxy-server={}", proxy));
        }

        builder = builder
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .arg("--metrics-recording-only")
            .arg("--no-sandbox") // Often needed for headless in containers
            .arg("--disable-gpu");

        for arg in &config.chrome_args {
            builder = builder.arg(arg);
        }

        let browser_config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {}", e))?;

        let (browser, handler) = Browser::launch(browser_config)
            .await
            .context("Failed to launch browser")?;

        Ok(Self {
            config: config.clone(),
            browser,
            handler: Self::spawn_handler(handler),
            launched: true,
        })
    }

    /// Find the Chrome executable: explicit config, well-known paths, then PATH.
    fn find_chrome(config: &BrowserEngineConfig) -> Result<PathBuf> {
        if let Some(ref path) = config.chrome_path {
            if path.exists() {
                return Ok(path.clone());
            }
            anyhow::bail!("Configured chrome_path does not exist: {}", path.display());
        }

        for path in Self::CHROME_PATHS {
            let p = std::path::Path::new(path);
            if p.exists() {
                info!("Found Chrome at: {}", path);
                return Ok(p.to_path_buf());
            }
        }

        for cmd in Self::CHROME_COMMANDS {
            if let Ok(path) = which::which(cmd) {
                info!("Found Chrome in PATH: {}", path.display());
                return Ok(path);
            }
        }

        Err(anyhow::anyhow!(
            "Chrome/Chromium not found. Please install it:\n\
             - Arch/Manjaro: sudo pacman -S chromium\n\
             - Ubuntu/Debian: sudo apt install chromium-browser\n\
             - Fedora: sudo dnf install chromium\n\
             - Or set CHROME_PATH / browser.chrome_path"
        ))
    }

    /// Connect to a remote Chrome instance.
    async fn connect_remote(config: &BrowserEngineConfig, url: &str) -> Result<Self> {
        info!(
            "Connecting to remote browser at {} (timeout: {}s)",
            url, config.timeout
        );

        // Get WebSocket URL from the /json/version endpoint
        let http_url = url
            .replace("ws://", "http://")
            .replace("wss://", "https://");
        let version_url = format!("{}/json/version", http_url.trim_end_matches('/'));

        let client = reqwest::Client::builder()
            .timeout(config.page_timeout())
            .build()
            .context("Failed to build DevTools client")?;
        let resp: serde_json::Value = client
            .get(&version_url)
            .send()
            .await
            .context("Failed to connect to remote browser")?
            .json()
            .await
            .context("Failed to parse browser version info")?;

        let ws_url = resp
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("No webSocketDebuggerUrl in response"))?;

        info!("Connecting to WebSocket: {}", ws_url);

        let handler_config = chromiumoxide::handler::HandlerConfig {
            request_timeout: config.page_timeout(),
            ..Default::default()
        };

        let (browser, handler) = Browser::connect_with_config(ws_url, handler_config)
            .await
            .context("Failed to connect to remote browser")?;

        Ok(Self {
            config: config.clone(),
            browser,
            handler: Self::spawn_handler(handler),
            launched: false,
        })
    }

    fn spawn_handler(mut handler: chromiumoxide::handler::Handler) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        })
    }

    /// Open a new tab and navigate it to `url`.
    ///
    /// Fails if navigation errors or does not finish within the page timeout.
    pub async fn open(&self, url: &str) -> Result<BrowserPage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("Failed to open browser tab")?;

        info!("Navigating to {}", url);
        let timeout = self.config.page_timeout();
        let navigation = tokio::time::timeout(timeout, page.goto(url))
            .await
            .map(|loaded| loaded.map(|_| ()));
        match navigation {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = page.close().await;
                return Err(anyhow::Error::new(e).context(format!("Failed to load {}", url)));
            }
            Err(_) => {
                let _ = page.close().await;
                anyhow::bail!("Timed out after {:?} loading {}", timeout, url);
            }
        }

        Ok(BrowserPage::new(page))
    }

    /// Shut the session down.
    ///
    /// A launched browser is closed and reaped; a remote browser is only
    /// disconnected.
    pub async fn close(mut self) {
        if self.launched {
            if let Err(e) = self.browser.close().await {
                warn!("Failed to close browser cleanly: {}", e);
            }
            match tokio::time::timeout(Duration::from_secs(5), self.browser.wait()).await {
                Ok(Ok(status)) => debug!("Browser exited: {:?}", status),
                Ok(Err(e)) => warn!("Failed waiting for browser exit: {}", e),
                Err(_) => warn!("Browser did not exit within 5s"),
            }
        }
        self.handler.abort();
    }
}

#[cfg(feature = "browser")]
impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

// Stub for when browser feature is disabled
#[cfg(not(feature = "browser"))]
pub struct BrowserSession {
    _config: BrowserEngineConfig,
}

#[cfg(not(feature = "browser"))]
impl BrowserSession {
    pub async fn launch(_config: &BrowserEngineConfig) -> Result<Self> {
        Err(anyhow::anyhow!(
            "Browser support not compiled. Rebuild with: cargo build --features browser"
        ))
    }

    pub async fn close(self) {}
}

//! Browser engine configuration types.
//!
//! These live outside `#[cfg(feature = "browser")]` so config parsing works
//! in builds without browser support.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Browser engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserEngineConfig {
    /// Run in headless mode (default: true).
    /// Set to false to watch the listing page being scrolled.
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Page load timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Proxy server URL (e.g., "socks5://127.0.0.1:1080").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

    /// Explicit Chrome/Chromium executable. Auto-detected when unset.
    /// Can also be set via CHROME_PATH environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,

    /// Remote Chrome DevTools URL (e.g., "ws://localhost:9222").
    /// If set, connects to existing browser instead of launching one.
    /// Can also be set via BROWSER_URL environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            timeout: default_timeout(),
            proxy: None,
            chrome_path: None,
            remote_url: None,
            chrome_args: Vec::new(),
        }
    }
}

impl BrowserEngineConfig {
    /// Apply overrides read through `lookup`. Empty values are ignored.
    ///
    /// - `BROWSER_URL` - Remote Chrome DevTools URL
    /// - `CHROME_PATH` - Chrome/Chromium executable
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("BROWSER_URL").filter(|v| !v.is_empty()) {
            self.remote_url = Some(val);
        }

        if let Some(val) = lookup("CHROME_PATH").filter(|v| !v.is_empty()) {
            self.chrome_path = Some(PathBuf::from(val));
        }

        self
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

pub fn default_headless() -> bool {
    true
}

pub fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_engine_config_default() {
        let config = BrowserEngineConfig::default();
        assert!(config.headless);
        assert_eq!(config.timeout, 30);
        assert!(config.proxy.is_none());
        assert!(config.chrome_path.is_none());
        assert!(config.remote_url.is_none());
        assert!(config.chrome_args.is_empty());
    }

    #[test]
    fn test_browser_engine_config_serde_defaults() {
        let config: BrowserEngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BrowserEngineConfig::default());
    }

    #[test]
    fn test_overrides_from_lookup() {
        let config = BrowserEngineConfig {
            remote_url: Some("ws://old:9222".to_string()),
            ..Default::default()
        }
        .with_overrides_from(|key| match key {
            "CHROME_PATH" => Some("/usr/local/bin/chromium".to_string()),
            "BROWSER_URL" => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.remote_url.as_deref(), Some("ws://old:9222"));
        assert_eq!(
            config.chrome_path,
            Some(PathBuf::from("/usr/local/bin/chromium"))
        );
    }

    #[test]
    fn test_browser_engine_config_serde_with_values() {
        let json = r##"{
            "headless": false,
            "proxy": "socks5://127.0.0.1:1080",
            "timeout": 60,
            "chrome_args": ["--window-size=1280,2000"]
        }"##;

        let config: BrowserEngineConfig = serde_json::from_str(json).unwrap();
        assert!(!config.headless);
        assert_eq!(config.proxy, Some("socks5://127.0.0.1:1080".to_string()));
        assert_eq!(config.page_timeout(), Duration::from_secs(60));
        assert_eq!(config.chrome_args, vec!["--window-size=1280,2000"]);
    }
}

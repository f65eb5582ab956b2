//! Configuration management for catalogscrape.
//!
//! A config file is optional; every field has a default. Files are parsed by
//! extension (TOML, YAML, otherwise JSON) and environment overrides are
//! applied on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scrapers::browser::BrowserEngineConfig;
use crate::scrapers::selectors::SelectorConfig;
use crate::scrapers::{resolve_user_agent, DEFAULT_USER_AGENT};

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "catalogscrape.toml";

/// Default output path for discovered URLs.
pub const DEFAULT_URLS_FILE: &str = "product_urls.csv";

/// Default output path for extracted product records.
pub const DEFAULT_PRODUCTS_FILE: &str = "products.csv";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("Invalid selector for {name} ({selector:?}): {reason}")]
    InvalidSelector {
        name: &'static str,
        selector: String,
        reason: String,
    },
    #[error("Invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Discovery stage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Stop once this many distinct product URLs have been collected.
    pub target_count: usize,
    /// Pause after each scroll, in seconds.
    pub scroll_pause_secs: f64,
    /// How long to wait for the "show more" control to become visible.
    pub expand_timeout_secs: u64,
    /// Delay after clicking "show more" so new tiles can render.
    pub settle_delay_secs: f64,
    /// Give up after this many consecutive scrolls that add no URL (0 = never).
    pub max_stalled_scrolls: usize,
    /// Click the "show more" control before scrolling.
    pub expand: bool,
    /// Where the URL table is written.
    pub output: PathBuf,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            target_count: 100,
            scroll_pause_secs: 3.0,
            expand_timeout_secs: 15,
            settle_delay_secs: 3.0,
            max_stalled_scrolls: 5,
            expand: true,
            output: PathBuf::from(DEFAULT_URLS_FILE),
        }
    }
}

impl DiscoveryConfig {
    pub fn scroll_pause(&self) -> Duration {
        secs_to_duration(self.scroll_pause_secs)
    }

    pub fn expand_timeout(&self) -> Duration {
        Duration::from_secs(self.expand_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        secs_to_duration(self.settle_delay_secs)
    }
}

/// Seconds as a `Duration`. NaN and negatives are zero; values too large to
/// represent (including infinity) saturate at `Duration::MAX`.
fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Extraction stage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Per-request timeout in seconds (0 = no timeout).
    pub timeout_secs: u64,
    /// Fixed delay after each request, in milliseconds.
    pub request_delay_ms: u64,
    /// Where the CLI writes the product table.
    pub output: PathBuf,
    /// Headers sent with every product page request.
    pub headers: BTreeMap<String, String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            request_delay_ms: 0,
            output: PathBuf::from(DEFAULT_PRODUCTS_FILE),
            headers: default_headers(),
        }
    }
}

impl ExtractionConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Replace the User-Agent header, whatever its current casing.
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.headers
            .retain(|name, _| !name.eq_ignore_ascii_case("user-agent"));
        self.headers
            .insert("User-Agent".to_string(), user_agent.into());
    }
}

fn default_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string());
    headers
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserEngineConfig,
    pub discovery: DiscoveryConfig,
    pub extraction: ExtractionConfig,
    pub selectors: SelectorConfig,

    /// File the configuration was loaded from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// Uses `explicit` if given, otherwise the first existing file among
    /// `./catalogscrape.toml` and `<config dir>/catalogscrape/config.toml`,
    /// otherwise defaults. Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file(Path::new("."), dirs::config_dir().as_deref()),
        };

        let config = match path {
            Some(path) => Self::load_from_path(&path)?,
            None => Self::default(),
        };

        Ok(config.with_env_overrides())
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_err = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents).map_err(|e| parse_err(e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&contents).map_err(|e| parse_err(e.to_string()))?
            }
            _ => serde_json::from_str(&contents).map_err(|e| parse_err(e.to_string()))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// - `BROWSER_URL`: remote Chrome DevTools URL
    /// - `CHROME_PATH`: browser executable
    /// - `CATALOGSCRAPE_USER_AGENT`: User-Agent for product page requests
    ///   (`impersonate` picks a real browser user agent)
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`. Empty values are ignored.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.browser = self.browser.with_overrides_from(&lookup);

        if let Some(val) = lookup("CATALOGSCRAPE_USER_AGENT").filter(|v| !v.is_empty()) {
            self.extraction.set_user_agent(resolve_user_agent(&val));
        }

        self
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// First existing config file: `<working_dir>/catalogscrape.toml`, then
/// `<config_dir>/catalogscrape/config.toml`.
fn find_config_file(working_dir: &Path, config_dir: Option<&Path>) -> Option<PathBuf> {
    let local = working_dir.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    config_dir
        .map(|dir| dir.join("catalogscrape").join("config.toml"))
        .filter(|p| p.is_file())
}

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default marketplace origin
pub const DEFAULT_BASE_URL: &str = "https://www.ebay.com";

/// Default store search page the discovery session starts from
pub const DEFAULT_SEED_URL: &str = "https://www.ebay.com/sch/garlandcomputer/m.html";

/// Browser-like user agent sent unless the config overrides it
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";

/// Main configuration structure for Facet-Sweep
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Target marketplace configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin that the session, customize and refine endpoints hang off
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Search page used to open the discovery session
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Refine aspect whose values become facets
    #[serde(rename = "facet-name")]
    pub facet_name: String,
}

impl SiteConfig {
    /// Endpoint that trades a session id for a currency token
    pub fn token_endpoint(&self) -> String {
        format!("{}/sch/ajax/customize", self.base_url.trim_end_matches('/'))
    }

    /// Form endpoint that applies the display/currency settings
    pub fn customize_endpoint(&self) -> String {
        format!("{}/sch/customize", self.base_url.trim_end_matches('/'))
    }

    /// Aggregation endpoint listing the available facet values
    pub fn refine_endpoint(&self) -> String {
        format!("{}/sch/ajax/refine", self.base_url.trim_end_matches('/'))
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            seed_url: DEFAULT_SEED_URL.to_string(),
            facet_name: "condition".to_string(),
        }
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving one `<item-id>.json` file per listing
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./result"),
        }
    }
}

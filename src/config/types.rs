use serde::Deserialize;

/// Main configuration structure for Shelfwatch
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Scraping proxy connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    /// Proxy scrape endpoint that accepts `{"url": ...}` requests
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Basic auth token sent with every request
    #[serde(rename = "auth-token", default)]
    pub auth_token: Option<String>,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Per-URL retry policy
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum fetch attempts for a single URL
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between attempts on the same URL (milliseconds)
    #[serde(rename = "retry-delay-ms", default)]
    pub retry_delay_ms: u64,
}

/// Batch pacing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchConfig {
    /// Pause between consecutive URLs (milliseconds); zero disables it
    #[serde(rename = "request-delay-ms", default)]
    pub request_delay_ms: u64,
}

/// Input spreadsheet location
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Path to the CSV sheet holding product URLs
    pub path: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database holding the output sheet
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// CSV export of the output sheet, written after each run
    #[serde(rename = "csv-path", default)]
    pub csv_path: Option<String>,

    /// Markdown run report, written after each run
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_ms: 0,
        }
    }
}

fn default_endpoint() -> String {
    "https://scraper-api.decodo.com/v2/scrape".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

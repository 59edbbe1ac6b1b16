use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Browser User-Agent sent with every request unless configured otherwise
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/121.0.0.0";

/// Targets surveyed when neither the config file nor the command line names any
pub const DEFAULT_TARGETS: &[&str] = &[
    "https://google.com",
    "https://golang.org",
    "https://github.com",
    "https://stackoverflow.com",
    "https://chatengine.io",
    "https://learn2earn.ng",
    "https://www.github.com/EmeditWeb",
    "https://leetcode.com",
];

/// Main configuration structure for Webpulse
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
    pub targets: TargetsConfig,
}

/// Fetch pipeline configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScraperConfig {
    /// Number of concurrent workers
    pub concurrency: usize,

    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,

    /// Total request attempts per URL, including the first
    pub max_attempts: u32,

    /// Base of the exponential backoff; attempt `i` is followed by `base^i` seconds
    pub backoff_base_secs: u64,

    /// User-Agent header value
    pub user_agent: String,

    /// Pipeline-wide deadline (seconds); 0 disables it
    pub deadline_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            concurrency: 20,
            request_timeout_secs: 15,
            max_attempts: 3,
            backoff_base_secs: 2,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            deadline_secs: 0,
        }
    }
}

impl ScraperConfig {
    /// Per-request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Pipeline deadline, if one is configured
    pub fn deadline(&self) -> Option<Duration> {
        (self.deadline_secs > 0).then(|| Duration::from_secs(self.deadline_secs))
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the JSON report
    pub results_path: PathBuf,

    /// Path to the plain-text summary
    pub summary_path: PathBuf,

    /// Optional log file the event stream is appended to
    pub log_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: PathBuf::from("results.json"),
            summary_path: PathBuf::from("summary.txt"),
            log_path: None,
        }
    }
}

/// Target list
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// URLs to survey; the scheme may be omitted
    pub urls: Vec<String>,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            urls: DEFAULT_TARGETS.iter().map(|u| u.to_string()).collect(),
        }
    }
}

use serde::Deserialize;
use std::time::Duration;

/// Browser-like user agent sent when the config does not name one
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for Course-Mirror
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mirror: MirrorConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// What to mirror and where to put it
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    /// Listing page holding the batch items
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Root of the local folder tree
    #[serde(rename = "output-dir")]
    pub output_dir: String,

    /// Pause between two batches (milliseconds)
    #[serde(rename = "inter-batch-delay-ms", default = "default_inter_batch_delay_ms")]
    pub inter_batch_delay_ms: u64,
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Total attempts per URL, including the first one
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed pause between two attempts (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Per-attempt timeout (milliseconds)
    #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Skip TLS certificate validation for the mirrored origin
    #[serde(rename = "accept-invalid-certs", default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
}

impl Config {
    /// Builds a configuration with default fetch and pacing settings
    pub fn new(root_url: impl Into<String>, output_dir: impl Into<String>) -> Self {
        Self {
            mirror: MirrorConfig {
                root_url: root_url.into(),
                output_dir: output_dir.into(),
                inter_batch_delay_ms: default_inter_batch_delay_ms(),
            },
            fetch: FetchConfig::default(),
        }
    }
}

impl MirrorConfig {
    pub fn inter_batch_delay(&self) -> Duration {
        Duration::from_millis(self.inter_batch_delay_ms)
    }
}

impl FetchConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            accept_invalid_certs: default_accept_invalid_certs(),
        }
    }
}

fn default_inter_batch_delay_ms() -> u64 {
    1000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    2000
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_accept_invalid_certs() -> bool {
    true
}

//! Course-Mirror: an offline mirror for a batch/chapter course site
//!
//! This crate walks a course listing (batches → chapters → lecture/notes views),
//! fetches every page with bounded retries, and rebuilds the hierarchy as a
//! static folder tree with generated navigation pages that work offline.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Course-Mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// A fetch that failed on every attempt
#[derive(Debug, Error)]
#[error("Failed to fetch {url} after {attempts} attempt(s): {last_error}")]
pub struct FetchError {
    pub url: String,
    pub attempts: u32,
    pub last_error: String,
}

/// Why a single listing item could not be turned into a record
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("item has no name")]
    MissingName,

    #[error("item has no link")]
    MissingLink,

    #[error("invalid link '{href}': {source}")]
    InvalidLink {
        href: String,
        source: ::url::ParseError,
    },

    #[error("card has no recognizable content")]
    EmptyCard,
}

/// Result type alias for Course-Mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{mirror, Fetcher, TreeMaterializer};
pub use model::{BatchRecord, ChapterRecord, ChapterStats, View};
pub use output::{sanitize, RunStatus, RunSummary};
pub use crate::url::derive_view_url;

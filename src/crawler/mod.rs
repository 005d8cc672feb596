//! Crawler module for mirroring the course site
//!
//! This module contains the core mirroring logic, including:
//! - HTTP fetching with retry logic
//! - Batch and chapter extraction from listing pages
//! - Top-down materialization of the local folder tree

mod extractor;
mod fetcher;
mod materializer;

pub use extractor::{
    extract_batches, extract_chapters, first_number, handler_target, Extraction, UNKNOWN_CHAPTER,
};
pub use fetcher::{build_http_client, AttemptError, Fetcher};
pub use materializer::{run_mirror, TreeMaterializer};

use crate::config::Config;
use crate::output::RunSummary;
use crate::MirrorError;

/// Runs a complete mirror operation
///
/// This is the main entry point for mirroring. It will:
/// 1. Fetch the root listing and extract batches
/// 2. Write the root navigation page
/// 3. For each batch, snapshot its page, extract chapters and write its
///    navigation page
/// 4. For each chapter, snapshot the Lectures and Notes views
///
/// # Arguments
///
/// * `config` - The mirror configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - Run finished (possibly with per-item failures)
/// * `Err(MirrorError)` - Setup failed before traversal could start
pub async fn mirror(config: &Config) -> Result<RunSummary, MirrorError> {
    run_mirror(config).await
}

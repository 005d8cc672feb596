//! Tree materializer - main mirror orchestration logic
//!
//! Walks the site top-down and rebuilds it on disk:
//!
//! ```text
//! <output>/index.html                                 generated
//! <output>/<Batch>/index.html                         generated
//! <output>/<Batch>/batch_details.html                 snapshot
//! <output>/<Batch>/<Chapter>/Lectures/index.html      snapshot
//! <output>/<Batch>/<Chapter>/Notes/index.html         snapshot
//! ```
//!
//! Processing is sequential. Failures below the root are logged, counted in
//! the [`RunSummary`], and surface only as missing files.

use crate::config::{validate, Config};
use crate::crawler::extractor::{extract_batches, extract_chapters};
use crate::crawler::fetcher::Fetcher;
use crate::model::View;
use crate::output::{
    ensure_dir, render_batch_index, render_root_index, save_html, BatchEntry, ChapterEntry,
    FolderAllocator, RunStatus, RunSummary, BATCH_DETAILS_FILE, INDEX_FILE,
};
use crate::url::derive_view_url;
use crate::{FetchError, MirrorError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Main mirror orchestrator
pub struct TreeMaterializer {
    fetcher: Fetcher,
    root_url: Url,
    output_dir: PathBuf,
    inter_batch_delay: Duration,
    summary: RunSummary,
}

impl TreeMaterializer {
    /// Creates a materializer from a configuration
    ///
    /// # Returns
    ///
    /// * `Ok(TreeMaterializer)` - Ready to run
    /// * `Err(MirrorError)` - Invalid configuration or HTTP client failure
    pub fn new(config: &Config) -> Result<Self, MirrorError> {
        validate(config)?;

        Ok(Self {
            fetcher: Fetcher::new(&config.fetch)?,
            root_url: Url::parse(&config.mirror.root_url)?,
            output_dir: PathBuf::from(&config.mirror.output_dir),
            inter_batch_delay: config.mirror.inter_batch_delay(),
            summary: RunSummary::new(),
        })
    }

    /// Runs the full traversal and returns the run summary
    ///
    /// Only setup failures (creating the output root) are returned as
    /// errors. An empty or unreachable root listing ends the run with
    /// [`RunStatus::NoContent`].
    pub async fn run(mut self) -> Result<RunSummary, MirrorError> {
        ensure_dir(&self.output_dir)?;

        let root_url = self.root_url.clone();
        tracing::info!("Fetching batches from: {}", root_url);

        let batches = match self.fetch(&root_url).await {
            Ok(html) => {
                let extraction = extract_batches(&html, &root_url);
                self.summary.items_skipped += extraction.skipped as u64;
                extraction.records
            }
            Err(_) => Vec::new(),
        };

        if batches.is_empty() {
            tracing::info!("No batches found at {}", root_url);
            self.summary.finish(RunStatus::NoContent);
            return Ok(self.summary);
        }

        tracing::info!("Found {} batches", batches.len());
        self.summary.batches_found = batches.len() as u64;

        let mut folders = FolderAllocator::new("Batch").reserve(INDEX_FILE);
        let entries: Vec<BatchEntry<'_>> = batches
            .iter()
            .enumerate()
            .map(|(i, record)| BatchEntry {
                record,
                folder: folders.allocate(&record.name, i + 1),
            })
            .collect();

        let root_index = self.output_dir.join(INDEX_FILE);
        self.write_page(&render_root_index(&entries), &root_index);

        for (i, entry) in entries.iter().enumerate() {
            if let Err(e) = self.process_batch(entry).await {
                tracing::error!("Error processing batch {}: {}", entry.record.name, e);
                self.summary.batches_failed += 1;
            }

            if i + 1 < entries.len() && !self.inter_batch_delay.is_zero() {
                tokio::time::sleep(self.inter_batch_delay).await;
            }
        }

        self.summary.finish(RunStatus::Completed);
        tracing::info!(
            "Mirror completed: {} batches, {} chapters, {} pages written",
            self.summary.batches_found,
            self.summary.chapters_found,
            self.summary.pages_written
        );

        Ok(self.summary)
    }

    /// Mirrors one batch: snapshot, chapter extraction, index, chapters
    async fn process_batch(&mut self, entry: &BatchEntry<'_>) -> Result<(), MirrorError> {
        let batch_dir = self.output_dir.join(&entry.folder);
        ensure_dir(&batch_dir)?;

        tracing::info!("Processing batch: {}", entry.record.name);
        tracing::debug!("Folder: {}", batch_dir.display());

        let chapters = match self.fetch(&entry.record.link).await {
            Ok(html) => {
                self.write_page(&html, &batch_dir.join(BATCH_DETAILS_FILE));
                let extraction = extract_chapters(&html, &entry.record.link);
                self.summary.items_skipped += extraction.skipped as u64;
                extraction.records
            }
            Err(_) => Vec::new(),
        };

        self.summary.chapters_found += chapters.len() as u64;

        let mut folders = FolderAllocator::new("Chapter")
            .reserve(INDEX_FILE)
            .reserve(BATCH_DETAILS_FILE);
        let chapter_entries: Vec<ChapterEntry<'_>> = chapters
            .iter()
            .enumerate()
            .map(|(i, record)| ChapterEntry {
                record,
                folder: folders.allocate(&record.name, i + 1),
            })
            .collect();

        self.write_page(
            &render_batch_index(entry.record, &chapter_entries),
            &batch_dir.join(INDEX_FILE),
        );

        for chapter in &chapter_entries {
            if let Err(e) = self.process_chapter(chapter, &batch_dir).await {
                tracing::error!("Error processing chapter {}: {}", chapter.record.name, e);
                self.summary.chapters_failed += 1;
            }
        }

        Ok(())
    }

    /// Mirrors one chapter's Lectures and Notes views
    ///
    /// Both view folders are created even when the chapter has no link.
    async fn process_chapter(
        &mut self,
        entry: &ChapterEntry<'_>,
        batch_dir: &Path,
    ) -> Result<(), MirrorError> {
        let chapter_dir = batch_dir.join(&entry.folder);
        ensure_dir(&chapter_dir)?;

        tracing::info!("  Processing chapter: {}", entry.record.name);

        let link = entry.record.link.as_ref();
        if link.is_none() {
            tracing::warn!(
                "  Chapter '{}' has no link; view folders left empty",
                entry.record.name
            );
            self.summary.chapters_without_link += 1;
        }

        for view in View::ALL {
            let view_dir = chapter_dir.join(view.folder_name());
            if let Err(e) = ensure_dir(&view_dir) {
                tracing::error!("{}", e);
                self.summary.write_failures += 1;
                continue;
            }

            if let Some(link) = link {
                let view_url = derive_view_url(link, view);
                if let Ok(html) = self.fetch(&view_url).await {
                    self.write_page(&html, &view_dir.join(INDEX_FILE));
                }
            }
        }

        Ok(())
    }

    async fn fetch(&mut self, url: &Url) -> Result<String, FetchError> {
        let result = self.fetcher.fetch(url).await;
        self.summary.record_fetch(&result);
        result
    }

    fn write_page(&mut self, content: &str, path: &Path) -> bool {
        let result = save_html(content, path);
        self.summary.record_write(&result);

        match result {
            Ok(()) => {
                tracing::info!("Saved {}", path.display());
                true
            }
            Err(e) => {
                tracing::error!("Error saving page: {}", e);
                false
            }
        }
    }
}

/// Runs a complete mirror operation
///
/// # Example
///
/// ```no_run
/// use course_mirror::config::load_config;
/// use course_mirror::crawler::run_mirror;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("mirror.toml"))?;
/// let summary = run_mirror(&config).await?;
/// println!("{} pages written", summary.pages_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_mirror(config: &Config) -> Result<RunSummary, MirrorError> {
    TreeMaterializer::new(config)?.run().await
}

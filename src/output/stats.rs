//! End-of-run summary for a mirror run
//!
//! Failures below the root never abort a run; they are counted here so the
//! CLI can report them after the interleaved log lines.

use chrono::{DateTime, Utc};

/// How a mirror run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every batch was processed (some items may still have failed)
    Completed,
    /// The root listing yielded no batches
    NoContent,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::NoContent => "no content found",
        }
    }
}

/// Counters collected while materializing the mirror
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    pub batches_found: u64,
    pub batches_failed: u64,

    pub chapters_found: u64,
    pub chapters_failed: u64,
    pub chapters_without_link: u64,

    /// Listing items dropped during extraction
    pub items_skipped: u64,

    pub fetches_succeeded: u64,
    pub fetches_failed: u64,

    pub pages_written: u64,
    pub write_failures: u64,
}

impl RunSummary {
    /// Starts a summary clocked from now
    pub fn new() -> Self {
        Self {
            status: RunStatus::Completed,
            started_at: Utc::now(),
            finished_at: None,
            batches_found: 0,
            batches_failed: 0,
            chapters_found: 0,
            chapters_failed: 0,
            chapters_without_link: 0,
            items_skipped: 0,
            fetches_succeeded: 0,
            fetches_failed: 0,
            pages_written: 0,
            write_failures: 0,
        }
    }

    /// Stamps the finish time and final status
    pub fn finish(&mut self, status: RunStatus) {
        self.status = status;
        self.finished_at = Some(Utc::now());
    }

    pub fn record_fetch<T, E>(&mut self, result: &Result<T, E>) {
        match result {
            Ok(_) => self.fetches_succeeded += 1,
            Err(_) => self.fetches_failed += 1,
        }
    }

    pub fn record_write<T, E>(&mut self, result: &Result<T, E>) {
        match result {
            Ok(_) => self.pages_written += 1,
            Err(_) => self.write_failures += 1,
        }
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    pub fn total_fetches(&self) -> u64 {
        self.fetches_succeeded + self.fetches_failed
    }

    /// True when anything was lost: a fetch, a write, a batch or a chapter
    pub fn has_failures(&self) -> bool {
        self.fetches_failed > 0
            || self.write_failures > 0
            || self.batches_failed > 0
            || self.chapters_failed > 0
    }

    /// Share of successful fetches as a percentage
    pub fn fetch_success_rate(&self) -> f64 {
        let total = self.total_fetches();
        if total == 0 {
            return 0.0;
        }
        (self.fetches_succeeded as f64 / total as f64) * 100.0
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Mirror Summary ===\n");

    println!("Status: {}", summary.status.as_str());
    println!("Started: {}", summary.started_at.to_rfc3339());
    if let Some(finished) = summary.finished_at {
        println!("Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = summary.duration_seconds() {
        println!("Duration: {} seconds", duration);
    }
    println!();

    println!("Tree:");
    println!(
        "  Batches: {} found, {} failed",
        summary.batches_found, summary.batches_failed
    );
    println!(
        "  Chapters: {} found, {} failed, {} without link",
        summary.chapters_found, summary.chapters_failed, summary.chapters_without_link
    );
    if summary.items_skipped > 0 {
        println!("  Items skipped during extraction: {}", summary.items_skipped);
    }
    println!();

    println!("I/O:");
    println!(
        "  Fetches: {} succeeded, {} failed ({:.1}% success)",
        summary.fetches_succeeded,
        summary.fetches_failed,
        summary.fetch_success_rate()
    );
    println!(
        "  Pages: {} written, {} failed writes",
        summary.pages_written, summary.write_failures
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_summary_is_clean() {
        let summary = RunSummary::new();
        assert_eq!(summary.status, RunStatus::Completed);
        assert!(summary.finished_at.is_none());
        assert!(!summary.has_failures());
        assert_eq!(summary.fetch_success_rate(), 0.0);
    }

    #[test]
    fn test_record_fetch_and_write() {
        let mut summary = RunSummary::new();
        summary.record_fetch(&Ok::<_, ()>(()));
        summary.record_fetch(&Ok::<_, ()>(()));
        summary.record_fetch(&Err::<(), _>("boom"));
        summary.record_write(&Ok::<_, ()>(()));
        summary.record_write(&Err::<(), _>("disk full"));

        assert_eq!(summary.fetches_succeeded, 2);
        assert_eq!(summary.fetches_failed, 1);
        assert_eq!(summary.pages_written, 1);
        assert_eq!(summary.write_failures, 1);
        assert!(summary.has_failures());
        assert!((summary.fetch_success_rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_finish_sets_status_and_duration() {
        let mut summary = RunSummary::new();
        summary.finish(RunStatus::NoContent);

        assert_eq!(summary.status, RunStatus::NoContent);
        assert!(summary.finished_at.is_some());
        assert!(summary.duration_seconds().unwrap() >= 0);
    }

    #[test]
    fn test_linkless_chapters_are_not_failures() {
        let mut summary = RunSummary::new();
        summary.chapters_without_link = 3;
        summary.items_skipped = 1;
        assert!(!summary.has_failures());
    }
}

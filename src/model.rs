//! Records extracted from the course site
//!
//! Records are built once by the extractor and never mutated afterwards.
//! Folder names used for rendering live in separate view structs owned by
//! the materializer.

use std::fmt;
use url::Url;

/// A top-level course grouping from the root listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRecord {
    /// Human-readable batch title
    pub name: String,

    /// Canonical remote page for the batch
    pub link: Url,

    /// Cover image, resolved to an absolute URL
    pub image: Option<Url>,
}

/// A subdivision of a batch holding lectures and notes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRecord {
    /// Chapter title, `Unknown Chapter` when the card has none
    pub name: String,

    /// Canonical chapter page; `None` disables lecture/notes traversal
    pub link: Option<Url>,

    /// Cover image, resolved to an absolute URL
    pub image: Option<Url>,

    /// Counters shown on the chapter card
    pub stats: ChapterStats,
}

/// Video and note counters of a chapter card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChapterStats {
    pub videos: u64,
    pub notes: u64,
}

/// Content mode of a chapter page, selected by the `view` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Lectures,
    Notes,
}

impl View {
    /// Both views in the order they are mirrored
    pub const ALL: [View; 2] = [View::Lectures, View::Notes];

    /// Value of the `view` query parameter
    pub fn query_value(&self) -> &'static str {
        match self {
            View::Lectures => "lectures",
            View::Notes => "notes",
        }
    }

    /// Name of the chapter subdirectory holding this view
    pub fn folder_name(&self) -> &'static str {
        match self {
            View::Lectures => "Lectures",
            View::Notes => "Notes",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_value())
    }
}

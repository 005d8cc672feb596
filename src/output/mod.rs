//! Output module for writing the mirror tree
//!
//! This module handles:
//! - Turning page titles into unique, filesystem-safe folder names
//! - Rendering the generated navigation pages
//! - Persisting pages to disk
//! - Summarizing a run

mod naming;
pub mod stats;
mod templates;
mod writer;

pub use naming::{sanitize, FolderAllocator, MAX_NAME_CHARS};
pub use stats::{print_summary, RunStatus, RunSummary};
pub use templates::{
    encode_segment, escape_html, render_batch_index, render_root_index, BatchEntry, ChapterEntry,
};
pub use writer::{ensure_dir, save_html};

/// File name of every generated or snapshotted index page
pub const INDEX_FILE: &str = "index.html";

/// File name of the verbatim batch page snapshot
pub const BATCH_DETAILS_FILE: &str = "batch_details.html";

//! Record extraction from the course site's listing pages
//!
//! Two rules operate over parsed HTML:
//! - batch items on the root listing (`div.batch-item`)
//! - chapter cards on a batch page (`div.chapter-card`)
//!
//! Each item is extracted in isolation. A malformed item is logged and
//! skipped; it never aborts the rest of the list.

use crate::model::{BatchRecord, ChapterRecord, ChapterStats};
use crate::url::{resolve_image, resolve_link};
use crate::ExtractError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

/// Name given to chapter cards without a title
pub const UNKNOWN_CHAPTER: &str = "Unknown Chapter";

static BATCH_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("div.batch-item"));
static BATCH_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h3.batch-title"));
static STUDY_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a.study-btn[href]"));
static BATCH_IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("img.batch-image[src]"));

static CHAPTER_CARD: LazyLock<Selector> = LazyLock::new(|| selector("div.chapter-card"));
static CHAPTER_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h3.chapter-title"));
static ANY_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static STAT_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("div.stats div.stat-item"));
static CHAPTER_IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("img.chapter-image[src]"));

static HANDLER_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"window\.location\.href='([^']+)'").expect("hardcoded regex pattern is valid")
});
static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("hardcoded regex pattern is valid"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("hardcoded selector is valid")
}

/// Records pulled from one page, plus how many items were dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

impl<T> Default for Extraction<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }
}

/// Extracts every batch item from the root listing page
///
/// # Rules
///
/// - Name: `data-batch-name` attribute, else `h3.batch-title` text;
///   items with neither are skipped
/// - Link: `a.study-btn` href resolved against `page_url`; required
/// - Image: `img.batch-image` src resolved against `page_url`; optional
///
/// # Example
///
/// ```
/// use course_mirror::crawler::extract_batches;
/// use url::Url;
///
/// let html = r#"<div class="batch-item" data-batch-name="Physics 101">
///     <a class="study-btn" href="batch.php?id=1">Study</a></div>"#;
/// let page = Url::parse("https://example.com/kdlive/").unwrap();
/// let batches = extract_batches(html, &page);
/// assert_eq!(batches.records[0].link.as_str(), "https://example.com/kdlive/batch.php?id=1");
/// ```
pub fn extract_batches(html: &str, page_url: &Url) -> Extraction<BatchRecord> {
    let document = Html::parse_document(html);
    let mut extraction = Extraction::default();

    for (index, element) in document.select(&BATCH_ITEM).enumerate() {
        match extract_batch(element, page_url) {
            Ok(record) => extraction.records.push(record),
            Err(e) => {
                tracing::warn!("Skipping batch item #{} on {}: {}", index + 1, page_url, e);
                extraction.skipped += 1;
            }
        }
    }

    extraction
}

fn extract_batch(element: ElementRef<'_>, page_url: &Url) -> Result<BatchRecord, ExtractError> {
    let name = element
        .value()
        .attr("data-batch-name")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| first_text(element, &BATCH_TITLE))
        .ok_or(ExtractError::MissingName)?;

    let href = element
        .select(&STUDY_LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or(ExtractError::MissingLink)?;
    let link = resolve_link(href, page_url)?.ok_or(ExtractError::MissingLink)?;

    Ok(BatchRecord {
        name,
        link,
        image: first_image(element, &BATCH_IMAGE, page_url),
    })
}

/// Extracts every chapter card from a batch page
///
/// # Rules
///
/// - Name: `h3.chapter-title` text, else [`UNKNOWN_CHAPTER`]
/// - Link: legacy handler target, else first anchor href; absent when
///   neither resolves
/// - Stats: `div.stats div.stat-item` counters labeled "Videos"/"Notes"
/// - Image: `img.chapter-image` src; optional
///
/// Cards with none of the above are skipped.
pub fn extract_chapters(html: &str, page_url: &Url) -> Extraction<ChapterRecord> {
    let document = Html::parse_document(html);
    let mut extraction = Extraction::default();

    for (index, element) in document.select(&CHAPTER_CARD).enumerate() {
        match extract_chapter(element, page_url) {
            Ok(record) => extraction.records.push(record),
            Err(e) => {
                tracing::warn!("Skipping chapter card #{} on {}: {}", index + 1, page_url, e);
                extraction.skipped += 1;
            }
        }
    }

    extraction
}

fn extract_chapter(element: ElementRef<'_>, page_url: &Url) -> Result<ChapterRecord, ExtractError> {
    let title = first_text(element, &CHAPTER_TITLE);
    let link = handler_link(element, page_url).or_else(|| anchor_link(element, page_url));
    let (stats, has_stats) = chapter_stats(element);
    let image = first_image(element, &CHAPTER_IMAGE, page_url);

    if title.is_none() && link.is_none() && !has_stats && image.is_none() {
        return Err(ExtractError::EmptyCard);
    }

    Ok(ChapterRecord {
        name: title.unwrap_or_else(|| UNKNOWN_CHAPTER.to_string()),
        link,
        image,
        stats,
    })
}

/// Legacy-handler strategy: the card's `onclick` navigation target
fn handler_link(element: ElementRef<'_>, page_url: &Url) -> Option<Url> {
    let handler = element.value().attr("onclick")?;
    let target = handler_target(handler)?;
    resolve_quietly(target, page_url)
}

/// Pulls the URL literal out of `window.location.href='<url>'`
pub fn handler_target(handler: &str) -> Option<&str> {
    HANDLER_TARGET
        .captures(handler)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Anchor strategy: the first anchor whose href resolves to a page
fn anchor_link(element: ElementRef<'_>, page_url: &Url) -> Option<Url> {
    element
        .select(&ANY_LINK)
        .filter_map(|a| a.value().attr("href"))
        .find_map(|href| resolve_quietly(href, page_url))
}

fn resolve_quietly(href: &str, page_url: &Url) -> Option<Url> {
    match resolve_link(href, page_url) {
        Ok(link) => link,
        Err(e) => {
            tracing::debug!("Ignoring chapter link on {}: {}", page_url, e);
            None
        }
    }
}

/// Reads the labeled counters; the flag reports whether any stat item exists
fn chapter_stats(element: ElementRef<'_>) -> (ChapterStats, bool) {
    let mut stats = ChapterStats::default();
    let mut found = false;

    for item in element.select(&STAT_ITEM) {
        found = true;
        let text: String = item.text().collect();
        if text.contains("Videos") {
            stats.videos = first_number(&text);
        } else if text.contains("Notes") {
            stats.notes = first_number(&text);
        }
    }

    (stats, found)
}

/// First run of ASCII digits in `text`, or 0 when absent
///
/// Counters too large for a `u64` saturate at `u64::MAX`.
pub fn first_number(text: &str) -> u64 {
    FIRST_NUMBER
        .find(text)
        .map(|m| m.as_str().parse().unwrap_or(u64::MAX))
        .unwrap_or(0)
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

fn first_image(element: ElementRef<'_>, selector: &Selector, page_url: &Url) -> Option<Url> {
    element
        .select(selector)
        .next()
        .and_then(|img| img.value().attr("src"))
        .and_then(|src| resolve_image(src, page_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_url() -> Url {
        Url::parse("https://example.com/kdlive/").unwrap()
    }

    fn batch_url() -> Url {
        Url::parse("https://example.com/kdlive/batch.php?id=1").unwrap()
    }

    #[test]
    fn test_three_good_batches_one_malformed() {
        let html = r#"
            <html><body>
            <div class="batch-item" data-batch-name="Physics 101">
                <img class="batch-image" src="img/physics.png">
                <a class="study-btn" href="batch.php?id=1">Study</a>
            </div>
            <div class="batch-item">
                <h3 class="batch-title">  Chemistry  </h3>
                <a class="study-btn" href="/kdlive/batch.php?id=2">Study</a>
            </div>
            <div class="batch-item">
                <h3 class="batch-title">Broken</h3>
                <span>no study button here</span>
            </div>
            <div class="batch-item" data-batch-name="Maths">
                <a class="study-btn" href="https://other.example.com/batch/3">Study</a>
            </div>
            </body></html>
        "#;

        let extraction = extract_batches(html, &root_url());

        assert_eq!(extraction.records.len(), 3);
        assert_eq!(extraction.skipped, 1);

        let physics = &extraction.records[0];
        assert_eq!(physics.name, "Physics 101");
        assert_eq!(physics.link.as_str(), "https://example.com/kdlive/batch.php?id=1");
        assert_eq!(
            physics.image.as_ref().map(Url::as_str),
            Some("https://example.com/kdlive/img/physics.png")
        );

        let chemistry = &extraction.records[1];
        assert_eq!(chemistry.name, "Chemistry");
        assert!(chemistry.image.is_none());

        assert_eq!(
            extraction.records[2].link.as_str(),
            "https://other.example.com/batch/3"
        );
    }

    #[test]
    fn test_batch_data_attribute_wins_over_title() {
        let html = r#"<div class="batch-item" data-batch-name="From Attr">
            <h3 class="batch-title">From Title</h3>
            <a class="study-btn" href="b">Go</a></div>"#;
        let extraction = extract_batches(html, &root_url());
        assert_eq!(extraction.records[0].name, "From Attr");
    }

    #[test]
    fn test_blank_data_attribute_falls_back_to_title() {
        let html = r#"<div class="batch-item" data-batch-name="  ">
            <h3 class="batch-title">From Title</h3>
            <a class="study-btn" href="b">Go</a></div>"#;
        let extraction = extract_batches(html, &root_url());
        assert_eq!(extraction.records[0].name, "From Title");
    }

    #[test]
    fn test_batch_without_name_is_skipped() {
        let html = r#"<div class="batch-item"><a class="study-btn" href="b">Go</a></div>"#;
        let extraction = extract_batches(html, &root_url());
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.skipped, 1);
    }

    #[test]
    fn test_batch_with_javascript_link_is_skipped() {
        let html = r#"<div class="batch-item" data-batch-name="JS">
            <a class="study-btn" href="javascript:void(0)">Go</a></div>"#;
        let extraction = extract_batches(html, &root_url());
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.skipped, 1);
    }

    #[test]
    fn test_no_batches_on_page() {
        let extraction = extract_batches("<html><body><p>Nothing</p></body></html>", &root_url());
        assert_eq!(extraction, Extraction::default());
    }

    #[test]
    fn test_chapter_stats_parsed() {
        let html = r#"<div class="chapter-card">
            <h3 class="chapter-title">Ch 1: Motion</h3>
            <div class="stats">
                <div class="stat-item"><i class="icon"></i> 12 Videos</div>
                <div class="stat-item">5 Notes</div>
            </div></div>"#;
        let extraction = extract_chapters(html, &batch_url());
        assert_eq!(
            extraction.records[0].stats,
            ChapterStats { videos: 12, notes: 5 }
        );
    }

    #[test]
    fn test_chapter_stats_without_digits() {
        let html = r#"<div class="chapter-card">
            <h3 class="chapter-title">Ch 2</h3>
            <div class="stats">
                <div class="stat-item">Videos</div>
                <div class="stat-item">Notes pending</div>
            </div></div>"#;
        let extraction = extract_chapters(html, &batch_url());
        assert_eq!(extraction.records[0].stats, ChapterStats { videos: 0, notes: 0 });
    }

    #[test]
    fn test_chapter_link_from_handler() {
        let html = r#"<div class="chapter-card"
                onclick="window.location.href='chapter.php?id=7&amp;batch=1'">
            <h3 class="chapter-title">Ch 7</h3>
            <a href="fallback.php">ignored</a></div>"#;
        let extraction = extract_chapters(html, &batch_url());
        assert_eq!(
            extraction.records[0].link.as_ref().map(Url::as_str),
            Some("https://example.com/kdlive/chapter.php?id=7&batch=1")
        );
    }

    #[test]
    fn test_chapter_link_falls_back_to_anchor() {
        let html = r#"<div class="chapter-card" onclick="doSomethingElse()">
            <h3 class="chapter-title">Ch 8</h3>
            <a href="javascript:void(0)">noop</a>
            <a href="chapter.php?id=8">open</a></div>"#;
        let extraction = extract_chapters(html, &batch_url());
        assert_eq!(
            extraction.records[0].link.as_ref().map(Url::as_str),
            Some("https://example.com/kdlive/chapter.php?id=8")
        );
    }

    #[test]
    fn test_chapter_without_link_survives() {
        let html = r#"<div class="chapter-card">
            <h3 class="chapter-title">Ch 9</h3>
            <img class="chapter-image" src="//cdn.example.com/ch9.png"></div>"#;
        let extraction = extract_chapters(html, &batch_url());
        let chapter = &extraction.records[0];
        assert!(chapter.link.is_none());
        assert_eq!(
            chapter.image.as_ref().map(Url::as_str),
            Some("https://cdn.example.com/ch9.png")
        );
    }

    #[test]
    fn test_chapter_without_title_gets_placeholder() {
        let html = r#"<div class="chapter-card"><a href="c.php?id=1">open</a></div>"#;
        let extraction = extract_chapters(html, &batch_url());
        assert_eq!(extraction.records[0].name, UNKNOWN_CHAPTER);
    }

    #[test]
    fn test_empty_chapter_card_is_skipped() {
        let html = r#"
            <div class="chapter-card"><span>coming soon</span></div>
            <div class="chapter-card"><h3 class="chapter-title">Real</h3></div>"#;
        let extraction = extract_chapters(html, &batch_url());
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].name, "Real");
        assert_eq!(extraction.skipped, 1);
    }

    #[test]
    fn test_handler_target() {
        assert_eq!(
            handler_target("window.location.href='chapter.php?id=1'"),
            Some("chapter.php?id=1")
        );
        assert_eq!(
            handler_target("event.stopPropagation(); window.location.href='/a/b'; return false;"),
            Some("/a/b")
        );
        assert_eq!(handler_target("window.location.href=\"x\""), None);
        assert_eq!(handler_target("openChapter(3)"), None);
    }

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("12 Videos"), 12);
        assert_eq!(first_number("Notes: 5 (3 new)"), 5);
        assert_eq!(first_number("Videos"), 0);
    }

    #[test]
    fn test_first_number_large_counters() {
        assert_eq!(first_number("99999999999 Videos"), 99_999_999_999);
        assert_eq!(
            first_number("123456789012345678901234567890 Notes"),
            u64::MAX
        );
    }
}

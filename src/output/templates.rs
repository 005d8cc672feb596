//! Navigation page generation
//!
//! Renders the root and per-batch `index.html` pages from extracted records.
//! Names are HTML-escaped and folder names are percent-encoded in hrefs so
//! the pages open straight from disk.

use crate::model::{BatchRecord, ChapterRecord, View};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters that must be escaped inside one relative path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A batch paired with the folder it is mirrored into
#[derive(Debug, Clone)]
pub struct BatchEntry<'a> {
    pub record: &'a BatchRecord,
    pub folder: String,
}

/// A chapter paired with the folder it is mirrored into
#[derive(Debug, Clone)]
pub struct ChapterEntry<'a> {
    pub record: &'a ChapterRecord,
    pub folder: String,
}

const BASE_STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }
        .header { text-align: center; margin-bottom: 30px; }
        .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(300px, 1fr)); gap: 20px; }
        .card { background: white; border-radius: 10px; overflow: hidden; box-shadow: 0 4px 8px rgba(0,0,0,0.1); }
        .card-image { width: 100%; height: 180px; object-fit: cover; }
        .card-content { padding: 15px; }
        .card-title { margin-top: 0; color: #333; }
        .button { display: block; text-align: center; padding: 10px; background: #4CAF50; color: white; text-decoration: none; border-radius: 5px; }
        .back-btn { display: inline-block; margin-bottom: 20px; padding: 10px 15px; background: #4CAF50; color: white; text-decoration: none; border-radius: 5px; }
        .chapter-stats { display: flex; justify-content: space-between; margin: 10px 0; }
        .stat { background: #f0f0f0; padding: 5px 10px; border-radius: 15px; font-size: 14px; }
        .chapter-links { display: flex; gap: 10px; }
        .chapter-links .button { flex: 1; }
"#;

/// Renders the root page listing every batch
pub fn render_root_index(batches: &[BatchEntry<'_>]) -> String {
    let mut cards = String::new();

    for entry in batches {
        let name = escape_html(&entry.record.name);
        cards.push_str("        <div class=\"card\">\n");
        push_image(&mut cards, entry.record.image.as_ref(), &name);
        cards.push_str(&format!(
            "            <div class=\"card-content\">\n                <h3 class=\"card-title\">{}</h3>\n                <a href=\"{}/index.html\" class=\"button\">Open Batch</a>\n            </div>\n",
            name,
            encode_segment(&entry.folder)
        ));
        cards.push_str("        </div>\n");
    }

    page(
        "All Batches",
        "",
        "<h1>All Batches</h1>\n        <p>Select a batch to view its contents</p>",
        &cards,
    )
}

/// Renders a batch page listing its chapters and their two views
pub fn render_batch_index(batch: &BatchRecord, chapters: &[ChapterEntry<'_>]) -> String {
    let batch_name = escape_html(&batch.name);
    let mut cards = String::new();

    for entry in chapters {
        let name = escape_html(&entry.record.name);
        let folder = encode_segment(&entry.folder);

        cards.push_str("        <div class=\"card\">\n");
        push_image(&mut cards, entry.record.image.as_ref(), &name);
        cards.push_str(&format!(
            "            <div class=\"card-content\">\n                <h3 class=\"card-title\">{}</h3>\n                <div class=\"chapter-stats\">\n                    <span class=\"stat\">{} Videos</span>\n                    <span class=\"stat\">{} Notes</span>\n                </div>\n                <div class=\"chapter-links\">\n",
            name, entry.record.stats.videos, entry.record.stats.notes
        ));
        for view in View::ALL {
            cards.push_str(&format!(
                "                    <a href=\"{}/{}/index.html\" class=\"button\">{}</a>\n",
                folder,
                view.folder_name(),
                view.folder_name()
            ));
        }
        cards.push_str("                </div>\n            </div>\n        </div>\n");
    }

    page(
        &batch_name,
        "    <a href=\"../index.html\" class=\"back-btn\">&larr; Back to All Batches</a>\n",
        &format!(
            "<h1>{}</h1>\n        <p>Select a chapter to view lectures and notes</p>",
            batch_name
        ),
        &cards,
    )
}

fn page(title: &str, nav: &str, header: &str, cards: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}    </style>
</head>
<body>
{nav}    <div class="header">
        {header}
    </div>
    <div class="grid">
{cards}    </div>
</body>
</html>
"#,
        title = title,
        style = BASE_STYLE,
        nav = nav,
        header = header,
        cards = cards
    )
}

fn push_image(out: &mut String, image: Option<&url::Url>, alt: &str) {
    if let Some(image) = image {
        out.push_str(&format!(
            "            <img src=\"{}\" alt=\"{}\" class=\"card-image\">\n",
            escape_html(image.as_str()),
            alt
        ));
    }
}

/// Escapes text for use in HTML content and quoted attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Percent-encodes a folder name for use as one relative href segment
pub fn encode_segment(folder: &str) -> String {
    utf8_percent_encode(folder, PATH_SEGMENT).to_string()
}

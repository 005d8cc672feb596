use crate::model::View;
use url::Url;

/// Query parameter that selects a chapter's content mode
const VIEW_PARAM: &str = "view";

/// Derives the URL of one view of a chapter from its canonical link
///
/// # Rewriting Steps
///
/// 1. Read the query string as ordered key/value pairs (repeated keys kept)
/// 2. Replace the first `view` pair with the requested view and drop any
///    further `view` pairs; append `view` when the link has none
/// 3. Re-serialize the query; scheme, host, port, path and fragment are
///    left untouched
///
/// # Examples
///
/// ```
/// use course_mirror::url::derive_view_url;
/// use course_mirror::View;
/// use url::Url;
///
/// let link = Url::parse("https://example.com/chapter.php?id=7").unwrap();
/// let notes = derive_view_url(&link, View::Notes);
/// assert_eq!(notes.as_str(), "https://example.com/chapter.php?id=7&view=notes");
/// ```
pub fn derive_view_url(chapter_link: &Url, view: View) -> Url {
    let params = rewrite_view_param(chapter_link, view);

    let mut url = chapter_link.clone();
    url.query_pairs_mut().clear().extend_pairs(params.iter());
    url
}

/// Builds the rewritten query pairs, keeping the position of an existing `view`
fn rewrite_view_param(url: &Url, view: View) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = Vec::new();
    let mut has_view = false;

    for (key, value) in url.query_pairs() {
        if key == VIEW_PARAM {
            if !has_view {
                params.push((VIEW_PARAM.to_string(), view.query_value().to_string()));
                has_view = true;
            }
            continue;
        }
        params.push((key.into_owned(), value.into_owned()));
    }

    if !has_view {
        params.push((VIEW_PARAM.to_string(), view.query_value().to_string()));
    }

    params
}

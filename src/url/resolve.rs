use crate::ExtractError;
use url::Url;

/// Resolves a navigation target found on a listing page
///
/// Returns `Ok(None)` when the href is blank or cannot lead to a page:
/// `javascript:`, `mailto:`, `tel:` targets and fragment-only anchors.
/// Relative targets are joined onto `base_url`.
///
/// # Errors
///
/// `ExtractError::InvalidLink` when the href cannot be joined onto the base,
/// or resolves to a non-HTTP(S) URL.
pub fn resolve_link(href: &str, base_url: &Url) -> Result<Option<Url>, ExtractError> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return Ok(None);
    }

    if href.starts_with("javascript:") || href.starts_with("mailto:") || href.starts_with("tel:")
    {
        return Ok(None);
    }

    let resolved = base_url
        .join(href)
        .map_err(|source| ExtractError::InvalidLink {
            href: href.to_string(),
            source,
        })?;

    if resolved.scheme() == "http" || resolved.scheme() == "https" {
        Ok(Some(resolved))
    } else {
        tracing::debug!("Ignoring non-HTTP link: {}", resolved);
        Ok(None)
    }
}

/// Resolves an image source, treating blank or unparseable sources as absent
///
/// Protocol-relative sources (`//cdn.example.com/a.png`) inherit the base
/// URL's scheme so they still load from a local `file://` mirror.
pub fn resolve_image(src: &str, base_url: &Url) -> Option<Url> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }

    match base_url.join(src) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!("Ignoring image source '{}': {}", src, e);
            None
        }
    }
}

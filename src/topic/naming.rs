//! Naming a topic after the title of the page it points at.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{LoaderError, Result};
use crate::source::TitleFetcher;

/// Longest topic name we store, in characters.
pub const MAX_NAME_CHARS: usize = 251;

static TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<title>(.+?)</title>").expect("valid regex"));

/// Pull the text of the first `<title>` element out of raw HTML.
///
/// The text is returned as found: no trimming, no entity decoding.  The
/// element must open and close on the same line.
pub fn extract_title(html: &str) -> Option<&str> {
    TITLE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Cut `title` down to its first [`MAX_NAME_CHARS`] characters.
pub fn truncate_name(title: &str) -> String {
    title.chars().take(MAX_NAME_CHARS).collect()
}

/// Fetch `url` and derive a topic name from its title.
pub fn name_for<F>(fetcher: &F, url: &str) -> Result<String>
where
    F: TitleFetcher + ?Sized,
{
    let html = fetcher.fetch(url)?;
    let title = extract_title(&html)
        .ok_or_else(|| LoaderError::Parse(format!("no <title> found at {url}")))?;
    Ok(truncate_name(title))
}

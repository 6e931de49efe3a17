// * Image URL harvest from rendered markup
// * Pulls <img> sources out of the final DOM, resolves them against the page
// * URL, and keeps only URLs whose path carries a known image extension.

use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

use crate::config::constants::IMAGE_EXTENSIONS;

static SELECTOR_IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

/// Checks whether a URL's path ends with an allow-listed image extension
///
/// The match is case-insensitive and ignores the query string, so
/// `photo.JPG?width=120` passes while `tracker.exe` does not.
pub fn is_image_asset(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let path = parsed.path().to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| path.ends_with(&format!(".{ext}")))
}

/// Extracts absolute image URLs from page markup
///
/// Relative `src` values are resolved against `page_url`. Results keep
/// document order with duplicates removed.
pub fn harvest_image_urls(html: &str, page_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(page_url) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut seen: HashSet<String> = HashSet::new();
    let mut urls: Vec<String> = Vec::new();

    for element in document.select(&SELECTOR_IMG) {
        let Some(src) = element.value().attr("src") else {
            continue;
        };
        let Ok(absolute) = base.join(src) else {
            continue;
        };
        let absolute = absolute.to_string();
        if is_image_asset(&absolute) && seen.insert(absolute.clone()) {
            urls.push(absolute);
        }
    }

    urls
}

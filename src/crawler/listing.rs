//! Listing page scanning
//!
//! This module turns one listing page of the paginated catalog into the set
//! of detail-page URLs it references. Failures never propagate: a page that
//! cannot be fetched or parsed contributes an empty set and a warning.

use crate::config::SiteConfig;
use crate::crawler::fetcher::Fetcher;
use scraper::{Html, Selector};

/// CSS selector for item title links on a listing page
const ITEM_LINK_SELECTOR: &str = "h2.entry-title a";

/// Path marker that real detail hrefs carry (a four-digit-year segment)
const YEAR_PATH_MARKER: &str = "/20";

/// Computes the listing URL for a page index
///
/// Index 1 is the bare catalog URL; later pages live under an indexed
/// sub-path.
///
/// # Examples
///
/// ```
/// use catalog_harvest::crawler::listing_url;
///
/// assert_eq!(listing_url("https://example.com/games", 1), "https://example.com/games");
/// assert_eq!(listing_url("https://example.com/games", 7), "https://example.com/games/page/7");
/// ```
pub fn listing_url(base_url: &str, page_index: u32) -> String {
    if page_index > 1 {
        format!("{}/page/{}", base_url, page_index)
    } else {
        base_url.to_string()
    }
}

/// Fetches one listing page and returns the detail URLs it links to
///
/// # Arguments
///
/// * `fetcher` - The shared retrying fetcher
/// * `site` - Target site configuration (base URL and platform filter)
/// * `page_index` - 1-based listing page index
///
/// # Returns
///
/// The filtered hrefs in document order; empty on any failure.
pub async fn scan_listing_page(
    fetcher: &Fetcher,
    site: &SiteConfig,
    page_index: u32,
) -> Vec<String> {
    let url = listing_url(&site.base_url, page_index);

    let page = match fetcher.fetch(&url).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Failed to process page {}: {}", page_index, e);
            return Vec::new();
        }
    };

    extract_item_links(&page.body, &site.platform_filter)
}

/// Extracts candidate detail hrefs from listing markup
///
/// Only heading-level title links are considered, and a href is kept only if
/// it carries the year path marker and (case-insensitively) the platform
/// token. The filter is a cheap structural heuristic: missing a real item is
/// acceptable, wasting a detail fetch on a false positive is not.
pub fn extract_item_links(html: &str, platform_filter: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse(ITEM_LINK_SELECTOR) {
        let platform = platform_filter.to_lowercase();
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if href.contains(YEAR_PATH_MARKER) && href.to_lowercase().contains(&platform) {
                    links.push(href.to_string());
                }
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_url_first_page() {
        assert_eq!(
            listing_url("https://catalog.example.com/games", 1),
            "https://catalog.example.com/games"
        );
    }

    #[test]
    fn test_listing_url_later_pages() {
        assert_eq!(
            listing_url("https://catalog.example.com/games", 2),
            "https://catalog.example.com/games/page/2"
        );
        assert_eq!(
            listing_url("https://catalog.example.com/games", 122),
            "https://catalog.example.com/games/page/122"
        );
    }

    #[test]
    fn test_extract_matching_links() {
        let html = r#"<html><body>
            <h2 class="entry-title"><a href="https://x.com/2024/alpha-ps4">Alpha</a></h2>
            <h2 class="entry-title"><a href="https://x.com/2023/beta-PS4">Beta</a></h2>
        </body></html>"#;
        let links = extract_item_links(html, "ps4");
        assert_eq!(
            links,
            vec![
                "https://x.com/2024/alpha-ps4".to_string(),
                "https://x.com/2023/beta-PS4".to_string(),
            ]
        );
    }

    #[test]
    fn test_platform_filter_is_case_insensitive() {
        let html = r#"<html><body>
            <h2 class="entry-title"><a href="https://x.com/2024/game-PS4">Game</a></h2>
        </body></html>"#;
        assert_eq!(extract_item_links(html, "ps4").len(), 1);
        assert_eq!(extract_item_links(html, "PS4").len(), 1);
    }

    #[test]
    fn test_rejects_wrong_platform() {
        let html = r#"<html><body>
            <h2 class="entry-title"><a href="https://x.com/2024/game-ps5">Game</a></h2>
        </body></html>"#;
        assert!(extract_item_links(html, "ps4").is_empty());
    }

    #[test]
    fn test_rejects_missing_year_marker() {
        let html = r#"<html><body>
            <h2 class="entry-title"><a href="https://x.com/about-ps4">About</a></h2>
        </body></html>"#;
        assert!(extract_item_links(html, "ps4").is_empty());
    }

    #[test]
    fn test_ignores_non_title_links() {
        let html = r#"<html><body>
            <a href="https://x.com/2024/sidebar-ps4">Sidebar</a>
            <h3 class="entry-title"><a href="https://x.com/2024/wrong-level-ps4">H3</a></h3>
        </body></html>"#;
        assert!(extract_item_links(html, "ps4").is_empty());
    }

    #[test]
    fn test_ignores_anchor_without_href() {
        let html = r#"<html><body>
            <h2 class="entry-title"><a>No href</a></h2>
        </body></html>"#;
        assert!(extract_item_links(html, "ps4").is_empty());
    }

    #[test]
    fn test_document_order_preserved() {
        let html = r#"<html><body>
            <h2 class="entry-title"><a href="https://x.com/2024/c-ps4">C</a></h2>
            <h2 class="entry-title"><a href="https://x.com/2024/a-ps4">A</a></h2>
            <h2 class="entry-title"><a href="https://x.com/2024/b-ps4">B</a></h2>
        </body></html>"#;
        let links = extract_item_links(html, "ps4");
        assert_eq!(
            links,
            vec![
                "https://x.com/2024/c-ps4".to_string(),
                "https://x.com/2024/a-ps4".to_string(),
                "https://x.com/2024/b-ps4".to_string(),
            ]
        );
    }

    #[test]
    fn test_duplicates_kept_at_this_stage() {
        let html = r#"<html><body>
            <h2 class="entry-title"><a href="https://x.com/2024/same-ps4">Same</a></h2>
            <h2 class="entry-title"><a href="https://x.com/2024/same-ps4">Same again</a></h2>
        </body></html>"#;
        assert_eq!(extract_item_links(html, "ps4").len(), 2);
    }
}

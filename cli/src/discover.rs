//! Feed auto-discovery for named sites
//!
//! A site name becomes a list of conventional feed paths, probed in
//! order; a candidate counts only when its response parses as a feed.

use reqwest::Client;

/// Common feed URL patterns, tried in order.
const FEED_PATTERNS: &[&str] = &[
    "/feed/",               // WordPress
    "/rss",                 // Some sites
    "/rss.xml",             // Generic RSS
    "/feed.xml",            // Generic feed
    "/index.xml",           // Hugo
    "/atom.xml",            // Hugo/Jekyll Atom
    "/feeds/posts/default", // Blogger
];

/// Candidate feed URLs for a site name or domain.
///
/// Bare names get a `.com` suffix; schemes and trailing slashes are
/// stripped before the patterns are appended.
pub fn candidate_urls(site: &str) -> Vec<String> {
    let host = site
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_lowercase();
    let host = if host.contains('.') {
        host
    } else {
        format!("{}.com", host)
    };

    FEED_PATTERNS
        .iter()
        .map(|pattern| format!("https://{}{}", host, pattern))
        .collect()
}

/// Probe a site's candidate URLs and return the first that serves a
/// parseable feed, or `None` when nothing does.
pub async fn discover_feed(http: &Client, site: &str) -> Option<String> {
    for url in candidate_urls(site) {
        let response = match http.get(&url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!("{} answered {}", url, response.status());
                continue;
            }
            Err(e) => {
                tracing::debug!("{} unreachable: {}", url, e);
                continue;
            }
        };

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("{} body unreadable: {}", url, e);
                continue;
            }
        };

        if feed_rs::parser::parse(&bytes[..]).is_ok() {
            tracing::info!("Discovered feed for {}: {}", site, url);
            return Some(url);
        }
        tracing::debug!("{} did not parse as a feed", url);
    }
    None
}

/// Display label for a site: the first host label, so
/// `news.ycombinator.com` becomes `news` and `techcrunch` stays itself.
pub fn site_label(site: &str) -> String {
    site.trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('.')
        .next()
        .unwrap_or(site)
        .to_lowercase()
}

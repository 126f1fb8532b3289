//! Shared text normalization for fetched content

use scraper::{Html, Selector};
use url::Url;

/// Character budget for item excerpts.
pub(crate) const EXCERPT_MAX_CHARS: usize = 300;

/// Strip markup from an HTML fragment and collapse whitespace.
pub(crate) fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to `max` characters on a char boundary, appending an
/// ellipsis when anything was cut.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

/// Strip and truncate an HTML fragment into a display excerpt.
pub(crate) fn clean_excerpt(html: &str) -> String {
    truncate_chars(&strip_html(html), EXCERPT_MAX_CHARS)
}

/// First `<img src>` in an HTML fragment that parses as an absolute URL.
pub(crate) fn first_img_src(html: &str) -> Option<Url> {
    let fragment = Html::parse_fragment(html);
    let selector = Selector::parse("img").unwrap();
    fragment
        .select(&selector)
        .filter_map(|element| element.value().attr("src"))
        .find_map(|src| Url::parse(src).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_html_removes_tags_and_collapses_whitespace() {
        let text = strip_html("<p>Hello   <b>world</b></p>\n<p>again</p>");
        assert_eq!(text, "Hello world again");
    }

    #[test]
    fn strip_html_keeps_plain_text_untouched() {
        assert_eq!(strip_html("no markup here"), "no markup here");
    }

    #[test]
    fn truncate_chars_leaves_short_text_alone() {
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn truncate_chars_cuts_on_char_boundaries() {
        let cut = truncate_chars("héllo wörld, this goes on for a while", 11);
        assert_eq!(cut, "héllo wörld...");
    }

    #[test]
    fn clean_excerpt_strips_then_truncates() {
        let long_body = format!("<p>{}</p>", "word ".repeat(100));
        let excerpt = clean_excerpt(&long_body);
        assert!(excerpt.ends_with("..."));
        assert!(excerpt.chars().count() <= EXCERPT_MAX_CHARS + 3);
        assert!(!excerpt.contains('<'));
    }

    #[test]
    fn first_img_src_skips_relative_urls() {
        let html = r#"<img src="/relative.png"><img src="https://example.com/pic.jpg">"#;
        let url = first_img_src(html);
        assert_eq!(
            url.as_ref().map(Url::as_str),
            Some("https://example.com/pic.jpg")
        );
    }

    #[test]
    fn first_img_src_handles_markup_without_images() {
        assert_eq!(first_img_src("<p>nothing</p>"), None);
    }
}

//! Test fixtures
//!
//! Factory functions for items, sources, and images with sensible
//! defaults. Each fixture is valid on its own and can be customized by
//! the test after construction.

use std::path::PathBuf;

use crate::domain::entities::{InlineImage, NewsItem, Source};
use crate::domain::ports::FetchedImage;

/// A renderable item titled `title`, linked under example.com.
pub fn test_item(title: &str) -> NewsItem {
    let slug = title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");

    NewsItem {
        title: title.to_string(),
        excerpt: format!("Excerpt for {}.", title),
        link: format!("https://example.com/posts/{}", slug).parse().unwrap(),
        image_url: None,
        published_at: None,
        source_name: "example".to_string(),
    }
}

/// `count` items attributed to the source `name`.
pub fn test_items(name: &str, count: usize) -> Vec<NewsItem> {
    (1..=count)
        .map(|n| {
            let mut item = test_item(&format!("{} story {}", name, n));
            item.source_name = name.to_string();
            item
        })
        .collect()
}

/// A feed source whose URL is derived from its name.
pub fn feed_source(name: &str) -> Source {
    Source::feed(name, format!("https://{}.example.com/feed/", name))
}

/// A tiny payload that sniffs as PNG.
pub fn png_image() -> FetchedImage {
    FetchedImage {
        bytes: vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
        mime_type: "image/png".to_string(),
    }
}

/// An already-spooled inline PNG reference. The path is never read by
/// the renderer, so it does not need to exist.
pub fn inline_png(name: &str) -> InlineImage {
    InlineImage {
        content_id: format!("{}.png", name),
        path: PathBuf::from(format!("/tmp/newsroom-test/{}.png", name)),
        mime_type: "image/png".to_string(),
    }
}

//! Newsletter renderer
//!
//! Renders resolved items into the HTML email body. Rendering is pure:
//! items in, `RenderedEmail` out, no I/O. Items without a title are
//! dropped here, and `inline_images` is emitted in the same order as
//! the `cid:` references in the body.

use chrono::{DateTime, Utc};

use crate::app::ResolvedItem;
use crate::domain::entities::{Branding, InlineImage, RenderedEmail};

const STYLES: &str = "\
        body { font-family: Arial, sans-serif; line-height: 1.6; max-width: 800px; margin: 0 auto; padding: 20px; }
        h1 { color: #333; text-align: center; border-bottom: 2px solid #f0f0f0; padding-bottom: 10px; }
        .date { color: #666; font-size: 0.9em; text-align: center; margin-bottom: 20px; }
        .news-item { margin-bottom: 30px; padding: 20px; background: #f9f9f9; border-radius: 8px; }
        .news-item h2 { color: #2a5db0; margin-top: 0; }
        .news-item h2 a { color: inherit; text-decoration: none; }
        .news-item .excerpt { color: #666; margin: 10px 0; }
        .news-item .source { color: #999; font-size: 0.9em; margin-top: 5px; }
        .news-item img { max-width: 100%; height: auto; border-radius: 4px; margin: 10px 0; }
        .category-header { margin: 30px 0 20px; padding: 15px; background: #f0f0f0; border-radius: 8px; text-align: center; }
        .category-header h2 { color: #333; margin: 0; }
";

/// Render a newsletter email from resolved items.
pub fn render_newsletter(
    items: &[ResolvedItem],
    branding: &Branding,
    now: DateTime<Utc>,
) -> RenderedEmail {
    let date = now.format("%B %d, %Y").to_string();
    let subject = format!("{} - {}", branding.newsletter_title, date);

    let mut buf = String::new();
    let mut inline_images = Vec::new();

    // Document head
    buf.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    buf.push_str(&format!(
        "    <title>{}</title>\n",
        html_escape(&branding.newsletter_title)
    ));
    buf.push_str("    <style>\n");
    buf.push_str(STYLES);
    buf.push_str("    </style>\n</head>\n<body>\n");

    // Masthead
    buf.push_str(&format!(
        "    <h1>{}</h1>\n",
        html_escape(&branding.newsletter_title)
    ));
    buf.push_str(&format!("    <div class=\"date\">{}</div>\n\n", date));
    buf.push_str("    <div class=\"category-header\">\n");
    buf.push_str(&format!(
        "        <h2>{}</h2>\n",
        html_escape(&branding.section_title)
    ));
    buf.push_str("    </div>\n");

    for resolved in items {
        if !resolved.item.is_renderable() {
            continue;
        }
        buf.push_str(&render_item(resolved, &mut inline_images));
    }

    buf.push_str("</body>\n</html>\n");

    RenderedEmail {
        subject,
        html_body: buf,
        inline_images,
    }
}

fn render_item(resolved: &ResolvedItem, inline_images: &mut Vec<InlineImage>) -> String {
    let item = &resolved.item;
    let mut buf = String::new();

    buf.push_str("    <div class=\"news-item\">\n");
    buf.push_str(&format!(
        "        <h2><a href=\"{}\">{}</a></h2>\n",
        html_escape(item.link.as_str()),
        html_escape(&item.title)
    ));
    buf.push_str(&format!(
        "        <p class=\"excerpt\">{}</p>\n",
        html_escape(&item.excerpt)
    ));

    let source = html_escape(&item.source_name);
    let source_line = match item.published_at {
        Some(date) => format!("Source: {} - {}", source, date.format("%B %d, %Y")),
        None => format!("Source: {}", source),
    };
    buf.push_str(&format!("        <div class=\"source\">{}</div>\n", source_line));

    if let Some(image) = &resolved.image {
        buf.push_str(&format!(
            "        <img src=\"cid:{}\" alt=\"{}\">\n",
            image.content_id,
            html_escape(&item.title)
        ));
        inline_images.push(image.clone());
    }

    buf.push_str("    </div>\n");
    buf
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{inline_png, test_item};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 5, 9, 30, 0).unwrap()
    }

    fn with_image(title: &str, name: &str) -> ResolvedItem {
        ResolvedItem {
            item: test_item(title),
            image: Some(inline_png(name)),
        }
    }

    fn without_image(title: &str) -> ResolvedItem {
        ResolvedItem {
            item: test_item(title),
            image: None,
        }
    }

    // ===== subject and masthead =====

    #[test]
    fn subject_carries_title_and_date() {
        let email = render_newsletter(&[], &Branding::default(), fixed_now());
        assert_eq!(email.subject, "Daily Tech Newsletter - August 05, 2024");
    }

    #[test]
    fn renders_masthead_and_section_header() {
        let branding = Branding {
            newsletter_title: "Daily Tech Newsletter".to_string(),
            section_title: "quantum computing".to_string(),
        };
        let email = render_newsletter(&[without_image("A story")], &branding, fixed_now());

        assert!(email.html_body.contains("<h1>Daily Tech Newsletter</h1>"));
        assert!(email.html_body.contains(r#"<div class="date">August 05, 2024</div>"#));
        assert!(email.html_body.contains("<h2>quantum computing</h2>"));
    }

    // ===== item blocks =====

    #[test]
    fn links_titles_to_their_stories() {
        let email = render_newsletter(&[without_image("A story")], &Branding::default(), fixed_now());
        assert!(email
            .html_body
            .contains(r#"<h2><a href="https://example.com/posts/a-story">A story</a></h2>"#));
    }

    #[test]
    fn drops_items_without_titles() {
        let items = vec![without_image(""), without_image("   "), without_image("Kept")];
        let email = render_newsletter(&items, &Branding::default(), fixed_now());

        assert_eq!(
            email.html_body.matches(r#"<div class="news-item">"#).count(),
            1
        );
        assert!(email.html_body.contains("Kept"));
    }

    #[test]
    fn dropped_items_leave_no_inline_images() {
        let items = vec![with_image("", "orphan"), with_image("Kept", "kept")];
        let email = render_newsletter(&items, &Branding::default(), fixed_now());

        assert_eq!(email.inline_images.len(), 1);
        assert_eq!(email.inline_images[0].content_id, "kept.png");
        assert!(!email.html_body.contains("cid:orphan.png"));
    }

    #[test]
    fn source_line_includes_date_when_present() {
        let mut item = test_item("Dated");
        item.published_at = Some(fixed_now());
        let email = render_newsletter(
            &[ResolvedItem { item, image: None }],
            &Branding::default(),
            fixed_now(),
        );

        assert!(email
            .html_body
            .contains("Source: example - August 05, 2024"));
    }

    #[test]
    fn source_line_omits_missing_dates() {
        let email = render_newsletter(&[without_image("Undated")], &Branding::default(), fixed_now());
        assert!(email.html_body.contains("<div class=\"source\">Source: example</div>"));
    }

    #[test]
    fn keeps_item_text_when_no_image_resolved() {
        let email = render_newsletter(&[without_image("No picture")], &Branding::default(), fixed_now());
        assert!(email.html_body.contains("No picture"));
        assert!(!email.html_body.contains("<img"));
        assert!(email.inline_images.is_empty());
    }

    // ===== image ordering =====

    #[test]
    fn inline_images_follow_body_order() {
        let items = vec![
            with_image("First", "first"),
            without_image("Second"),
            with_image("Third", "third"),
        ];
        let email = render_newsletter(&items, &Branding::default(), fixed_now());

        let cids: Vec<_> = email
            .inline_images
            .iter()
            .map(|image| image.content_id.as_str())
            .collect();
        assert_eq!(cids, ["first.png", "third.png"]);

        let first_pos = email.html_body.find("cid:first.png").unwrap();
        let third_pos = email.html_body.find("cid:third.png").unwrap();
        assert!(first_pos < third_pos);
    }

    // ===== escaping =====

    #[test]
    fn escapes_markup_in_titles_and_excerpts() {
        let mut item = test_item("Tags <b> & ambushes");
        item.excerpt = "a \"quoted\" <i>excerpt</i>".to_string();
        let email = render_newsletter(
            &[ResolvedItem { item, image: None }],
            &Branding::default(),
            fixed_now(),
        );

        assert!(email.html_body.contains("Tags &lt;b&gt; &amp; ambushes"));
        assert!(email
            .html_body
            .contains("a &quot;quoted&quot; &lt;i&gt;excerpt&lt;/i&gt;"));
        assert!(!email.html_body.contains("<b>"));
    }
}

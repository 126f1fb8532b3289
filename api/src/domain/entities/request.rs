//! One newsletter to assemble and deliver

use serde::{Deserialize, Serialize};

use super::source::Source;

/// Default item budget for feed-mode newsletters.
pub const DEFAULT_ITEM_LIMIT: usize = 15;

/// Everything the pipeline needs for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRequest {
    pub recipients: Vec<String>,
    /// Sources in the order their items should appear.
    pub sources: Vec<Source>,
    /// Upper bound on items across all sources.
    pub limit: usize,
}

impl DeliveryRequest {
    /// Branding for this run. Search requests title their section after
    /// the query; feed requests use the stock section title.
    pub fn branding(&self) -> Branding {
        let section_title = self
            .sources
            .iter()
            .find_map(|source| match source {
                Source::Search { query, .. } => Some(query.clone()),
                Source::Feed { .. } => None,
            })
            .unwrap_or_else(|| Branding::default().section_title);

        Branding {
            section_title,
            ..Branding::default()
        }
    }
}

/// Masthead text for the rendered email.
#[derive(Debug, Clone, PartialEq)]
pub struct Branding {
    pub newsletter_title: String,
    pub section_title: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            newsletter_title: "Daily Tech Newsletter".to_string(),
            section_title: "Tech News".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_requests_use_stock_branding() {
        let request = DeliveryRequest {
            recipients: vec!["reader@example.com".to_string()],
            sources: Source::default_feeds(),
            limit: DEFAULT_ITEM_LIMIT,
        };

        let branding = request.branding();
        assert_eq!(branding.newsletter_title, "Daily Tech Newsletter");
        assert_eq!(branding.section_title, "Tech News");
    }

    #[test]
    fn search_requests_title_the_section_after_the_query() {
        let request = DeliveryRequest {
            recipients: vec!["reader@example.com".to_string()],
            sources: vec![Source::search("quantum computing", 5)],
            limit: 5,
        };

        assert_eq!(request.branding().section_title, "quantum computing");
    }
}

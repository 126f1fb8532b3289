//! Search adapter for the Exa API
//!
//! One POST per query. Results come back with full text, so excerpts
//! are built locally with the same normalization feeds get.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::entities::NewsItem;
use crate::domain::ports::SearchClient;
use crate::error::FetchError;

use super::text;

const EXA_API_URL: &str = "https://api.exa.ai";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Topic search against api.exa.ai.
pub struct ExaSearchClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl ExaSearchClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: Client::builder()
                .timeout(SEARCH_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            base_url: EXA_API_URL.to_string(),
        }
    }
}

#[async_trait]
impl SearchClient for ExaSearchClient {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<NewsItem>, FetchError> {
        let request = SearchRequest {
            query,
            num_results,
            contents: Contents { text: true },
        };

        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FetchError::Unauthorized),
            status if !status.is_success() => {
                let message = response.text().await.unwrap_or_default();
                Err(FetchError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
            _ => {
                let body: SearchResponse = response.json().await?;
                Ok(body.results.into_iter().filter_map(result_to_item).collect())
            }
        }
    }
}

fn result_to_item(result: SearchResult) -> Option<NewsItem> {
    let link = Url::parse(&result.url).ok()?;
    let source_name = link
        .host_str()
        .map(|host| host.trim_start_matches("www.").to_string())
        .unwrap_or_default();

    Some(NewsItem {
        title: result.title.unwrap_or_default(),
        excerpt: text::clean_excerpt(result.text.as_deref().unwrap_or_default()),
        link,
        image_url: result.image.as_deref().and_then(|raw| Url::parse(raw).ok()),
        published_at: result
            .published_date
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|date| date.with_timezone(&Utc)),
        source_name,
    })
}

// --- Wire types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    num_results: usize,
    contents: Contents,
}

#[derive(Serialize)]
struct Contents {
    text: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    #[serde(default)]
    title: Option<String>,
    url: String,
    #[serde(default)]
    published_date: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

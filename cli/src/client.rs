//! HTTP client for the newsroom gateway

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Client for the gateway's newsletter endpoint.
#[derive(Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    /// Create a client from `NEWSROOM_SERVER_URL`, falling back to the
    /// local default.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("NEWSROOM_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        Self::new(&base_url)
    }

    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request a search-mode newsletter. Returns the gateway's
    /// acknowledgment line.
    pub async fn send_topic(
        &self,
        query: &str,
        emails: &[String],
        num_results: usize,
    ) -> Result<String> {
        self.post_newsletter(&SearchPayload {
            query,
            emails,
            num_results,
        })
        .await
    }

    /// Request a feed-mode newsletter for one recipient.
    pub async fn send_feeds(
        &self,
        email: &str,
        websites: &BTreeMap<String, String>,
    ) -> Result<String> {
        self.post_newsletter(&FeedPayload { email, websites }).await
    }

    async fn post_newsletter<T: Serialize>(&self, body: &T) -> Result<String> {
        let url = format!("{}/generate_and_send_newsletter", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to POST {}", url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read gateway response")?;

        if !status.is_success() {
            anyhow::bail!("Gateway error ({}): {}", status, body);
        }

        // The acknowledgment body is {"status": "..."}.
        let ack: AckResponse =
            serde_json::from_str(&body).with_context(|| format!("Unexpected ack body: {}", body))?;
        Ok(ack.status)
    }
}

// --- Request / response types ---

#[derive(Debug, Serialize)]
struct SearchPayload<'a> {
    query: &'a str,
    emails: &'a [String],
    num_results: usize,
}

#[derive(Debug, Serialize)]
struct FeedPayload<'a> {
    email: &'a str,
    websites: &'a BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct AckResponse {
    status: String,
}

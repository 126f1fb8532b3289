//! Mock implementations of port traits
//!
//! In-memory implementations configured with builder methods. Call
//! recorders are handed out as `Arc<RwLock<..>>` so tests can keep a
//! handle after the mock moves into a service.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use url::Url;

use crate::domain::entities::{NewsItem, RenderedEmail};
use crate::domain::ports::{FeedClient, FetchedImage, Mailer, MediaClient, SearchClient};
use crate::error::{DeliveryError, FetchError, MediaError};

// ============================================================================
// Feed client
// ============================================================================

/// Feed client serving canned items, keyed by source name.
#[derive(Default)]
pub struct StaticFeedClient {
    feeds: HashMap<String, Vec<NewsItem>>,
    failures: HashSet<String>,
    requested_limits: Arc<RwLock<Vec<usize>>>,
}

impl StaticFeedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `items` for the source named `name`.
    pub fn with_feed(mut self, name: &str, items: Vec<NewsItem>) -> Self {
        self.feeds.insert(name.to_string(), items);
        self
    }

    /// Make the source named `name` fail with an HTTP 500.
    pub fn with_failure(mut self, name: &str) -> Self {
        self.failures.insert(name.to_string());
        self
    }

    /// The `limit` argument of every `fetch_feed` call, in call order.
    pub fn requested_limits(&self) -> Arc<RwLock<Vec<usize>>> {
        self.requested_limits.clone()
    }
}

#[async_trait]
impl FeedClient for StaticFeedClient {
    async fn fetch_feed(
        &self,
        name: &str,
        _url: &str,
        limit: usize,
    ) -> Result<Vec<NewsItem>, FetchError> {
        self.requested_limits.write().unwrap().push(limit);

        if self.failures.contains(name) {
            return Err(FetchError::Api {
                status: 500,
                message: format!("feed {} returned non-success", name),
            });
        }

        match self.feeds.get(name) {
            Some(items) => Ok(items.iter().take(limit).cloned().collect()),
            None => Err(FetchError::Api {
                status: 404,
                message: format!("no such feed: {}", name),
            }),
        }
    }
}

// ============================================================================
// Search client
// ============================================================================

/// Search client returning one canned result set for every query.
#[derive(Default)]
pub struct StaticSearchClient {
    results: Vec<NewsItem>,
    fail: bool,
    requests: Arc<RwLock<Vec<(String, usize)>>>,
}

impl StaticSearchClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, results: Vec<NewsItem>) -> Self {
        self.results = results;
        self
    }

    /// Make every search fail with an HTTP 500.
    pub fn with_failure(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Every `(query, num_results)` pair seen, in call order.
    pub fn requests(&self) -> Arc<RwLock<Vec<(String, usize)>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl SearchClient for StaticSearchClient {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<NewsItem>, FetchError> {
        self.requests
            .write()
            .unwrap()
            .push((query.to_string(), num_results));

        if self.fail {
            return Err(FetchError::Api {
                status: 500,
                message: "search backend unavailable".to_string(),
            });
        }
        Ok(self.results.iter().take(num_results).cloned().collect())
    }
}

// ============================================================================
// Media client
// ============================================================================

/// Media client serving canned images keyed by exact URL. Anything not
/// configured resolves as a 404.
#[derive(Default)]
pub struct StaticMediaClient {
    images: HashMap<String, FetchedImage>,
    favicons: HashMap<String, FetchedImage>,
}

impl StaticMediaClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, url: &str, image: FetchedImage) -> Self {
        self.images.insert(url.to_string(), image);
        self
    }

    pub fn with_favicon(mut self, origin: &str, image: FetchedImage) -> Self {
        self.favicons.insert(origin.to_string(), image);
        self
    }
}

#[async_trait]
impl MediaClient for StaticMediaClient {
    async fn resolve_image(&self, url: &Url) -> Result<FetchedImage, MediaError> {
        self.images
            .get(url.as_str())
            .cloned()
            .ok_or(MediaError::Status(404))
    }

    async fn resolve_favicon(&self, origin: &Url) -> Result<FetchedImage, MediaError> {
        self.favicons
            .get(origin.as_str())
            .cloned()
            .ok_or(MediaError::Status(404))
    }
}

// ============================================================================
// Mailer
// ============================================================================

/// What the mailer was asked to send, flattened for assertions.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub subject: String,
    pub html_body: String,
    pub inline_images: usize,
    pub recipients: Vec<String>,
}

/// Mailer that records every send attempt. Optionally rejects each
/// attempt the way a relay with bad credentials would.
#[derive(Default)]
pub struct RecordingMailer {
    outbox: Arc<RwLock<Vec<SentEmail>>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose relay rejects authentication on every attempt.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Every send attempt, including rejected ones, in call order.
    pub fn outbox(&self) -> Arc<RwLock<Vec<SentEmail>>> {
        self.outbox.clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(
        &self,
        email: &RenderedEmail,
        recipients: &[String],
    ) -> Result<(), DeliveryError> {
        self.outbox.write().unwrap().push(SentEmail {
            subject: email.subject.clone(),
            html_body: email.html_body.clone(),
            inline_images: email.inline_images.len(),
            recipients: recipients.to_vec(),
        });

        if self.fail {
            return Err(DeliveryError::Smtp(
                "535 5.7.8 authentication credentials invalid".to_string(),
            ));
        }
        Ok(())
    }
}

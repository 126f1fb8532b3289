//! Newsletter pipeline orchestration
//!
//! Fetch items, resolve one image per item, render, deliver, clean up
//! the spool. Media problems never fail a run; delivery problems do.

use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};

use crate::adapters::ImageSpool;
use crate::app::fetcher::Fetcher;
use crate::domain::entities::{DeliveryRequest, InlineImage, NewsItem};
use crate::domain::ports::{FeedClient, Mailer, MediaClient, SearchClient};
use crate::error::PipelineError;
use crate::render::render_newsletter;

/// Image downloads in flight at once.
const MAX_PARALLEL_IMAGE_FETCHES: usize = 4;

/// An item paired with its spooled image, if one was resolved.
#[derive(Debug, Clone)]
pub struct ResolvedItem {
    pub item: NewsItem,
    pub image: Option<InlineImage>,
}

/// Summary of one completed run.
#[derive(Debug, Clone)]
pub struct DeliveryReport {
    pub subject: String,
    pub items_rendered: usize,
    pub recipients: usize,
}

/// Orchestrates fetch, image resolution, rendering, and delivery.
pub struct NewsletterService<F, S, M, D>
where
    F: FeedClient,
    S: SearchClient,
    M: MediaClient,
    D: Mailer,
{
    fetcher: Fetcher<F, S>,
    media: Arc<M>,
    mailer: Arc<D>,
}

impl<F, S, M, D> NewsletterService<F, S, M, D>
where
    F: FeedClient,
    S: SearchClient,
    M: MediaClient,
    D: Mailer,
{
    pub fn new(feeds: Arc<F>, search: Arc<S>, media: Arc<M>, mailer: Arc<D>) -> Self {
        Self {
            fetcher: Fetcher::new(feeds, search),
            media,
            mailer,
        }
    }

    /// Fetch items for a request without touching images or email.
    pub async fn fetch_items(
        &self,
        request: &DeliveryRequest,
    ) -> Result<Vec<NewsItem>, PipelineError> {
        self.fetcher.fetch(&request.sources, request.limit).await
    }

    /// Run the full pipeline once.
    pub async fn run(&self, request: &DeliveryRequest) -> Result<DeliveryReport, PipelineError> {
        tracing::info!(
            "Starting newsletter run: {} source(s), {} recipient(s), limit {}",
            request.sources.len(),
            request.recipients.len(),
            request.limit
        );

        let items = self.fetch_items(request).await?;
        tracing::info!("Fetched {} item(s)", items.len());

        let spool = match ImageSpool::new() {
            Ok(spool) => Some(spool),
            Err(e) => {
                tracing::warn!("Image spool unavailable, sending without images: {}", e);
                None
            }
        };

        let resolved = self.resolve_images(items, spool.as_ref()).await;
        let email = render_newsletter(&resolved, &request.branding(), Utc::now());

        let report = DeliveryReport {
            subject: email.subject.clone(),
            items_rendered: resolved.iter().filter(|r| r.item.is_renderable()).count(),
            recipients: request.recipients.len(),
        };

        let outcome = self.mailer.send(&email, &request.recipients).await;

        // The spool is gone after this point either way; the mailer has
        // already read every attachment it needed.
        if let Some(spool) = spool {
            if let Err(e) = spool.cleanup() {
                tracing::warn!("Failed to remove image spool: {}", e);
            }
        }

        outcome?;
        Ok(report)
    }

    /// Resolve at most one spooled image per item. Never fails the run:
    /// an item whose image cannot be resolved keeps its text.
    async fn resolve_images(
        &self,
        items: Vec<NewsItem>,
        spool: Option<&ImageSpool>,
    ) -> Vec<ResolvedItem> {
        let Some(spool) = spool else {
            return items
                .into_iter()
                .map(|item| ResolvedItem { item, image: None })
                .collect();
        };

        stream::iter(items)
            .map(|item| async move {
                let image = self.resolve_one(&item, spool).await;
                ResolvedItem { item, image }
            })
            .buffered(MAX_PARALLEL_IMAGE_FETCHES)
            .collect()
            .await
    }

    async fn resolve_one(&self, item: &NewsItem, spool: &ImageSpool) -> Option<InlineImage> {
        let mut fetched = None;

        if let Some(url) = &item.image_url {
            match self.media.resolve_image(url).await {
                Ok(image) => fetched = Some(image),
                Err(e) => tracing::warn!("Image for \"{}\" skipped: {}", item.title, e),
            }
        }

        // Fall back to the site favicon so the item still gets art.
        if fetched.is_none() {
            if let Some(origin) = item.origin() {
                match self.media.resolve_favicon(&origin).await {
                    Ok(image) => fetched = Some(image),
                    Err(e) => tracing::debug!("No favicon for {}: {}", origin, e),
                }
            }
        }

        match spool.store(fetched?).await {
            Ok(inline) => Some(inline),
            Err(e) => {
                tracing::warn!("Could not spool image for \"{}\": {}", item.title, e);
                None
            }
        }
    }
}

//! Newsletter gateway handler
//!
//! One POST endpoint accepting two request shapes: a feed-mode payload
//! (single recipient, optional custom feed map) and a search-mode
//! payload (topic query, recipient list). Work happens in a background
//! task; the response only acknowledges the hand-off.

use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::entities::{DeliveryRequest, Source, DEFAULT_ITEM_LIMIT};
use crate::domain::ports::{FeedClient, Mailer, MediaClient, SearchClient};
use crate::error::AppError;
use crate::AppState;

const DEFAULT_NUM_RESULTS: usize = 5;

fn default_num_results() -> usize {
    DEFAULT_NUM_RESULTS
}

/// Incoming payload for `/generate_and_send_newsletter`.
///
/// Untagged: serde tries variants in declaration order, so the search
/// shape (which requires `query` and `emails`) must come first.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NewsletterRequest {
    Search {
        query: String,
        emails: Vec<String>,
        #[serde(default = "default_num_results")]
        num_results: usize,
    },
    Feed {
        email: String,
        #[serde(default)]
        websites: Option<BTreeMap<String, String>>,
    },
}

impl NewsletterRequest {
    /// Validate and convert into a pipeline request.
    pub fn into_delivery_request(self) -> Result<DeliveryRequest, AppError> {
        match self {
            NewsletterRequest::Search {
                query,
                emails,
                num_results,
            } => {
                let query = query.trim().to_string();
                if query.is_empty() {
                    return Err(AppError::BadRequest("query must not be empty".to_string()));
                }
                if emails.is_empty() {
                    return Err(AppError::BadRequest("emails must not be empty".to_string()));
                }
                for email in &emails {
                    if !looks_like_email(email) {
                        return Err(AppError::BadRequest(format!(
                            "invalid email address: {}",
                            email
                        )));
                    }
                }
                if num_results == 0 {
                    return Err(AppError::BadRequest(
                        "num_results must be at least 1".to_string(),
                    ));
                }

                Ok(DeliveryRequest {
                    recipients: emails,
                    sources: vec![Source::search(query, num_results)],
                    limit: num_results,
                })
            }
            NewsletterRequest::Feed { email, websites } => {
                if !looks_like_email(&email) {
                    return Err(AppError::BadRequest(format!(
                        "invalid email address: {}",
                        email
                    )));
                }

                let sources = match websites {
                    Some(websites) => {
                        if websites.is_empty() {
                            return Err(AppError::BadRequest(
                                "websites must not be empty".to_string(),
                            ));
                        }
                        let mut sources = Vec::with_capacity(websites.len());
                        for (name, feed_url) in websites {
                            let name = name.trim().to_string();
                            if name.is_empty() {
                                return Err(AppError::BadRequest(
                                    "website names must not be empty".to_string(),
                                ));
                            }
                            if Url::parse(&feed_url).is_err() {
                                return Err(AppError::BadRequest(format!(
                                    "invalid feed URL for {}: {}",
                                    name, feed_url
                                )));
                            }
                            sources.push(Source::feed(name, feed_url));
                        }
                        sources
                    }
                    None => Source::default_feeds(),
                };

                Ok(DeliveryRequest {
                    recipients: vec![email],
                    sources,
                    limit: DEFAULT_ITEM_LIMIT,
                })
            }
        }
    }
}

/// Acknowledgement body returned on accepted requests.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub status: String,
}

/// POST /generate_and_send_newsletter
///
/// Validates the payload, spawns the pipeline, and acknowledges
/// immediately. Pipeline outcomes are only logged.
pub async fn generate_and_send_newsletter<F, S, M, D>(
    State(state): State<AppState<F, S, M, D>>,
    Json(request): Json<NewsletterRequest>,
) -> Result<impl IntoResponse, AppError>
where
    F: FeedClient + 'static,
    S: SearchClient + 'static,
    M: MediaClient + 'static,
    D: Mailer + 'static,
{
    let delivery = request.into_delivery_request()?;
    let status = format!(
        "Newsletter is being sent to {}",
        delivery.recipients.join(", ")
    );

    let service = state.service.clone();
    tokio::spawn(async move {
        match service.run(&delivery).await {
            Ok(report) => tracing::info!(
                "Newsletter \"{}\" sent: {} item(s) to {} recipient(s)",
                report.subject,
                report.items_rendered,
                report.recipients
            ),
            Err(e) => tracing::error!("Newsletter delivery failed: {}", e),
        }
    });

    Ok((StatusCode::ACCEPTED, Json(AckResponse { status })))
}

fn looks_like_email(address: &str) -> bool {
    if address.contains(char::is_whitespace) {
        return false;
    }
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

//! Intent extraction from free text
//!
//! The user types one request line; an `IntentExtractor` turns it into
//! structured fields. The primary extractor asks the Groq
//! chat-completions API to pull out the topic and addresses; the
//! fallback works entirely from patterns. Result counts and named
//! sites are pattern-extracted in both cases.

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_NUM_RESULTS: usize = 5;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1";
const GROQ_MODEL: &str = "llama3-70b-8192";
const GROQ_TIMEOUT: Duration = Duration::from_secs(10);

/// What one free-text request asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsletterIntent {
    /// Topic for search mode, when one was named.
    pub topic: Option<String>,
    pub recipients: Vec<String>,
    pub num_results: usize,
    /// Site names for feed mode, resolved to feed URLs later.
    pub sites: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Could not reach the intent API: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Intent API returned status {0}")]
    Api(u16),

    #[error("Intent API reply had no usable JSON: {0}")]
    BadReply(String),

    #[error("No topic, sites, or recipients could be extracted")]
    NothingExtracted,
}

/// Turns one free-text request into a `NewsletterIntent`.
#[async_trait]
pub trait IntentExtractor {
    async fn extract(&self, text: &str) -> Result<NewsletterIntent, ExtractError>;
}

// ============================================================================
// Pattern fallback
// ============================================================================

/// Pure pattern extraction, used when no intent API is configured or
/// the API call fails.
pub struct RegexExtractor;

#[async_trait]
impl IntentExtractor for RegexExtractor {
    async fn extract(&self, text: &str) -> Result<NewsletterIntent, ExtractError> {
        Ok(NewsletterIntent {
            topic: extract_topic(text),
            recipients: extract_emails(text),
            num_results: extract_num_results(text).unwrap_or(DEFAULT_NUM_RESULTS),
            sites: extract_sites(text),
        })
    }
}

/// Topic after "about"/"on"/"for"/"regarding", stopping before the
/// recipient clause; a looser "newsletter ..." pattern as fallback.
pub fn extract_topic(text: &str) -> Option<String> {
    let primary = Regex::new(r#"(?i)(?:about|on|for|regarding)\s+([^"]*?)(?:\s+to\s+|$)"#).unwrap();
    if let Some(captures) = primary.captures(text) {
        let topic = captures[1].trim();
        if !topic.is_empty() {
            return Some(topic.to_string());
        }
    }

    let general =
        Regex::new(r"(?i)newsletter\s+(?:about\s+)?(.+?)(?:\s+to\s+|\s+with\s+|$)").unwrap();
    general
        .captures(text)
        .map(|captures| captures[1].trim().to_string())
        .filter(|topic| !topic.is_empty())
}

pub fn extract_emails(text: &str) -> Vec<String> {
    let pattern = Regex::new(r"[\w.-]+@[\w.-]+\.\w+").unwrap();
    pattern
        .find_iter(text)
        .map(|found| found.as_str().to_string())
        .collect()
}

pub fn extract_num_results(text: &str) -> Option<usize> {
    let pattern =
        Regex::new(r"(?i)(?:with|using|include)\s+(\d+)\s+(?:results|articles)").unwrap();
    pattern
        .captures(text)
        .and_then(|captures| captures[1].parse().ok())
}

/// Domain-looking tokens that are not part of an email address, taken
/// as named sites for feed mode.
pub fn extract_sites(text: &str) -> Vec<String> {
    let email = Regex::new(r"[\w.-]+@[\w.-]+\.\w+").unwrap();
    let without_emails = email.replace_all(text, " ");

    let domain = Regex::new(r"\b(?:[A-Za-z0-9-]+\.)+[A-Za-z]{2,}\b").unwrap();
    domain
        .find_iter(&without_emails)
        .map(|found| found.as_str().to_lowercase())
        .collect()
}

// ============================================================================
// Groq extractor
// ============================================================================

/// Extracts intent through the Groq OpenAI-compatible chat API.
pub struct GroqExtractor {
    http: Client,
    api_key: String,
    base_url: String,
}

impl GroqExtractor {
    pub fn new(api_key: String) -> Self {
        Self {
            http: Client::builder()
                .timeout(GROQ_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            base_url: GROQ_API_URL.to_string(),
        }
    }

    fn prompt_for(text: &str) -> String {
        format!(
            r#"Extract the newsletter topic and email addresses from the following user input:

"{}"

Return ONLY a JSON object with the following format:
{{
    "topic": "the extracted topic",
    "emails": ["email1@example.com", "email2@example.com"]
}}

If no topic is found, set "topic" to null.
If no emails are found, set "emails" to an empty array."#,
            text
        )
    }
}

#[async_trait]
impl IntentExtractor for GroqExtractor {
    async fn extract(&self, text: &str) -> Result<NewsletterIntent, ExtractError> {
        let request = ChatRequest {
            model: GROQ_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: Self::prompt_for(text),
            }],
            max_tokens: 1024,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Api(status.as_u16()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| ExtractError::BadReply("no choices in reply".to_string()))?;

        let extracted = parse_model_reply(content)?;
        Ok(NewsletterIntent {
            topic: extracted.topic.filter(|topic| !topic.trim().is_empty()),
            recipients: extracted.emails,
            // Counts and sites are not part of the model contract.
            num_results: extract_num_results(text).unwrap_or(DEFAULT_NUM_RESULTS),
            sites: extract_sites(text),
        })
    }
}

/// Pull the first JSON object out of a model reply, which may wrap it
/// in prose or code fences.
fn parse_model_reply(content: &str) -> Result<ExtractedFields, ExtractError> {
    let json_blob = Regex::new(r"(?s)\{.*\}").unwrap();
    let blob = json_blob
        .find(content)
        .ok_or_else(|| ExtractError::BadReply(content.to_string()))?;

    serde_json::from_str(blob.as_str()).map_err(|e| ExtractError::BadReply(e.to_string()))
}

// --- Wire types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ExtractedFields {
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    emails: Vec<String>,
}

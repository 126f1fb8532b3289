//! newsroom — natural-language front-end for the newsletter gateway
//!
//! Takes one free-text request ("Send a newsletter about AI safety to
//! user@example.com with 6 results"), extracts the structured fields,
//! optionally auto-discovers feeds for named sites, and POSTs to the
//! gateway. The gateway does the actual fetching and sending.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod client;
mod discover;
mod intent;

use client::GatewayClient;
use intent::{GroqExtractor, IntentExtractor, NewsletterIntent, RegexExtractor};

#[derive(Parser)]
#[command(
    name = "newsroom",
    about = "Generate and send a newsletter from one request",
    version
)]
struct Cli {
    /// A request like "Send a newsletter about AI safety to user@example.com with 6 results"
    prompt: Option<String>,

    /// Gateway base URL; overrides NEWSROOM_SERVER_URL
    #[arg(long)]
    server: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr; stdout is for the acknowledgment.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let text = match cli.prompt {
        Some(prompt) => prompt,
        None => prompt_line(
            "Enter your request (e.g., 'Send a newsletter about AI advancements to user@example.com with 6 results'): ",
        )?,
    };
    if text.is_empty() {
        bail!("Nothing to do: the request was empty");
    }

    let mut intent = extract_intent(&text).await?;

    if intent.recipients.is_empty() {
        let raw = prompt_line(
            "No email addresses detected. Please enter recipient emails (comma separated): ",
        )?;
        intent.recipients = raw
            .split(',')
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(str::to_string)
            .collect();
    }
    if intent.recipients.is_empty() {
        bail!("No recipients given; nothing sent");
    }

    let gateway = match cli.server {
        Some(url) => GatewayClient::new(&url)?,
        None => GatewayClient::from_env()?,
    };

    // Named sites take feed mode; otherwise the topic takes search mode.
    if !intent.sites.is_empty() {
        if let Some(websites) = resolve_sites(&intent.sites).await {
            let recipient = &intent.recipients[0];
            if intent.recipients.len() > 1 {
                tracing::warn!(
                    "Feed mode takes a single recipient; sending to {} only",
                    recipient
                );
            }

            println!("Generating newsletter from: {}", join_keys(&websites));
            println!("Sending to: {}", recipient);

            let ack = gateway.send_feeds(recipient, &websites).await?;
            println!("{}", ack);
            return Ok(());
        }
        tracing::warn!("No feeds discovered for the named sites; trying topic mode");
    }

    let topic = match intent.topic.take() {
        Some(topic) => topic,
        None => prompt_line("Topic not detected. Please enter a topic for your newsletter: ")?,
    };
    if topic.is_empty() {
        return Err(intent::ExtractError::NothingExtracted.into());
    }

    println!("Generating newsletter about: {}", topic);
    println!("Sending to: {}", intent.recipients.join(", "));
    println!("Including {} results", intent.num_results);

    let ack = gateway
        .send_topic(&topic, &intent.recipients, intent.num_results)
        .await?;
    println!("{}", ack);
    Ok(())
}

/// Extract intent with the Groq API when a key is configured, falling
/// back to pattern matching when it is not or when the call fails.
async fn extract_intent(text: &str) -> Result<NewsletterIntent> {
    if let Ok(api_key) = std::env::var("GROQ_API_KEY") {
        match GroqExtractor::new(api_key).extract(text).await {
            Ok(intent) => {
                if let Some(topic) = &intent.topic {
                    tracing::info!("Topic extracted with intent API: {}", topic);
                }
                return Ok(intent);
            }
            Err(e) => {
                tracing::warn!("Intent API failed, falling back to pattern matching: {}", e)
            }
        }
    }

    let intent = RegexExtractor.extract(text).await?;
    if let Some(topic) = &intent.topic {
        tracing::info!("Topic extracted with patterns: {}", topic);
    }
    Ok(intent)
}

/// Probe each named site for a feed. Sites without one are skipped
/// with a warning; `None` when nothing resolved at all.
async fn resolve_sites(sites: &[String]) -> Option<BTreeMap<String, String>> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());

    let mut websites = BTreeMap::new();
    for site in sites {
        match discover::discover_feed(&http, site).await {
            Some(feed_url) => {
                websites.insert(discover::site_label(site), feed_url);
            }
            None => tracing::warn!("No feed found for {}, skipping", site),
        }
    }

    if websites.is_empty() {
        None
    } else {
        Some(websites)
    }
}

fn prompt_line(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn join_keys(websites: &BTreeMap<String, String>) -> String {
    websites.keys().cloned().collect::<Vec<_>>().join(", ")
}

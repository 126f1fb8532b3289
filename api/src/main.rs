//! Newsroom API server
//!
//! Aggregates RSS feeds and topic search results into an HTML email
//! newsletter with inline images. Uses hexagonal (ports & adapters)
//! architecture: the pipeline depends on traits, adapters talk to the
//! outside world.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod error;
mod handlers;
mod render;

#[cfg(test)]
mod test_utils;


use adapters::{ExaSearchClient, HttpMediaClient, RssFeedClient, SmtpMailer};
use app::{NewsletterService, ResolvedItem};
use config::Config;
use domain::entities::{DeliveryRequest, Source, DEFAULT_ITEM_LIMIT};
use domain::ports::{FeedClient, Mailer, MediaClient, SearchClient};
use render::render_newsletter;

/// The concrete pipeline this binary wires together.
type Service = NewsletterService<RssFeedClient, ExaSearchClient, HttpMediaClient, SmtpMailer>;

/// Application state shared across all handlers. Generic over the port
/// implementations so tests can stand the router up on mocks.
pub struct AppState<F, S, M, D>
where
    F: FeedClient,
    S: SearchClient,
    M: MediaClient,
    D: Mailer,
{
    pub service: Arc<NewsletterService<F, S, M, D>>,
}

impl<F, S, M, D> Clone for AppState<F, S, M, D>
where
    F: FeedClient,
    S: SearchClient,
    M: MediaClient,
    D: Mailer,
{
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Parser)]
#[command(name = "newsroom-api", about = "Newsletter gateway and pipeline", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP gateway (the default)
    Serve,
    /// Fetch the default feeds and deliver one newsletter now
    Send {
        /// Recipient address; falls back to EMAIL_RECIPIENT
        #[arg(long)]
        to: Option<String>,
        /// Item budget across all feeds
        #[arg(long, default_value_t = DEFAULT_ITEM_LIMIT)]
        limit: usize,
        /// Fetch and render, print a summary, send nothing
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,newsroom_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Send { to, limit, dry_run } => send(config, to, limit, dry_run).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting newsroom API...");

    let exa_api_key = config
        .exa_api_key
        .clone()
        .context("EXA_API_KEY must be set to serve search requests")?;

    // Create adapters
    let feeds = Arc::new(RssFeedClient::new());
    let search = Arc::new(ExaSearchClient::new(exa_api_key));
    let media = Arc::new(HttpMediaClient::new());
    let mailer = Arc::new(SmtpMailer::new(&config).context("Failed to build SMTP transport")?);

    // Create the pipeline service
    let service = Arc::new(NewsletterService::new(feeds, search, media, mailer));

    let state = AppState { service };

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route(
            "/generate_and_send_newsletter",
            post(handlers::generate_and_send_newsletter),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn send(
    config: Config,
    to: Option<String>,
    limit: usize,
    dry_run: bool,
) -> anyhow::Result<()> {
    let recipient = to
        .or_else(|| config.email_recipient.clone())
        .context("No recipient: pass --to or set EMAIL_RECIPIENT")?;

    let request = DeliveryRequest {
        recipients: vec![recipient],
        sources: Source::default_feeds(),
        limit,
    };

    let feeds = Arc::new(RssFeedClient::new());
    // Feed-only runs never call the search client.
    let search = Arc::new(ExaSearchClient::new(
        config.exa_api_key.clone().unwrap_or_default(),
    ));
    let media = Arc::new(HttpMediaClient::new());
    let mailer = Arc::new(SmtpMailer::new(&config).context("Failed to build SMTP transport")?);
    let service = NewsletterService::new(feeds, search, media, mailer);

    if dry_run {
        let items = service.fetch_items(&request).await?;
        let resolved: Vec<ResolvedItem> = items
            .into_iter()
            .map(|item| ResolvedItem { item, image: None })
            .collect();
        let email = render_newsletter(&resolved, &request.branding(), Utc::now());

        println!("{}", email.subject);
        for entry in resolved.iter().filter(|entry| entry.item.is_renderable()) {
            println!("- {} ({})", entry.item.title, entry.item.source_name);
        }
        return Ok(());
    }

    let report = service.run(&request).await?;
    println!(
        "Sent \"{}\": {} item(s) to {} recipient(s)",
        report.subject, report.items_rendered, report.recipients
    );
    Ok(())
}

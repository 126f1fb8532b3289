//! Application layer
//!
//! Contains the pipeline orchestration. Services coordinate between
//! domain entities, ports, and the renderer.

pub mod fetcher;
pub mod newsletter_service;

pub use fetcher::{Fetcher, PER_FEED_ITEM_CAP};
pub use newsletter_service::{DeliveryReport, NewsletterService, ResolvedItem};

//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod exa;
pub mod media;
pub mod rss;
pub mod smtp;
mod text;

pub use exa::ExaSearchClient;
pub use media::{HttpMediaClient, ImageSpool};
pub use rss::RssFeedClient;
pub use smtp::SmtpMailer;

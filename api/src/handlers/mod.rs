//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod newsletter;

pub use newsletter::generate_and_send_newsletter;

//! Domain ports (traits)
//!
//! Port traits define interfaces that the pipeline requires.
//! Adapters provide concrete implementations of these traits.

pub mod content;
pub mod mailer;
pub mod media;

pub use content::{FeedClient, SearchClient};
pub use mailer::Mailer;
pub use media::{FetchedImage, MediaClient};

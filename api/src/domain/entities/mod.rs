//! Domain entities
//!
//! Pure domain models for the newsletter pipeline: what to fetch, what
//! was fetched, and what gets delivered.

pub mod email;
pub mod item;
pub mod request;
pub mod source;

pub use email::{InlineImage, RenderedEmail};
pub use item::NewsItem;
pub use request::{Branding, DeliveryRequest, DEFAULT_ITEM_LIMIT};
pub use source::{Source, DEFAULT_FEEDS};

//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Domain models for sources, items, and rendered email
//! - `ports`: Trait definitions for external dependencies

pub mod entities;
pub mod ports;

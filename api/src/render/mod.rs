//! Render module
//!
//! Pure HTML rendering for the newsletter email.

pub mod renderer;

pub use renderer::render_newsletter;

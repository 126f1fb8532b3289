//! Port for email delivery

use async_trait::async_trait;

use crate::domain::entities::RenderedEmail;
use crate::error::DeliveryError;

/// Delivers a rendered newsletter.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send `email` to every address in `recipients` in one transaction.
    async fn send(&self, email: &RenderedEmail, recipients: &[String])
        -> Result<(), DeliveryError>;
}

//! SMTP delivery via lettre
//!
//! The newsletter goes out as one multipart/related message: an HTML
//! body first, then each spooled image as an inline attachment whose
//! Content-ID matches the `cid:` reference in the body. All recipients
//! share a single transaction.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment, Body, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::Config;
use crate::domain::entities::RenderedEmail;
use crate::domain::ports::Mailer;
use crate::error::DeliveryError;

/// Sends newsletters through a STARTTLS SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
}

impl SmtpMailer {
    pub fn new(config: &Config) -> Result<Self, DeliveryError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.email_user.clone(),
                config.email_app_password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            sender: config.email_user.clone(),
        })
    }

    async fn assemble(
        &self,
        email: &RenderedEmail,
        recipients: &[String],
    ) -> Result<Message, DeliveryError> {
        let mut builder = Message::builder()
            .from(self.sender.parse::<Mailbox>()?)
            .subject(email.subject.clone());
        for recipient in recipients {
            builder = builder.to(recipient.parse::<Mailbox>()?);
        }

        let mut related = MultiPart::related().singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_HTML)
                .body(email.html_body.clone()),
        );
        for image in &email.inline_images {
            let bytes = tokio::fs::read(&image.path).await?;
            let content_type = ContentType::parse(&image.mime_type)
                .map_err(|_| DeliveryError::ContentType(image.mime_type.clone()))?;
            related = related.singlepart(
                Attachment::new_inline(image.content_id.clone())
                    .body(Body::new(bytes), content_type),
            );
        }

        Ok(builder.multipart(related)?)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        email: &RenderedEmail,
        recipients: &[String],
    ) -> Result<(), DeliveryError> {
        let message = self.assemble(email, recipients).await?;
        self.transport.send(message).await?;
        tracing::info!(
            "Delivered \"{}\" to {} recipient(s) with {} inline image(s)",
            email.subject,
            recipients.len(),
            email.inline_images.len()
        );
        Ok(())
    }
}

//! Image retrieval and the on-disk spool for inline attachments
//!
//! Downloaded bytes are only accepted when their magic bytes sniff as a
//! known image format; extensions and Content-Type headers are not
//! trusted. Accepted images live in a temp-dir spool, named by their
//! Content-ID, until the send finishes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tempfile::TempDir;
use url::Url;
use uuid::Uuid;

use crate::domain::entities::InlineImage;
use crate::domain::ports::{FetchedImage, MediaClient};
use crate::error::MediaError;

const IMAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Downloads images over HTTP.
pub struct HttpMediaClient {
    http: Client,
}

impl HttpMediaClient {
    pub fn new() -> Self {
        Self {
            http: Client::builder()
                .user_agent(concat!("newsroom/", env!("CARGO_PKG_VERSION")))
                .timeout(IMAGE_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedImage, MediaError> {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let mime_type = sniff_mime(&bytes).ok_or(MediaError::UnrecognizedFormat)?;
        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            mime_type: mime_type.to_string(),
        })
    }
}

impl Default for HttpMediaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaClient for HttpMediaClient {
    async fn resolve_image(&self, url: &Url) -> Result<FetchedImage, MediaError> {
        self.fetch(url).await
    }

    async fn resolve_favicon(&self, origin: &Url) -> Result<FetchedImage, MediaError> {
        let url = origin.join("/favicon.ico")?;
        self.fetch(&url).await
    }
}

/// MIME type from leading magic bytes. `None` for anything that is not
/// a known image format.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'B', b'M', ..] => Some("image/bmp"),
        [0x00, 0x00, 0x01, 0x00, ..] => Some("image/x-icon"),
        _ => None,
    }
}

/// Temp-dir backed store for images between resolve and send.
///
/// Files are named by Content-ID. `cleanup` removes the directory; the
/// `TempDir` drop does the same if a run aborts early.
pub struct ImageSpool {
    dir: TempDir,
}

impl ImageSpool {
    pub fn new() -> Result<Self, MediaError> {
        let dir = tempfile::Builder::new().prefix("newsroom-img-").tempdir()?;
        Ok(Self { dir })
    }

    /// Write image bytes to the spool, returning the inline reference
    /// shared by the renderer and the mailer.
    pub async fn store(&self, image: FetchedImage) -> Result<InlineImage, MediaError> {
        let content_id = format!(
            "{}.{}",
            Uuid::new_v4().simple(),
            extension_for(&image.mime_type)
        );
        let path = self.dir.path().join(&content_id);
        tokio::fs::write(&path, &image.bytes).await?;

        Ok(InlineImage {
            content_id,
            path,
            mime_type: image.mime_type,
        })
    }

    /// Delete the spool directory and everything in it.
    pub fn cleanup(self) -> std::io::Result<()> {
        self.dir.close()
    }
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/x-icon" => "ico",
        _ => "img",
    }
}

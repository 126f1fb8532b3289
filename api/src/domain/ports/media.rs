//! Port for image retrieval

use async_trait::async_trait;
use url::Url;

use crate::error::MediaError;

/// Raw image bytes with a MIME type sniffed from their content.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Downloads article images and site favicons.
#[async_trait]
pub trait MediaClient: Send + Sync {
    async fn resolve_image(&self, url: &Url) -> Result<FetchedImage, MediaError>;

    /// Fetch the favicon for a site root, used when an item offers no
    /// usable article image.
    async fn resolve_favicon(&self, origin: &Url) -> Result<FetchedImage, MediaError>;
}

//! Rendered email artifacts

use std::path::PathBuf;

/// An image spooled to disk and referenced from the HTML body by CID.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    /// Content-ID the HTML references via `src="cid:..."`. Doubles as
    /// the spool file name.
    pub content_id: String,
    /// Location of the spooled bytes, valid until the spool is removed.
    pub path: PathBuf,
    pub mime_type: String,
}

/// A fully rendered newsletter, ready for the mailer.
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub subject: String,
    pub html_body: String,
    /// Inline images in the order their CIDs appear in `html_body`.
    pub inline_images: Vec<InlineImage>,
}

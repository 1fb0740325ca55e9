//! Staged attachment builder.
//!
//! [`AttachmentBuilder`] only offers content sources. Each source returns an
//! [`AttachmentOptions`], which is the only type with `build()`, so an
//! attachment cannot be configured or built before its content is chosen.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::mime_map::{GuessMimeMapper, MimeMapper};
use crate::types::{encode_base64, read_file, Attachment, Disposition};

/// First stage: choose where the content comes from.
#[derive(Debug, Default, Clone, Copy)]
pub struct AttachmentBuilder;

impl AttachmentBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Content given as Base64 text.
    pub fn from_base64(
        self,
        content: impl Into<String>,
        filename: impl Into<String>,
    ) -> AttachmentOptions {
        AttachmentOptions::new(Source::Base64(content.into()), Some(filename.into()))
    }

    /// Content given as raw bytes; encoded at build time.
    pub fn from_bytes(
        self,
        bytes: impl Into<Vec<u8>>,
        filename: impl Into<String>,
    ) -> AttachmentOptions {
        AttachmentOptions::new(Source::Bytes(bytes.into()), Some(filename.into()))
    }

    /// Content read from a file at build time. The filename defaults to the
    /// file's own name.
    pub fn from_file(self, path: impl Into<PathBuf>) -> AttachmentOptions {
        AttachmentOptions::new(Source::File(path.into()), None)
    }
}

enum Source {
    Base64(String),
    Bytes(Vec<u8>),
    File(PathBuf),
}

/// Second stage: optional settings, then [`AttachmentOptions::build`].
pub struct AttachmentOptions {
    source: Source,
    filename: Option<String>,
    mime_type: Option<String>,
    disposition: Disposition,
    content_id: Option<String>,
    mime_mapper: Arc<dyn MimeMapper>,
}

impl AttachmentOptions {
    fn new(source: Source, filename: Option<String>) -> Self {
        Self {
            source,
            filename,
            mime_type: None,
            disposition: Disposition::Attachment,
            content_id: None,
            mime_mapper: Arc::new(GuessMimeMapper),
        }
    }

    pub fn disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }

    /// Shorthand for `disposition(Disposition::Inline)`.
    pub fn inline(self) -> Self {
        self.disposition(Disposition::Inline)
    }

    /// Content-ID for an inline attachment. Ignored for regular attachments.
    pub fn content_id(mut self, id: impl Into<String>) -> Self {
        self.content_id = Some(id.into());
        self
    }

    /// Override the filename.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the MIME type instead of deducing it from the filename.
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn mime_mapper(mut self, mapper: Arc<dyn MimeMapper>) -> Self {
        self.mime_mapper = mapper;
        self
    }

    /// Validate and create the attachment.
    pub fn build(self) -> Result<Attachment, ValidationError> {
        let (content, default_filename) = match self.source {
            Source::Base64(content) => (content, None),
            Source::Bytes(bytes) => (encode_base64(&bytes), None),
            Source::File(path) => {
                let (bytes, name) = read_file(&path)?;
                (encode_base64(&bytes), Some(name))
            }
        };

        let filename = self.filename.or(default_filename).unwrap_or_default();

        Attachment::new_with_mapper(
            content,
            filename,
            self.mime_type.as_deref(),
            self.disposition,
            self.content_id.as_deref(),
            self.mime_mapper.as_ref(),
        )
    }
}

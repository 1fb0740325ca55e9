//! Attachments.

use base64::Engine;
use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::builders::AttachmentBuilder;
use crate::error::ValidationError;
use crate::mime_map::{GuessMimeMapper, MimeMapper};

/// Maximum filename length in characters.
pub const MAX_FILENAME_LENGTH: usize = 1000;

/// How the attachment is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Regular attachment.
    #[default]
    Attachment,
    /// Rendered in the body and referenced by Content-ID.
    Inline,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Inline => "inline",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated attachment. The content is Base64 text and may be empty.
///
/// `content_id` is present exactly when the disposition is
/// [`Disposition::Inline`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    content: String,
    disposition: Disposition,
    filename: String,
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    content_id: Option<String>,
    #[serde(rename = "type")]
    mime_type: String,
}

impl Attachment {
    /// Start a staged builder.
    pub fn builder() -> AttachmentBuilder {
        AttachmentBuilder::new()
    }

    /// Create an attachment from all of its parts, deducing a missing MIME
    /// type from the filename.
    pub fn new(
        content: impl Into<String>,
        filename: impl Into<String>,
        mime_type: Option<&str>,
        disposition: Disposition,
        content_id: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Self::new_with_mapper(
            content,
            filename,
            mime_type,
            disposition,
            content_id,
            &GuessMimeMapper,
        )
    }

    /// Same as [`Attachment::new`] with a caller-supplied MIME mapper.
    pub fn new_with_mapper(
        content: impl Into<String>,
        filename: impl Into<String>,
        mime_type: Option<&str>,
        disposition: Disposition,
        content_id: Option<&str>,
        mapper: &dyn MimeMapper,
    ) -> Result<Self, ValidationError> {
        let content = strip_whitespace(content.into());
        validate_base64(&content)?;

        let filename = filename.into();
        validate_filename(&filename)?;

        let mime_type = match mime_type {
            Some(explicit) => {
                if explicit.trim().is_empty() {
                    return Err(ValidationError::EmptyMimeType);
                }
                if !mapper.is_valid_mime_type(explicit) {
                    return Err(ValidationError::InvalidMimeType {
                        mime_type: explicit.to_string(),
                    });
                }
                explicit.to_string()
            }
            None => mapper
                .mime_type(&filename)
                .filter(|m| !m.trim().is_empty())
                .ok_or_else(|| ValidationError::UnknownMimeType {
                    filename: filename.clone(),
                })?,
        };

        let content_id = match disposition {
            Disposition::Attachment => None,
            Disposition::Inline => Some(
                content_id
                    .filter(|id| !id.trim().is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            ),
        };

        Ok(Self {
            content,
            disposition,
            filename,
            content_id,
            mime_type,
        })
    }

    /// Regular attachment from Base64 text.
    pub fn from_base64(
        content: impl Into<String>,
        filename: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::new(content, filename, None, Disposition::Attachment, None)
    }

    /// Regular attachment from raw bytes.
    pub fn from_bytes(
        bytes: impl AsRef<[u8]>,
        filename: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::from_base64(encode(bytes.as_ref()), filename)
    }

    /// Regular attachment read from disk, named after the file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let (bytes, filename) = read_file(path.as_ref())?;
        Self::from_bytes(bytes, filename)
    }

    /// Inline attachment from Base64 text. A fresh Content-ID is generated
    /// when none is given.
    pub fn inline_from_base64(
        content: impl Into<String>,
        filename: impl Into<String>,
        content_id: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Self::new(content, filename, None, Disposition::Inline, content_id)
    }

    /// Inline attachment from raw bytes.
    pub fn inline_from_bytes(
        bytes: impl AsRef<[u8]>,
        filename: impl Into<String>,
        content_id: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Self::inline_from_base64(encode(bytes.as_ref()), filename, content_id)
    }

    /// Base64 content.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn disposition(&self) -> Disposition {
        self.disposition
    }

    pub fn content_id(&self) -> Option<&str> {
        self.content_id.as_deref()
    }

    /// `cid:` reference for use in HTML bodies.
    pub fn cid_reference(&self) -> Option<String> {
        self.content_id.as_ref().map(|id| format!("cid:{}", id))
    }
}

pub(crate) fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub(crate) fn read_file(path: &Path) -> Result<(Vec<u8>, String), ValidationError> {
    let bytes = std::fs::read(path).map_err(|e| ValidationError::FileRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((bytes, filename))
}

/// Line-wrapped Base64 (76-column MIME style) is unwrapped.
fn strip_whitespace(content: String) -> String {
    if content.bytes().any(|b| b.is_ascii_whitespace()) {
        content.chars().filter(|c| !c.is_ascii_whitespace()).collect()
    } else {
        content
    }
}

fn validate_base64(content: &str) -> Result<(), ValidationError> {
    if content.is_empty() {
        return Ok(());
    }
    base64::engine::general_purpose::STANDARD
        .decode(content)
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidBase64 {
            message: e.to_string(),
        })
}

fn validate_filename(filename: &str) -> Result<(), ValidationError> {
    if filename.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }
    let length = filename.chars().count();
    if length > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong {
            length,
            max: MAX_FILENAME_LENGTH,
        });
    }
    Ok(())
}

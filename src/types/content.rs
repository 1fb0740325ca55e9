//! Message body parts.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Body content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContentType {
    #[serde(rename = "text/plain")]
    Text,
    #[serde(rename = "text/html")]
    Html,
}

impl ContentType {
    /// MIME string sent on the wire.
    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Text => "text/plain",
            Self::Html => "text/html",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

impl FromStr for ContentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text/plain" => Ok(Self::Text),
            "text/html" => Ok(Self::Html),
            _ => Err(ValidationError::InvalidMimeType {
                mime_type: s.to_string(),
            }),
        }
    }
}

/// A body part: non-blank text plus its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Content {
    body: String,
    #[serde(rename = "type")]
    content_type: ContentType,
}

impl Content {
    /// Create a body part.
    pub fn new(body: impl Into<String>, content_type: ContentType) -> Result<Self, ValidationError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        Ok(Self { body, content_type })
    }

    /// Plain-text body part.
    pub fn text(body: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(body, ContentType::Text)
    }

    /// HTML body part.
    pub fn html(body: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(body, ContentType::Html)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }
}

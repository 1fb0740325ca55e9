//! Message aggregate and its wire representation.

use serde::{Serialize, Serializer};

use super::{Attachment, Content, MailUser};
use crate::builders::MessageBuilder;
use crate::error::ValidationError;

/// All parts of a message, supplied at once to [`Message::from_parts`].
#[derive(Debug, Clone)]
pub struct MessageParts {
    pub from: MailUser,
    /// Overrides the `From` header shown to recipients.
    pub header_from: Option<MailUser>,
    pub subject: String,
    pub tos: Vec<MailUser>,
    pub cc: Vec<MailUser>,
    pub bcc: Vec<MailUser>,
    pub reply_tos: Vec<MailUser>,
    pub content: Vec<Content>,
    pub attachments: Vec<Attachment>,
}

impl MessageParts {
    /// Parts with only a sender and subject set.
    pub fn new(from: MailUser, subject: impl Into<String>) -> Self {
        Self {
            from,
            header_from: None,
            subject: subject.into(),
            tos: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            reply_tos: Vec::new(),
            content: Vec::new(),
            attachments: Vec::new(),
        }
    }
}

/// A validated, immutable e-mail message.
///
/// Every instance has a non-blank subject, at least one `to` recipient and at
/// least one content part. Recipient lists keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    from: MailUser,
    header_from: Option<MailUser>,
    subject: String,
    tos: Vec<MailUser>,
    cc: Vec<MailUser>,
    bcc: Vec<MailUser>,
    reply_tos: Vec<MailUser>,
    content: Vec<Content>,
    attachments: Vec<Attachment>,
}

impl Message {
    /// Start a fluent builder.
    pub fn builder() -> MessageBuilder {
        MessageBuilder::new()
    }

    /// Create a message with the required parts only.
    pub fn new(
        from: MailUser,
        subject: impl Into<String>,
        tos: Vec<MailUser>,
        content: Vec<Content>,
    ) -> Result<Self, ValidationError> {
        let mut parts = MessageParts::new(from, subject);
        parts.tos = tos;
        parts.content = content;
        Self::from_parts(parts)
    }

    /// Create a message from all of its parts.
    pub fn from_parts(parts: MessageParts) -> Result<Self, ValidationError> {
        if parts.subject.trim().is_empty() {
            return Err(ValidationError::EmptySubject);
        }
        if parts.tos.is_empty() {
            return Err(ValidationError::MissingField { field: "to" });
        }
        if parts.content.is_empty() {
            return Err(ValidationError::MissingField { field: "content" });
        }

        Ok(Self {
            from: parts.from,
            header_from: parts.header_from,
            subject: parts.subject,
            tos: parts.tos,
            cc: parts.cc,
            bcc: parts.bcc,
            reply_tos: parts.reply_tos,
            content: parts.content,
            attachments: parts.attachments,
        })
    }

    pub fn from(&self) -> &MailUser {
        &self.from
    }

    pub fn header_from(&self) -> Option<&MailUser> {
        self.header_from.as_ref()
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn tos(&self) -> &[MailUser] {
        &self.tos
    }

    pub fn cc(&self) -> &[MailUser] {
        &self.cc
    }

    pub fn bcc(&self) -> &[MailUser] {
        &self.bcc
    }

    pub fn reply_tos(&self) -> &[MailUser] {
        &self.reply_tos
    }

    pub fn content(&self) -> &[Content] {
        &self.content
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Total of `to`, `cc` and `bcc` recipients.
    pub fn recipient_count(&self) -> usize {
        self.tos.len() + self.cc.len() + self.bcc.len()
    }
}

#[derive(Serialize)]
struct WireHeaders<'a> {
    from: &'a MailUser,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage<'a> {
    attachments: &'a [Attachment],
    content: &'a [Content],
    from: &'a MailUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    headers: Option<WireHeaders<'a>>,
    subject: &'a str,
    tos: &'a [MailUser],
    cc: &'a [MailUser],
    bcc: &'a [MailUser],
    reply_tos: &'a [MailUser],
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireMessage {
            attachments: &self.attachments,
            content: &self.content,
            from: &self.from,
            headers: self.header_from.as_ref().map(|from| WireHeaders { from }),
            subject: &self.subject,
            tos: &self.tos,
            cc: &self.cc,
            bcc: &self.bcc,
            reply_tos: &self.reply_tos,
        }
        .serialize(serializer)
    }
}

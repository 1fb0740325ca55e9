//! Fluent message builder.

use crate::error::ValidationError;
use crate::types::{Attachment, Content, ContentType, MailUser, Message, MessageParts};

/// Builder for [`Message`].
///
/// Address and content arguments are validated as they are added; the first
/// failure is kept and returned by [`MessageBuilder::build`]. Required parts
/// are checked only at `build()`.
///
/// # Examples
///
/// ```rust
/// use transactional_mail::types::Message;
///
/// let message = Message::builder()
///     .from(("sender@example.com", "Sender"))
///     .to("recipient@example.com")
///     .cc("Team <team@example.com>")
///     .subject("Quarterly report")
///     .text("The report is attached.")
///     .html("<p>The report is attached.</p>")
///     .build()?;
///
/// assert_eq!(message.tos()[0].email(), "recipient@example.com");
/// # Ok::<(), transactional_mail::error::ValidationError>(())
/// ```
#[derive(Debug, Default)]
pub struct MessageBuilder {
    from: Option<MailUser>,
    header_from: Option<MailUser>,
    subject: Option<String>,
    tos: Vec<MailUser>,
    cc: Vec<MailUser>,
    bcc: Vec<MailUser>,
    reply_tos: Vec<MailUser>,
    content: Vec<Content>,
    attachments: Vec<Attachment>,
    error: Option<ValidationError>,
}

impl MessageBuilder {
    /// Create a new message builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn keep<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.error.get_or_insert(e);
                None
            }
        }
    }

    fn user<U>(&mut self, user: U) -> Option<MailUser>
    where
        U: TryInto<MailUser>,
        U::Error: Into<ValidationError>,
    {
        self.keep(user.try_into().map_err(Into::into))
    }

    /// Set the envelope sender.
    ///
    /// Accepts a [`MailUser`], an address or `"Name <address>"` string, or an
    /// `(address, name)` pair.
    pub fn from<U>(mut self, user: U) -> Self
    where
        U: TryInto<MailUser>,
        U::Error: Into<ValidationError>,
    {
        if let Some(user) = self.user(user) {
            self.from = Some(user);
        }
        self
    }

    /// Set the sender shown in the `From` header, when it differs from the
    /// envelope sender.
    pub fn header_from<U>(mut self, user: U) -> Self
    where
        U: TryInto<MailUser>,
        U::Error: Into<ValidationError>,
    {
        if let Some(user) = self.user(user) {
            self.header_from = Some(user);
        }
        self
    }

    /// Add a "To" recipient.
    pub fn to<U>(mut self, user: U) -> Self
    where
        U: TryInto<MailUser>,
        U::Error: Into<ValidationError>,
    {
        if let Some(user) = self.user(user) {
            self.tos.push(user);
        }
        self
    }

    /// Add a "CC" recipient.
    pub fn cc<U>(mut self, user: U) -> Self
    where
        U: TryInto<MailUser>,
        U::Error: Into<ValidationError>,
    {
        if let Some(user) = self.user(user) {
            self.cc.push(user);
        }
        self
    }

    /// Add a "BCC" recipient.
    pub fn bcc<U>(mut self, user: U) -> Self
    where
        U: TryInto<MailUser>,
        U::Error: Into<ValidationError>,
    {
        if let Some(user) = self.user(user) {
            self.bcc.push(user);
        }
        self
    }

    /// Add a "Reply-To" address.
    pub fn reply_to<U>(mut self, user: U) -> Self
    where
        U: TryInto<MailUser>,
        U::Error: Into<ValidationError>,
    {
        if let Some(user) = self.user(user) {
            self.reply_tos.push(user);
        }
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Add a body part.
    pub fn content(mut self, body: impl Into<String>, content_type: ContentType) -> Self {
        if let Some(content) = self.keep(Content::new(body, content_type)) {
            self.content.push(content);
        }
        self
    }

    /// Add a plain-text body part.
    pub fn text(self, body: impl Into<String>) -> Self {
        self.content(body, ContentType::Text)
    }

    /// Add an HTML body part.
    pub fn html(self, body: impl Into<String>) -> Self {
        self.content(body, ContentType::Html)
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Build the message.
    ///
    /// Returns the first argument error seen, otherwise the first missing
    /// part in the order sender, recipient, subject, content.
    pub fn build(self) -> Result<Message, ValidationError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let from = self.from.ok_or(ValidationError::MissingField { field: "from" })?;
        if self.tos.is_empty() {
            return Err(ValidationError::MissingField { field: "to" });
        }
        let subject = self
            .subject
            .ok_or(ValidationError::MissingField { field: "subject" })?;
        if self.content.is_empty() {
            return Err(ValidationError::MissingField { field: "content" });
        }

        Message::from_parts(MessageParts {
            from,
            header_from: self.header_from,
            subject,
            tos: self.tos,
            cc: self.cc,
            bcc: self.bcc,
            reply_tos: self.reply_tos,
            content: self.content,
            attachments: self.attachments,
        })
    }
}

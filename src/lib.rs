//! Transactional Mail Integration Module
//!
//! Client for a transactional e-mail REST API.
//!
//! # Features
//!
//! - OAuth2 client-credentials authentication (RFC 6749 Section 4.4)
//! - Per-client token cache with early refresh and single-flight renewal
//! - Validated, immutable messages, attachments, users and content parts
//! - Direct constructors and fluent builders with the same validation
//! - Regional endpoints (US, EU, AU)
//!
//! # Example
//!
//! ```rust,ignore
//! use transactional_mail::{Attachment, MailClient, MailClientConfig, Message, Region};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MailClientConfig::builder()
//!         .client_id("my-client-id")
//!         .client_secret("my-client-secret")
//!         .region(Region::Eu)
//!         .build()?;
//!
//!     let client = MailClient::new(config)?;
//!
//!     let logo = Attachment::builder()
//!         .from_file("logo.png")
//!         .inline()
//!         .content_id("logo")
//!         .build()?;
//!
//!     let message = Message::builder()
//!         .from(("noreply@example.com", "Example"))
//!         .to("user@example.com")
//!         .subject("Welcome")
//!         .text("Welcome aboard!")
//!         .html("<img src=\"cid:logo\"><p>Welcome aboard!</p>")
//!         .attachment(logo)
//!         .build()?;
//!
//!     let result = client.send(&message).await?;
//!     println!("{} {}", result.status(), result.message_id);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: message, attachment, user, content and send result
//! - `builders`: fluent builders for attachments and messages
//! - `token`: client-credentials flow and the token cache
//! - `transport`: HTTP transport and the bearer-token wrapper
//! - `config`: client configuration, regions and environment loading
//! - `mime_map`: MIME type lookup for attachments
//! - `error`: error hierarchy
//! - `client`: high-level mail client
//! - `mocks`: test doubles for the collaborator traits

pub mod builders;
pub mod client;
pub mod config;
pub mod error;
pub mod mime_map;
pub mod mocks;
pub mod token;
pub mod transport;
pub mod types;

// Re-export main client
pub use client::MailClient;

// Re-export configuration
pub use config::{ClientAuthMethod, MailClientConfig, MailClientConfigBuilder, Region};

// Re-export errors
pub use error::{
    AuthenticationError, ConfigurationError, MailError, MailResult, TransportError,
    ValidationError,
};

// Re-export types
pub use types::{
    Attachment, Content, ContentType, Disposition, MailUser, Message, MessageParts, SendResult,
};

// Re-export builders
pub use builders::{AttachmentBuilder, AttachmentOptions, MessageBuilder};

// Re-export collaborators
pub use mime_map::{GuessMimeMapper, MimeMapper};
pub use token::{Clock, SystemClock, TokenCache};
pub use transport::{HttpTransport, ReqwestHttpTransport};

//! Builders
//!
//! Fluent construction of attachments and messages. Builders apply the same
//! validation as the direct constructors on the types themselves.

mod attachment;
mod message;

pub use attachment::{AttachmentBuilder, AttachmentOptions};
pub use message::MessageBuilder;

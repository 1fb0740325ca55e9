//! Domain Types
//!
//! Validated, immutable building blocks of an outgoing message.

mod attachment;
mod content;
mod message;
mod result;
mod user;

pub use attachment::{Attachment, Disposition, MAX_FILENAME_LENGTH};
pub use content::{Content, ContentType};
pub use message::{Message, MessageParts};
pub use result::SendResult;
pub use user::MailUser;

pub(crate) use attachment::{encode as encode_base64, read_file};

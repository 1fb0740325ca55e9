//! Tests for message construction and the JSON sent to the API.

use pretty_assertions::assert_eq;
use serde_json::json;

use transactional_mail::{
    Attachment, Content, ContentType, Disposition, MailUser, Message, MessageParts,
    ValidationError,
};

#[test]
fn test_full_message_wire_shape() {
    let logo = Attachment::builder()
        .from_bytes(b"png".to_vec(), "logo.png")
        .inline()
        .content_id("logo")
        .build()
        .unwrap();
    let report = Attachment::from_base64("JVBERg==", "report.pdf").unwrap();

    let message = Message::builder()
        .from(("bounce@example.com", "Bounces"))
        .header_from(("news@example.com", "Newsletter"))
        .to("first@example.com")
        .to(("second@example.com", "Second"))
        .cc("cc@example.com")
        .bcc("bcc@example.com")
        .reply_to("support@example.com")
        .subject("Monthly update")
        .text("Plain body")
        .html("<img src=\"cid:logo\">")
        .attachment(logo)
        .attachment(report)
        .build()
        .unwrap();

    let expected = json!({
        "attachments": [
            {
                "content": "cG5n",
                "disposition": "inline",
                "filename": "logo.png",
                "id": "logo",
                "type": "image/png"
            },
            {
                "content": "JVBERg==",
                "disposition": "attachment",
                "filename": "report.pdf",
                "type": "application/pdf"
            }
        ],
        "content": [
            {"body": "Plain body", "type": "text/plain"},
            {"body": "<img src=\"cid:logo\">", "type": "text/html"}
        ],
        "from": {"email": "bounce@example.com", "name": "Bounces"},
        "headers": {"from": {"email": "news@example.com", "name": "Newsletter"}},
        "subject": "Monthly update",
        "tos": [
            {"email": "first@example.com"},
            {"email": "second@example.com", "name": "Second"}
        ],
        "cc": [{"email": "cc@example.com"}],
        "bcc": [{"email": "bcc@example.com"}],
        "replyTos": [{"email": "support@example.com"}]
    });

    assert_eq!(serde_json::to_value(&message).unwrap(), expected);
}

#[test]
fn test_key_order_on_the_wire() {
    let message = Message::builder()
        .from("a@x.com")
        .to("b@x.com")
        .subject("s")
        .text("hi")
        .build()
        .unwrap();

    let json = serde_json::to_string(&message).unwrap();
    assert_eq!(
        json,
        r#"{"attachments":[],"content":[{"body":"hi","type":"text/plain"}],"from":{"email":"a@x.com"},"subject":"s","tos":[{"email":"b@x.com"}],"cc":[],"bcc":[],"replyTos":[]}"#
    );
}

#[test]
fn test_construction_paths_agree() {
    let built = Message::builder()
        .from("a@x.com")
        .to("b@x.com")
        .subject("s")
        .content("hi", ContentType::Text)
        .build()
        .unwrap();

    let direct = Message::new(
        MailUser::new("a@x.com").unwrap(),
        "s",
        vec![MailUser::new("b@x.com").unwrap()],
        vec![Content::text("hi").unwrap()],
    )
    .unwrap();

    assert_eq!(built, direct);
}

#[test]
fn test_direct_construction_is_strict() {
    let parts = MessageParts::new(MailUser::new("a@x.com").unwrap(), "s");
    assert_eq!(
        Message::from_parts(parts),
        Err(ValidationError::MissingField { field: "to" })
    );
}

#[test]
fn test_empty_attachment_is_representable() {
    let attachment = Attachment::builder()
        .from_bytes(Vec::new(), "empty.txt")
        .build()
        .unwrap();

    assert_eq!(attachment.content(), "");
    assert_eq!(attachment.disposition(), Disposition::Attachment);
    assert_eq!(attachment.content_id(), None);
}

#[test]
fn test_inline_ids_are_unique() {
    let first = Attachment::inline_from_bytes(b"a", "a.png", None).unwrap();
    let second = Attachment::builder()
        .from_bytes(b"a".to_vec(), "a.png")
        .disposition(Disposition::Inline)
        .build()
        .unwrap();

    assert!(first.content_id().is_some());
    assert!(second.content_id().is_some());
    assert_ne!(first.content_id(), second.content_id());
}

//! End-to-end tests against a local mock HTTP server.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use transactional_mail::error::{AuthenticationError, TransportError};
use transactional_mail::transport::{HttpMethod, HttpRequest, HttpTransport};
use transactional_mail::{MailClient, MailClientConfig, MailError, Message, ReqwestHttpTransport};

fn config(server: &MockServer) -> MailClientConfig {
    MailClientConfig::builder()
        .client_id("client-id")
        .client_secret("client-secret")
        .add_scope("mail.send")
        .base_url(server.uri())
        .build()
        .unwrap()
}

fn message() -> Message {
    Message::builder()
        .from(("sender@example.com", "Sender"))
        .to("recipient@example.com")
        .subject("Hello")
        .text("Hi there")
        .build()
        .unwrap()
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=client-id"))
        .and(body_string_contains("scope=mail.send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "live-token",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_send_round_trip() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .and(header("authorization", "Bearer live-token"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "from": {"email": "sender@example.com", "name": "Sender"},
            "tos": [{"email": "recipient@example.com"}],
            "subject": "Hello",
            "content": [{"body": "Hi there", "type": "text/plain"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message_id": "msg-1",
            "reason": "Accepted",
            "request_id": "req-1"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = MailClient::new(config(&server)).unwrap();

    let first = client.send(&message()).await.unwrap();
    assert!(first.is_success());
    assert_eq!(first.message_id, "msg-1");
    assert_eq!(first.reason, "Accepted");
    assert_eq!(first.request_id, "req-1");

    // Second send reuses the cached token.
    let second = client.send(&message()).await.unwrap();
    assert_eq!(second.message_id, "msg-1");
}

#[tokio::test]
async fn test_api_rejection_with_plain_body() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = MailClient::new(config(&server)).unwrap();
    let result = client.send(&message()).await.unwrap();

    assert_eq!(result.status(), 500);
    assert_eq!(result.raw_json, "upstream exploded");
    assert_eq!(result.message_id, "");
    assert_eq!(result.reason, "");
    assert_eq!(result.request_id, "");
}

#[tokio::test]
async fn test_token_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "Unknown client"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = MailClient::new(config(&server)).unwrap();
    let err = client.send(&message()).await.unwrap_err();

    match err {
        MailError::Authentication(AuthenticationError::TokenRequestFailed {
            status,
            error,
            error_description,
        }) => {
            assert_eq!(status, 401);
            assert_eq!(error.as_deref(), Some("invalid_client"));
            assert_eq!(error_description.as_deref(), Some("Unknown client"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_reqwest_transport_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let transport =
        ReqwestHttpTransport::with_options(Some(Duration::from_millis(50)), 1024).unwrap();
    let request = HttpRequest::new(HttpMethod::Get, format!("{}/slow", server.uri()));

    let err = transport.send(request).await.unwrap_err();
    assert!(matches!(err, TransportError::Timeout { .. }));
}

#[tokio::test]
async fn test_reqwest_transport_response_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(2048)))
        .mount(&server)
        .await;

    let transport = Arc::new(ReqwestHttpTransport::with_options(None, 1024).unwrap());
    let request = HttpRequest::new(HttpMethod::Get, format!("{}/large", server.uri()));

    let err = transport.send(request).await.unwrap_err();
    assert!(matches!(err, TransportError::ResponseTooLarge { .. }));
}

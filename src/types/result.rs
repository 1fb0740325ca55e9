//! Send outcome.

use serde_json::Value;

use crate::transport::HttpResponse;

/// Result of a send call.
///
/// Built from any response; fields the body does not carry (or a body that
/// is not JSON at all) come out as empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    pub message_id: String,
    pub reason: String,
    pub request_id: String,
    /// Response body as received.
    pub raw_json: String,
    pub http_response: HttpResponse,
}

impl SendResult {
    pub fn from_response(response: HttpResponse) -> Self {
        let parsed: Value = serde_json::from_str(&response.body).unwrap_or(Value::Null);

        Self {
            message_id: text_field(&parsed, "message_id"),
            reason: text_field(&parsed, "reason"),
            request_id: text_field(&parsed, "request_id"),
            raw_json: response.body.clone(),
            http_response: response,
        }
    }

    /// HTTP status of the send call.
    pub fn status(&self) -> u16 {
        self.http_response.status
    }

    /// Whether the API accepted the message (2xx).
    pub fn is_success(&self) -> bool {
        self.http_response.is_success()
    }
}

/// Each field degrades on its own: numbers and booleans are rendered as
/// text, anything else is empty.
fn text_field(body: &Value, key: &str) -> String {
    match body.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_json_fields() {
        let body = r#"{"message_id":"m1","reason":"ok","request_id":"r1"}"#;
        let result = SendResult::from_response(HttpResponse::new(200, body));
        assert_eq!(result.message_id, "m1");
        assert_eq!(result.reason, "ok");
        assert_eq!(result.request_id, "r1");
        assert_eq!(result.raw_json, body);
        assert!(result.is_success());
    }

    #[test]
    fn test_non_json_body() {
        let result = SendResult::from_response(HttpResponse::new(502, "Bad Gateway"));
        assert_eq!(result.message_id, "");
        assert_eq!(result.reason, "");
        assert_eq!(result.request_id, "");
        assert_eq!(result.raw_json, "Bad Gateway");
        assert_eq!(result.status(), 502);
        assert!(!result.is_success());
    }

    #[test]
    fn test_partial_and_null_fields() {
        let body = r#"{"reason":"Invalid to[1]","message_id":null,"extra":42}"#;
        let result = SendResult::from_response(HttpResponse::new(400, body));
        assert_eq!(result.reason, "Invalid to[1]");
        assert_eq!(result.message_id, "");
        assert_eq!(result.request_id, "");
    }

    #[test]
    fn test_fields_degrade_independently() {
        let body = r#"{"message_id":"m1","reason":{"code":7},"request_id":123}"#;
        let result = SendResult::from_response(HttpResponse::new(200, body));
        assert_eq!(result.message_id, "m1");
        assert_eq!(result.reason, "");
        assert_eq!(result.request_id, "123");

        let array = SendResult::from_response(HttpResponse::new(200, r#"["m1"]"#));
        assert_eq!(array.message_id, "");
    }
}

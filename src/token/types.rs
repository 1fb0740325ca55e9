//! Token Types
//!
//! Token endpoint response and the cached bearer token.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::AuthenticationError;

/// Token response from the authorization server.
///
/// Every field is optional at the parsing level so that a missing
/// `access_token` or expiry maps to a dedicated error instead of a JSON error.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Token type (usually "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
    /// Expires in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Absolute expiry timestamp.
    #[serde(default, rename = ".expires", alias = "expires_at")]
    pub expires: Option<String>,
    /// Additional fields.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl TokenResponse {
    /// Absolute expiry as reported by the server, before any early-refresh
    /// offset. The absolute timestamp wins over `expires_in`.
    pub fn expiry(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, AuthenticationError> {
        if let Some(raw) = &self.expires {
            return parse_timestamp(raw);
        }

        let secs = self.expires_in.ok_or(AuthenticationError::MissingExpiry)?;
        i64::try_from(secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| AuthenticationError::InvalidExpiry {
                value: secs.to_string(),
            })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AuthenticationError> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| AuthenticationError::InvalidExpiry {
            value: raw.to_string(),
        })
}

/// Bearer token held by the cache.
#[derive(Clone)]
pub struct AccessToken {
    value: SecretString,
    /// Instant after which the cache stops using the token. The early-refresh
    /// offset is already applied.
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create new access token.
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: SecretString::new(value.into()),
            expires_at,
        }
    }

    /// Convert a token endpoint response, applying the early-refresh offset.
    ///
    /// The offset is capped at half of the token's remaining lifetime.
    pub fn from_response(
        response: TokenResponse,
        now: DateTime<Utc>,
        refresh_offset: Duration,
    ) -> Result<Self, AuthenticationError> {
        let value = response
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(AuthenticationError::MissingAccessToken)?
            .to_string();

        let expiry = response.expiry(now)?;

        // Offset is capped at half of the remaining lifetime.
        let lifetime = expiry.signed_duration_since(now);
        let offset = chrono::Duration::from_std(refresh_offset)
            .unwrap_or(lifetime)
            .min(lifetime / 2)
            .max(chrono::Duration::zero());
        let expires_at = expiry.checked_sub_signed(offset).ok_or_else(|| {
            AuthenticationError::InvalidExpiry {
                value: format!("{} minus {:?}", expiry, refresh_offset),
            }
        })?;

        Ok(Self::new(value, expires_at))
    }

    /// Get token value.
    pub fn secret(&self) -> &str {
        self.value.expose_secret()
    }

    /// Whether the token may still be used at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Format as Authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.value.expose_secret())
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_token_response_parsing() {
        let json = r#"{
            "access_token": "test-token",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "mail.send"
        }"#;

        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token.as_deref(), Some("test-token"));
        assert_eq!(response.expires_in, Some(3600));
        assert!(response.extra.contains_key("scope"));
    }

    #[test]
    fn test_relative_expiry_applies_offset() {
        let response = TokenResponse {
            access_token: Some("abc".to_string()),
            expires_in: Some(120),
            ..Default::default()
        };

        let token = AccessToken::from_response(response, epoch(), Duration::from_secs(60)).unwrap();
        assert_eq!(token.expires_at, epoch() + chrono::Duration::seconds(60));
        assert!(token.is_valid_at(epoch() + chrono::Duration::seconds(59)));
        assert!(!token.is_valid_at(epoch() + chrono::Duration::seconds(60)));
    }

    #[test]
    fn test_offset_capped_for_short_lived_tokens() {
        for expires_in in [60, 30] {
            let response = TokenResponse {
                access_token: Some("short".to_string()),
                expires_in: Some(expires_in),
                ..Default::default()
            };

            let token =
                AccessToken::from_response(response, epoch(), Duration::from_secs(60)).unwrap();
            let half = chrono::Duration::seconds(expires_in as i64 / 2);
            assert_eq!(token.expires_at, epoch() + half);
            assert!(token.is_valid_at(epoch()));
        }
    }

    #[test]
    fn test_absolute_expiry_in_the_past_is_not_extended() {
        let json = r#"{"access_token": "stale", "expires_at": "2023-12-31T23:59:00Z"}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();

        let token = AccessToken::from_response(response, epoch(), Duration::from_secs(60)).unwrap();
        assert_eq!(token.expires_at, Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 0).unwrap());
        assert!(!token.is_valid_at(epoch()));
    }

    #[test]
    fn test_absolute_expiry_wins() {
        let json = r#"{
            "access_token": "abc",
            "expires_in": 10,
            ".expires": "Mon, 01 Jan 2024 01:00:00 GMT"
        }"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();

        let token = AccessToken::from_response(response, epoch(), Duration::from_secs(60)).unwrap();
        assert_eq!(token.expires_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 59, 0).unwrap());
    }

    #[test]
    fn test_absolute_expiry_rfc3339_alias() {
        let json = r#"{"access_token": "abc", "expires_at": "2024-01-01T00:10:00Z"}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();

        let expiry = response.expiry(epoch()).unwrap();
        assert_eq!(expiry, Utc.with_ymd_and_hms(2024, 1, 1, 0, 10, 0).unwrap());
    }

    #[test]
    fn test_missing_access_token() {
        let response = TokenResponse {
            expires_in: Some(3600),
            ..Default::default()
        };
        let result = AccessToken::from_response(response, epoch(), Duration::ZERO);
        assert!(matches!(result, Err(AuthenticationError::MissingAccessToken)));
    }

    #[test]
    fn test_missing_expiry() {
        let response = TokenResponse {
            access_token: Some("abc".to_string()),
            ..Default::default()
        };
        let result = AccessToken::from_response(response, epoch(), Duration::ZERO);
        assert!(matches!(result, Err(AuthenticationError::MissingExpiry)));
    }

    #[test]
    fn test_unparseable_expiry() {
        let response = TokenResponse {
            access_token: Some("abc".to_string()),
            expires: Some("tomorrow".to_string()),
            ..Default::default()
        };
        let result = AccessToken::from_response(response, epoch(), Duration::ZERO);
        assert!(matches!(result, Err(AuthenticationError::InvalidExpiry { .. })));
    }

    #[test]
    fn test_authorization_header_and_debug() {
        let token = AccessToken::new("secret-token", epoch());
        assert_eq!(token.authorization_header(), "Bearer secret-token");
        assert_eq!(token.secret(), "secret-token");
        assert!(!format!("{:?}", token).contains("secret-token"));
    }
}

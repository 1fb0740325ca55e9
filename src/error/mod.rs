//! Error Types
//!
//! Error hierarchy for the transactional mail client. Every family converts
//! into [`MailError`], which is what the client surfaces to callers.

use std::time::Duration;
use thiserror::Error;

/// Root error type for the mail client.
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Authentication failed: {0}")]
    Authentication(#[from] AuthenticationError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MailError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "MAIL_CONFIG",
            Self::Validation(_) => "MAIL_VALIDATION",
            Self::Authentication(_) => "MAIL_AUTH",
            Self::Transport(_) => "MAIL_TRANSPORT",
            Self::Serialization(_) => "MAIL_SERIALIZATION",
        }
    }

    /// Check if the error came from token acquisition.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

/// Configuration error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },

    #[error("Unknown region: {value}")]
    UnknownRegion { value: String },

    #[error("Environment error: {message}")]
    Environment { message: String },
}

/// Construction/validation error raised by the domain model.
///
/// These are always raised before any request leaves the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email address '{email}': {reason}")]
    InvalidEmail { email: String, reason: String },

    #[error("Content body cannot be empty")]
    EmptyBody,

    #[error("Subject cannot be empty")]
    EmptySubject,

    #[error("Attachment content is not valid Base64: {message}")]
    InvalidBase64 { message: String },

    #[error("Attachment filename cannot be empty")]
    EmptyFilename,

    #[error("Attachment filename too long: {length} characters (max {max})")]
    FilenameTooLong { length: usize, max: usize },

    #[error("MIME type cannot be empty")]
    EmptyMimeType,

    #[error("Invalid MIME type: {mime_type}")]
    InvalidMimeType { mime_type: String },

    #[error("Cannot determine MIME type for '{filename}'")]
    UnknownMimeType { filename: String },

    #[error("Cannot read attachment file {path}: {message}")]
    FileRead { path: String, message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },
}

impl From<std::convert::Infallible> for ValidationError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// Token acquisition error.
#[derive(Error, Debug)]
pub enum AuthenticationError {
    #[error("Token endpoint unreachable: {0}")]
    EndpointUnreachable(#[source] TransportError),

    #[error("Token request rejected with HTTP {status}{}", describe_oauth_error(.error, .error_description))]
    TokenRequestFailed {
        status: u16,
        error: Option<String>,
        error_description: Option<String>,
    },

    #[error("Invalid token response: {message}")]
    InvalidTokenResponse { message: String },

    #[error("Token response is missing access_token")]
    MissingAccessToken,

    #[error("Token response carries no expiry")]
    MissingExpiry,

    #[error("Invalid token expiry: {value}")]
    InvalidExpiry { value: String },

    #[error("Token refresh aborted: {message}")]
    RefreshAborted { message: String },
}

fn describe_oauth_error(error: &Option<String>, description: &Option<String>) -> String {
    match (error, description) {
        (Some(e), Some(d)) => format!(" ({}: {})", e, d),
        (Some(e), None) => format!(" ({})", e),
        (None, Some(d)) => format!(" ({})", d),
        (None, None) => String::new(),
    }
}

/// Network/transport error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Response too large: {size} bytes")]
    ResponseTooLarge { size: usize },

    #[error("Failed to build HTTP client: {message}")]
    ClientBuild { message: String },
}

/// Result type for mail client operations.
pub type MailResult<T> = Result<T, MailError>;

/// OAuth2 error response from the token endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OAuth2ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Parse error response from HTTP body.
pub fn parse_error_response(body: &str) -> Option<OAuth2ErrorResponse> {
    serde_json::from_str(body).ok()
}

/// Create error from a non-success token endpoint response.
pub fn create_error_from_response(status: u16, body: &str) -> AuthenticationError {
    match parse_error_response(body) {
        Some(response) => AuthenticationError::TokenRequestFailed {
            status,
            error: Some(response.error),
            error_description: response.error_description,
        },
        None => AuthenticationError::TokenRequestFailed {
            status,
            error: None,
            error_description: None,
        },
    }
}

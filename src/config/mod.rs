//! Configuration
//!
//! Client configuration types and the fluent builder that validates them.

mod region;

pub use region::Region;

use secrecy::SecretString;
use std::time::Duration;
use url::Url;

use crate::error::ConfigurationError;
use crate::transport::DEFAULT_MAX_RESPONSE_SIZE;

/// Seconds before the reported expiry at which a token is treated as expired.
pub const DEFAULT_REFRESH_OFFSET_SECS: u64 = 60;

/// Token endpoint path relative to the region base URL.
pub const TOKEN_PATH: &str = "/oauth2/token";

/// Send endpoint path relative to the base URL.
pub const SEND_PATH: &str = "/send";

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("transactional-mail-rust/", env!("CARGO_PKG_VERSION"));

const ENV_PREFIX: &str = "TRANSACTIONAL_MAIL_";

/// Mail client configuration.
#[derive(Clone, Debug)]
pub struct MailClientConfig {
    /// Client credentials.
    pub credentials: ClientCredentials,
    /// Scopes to request with the client-credentials grant.
    pub scopes: Vec<String>,
    /// Selected region.
    pub region: Region,
    /// API base URL (region default unless overridden).
    pub base_url: String,
    /// OAuth2 token endpoint.
    pub token_endpoint: String,
    /// Early-refresh offset subtracted from every token expiry.
    pub refresh_offset: Duration,
    /// Request timeout; `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,
    /// Maximum accepted response size in bytes.
    pub max_response_size: usize,
    /// User-Agent header value.
    pub user_agent: String,
}

impl MailClientConfig {
    /// Create new configuration builder.
    pub fn builder() -> MailClientConfigBuilder {
        MailClientConfigBuilder::new()
    }

    /// Load configuration from `TRANSACTIONAL_MAIL_*` environment variables.
    ///
    /// `CLIENT_ID` and `CLIENT_SECRET` are required; `REGION`, `SCOPE`,
    /// `BASE_URL` and `TOKEN_URL` are optional.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));
        let required = |name: &str| {
            var(name).ok_or_else(|| ConfigurationError::Environment {
                message: format!("{}{} must be set", ENV_PREFIX, name),
            })
        };

        let mut builder = Self::builder()
            .client_id(required("CLIENT_ID")?)
            .client_secret(required("CLIENT_SECRET")?);

        if let Some(region) = var("REGION") {
            builder = builder.region(region.parse()?);
        }
        if let Some(scope) = var("SCOPE") {
            for s in scope.split_whitespace() {
                builder = builder.add_scope(s);
            }
        }
        if let Some(base_url) = var("BASE_URL") {
            builder = builder.base_url(base_url);
        }
        if let Some(token_url) = var("TOKEN_URL") {
            builder = builder.token_endpoint(token_url);
        }

        builder.build()
    }

    /// Full URL of the send endpoint.
    pub fn send_endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SEND_PATH)
    }

    /// Space-separated scope parameter, if any scopes are configured.
    pub fn scope(&self) -> Option<String> {
        if self.scopes.is_empty() {
            None
        } else {
            Some(self.scopes.join(" "))
        }
    }
}

/// Client credentials for the OAuth2 client-credentials grant.
#[derive(Clone)]
pub struct ClientCredentials {
    /// Client identifier.
    pub client_id: String,
    /// Client secret.
    pub client_secret: SecretString,
    /// Client authentication method.
    pub auth_method: ClientAuthMethod,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("auth_method", &self.auth_method)
            .finish()
    }
}

/// Client authentication method at the token endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ClientAuthMethod {
    /// client_id and client_secret in the form body.
    #[default]
    ClientSecretPost,
    /// HTTP Basic Authentication header.
    ClientSecretBasic,
}

/// Fluent builder for [`MailClientConfig`].
#[derive(Default)]
pub struct MailClientConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    auth_method: ClientAuthMethod,
    scopes: Vec<String>,
    region: Region,
    base_url: Option<String>,
    token_endpoint: Option<String>,
    refresh_offset: Option<Duration>,
    timeout: Option<Duration>,
    max_response_size: Option<usize>,
    user_agent: Option<String>,
}

impl MailClientConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::new(client_secret.into()));
        self
    }

    /// Set client authentication method.
    pub fn auth_method(mut self, method: ClientAuthMethod) -> Self {
        self.auth_method = method;
        self
    }

    /// Add a scope to request.
    pub fn add_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Replace the requested scopes.
    pub fn scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Select the API region.
    pub fn region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Override the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Override the token endpoint.
    pub fn token_endpoint(mut self, url: impl Into<String>) -> Self {
        self.token_endpoint = Some(url.into());
        self
    }

    /// Set the early-refresh offset.
    pub fn refresh_offset(mut self, offset: Duration) -> Self {
        self.refresh_offset = Some(offset);
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum accepted response size.
    pub fn max_response_size(mut self, bytes: usize) -> Self {
        self.max_response_size = Some(bytes);
        self
    }

    /// Override the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<MailClientConfig, ConfigurationError> {
        let client_id = self
            .client_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ConfigurationError::MissingField {
                field: "client_id".to_string(),
            })?;

        let client_secret = self
            .client_secret
            .ok_or_else(|| ConfigurationError::MissingField {
                field: "client_secret".to_string(),
            })?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| self.region.base_url().to_string());
        validate_url(&base_url)?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let token_endpoint = self
            .token_endpoint
            .unwrap_or_else(|| format!("{}{}", base_url, TOKEN_PATH));
        validate_url(&token_endpoint)?;

        Ok(MailClientConfig {
            credentials: ClientCredentials {
                client_id,
                client_secret,
                auth_method: self.auth_method,
            },
            scopes: self.scopes,
            region: self.region,
            base_url,
            token_endpoint,
            refresh_offset: self
                .refresh_offset
                .unwrap_or(Duration::from_secs(DEFAULT_REFRESH_OFFSET_SECS)),
            timeout: self.timeout,
            max_response_size: self.max_response_size.unwrap_or(DEFAULT_MAX_RESPONSE_SIZE),
            user_agent: self.user_agent.unwrap_or_else(|| USER_AGENT.to_string()),
        })
    }
}

fn validate_url(url: &str) -> Result<(), ConfigurationError> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigurationError::InvalidEndpoint {
            url: url.to_string(),
        }),
    }
}

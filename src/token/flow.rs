//! Client Credentials Flow
//!
//! RFC 6749 Section 4.4 - Client Credentials Grant.

use async_trait::async_trait;
use base64::Engine;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{ClientAuthMethod, MailClientConfig};
use crate::error::{create_error_from_response, AuthenticationError};
use crate::token::TokenResponse;
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};

/// Client Credentials Flow interface.
#[async_trait]
pub trait ClientCredentialsFlow: Send + Sync + 'static {
    /// Request a fresh access token.
    async fn request_token(&self) -> Result<TokenResponse, AuthenticationError>;
}

/// Client Credentials Flow implementation.
pub struct ClientCredentialsFlowImpl<T: HttpTransport> {
    config: MailClientConfig,
    transport: Arc<T>,
}

impl<T: HttpTransport> ClientCredentialsFlowImpl<T> {
    /// Create new Client Credentials Flow.
    pub fn new(config: MailClientConfig, transport: Arc<T>) -> Self {
        Self { config, transport }
    }

    fn build_request_body(&self) -> String {
        let mut params = vec![("grant_type", "client_credentials".to_string())];

        if self.config.credentials.auth_method == ClientAuthMethod::ClientSecretPost {
            use secrecy::ExposeSecret;
            params.push(("client_id", self.config.credentials.client_id.clone()));
            params.push((
                "client_secret",
                self.config.credentials.client_secret.expose_secret().to_string(),
            ));
        }

        if let Some(scope) = self.config.scope() {
            params.push(("scope", scope));
        }

        params
            .into_iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(&v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn build_request_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        headers.insert("accept".to_string(), "application/json".to_string());
        headers.insert("user-agent".to_string(), self.config.user_agent.clone());

        if self.config.credentials.auth_method == ClientAuthMethod::ClientSecretBasic {
            use secrecy::ExposeSecret;
            let credentials = format!(
                "{}:{}",
                urlencoding::encode(&self.config.credentials.client_id),
                urlencoding::encode(self.config.credentials.client_secret.expose_secret())
            );
            let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
            headers.insert("authorization".to_string(), format!("Basic {}", encoded));
        }

        headers
    }
}

#[async_trait]
impl<T: HttpTransport> ClientCredentialsFlow for ClientCredentialsFlowImpl<T> {
    async fn request_token(&self) -> Result<TokenResponse, AuthenticationError> {
        let http_request = HttpRequest {
            method: HttpMethod::Post,
            url: self.config.token_endpoint.clone(),
            headers: self.build_request_headers(),
            body: Some(self.build_request_body()),
        };

        let response = self
            .transport
            .send(http_request)
            .await
            .map_err(AuthenticationError::EndpointUnreachable)?;

        if !response.is_success() {
            return Err(create_error_from_response(response.status, &response.body));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            AuthenticationError::InvalidTokenResponse {
                message: e.to_string(),
            }
        })
    }
}

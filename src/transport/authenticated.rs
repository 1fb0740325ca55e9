//! Authenticated Transport
//!
//! Wraps an [`HttpTransport`] and attaches a bearer token from the
//! [`TokenCache`] to every request.

use std::sync::Arc;

use crate::error::MailError;
use crate::token::{AccessToken, TokenCache};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// Transport that authenticates every request.
pub struct AuthenticatedTransport<T: HttpTransport> {
    transport: Arc<T>,
    tokens: TokenCache,
    user_agent: String,
}

impl<T: HttpTransport> AuthenticatedTransport<T> {
    /// Create a new authenticated transport.
    pub fn new(transport: Arc<T>, tokens: TokenCache, user_agent: impl Into<String>) -> Self {
        Self {
            transport,
            tokens,
            user_agent: user_agent.into(),
        }
    }

    /// Token cache backing this transport.
    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    /// Send a request with a valid bearer token.
    ///
    /// The response is returned as received; only token acquisition and
    /// transport failures are errors.
    pub async fn dispatch(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<String>,
    ) -> Result<HttpResponse, MailError> {
        self.dispatch_with_token(method, url, body)
            .await
            .map(|(response, _)| response)
    }

    /// Same as [`AuthenticatedTransport::dispatch`], also returning the token
    /// the request carried.
    pub async fn dispatch_with_token(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<String>,
    ) -> Result<(HttpResponse, AccessToken), MailError> {
        let token = self.tokens.ensure_valid_token().await?;

        let mut request = HttpRequest::new(method, url);
        request
            .headers
            .insert("authorization".to_string(), token.authorization_header());
        request
            .headers
            .insert("user-agent".to_string(), self.user_agent.clone());
        request
            .headers
            .insert("accept".to_string(), "application/json".to_string());
        if body.is_some() {
            request
                .headers
                .insert("content-type".to_string(), "application/json".to_string());
        }
        request.body = body;

        tracing::debug!(method = %method, url = %url, "dispatching request");

        let response = self.transport.send(request).await?;

        tracing::debug!(status = response.status, "received response");

        Ok((response, token))
    }
}

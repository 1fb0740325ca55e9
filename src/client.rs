//! Mail Client
//!
//! Sends messages to the transactional mail API.

use std::sync::Arc;

use crate::config::MailClientConfig;
use crate::error::MailError;
use crate::token::{ClientCredentialsFlow, ClientCredentialsFlowImpl, Clock, SystemClock, TokenCache};
use crate::transport::{AuthenticatedTransport, HttpMethod, HttpTransport, ReqwestHttpTransport};
use crate::types::{Message, SendResult};

/// Transactional mail API client.
///
/// One client owns one token cache; clones are not provided, share the
/// client behind an `Arc` instead.
pub struct MailClient<T: HttpTransport = ReqwestHttpTransport> {
    config: MailClientConfig,
    transport: AuthenticatedTransport<T>,
}

impl MailClient<ReqwestHttpTransport> {
    /// Create a client using the reqwest transport.
    pub fn new(config: MailClientConfig) -> Result<Self, MailError> {
        let transport = Arc::new(ReqwestHttpTransport::with_options(
            config.timeout,
            config.max_response_size,
        )?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client from `TRANSACTIONAL_MAIL_*` environment variables.
    pub fn from_env() -> Result<Self, MailError> {
        Self::new(MailClientConfig::from_env()?)
    }
}

impl<T: HttpTransport> MailClient<T> {
    /// Create a client over a custom transport. Token requests use the same
    /// transport.
    pub fn with_transport(config: MailClientConfig, transport: Arc<T>) -> Self {
        let flow = Arc::new(ClientCredentialsFlowImpl::new(
            config.clone(),
            transport.clone(),
        ));
        Self::with_components(config, transport, flow, Arc::new(SystemClock))
    }

    /// Create a client from explicit parts.
    pub fn with_components(
        config: MailClientConfig,
        transport: Arc<T>,
        flow: Arc<dyn ClientCredentialsFlow>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tokens = TokenCache::with_clock(flow, config.refresh_offset, clock);
        let transport = AuthenticatedTransport::new(transport, tokens, config.user_agent.clone());
        Self { config, transport }
    }

    pub fn config(&self) -> &MailClientConfig {
        &self.config
    }

    /// Token cache used by this client.
    pub fn tokens(&self) -> &TokenCache {
        self.transport.tokens()
    }

    /// Send a message.
    ///
    /// Any HTTP response from the API becomes a [`SendResult`], including
    /// rejections; check [`SendResult::is_success`]. A 401 additionally
    /// clears the cached token, unless it was already replaced, so the next
    /// call authenticates again.
    pub async fn send(&self, message: &Message) -> Result<SendResult, MailError> {
        let body = serde_json::to_string(message)?;
        let url = self.config.send_endpoint();

        let (response, token) = self
            .transport
            .dispatch_with_token(HttpMethod::Post, &url, Some(body))
            .await?;

        if response.status == 401 && self.transport.tokens().invalidate_if(&token).await {
            tracing::warn!("send rejected with 401, discarded cached token");
        }

        let result = SendResult::from_response(response);

        tracing::info!(
            status = result.status(),
            message_id = %result.message_id,
            request_id = %result.request_id,
            recipients = message.recipient_count(),
            "message sent"
        );

        Ok(result)
    }
}

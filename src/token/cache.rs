//! Token Cache
//!
//! Holds the bearer token for one client instance and refreshes it through
//! the client-credentials flow when it is missing or past its effective
//! expiry.
//!
//! Reads take a short shared lock and never wait on a refresh. Refreshes are
//! serialized by a per-instance async mutex and re-check the cache once the
//! mutex is held, so callers that queued behind a successful refresh reuse
//! its token instead of requesting another one. The refresh runs on its own
//! task that owns the mutex guard: a caller that is dropped mid-refresh does
//! not cancel the request the other waiters depend on, and the guard is
//! released whether the refresh succeeds or fails.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::error::AuthenticationError;
use crate::token::{AccessToken, ClientCredentialsFlow, Clock, SystemClock};

/// Per-client bearer token cache.
pub struct TokenCache {
    flow: Arc<dyn ClientCredentialsFlow>,
    clock: Arc<dyn Clock>,
    refresh_offset: Duration,
    current: Arc<RwLock<Option<AccessToken>>>,
    refresh_lock: Arc<Mutex<()>>,
}

impl TokenCache {
    /// Create an empty cache backed by the system clock.
    pub fn new(flow: Arc<dyn ClientCredentialsFlow>, refresh_offset: Duration) -> Self {
        Self::with_clock(flow, refresh_offset, Arc::new(SystemClock))
    }

    /// Create an empty cache with an explicit time source.
    pub fn with_clock(
        flow: Arc<dyn ClientCredentialsFlow>,
        refresh_offset: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            flow,
            clock,
            refresh_offset,
            current: Arc::new(RwLock::new(None)),
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Return a token that is valid now, requesting a new one if needed.
    pub async fn ensure_valid_token(&self) -> Result<AccessToken, AuthenticationError> {
        if let Some(token) = self.valid_token().await {
            return Ok(token);
        }

        let guard = self.refresh_lock.clone().lock_owned().await;

        if let Some(token) = self.valid_token().await {
            tracing::debug!("access token already refreshed by a concurrent caller");
            return Ok(token);
        }

        let refresh = Refresh {
            flow: self.flow.clone(),
            clock: self.clock.clone(),
            refresh_offset: self.refresh_offset,
            current: self.current.clone(),
        };

        tokio::spawn(refresh.run(guard))
            .await
            .map_err(|e| AuthenticationError::RefreshAborted {
                message: e.to_string(),
            })?
    }

    /// Currently cached token, valid or not.
    pub async fn cached_token(&self) -> Option<AccessToken> {
        self.current.read().await.clone()
    }

    /// Drop the cached token so the next call requests a new one.
    pub async fn invalidate(&self) {
        *self.current.write().await = None;
    }

    /// Drop the cached token only if it is still `rejected`. A newer token
    /// installed since `rejected` was handed out is kept.
    ///
    /// Returns whether the cache was cleared.
    pub async fn invalidate_if(&self, rejected: &AccessToken) -> bool {
        let mut current = self.current.write().await;
        let matches = current.as_ref().is_some_and(|token| {
            token.secret() == rejected.secret() && token.expires_at == rejected.expires_at
        });
        if matches {
            *current = None;
        }
        matches
    }

    async fn valid_token(&self) -> Option<AccessToken> {
        let now = self.clock.now();
        self.current
            .read()
            .await
            .as_ref()
            .filter(|token| token.is_valid_at(now))
            .cloned()
    }
}

struct Refresh {
    flow: Arc<dyn ClientCredentialsFlow>,
    clock: Arc<dyn Clock>,
    refresh_offset: Duration,
    current: Arc<RwLock<Option<AccessToken>>>,
}

impl Refresh {
    async fn run(self, _guard: OwnedMutexGuard<()>) -> Result<AccessToken, AuthenticationError> {
        tracing::debug!("requesting access token");

        let result = match self.flow.request_token().await {
            Ok(response) => {
                AccessToken::from_response(response, self.clock.now(), self.refresh_offset)
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(token) => {
                tracing::info!(expires_at = %token.expires_at, "access token refreshed");
                *self.current.write().await = Some(token.clone());
                Ok(token)
            }
            Err(e) => {
                tracing::warn!(error = %e, "access token refresh failed");
                Err(e)
            }
        }
    }
}

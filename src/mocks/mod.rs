//! Test doubles for the transport, token flow, clock and MIME lookup.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::{AuthenticationError, TransportError};
use crate::mime_map::MimeMapper;
use crate::token::{ClientCredentialsFlow, Clock, TokenResponse};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct MockRoute {
    queued: VecDeque<Result<HttpResponse, TransportError>>,
    fallback: Option<HttpResponse>,
}

/// Mock HTTP transport. Responses are registered per URL suffix and served
/// first-in first-out; a route's default response is used once its queue is
/// empty.
#[derive(Default)]
pub struct MockHttpTransport {
    routes: Mutex<Vec<(String, MockRoute)>>,
    request_history: Mutex<Vec<HttpRequest>>,
    delay: Mutex<Option<Duration>>,
}

impl MockHttpTransport {
    /// Create new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_route<F: FnOnce(&mut MockRoute)>(&self, url_suffix: &str, f: F) -> &Self {
        let mut routes = lock(&self.routes);
        match routes.iter_mut().find(|(suffix, _)| suffix == url_suffix) {
            Some((_, route)) => f(route),
            None => {
                let mut route = MockRoute::default();
                f(&mut route);
                routes.push((url_suffix.to_string(), route));
            }
        }
        self
    }

    /// Queue a response for URLs ending in `url_suffix`.
    pub fn queue_response(&self, url_suffix: &str, response: HttpResponse) -> &Self {
        self.with_route(url_suffix, |route| route.queued.push_back(Ok(response)))
    }

    /// Queue a JSON response.
    pub fn queue_json_response<T: serde::Serialize>(
        &self,
        url_suffix: &str,
        status: u16,
        body: &T,
    ) -> &Self {
        self.queue_response(url_suffix, json_response(status, body))
    }

    /// Queue a transport failure.
    pub fn queue_error(&self, url_suffix: &str, error: TransportError) -> &Self {
        self.with_route(url_suffix, |route| route.queued.push_back(Err(error)))
    }

    /// Set default response when the route's queue is empty.
    pub fn set_default_response(&self, url_suffix: &str, response: HttpResponse) -> &Self {
        self.with_route(url_suffix, |route| route.fallback = Some(response))
    }

    /// Delay every response.
    pub fn set_delay(&self, delay: Duration) -> &Self {
        *lock(&self.delay) = Some(delay);
        self
    }

    /// Get request history.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        lock(&self.request_history).clone()
    }

    /// Requests whose URL ends in `url_suffix`.
    pub fn get_requests_to(&self, url_suffix: &str) -> Vec<HttpRequest> {
        lock(&self.request_history)
            .iter()
            .filter(|r| r.url.ends_with(url_suffix))
            .cloned()
            .collect()
    }

    /// Get last request.
    pub fn get_last_request(&self) -> Option<HttpRequest> {
        lock(&self.request_history).last().cloned()
    }

    fn next_response(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let mut routes = lock(&self.routes);
        let route = routes
            .iter_mut()
            .find(|(suffix, _)| url.ends_with(suffix.as_str()))
            .map(|(_, route)| route);

        match route {
            Some(route) => match route.queued.pop_front() {
                Some(result) => result,
                None => route.fallback.clone().ok_or_else(|| no_response(url)),
            },
            None => Err(no_response(url)),
        }
    }
}

fn no_response(url: &str) -> TransportError {
    TransportError::ConnectionFailed {
        message: format!("No mock response available for {}", url),
    }
}

/// Build a JSON response.
pub fn json_response<T: serde::Serialize>(status: u16, body: &T) -> HttpResponse {
    let mut headers = HashMap::new();
    headers.insert("content-type".to_string(), "application/json".to_string());
    HttpResponse {
        status,
        status_text: if status == 200 { "OK" } else { "Error" }.to_string(),
        headers,
        body: serde_json::to_string(body).unwrap_or_default(),
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        lock(&self.request_history).push(request);

        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.next_response(&url)
    }
}

/// Mock client-credentials flow that counts calls.
#[derive(Default)]
pub struct MockClientCredentialsFlow {
    queued: Mutex<VecDeque<Result<TokenResponse, AuthenticationError>>>,
    calls: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl MockClientCredentialsFlow {
    /// Create new mock flow.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a token response.
    pub fn queue_response(&self, response: TokenResponse) -> &Self {
        lock(&self.queued).push_back(Ok(response));
        self
    }

    /// Queue an error.
    pub fn queue_error(&self, error: AuthenticationError) -> &Self {
        lock(&self.queued).push_back(Err(error));
        self
    }

    /// Delay every token request.
    pub fn set_delay(&self, delay: Duration) -> &Self {
        *lock(&self.delay) = Some(delay);
        self
    }

    /// Number of token requests made.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientCredentialsFlow for MockClientCredentialsFlow {
    async fn request_token(&self) -> Result<TokenResponse, AuthenticationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        lock(&self.queued)
            .pop_front()
            .unwrap_or(Err(AuthenticationError::RefreshAborted {
                message: "No mock token response available".to_string(),
            }))
    }
}

/// Manually advanced clock.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Clock starting at 2024-01-01T00:00:00Z.
    pub fn new() -> Self {
        Self::starting_at(Utc.timestamp_opt(1_704_067_200, 0).single().unwrap_or_default())
    }

    /// Clock starting at `start`.
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = lock(&self.now);
        if let Ok(delta) = chrono::Duration::from_std(by) {
            *now += delta;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *lock(&self.now)
    }
}

/// MIME mapper backed by a fixed extension table.
#[derive(Default)]
pub struct StaticMimeMapper {
    types: HashMap<String, String>,
}

impl StaticMimeMapper {
    /// Create an empty mapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map an extension (without dot) to a MIME type.
    pub fn with(mut self, extension: &str, mime_type: &str) -> Self {
        self.types
            .insert(extension.to_ascii_lowercase(), mime_type.to_string());
        self
    }
}

impl MimeMapper for StaticMimeMapper {
    fn mime_type(&self, filename: &str) -> Option<String> {
        let (_, extension) = filename.rsplit_once('.')?;
        self.types.get(&extension.to_ascii_lowercase()).cloned()
    }

    fn is_valid_mime_type(&self, mime_type: &str) -> bool {
        self.types.values().any(|known| known == mime_type)
    }
}

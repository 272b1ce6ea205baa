use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::envelope::ApiEnvelope;
use crate::error::ClientError;
use crate::expiry::{ClearAndRedirect, SessionExpired, SessionExpiryListener};
use crate::navigation::{Navigator, TracingNavigator};
use crate::normalize::{normalize_failure, normalize_response, ExpiryPolicy, Normalized};
use crate::session::{bearer_value, MemorySessionStore, SessionStore};
use crate::transport::{HttpMethod, OutboundRequest, ReqwestTransport, Transport};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: Url,
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
    listener: Arc<dyn SessionExpiryListener>,
    policy: ExpiryPolicy,
    request_logging: bool,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("policy", &self.inner.policy)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder::new(base_url)
    }

    /// Client wired from configuration, with the default clear-and-redirect listener.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let session = Arc::new(MemorySessionStore::new());
        if let Some(token) = config.session.token.as_deref() {
            session.set_token(token);
        }

        ApiClient::builder(config.api.base_url.clone())
            .timeout(config.timeout())
            .user_agent(config.api.user_agent.clone())
            .request_logging(config.api.enable_request_logging)
            .expiry_policy(config.expiry_policy())
            .session(session)
            .build()
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.inner.session
    }

    pub fn expiry_policy(&self) -> ExpiryPolicy {
        self.inner.policy
    }

    /// Absolute URLs pass through; anything else is joined onto the base URL.
    pub fn resolve(&self, url: &str) -> Result<Url, ClientError> {
        if let Ok(absolute) = Url::parse(url) {
            if absolute.has_host() {
                return Ok(absolute);
            }
        }
        self.inner
            .base_url
            .join(url.trim_start_matches('/'))
            .map_err(|_| ClientError::InvalidRequestUrl(url.to_string()))
    }

    /// Base URL extended with percent-encoded path segments.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidRequestUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get(&self, url: &str) -> ApiEnvelope {
        self.request(HttpMethod::Get, url, None).await
    }

    pub async fn post(&self, url: &str, data: Value) -> ApiEnvelope {
        self.request(HttpMethod::Post, url, Some(data)).await
    }

    pub async fn put(&self, url: &str, data: Value) -> ApiEnvelope {
        self.request(HttpMethod::Put, url, Some(data)).await
    }

    pub async fn delete(&self, url: &str) -> ApiEnvelope {
        self.request(HttpMethod::Delete, url, None).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> ApiEnvelope {
        self.request_json(HttpMethod::Post, url, body).await
    }

    pub async fn put_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> ApiEnvelope {
        self.request_json(HttpMethod::Put, url, body).await
    }

    async fn request_json<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        url: &str,
        body: &B,
    ) -> ApiEnvelope {
        match serde_json::to_value(body) {
            Ok(value) => self.request(method, url, Some(value)).await,
            Err(e) => {
                tracing::error!(%method, url, "Failed to serialize request body: {}", e);
                ApiEnvelope::network_failure()
            }
        }
    }

    /// Issue one request and normalize whatever comes back.
    pub async fn request(&self, method: HttpMethod, url: &str, data: Option<Value>) -> ApiEnvelope {
        let target = match self.resolve(url) {
            Ok(target) => target,
            Err(e) => {
                // Nothing was sent; same outcome as a request that never got a response
                tracing::error!(%method, "{}", e);
                return ApiEnvelope::network_failure();
            }
        };

        let request_id = Uuid::new_v4();
        let outbound = OutboundRequest {
            method,
            url: target.clone(),
            headers: self.headers(request_id),
            body: if method.allows_body() { data } else { None },
        };

        tracing::debug!(%method, url = %target, %request_id, "Sending API request");

        let outcome = match self.inner.transport.send(outbound).await {
            Ok(response) => {
                if self.inner.request_logging {
                    tracing::info!(
                        %method,
                        url = %target,
                        status = response.status.as_u16(),
                        %request_id,
                        "API request completed"
                    );
                }
                normalize_response(response.status, &response.body, &self.inner.policy)
            }
            Err(failure) => {
                tracing::error!(%method, url = %target, %request_id, "API request failed: {}", failure);
                normalize_failure(&failure)
            }
        };

        self.settle(outcome, method, &target)
    }

    fn settle(&self, outcome: Normalized, method: HttpMethod, target: &Url) -> ApiEnvelope {
        match outcome {
            Normalized::Envelope(envelope) => envelope,
            Normalized::SessionExpired(reason) => {
                let event = SessionExpired::new(reason, method, target.as_str());
                self.inner.listener.on_session_expired(&event);
                ApiEnvelope::session_expired()
            }
        }
    }

    fn headers(&self, request_id: Uuid) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            headers.insert(REQUEST_ID_HEADER, value);
        }

        if let Some(token) = self.inner.session.token() {
            match HeaderValue::from_str(&bearer_value(&token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => {
                    tracing::warn!("Stored token is not a valid header value, sending unauthenticated");
                }
            }
        }

        headers
    }
}

pub struct ApiClientBuilder {
    base_url: String,
    transport: Option<Arc<dyn Transport>>,
    session: Option<Arc<dyn SessionStore>>,
    navigator: Option<Arc<dyn Navigator>>,
    listener: Option<Arc<dyn SessionExpiryListener>>,
    policy: ExpiryPolicy,
    timeout: Option<Duration>,
    user_agent: String,
    request_logging: bool,
}

impl ApiClientBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            transport: None,
            session: None,
            navigator: None,
            listener: None,
            policy: ExpiryPolicy::default(),
            timeout: None,
            user_agent: format!("backoffice-api/{}", env!("CARGO_PKG_VERSION")),
            request_logging: false,
        }
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// Navigator used by the default clear-and-redirect listener
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Replace the default listener entirely; the navigator is then unused.
    pub fn listener(mut self, listener: Arc<dyn SessionExpiryListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn expiry_policy(mut self, policy: ExpiryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn request_logging(mut self, enabled: bool) -> Self {
        self.request_logging = enabled;
        self
    }

    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = parse_base_url(&self.base_url)?;

        let session: Arc<dyn SessionStore> = self
            .session
            .unwrap_or_else(|| Arc::new(MemorySessionStore::new()));

        let listener: Arc<dyn SessionExpiryListener> = match self.listener {
            Some(listener) => listener,
            None => {
                let navigator = self.navigator.unwrap_or_else(|| Arc::new(TracingNavigator));
                Arc::new(ClearAndRedirect::new(session.clone(), navigator))
            }
        };

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.timeout, &self.user_agent)?),
        };

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                base_url,
                transport,
                session,
                listener,
                policy: self.policy,
                request_logging: self.request_logging,
            }),
        })
    }
}

/// Parse the base URL, forcing a trailing slash so relative joins append.
fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| ClientError::invalid_base_url(raw, e))?;
    if url.cannot_be_a_base() {
        return Err(ClientError::config(format!("base URL '{}' cannot be a base", raw)));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

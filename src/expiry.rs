use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::navigation::{Navigator, LOGIN_PATH};
use crate::normalize::ExpiryReason;
use crate::session::SessionStore;
use crate::transport::HttpMethod;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionExpired {
    pub reason: ExpiryReason,
    pub method: HttpMethod,
    pub url: String,
    pub detected_at: DateTime<Utc>,
}

impl SessionExpired {
    pub fn new(reason: ExpiryReason, method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            reason,
            method,
            url: url.into(),
            detected_at: Utc::now(),
        }
    }
}

pub trait SessionExpiryListener: Send + Sync {
    fn on_session_expired(&self, event: &SessionExpired);
}

/// Default subscriber: clear the session, then go to the login page.
///
/// Concurrent expiring calls each trigger it; both steps are idempotent.
pub struct ClearAndRedirect {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl ClearAndRedirect {
    pub fn new(store: Arc<dyn SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }
}

impl SessionExpiryListener for ClearAndRedirect {
    fn on_session_expired(&self, event: &SessionExpired) {
        tracing::warn!(
            reason = ?event.reason,
            method = %event.method,
            url = %event.url,
            "Session expired, clearing stored session"
        );
        self.store.clear();
        self.navigator.navigate_to(LOGIN_PATH);
    }
}

impl<F> SessionExpiryListener for F
where
    F: Fn(&SessionExpired) + Send + Sync,
{
    fn on_session_expired(&self, event: &SessionExpired) {
        self(event)
    }
}

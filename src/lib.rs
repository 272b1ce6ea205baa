//! Normalizing client for the back-office platform REST API.
//!
//! Every call resolves to an [`ApiEnvelope`]; session expiry is reported to a
//! single [`SessionExpiryListener`] which clears the session and redirects.

pub mod cli;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod expiry;
pub mod navigation;
pub mod normalize;
pub mod resources;
pub mod session;
pub mod transport;

pub use client::{ApiClient, ApiClientBuilder};
pub use envelope::ApiEnvelope;
pub use error::ClientError;
pub use expiry::{ClearAndRedirect, SessionExpired, SessionExpiryListener};
pub use navigation::{Navigator, RecordingNavigator, TracingNavigator, LOGIN_PATH};
pub use normalize::{ExpiryPolicy, ExpiryReason, Normalized};
pub use resources::{Resource, ResourceApi};
pub use session::{MemorySessionStore, SessionStore};
pub use transport::{HttpMethod, ReqwestTransport, Transport};

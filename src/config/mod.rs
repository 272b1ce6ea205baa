use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::normalize::ExpiryPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Overall request timeout; `None` leaves the transport default in place
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Treat structured `code` fields as session expiry, on top of the message heuristic
    pub honor_error_codes: bool,
    /// Token injected at startup (e.g. from `BACKOFFICE_TOKEN`)
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        Self::for_environment(environment).with_env_overrides()
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("BACKOFFICE_API_URL") {
            if !v.trim().is_empty() {
                self.api.base_url = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("BACKOFFICE_API_TIMEOUT_SECS") {
            self.api.timeout_secs = v.parse::<u64>().ok().filter(|secs| *secs > 0);
        }
        if let Ok(v) = env::var("BACKOFFICE_USER_AGENT") {
            self.api.user_agent = v;
        }
        if let Ok(v) = env::var("BACKOFFICE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("BACKOFFICE_HONOR_ERROR_CODES") {
            self.session.honor_error_codes = v.parse().unwrap_or(self.session.honor_error_codes);
        }
        if let Ok(v) = env::var("BACKOFFICE_TOKEN") {
            self.session.token = Some(v).filter(|t| !t.trim().is_empty());
        }

        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.api.timeout_secs.map(Duration::from_secs)
    }

    pub fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy {
            honor_error_codes: self.session.honor_error_codes,
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8000/api/".to_string(),
                timeout_secs: None,
                user_agent: default_user_agent(),
                enable_request_logging: true,
            },
            session: SessionConfig {
                honor_error_codes: false,
                token: None,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging.example.com/api/".to_string(),
                timeout_secs: None,
                user_agent: default_user_agent(),
                enable_request_logging: true,
            },
            session: SessionConfig {
                honor_error_codes: false,
                token: None,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://app.example.com/api/".to_string(),
                timeout_secs: None,
                user_agent: default_user_agent(),
                enable_request_logging: false,
            },
            session: SessionConfig {
                honor_error_codes: false,
                token: None,
            },
        }
    }
}

fn default_user_agent() -> String {
    format!("backoffice-api/{}", env!("CARGO_PKG_VERSION"))
}

// Global singleton config - initialized once on first access
pub static CONFIG: Lazy<ClientConfig> = Lazy::new(ClientConfig::from_env);

pub fn config() -> &'static ClientConfig {
    &CONFIG
}

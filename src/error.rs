// Client construction and configuration errors.
// Calls themselves never fail; they always produce an ApiEnvelope.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("cannot resolve request URL '{0}'")]
    InvalidRequestUrl(String),

    #[error("unsupported HTTP method '{0}' (expected GET, POST, PUT or DELETE)")]
    UnsupportedMethod(String),

    #[error("unknown resource '{0}'")]
    UnknownResource(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn invalid_base_url(url: impl Into<String>, source: url::ParseError) -> Self {
        ClientError::InvalidBaseUrl {
            url: url.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ClientError::Config(message.into())
    }
}

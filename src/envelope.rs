// Uniform result envelope returned by every API call

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NO_CONTENT_MESSAGE: &str = "Opération réussie";
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expirée, veuillez vous reconnecter";
pub const SERVER_PROBLEM_MESSAGE: &str =
    "Un problème avec le serveur. Veuillez réessayer ultérieurement";
pub const GENERIC_ERROR_MESSAGE: &str = "Une erreur s'est produite";
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Un problème lors de l'envoi. Veuillez vérifier votre connexion internet";

/// Normalized `{success, data, message, errors}` result.
///
/// The shape is the same whichever backend response produced it. `data` is
/// serialized as `null` when absent and `errors` as `[]` when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T = Value> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn new(success: bool, data: Option<T>, message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success,
            data,
            message: message.into(),
            errors,
        }
    }

    /// Failed envelope carrying only a message
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(false, None, message, Vec::new())
    }

    /// Fixed result for HTTP 204, independent of any body
    pub fn no_content() -> Self {
        Self::new(true, None, NO_CONTENT_MESSAGE, Vec::new())
    }

    pub fn session_expired() -> Self {
        Self::failure(SESSION_EXPIRED_MESSAGE)
    }

    pub fn server_problem() -> Self {
        Self::failure(SERVER_PROBLEM_MESSAGE)
    }

    pub fn network_failure() -> Self {
        Self::failure(NETWORK_FAILURE_MESSAGE)
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

impl ApiEnvelope<Value> {
    /// Decode the JSON payload into a caller type, keeping the rest of the envelope.
    pub fn decode<U: DeserializeOwned>(self) -> Result<ApiEnvelope<U>, serde_json::Error> {
        let data = match self.data {
            Some(value) => Some(serde_json::from_value(value)?),
            None => None,
        };

        Ok(ApiEnvelope {
            success: self.success,
            data,
            message: self.message,
            errors: self.errors,
        })
    }
}

//! Error type shared by the API client, the auth actions and token helpers.

/// Errors returned by client operations.
///
/// Failed auth actions also leave a human-readable message in the session's
/// `error` field; the variant here is for callers that branch on the cause.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Login rejected by the server
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Registration rejected by the server
    #[error("Registration failed: {0}")]
    RegistrationFailed(String),

    /// An authenticated call came back 401; the session has been cleared
    #[error("Session expired")]
    SessionExpired,

    /// The request could not be sent, or the reply could not be parsed
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success status from a JSON helper
    #[error("Unexpected status {status}{}", reason_suffix(.message))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// Access token could not be decoded
    #[error("Invalid access token: {0}")]
    InvalidToken(String),
}

impl ClientError {
    /// Stable machine-readable code for the error.
    ///
    /// # Example
    ///
    /// ```
    /// # use dogsitter_client::ClientError;
    /// assert_eq!(ClientError::SessionExpired.code(), "session_expired");
    /// ```
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::InvalidCredentials(_) => "invalid_credentials",
            ClientError::RegistrationFailed(_) => "registration_failed",
            ClientError::SessionExpired => "session_expired",
            ClientError::Network(_) => "network_error",
            ClientError::Status { .. } => "unexpected_status",
            ClientError::InvalidToken(_) => "invalid_token",
        }
    }
}

fn reason_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

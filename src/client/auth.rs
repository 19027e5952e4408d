//! Login, registration and logout against the booking API.
//!
//! Actions write their outcome into the shared [`Session`]: credentials on
//! success, a displayable message in `error` on failure. They never navigate;
//! the router picks up the new state on the next navigation.

use crate::client::http_client::{ApiClient, ApiMessage};
use crate::client::session::Session;
use crate::config::{LOGIN_ENDPOINT, REGISTER_ENDPOINT};
use crate::{ClientError, User};
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Login form payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration form payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Registration {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            first_name: None,
            last_name: None,
        }
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }
}

/// Reply of the login and registration endpoints.
#[derive(Debug, Default, Deserialize)]
struct AuthResponse {
    token: Option<String>,
    user: Option<serde_json::Value>,
    #[serde(flatten)]
    message: ApiMessage,
}

/// What a completed auth request turned into.
enum Outcome {
    Accepted(AuthResponse),
    Rejected(Option<String>),
}

/// Auth actions bound to one API client and its session.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    /// Logs in with `credentials`.
    ///
    /// On success the returned token and user are stored in the session.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Email and password posted to the login endpoint
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The session now holds the new token and user
    /// * `Err(ClientError)` - The login failed; see below
    ///
    /// # Example
    ///
    /// ```ignore
    /// auth.login(&LoginCredentials::new("a@b.com", "secret")).await?;
    /// assert!(auth.session().is_authenticated());
    /// ```
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidCredentials`] when the server rejects the login;
    ///   the token is left as it was and `error` holds the server's message
    ///   or the configured fallback
    /// - [`ClientError::Network`] when the request fails or the reply is not
    ///   a usable auth response; `error` holds the server-error message
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<(), ClientError> {
        tracing::trace!("Logging in");
        let session = self.session();
        session.set_error(None);

        match self.submit(LOGIN_ENDPOINT, credentials).await? {
            Outcome::Rejected(message) => {
                let message =
                    message.unwrap_or_else(|| self.messages().invalid_credentials.clone());
                tracing::warn!("Login rejected: {}", message);
                session.set_error(Some(message.clone()));
                Err(ClientError::InvalidCredentials(message))
            }
            Outcome::Accepted(reply) => {
                let Some(token) = reply.token.filter(|t| !t.is_empty()) else {
                    return Err(self.server_error("login reply carried no token"));
                };
                let user = reply.user.and_then(User::from_value);

                session.set_token(Some(token));
                session.set_user(user);
                tracing::trace!("Login succeeded");
                Ok(())
            }
        }
    }

    /// Registers a new account.
    ///
    /// Registration does not log the user in, even if the server returns a
    /// token; the session is untouched apart from `error`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::RegistrationFailed`] when the server rejects the data
    /// - [`ClientError::Network`] when the request fails or the reply is not JSON
    pub async fn register(&self, registration: &Registration) -> Result<(), ClientError> {
        tracing::trace!("Registering new account");
        let session = self.session();
        session.set_error(None);

        match self.submit(REGISTER_ENDPOINT, registration).await? {
            Outcome::Rejected(message) => {
                let message =
                    message.unwrap_or_else(|| self.messages().registration_failed.clone());
                tracing::warn!("Registration rejected: {}", message);
                session.set_error(Some(message.clone()));
                Err(ClientError::RegistrationFailed(message))
            }
            Outcome::Accepted(_) => {
                tracing::trace!("Registration succeeded");
                Ok(())
            }
        }
    }

    /// Ends the session, in memory and in storage.
    pub fn logout(&self) {
        tracing::trace!("Logging out");
        self.session().clear();
    }

    /// POSTs `body` to an auth endpoint and classifies the reply.
    ///
    /// Transport failures and non-JSON bodies are reported as server errors
    /// here, so callers only handle accept/reject.
    async fn submit<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<Outcome, ClientError> {
        let response = match self.client.dispatch(Method::POST, endpoint, Some(body)).await {
            Ok(response) => response,
            Err(e) => return Err(self.server_error(&e.to_string())),
        };

        let status = response.status();
        let reply: AuthResponse = match response.json().await {
            Ok(reply) => reply,
            Err(e) => {
                return Err(self.server_error(&format!("unreadable reply ({}): {}", status, e)));
            }
        };

        if status.is_success() {
            Ok(Outcome::Accepted(reply))
        } else {
            Ok(Outcome::Rejected(reply.message.into_text()))
        }
    }

    fn server_error(&self, detail: &str) -> ClientError {
        tracing::error!("Auth request failed: {}", detail);
        self.session()
            .set_error(Some(self.messages().server_error.clone()));
        ClientError::Network(detail.to_string())
    }

    fn messages(&self) -> &crate::config::Messages {
        &self.client.config().messages
    }
}

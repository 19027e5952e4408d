//! Remote API configuration.
//!
//! This module provides the base URLs of the booking API and its media host,
//! the endpoint paths the client talks to, and the user-facing fallback
//! messages shown when the server does not supply one.

use serde::{Deserialize, Serialize};

/// Path of the login endpoint, relative to the API base URL.
pub const LOGIN_ENDPOINT: &str = "auth/login/";

/// Path of the registration endpoint, relative to the API base URL.
pub const REGISTER_ENDPOINT: &str = "auth/register/";

/// Path of the dog-sitter collection, relative to the API base URL.
pub const DOGSITTERS_ENDPOINT: &str = "dogsitters/";

/// Path of the booking collection, relative to the API base URL.
pub const BOOKINGS_ENDPOINT: &str = "bookings/";

/// Avatar shown for users without an uploaded picture.
pub const DEFAULT_AVATAR: &str = "/images/default_avatar.jpg";

const LOCAL_API_URL: &str = "http://localhost:8000/api";
const LOCAL_MEDIA_URL: &str = "http://localhost:8000/media";

/// Fallback messages stored in the session when the server gives no reason.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Messages {
    /// Shown when login is rejected without a server message.
    pub invalid_credentials: String,
    /// Shown when registration is rejected without a server message.
    pub registration_failed: String,
    /// Shown when the request could not be completed or the reply parsed.
    pub server_error: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            invalid_credentials: "Неверный email или пароль".to_string(),
            registration_failed: "Ошибка регистрации".to_string(),
            server_error: "Ошибка сервера".to_string(),
        }
    }
}

impl Messages {
    /// English variants of the default messages.
    pub fn english() -> Self {
        Self {
            invalid_credentials: "Invalid email or password".to_string(),
            registration_failed: "Registration failed".to_string(),
            server_error: "Server error".to_string(),
        }
    }
}

/// Remote API configuration.
///
/// # Fields
///
/// - `api_url`: base URL every relative request path is joined to
/// - `media_url`: base URL for uploaded media (avatars, photos)
/// - `default_avatar`: image used when a user has none
/// - `messages`: fallback texts for failed auth actions
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the REST API (e.g., "http://localhost:8000/api")
    pub api_url: String,

    /// Base URL of the media host (e.g., "http://localhost:8000/media")
    pub media_url: String,

    /// Avatar path used when the user record carries none.
    pub default_avatar: String,

    /// Fallback messages for failed auth actions.
    pub messages: Messages,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::local()
    }
}

impl ApiConfig {
    /// Creates a config for the given API and media base URLs.
    ///
    /// # Example
    ///
    /// ```
    /// # use dogsitter_client::ApiConfig;
    /// let config = ApiConfig::new(
    ///     "https://sitters.example.com/api".to_string(),
    ///     "https://sitters.example.com/media".to_string(),
    /// );
    /// assert_eq!(config.login_url(), "https://sitters.example.com/api/auth/login/");
    /// ```
    pub fn new(api_url: String, media_url: String) -> Self {
        Self {
            api_url,
            media_url,
            default_avatar: DEFAULT_AVATAR.to_string(),
            messages: Messages::default(),
        }
    }

    /// Config for a development backend on localhost.
    pub fn local() -> Self {
        Self::new(LOCAL_API_URL.to_string(), LOCAL_MEDIA_URL.to_string())
    }

    /// Loads the config from compile-time environment variables.
    ///
    /// Expected environment variables:
    /// - `DOGSITTER_API_URL` - API base URL
    /// - `DOGSITTER_MEDIA_URL` - media base URL (defaults to the local media host)
    ///
    /// Returns `None` if `DOGSITTER_API_URL` was not set at compile time.
    pub fn from_env() -> Option<Self> {
        let api_url = option_env!("DOGSITTER_API_URL")?;
        let media_url = option_env!("DOGSITTER_MEDIA_URL").unwrap_or(LOCAL_MEDIA_URL);

        Some(Self::new(api_url.to_string(), media_url.to_string()))
    }

    /// Loads the config from the environment, falling back to [`ApiConfig::local`].
    pub fn from_env_or_local() -> Self {
        Self::from_env().unwrap_or_else(|| {
            tracing::warn!("DOGSITTER_API_URL not set at compile time, using local API");
            Self::local()
        })
    }

    /// Replaces the fallback messages.
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Resolves a request path against the API base URL.
    ///
    /// Absolute `http://` and `https://` URLs are returned unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// # use dogsitter_client::ApiConfig;
    /// let config = ApiConfig::local();
    /// assert_eq!(config.endpoint("/bookings/"), "http://localhost:8000/api/bookings/");
    /// assert_eq!(config.endpoint("https://other.host/x"), "https://other.host/x");
    /// ```
    pub fn endpoint(&self, path: &str) -> String {
        join_url(&self.api_url, path)
    }

    /// Returns the login endpoint URL.
    pub fn login_url(&self) -> String {
        self.endpoint(LOGIN_ENDPOINT)
    }

    /// Returns the registration endpoint URL.
    pub fn register_url(&self) -> String {
        self.endpoint(REGISTER_ENDPOINT)
    }

    /// Returns the dog-sitter collection URL.
    pub fn dogsitters_url(&self) -> String {
        self.endpoint(DOGSITTERS_ENDPOINT)
    }

    /// Returns the booking collection URL.
    pub fn bookings_url(&self) -> String {
        self.endpoint(BOOKINGS_ENDPOINT)
    }

    /// Resolves a media path (e.g., an avatar file) against the media host.
    pub fn media_url_for(&self, path: &str) -> String {
        join_url(&self.media_url, path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

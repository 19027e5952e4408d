//! Authentication-aware HTTP client for the booking API.
//!
//! [`ApiClient`] is the single place where requests get their headers and
//! where an expired session is detected:
//! - every request carries `Content-Type` and `Accept: application/json`
//! - `Authorization: Bearer <token>` is added while the session holds a token
//! - a 401 reply clears the session and sends the user to `/login`
//!
//! All other replies are handed back untouched. There is no retry.

use crate::client::navigation::Navigator;
use crate::client::router::LOGIN_PATH;
use crate::client::session::Session;
use crate::{ApiConfig, ClientError};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::rc::Rc;

const JSON: &str = "application/json";

/// Error payload the API sends with failed requests.
#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct ApiMessage {
    pub message: Option<String>,
    pub detail: Option<String>,
}

impl ApiMessage {
    pub(crate) fn into_text(self) -> Option<String> {
        self.message.or(self.detail).filter(|m| !m.is_empty())
    }
}

/// HTTP client bound to one session.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    session: Session,
    navigator: Rc<dyn Navigator>,
}

impl ApiClient {
    /// Creates a client for `config` that authenticates as `session` and
    /// redirects through `navigator` when the session expires.
    pub fn new(config: ApiConfig, session: Session, navigator: Rc<dyn Navigator>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            session,
            navigator,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Headers for the next request, derived from the current session.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));

        if let Some(token) = self.session.token() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => {
                    tracing::warn!("Stored token is not a valid header value, sending unauthenticated")
                }
            }
        }

        headers
    }

    /// Sends a request and applies session-expiry handling.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `path` - Endpoint relative to the API base, or an absolute URL
    /// * `body` - Optional value sent as the JSON body
    ///
    /// # Returns
    ///
    /// * `Ok(Response)` - Any reply other than 401, status untouched
    /// * `Err(ClientError)` - See below
    ///
    /// # Errors
    ///
    /// - [`ClientError::SessionExpired`] on HTTP 401, after the session has been
    ///   cleared and the navigator sent to `/login`
    /// - [`ClientError::Network`] when the request could not be completed
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let response = self.dispatch(method, path, body).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
            return Err(ClientError::SessionExpired);
        }

        Ok(response)
    }

    /// Sends a request with the session's headers but no 401 handling.
    ///
    /// Used for the auth endpoints, where 401 means "wrong credentials".
    pub(crate) async fn dispatch<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.endpoint(path);
        tracing::trace!("{} {}", method, url);

        let mut request = self.http.request(method, &url).headers(self.headers());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Request to {} failed: {}", url, e);
            ClientError::from(e)
        })?;

        tracing::trace!("{} -> {}", url, response.status());
        Ok(response)
    }

    /// Clears the session and forces navigation to the login page.
    ///
    /// Safe to call repeatedly.
    pub fn handle_unauthorized(&self) {
        tracing::warn!("Authorization failed (401), redirecting to {}", LOGIN_PATH);
        self.session.expire();
        self.navigator.navigate(LOGIN_PATH);
    }

    /// GET `path` and decode the JSON reply.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        decode_json(response).await
    }

    /// POST `body` to `path` and decode the JSON reply.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        decode_json(response).await
    }

    /// PUT `body` to `path` and decode the JSON reply.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PUT, path, Some(body)).await?;
        decode_json(response).await
    }

    /// PATCH `path` with `body` and decode the JSON reply.
    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PATCH, path, Some(body)).await?;
        decode_json(response).await
    }

    /// DELETE `path`, ignoring any reply body.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let response = self.send::<()>(Method::DELETE, path, None).await?;
        ensure_success(response).await.map(|_| ())
    }
}

async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ApiMessage>()
        .await
        .ok()
        .and_then(ApiMessage::into_text);

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = ensure_success(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Network(format!("Failed to parse response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::navigation::MemoryNavigator;
    use crate::client::storage::MemoryStorage;

    fn client_with_token(token: Option<&str>) -> ApiClient {
        let session = Session::restore(Rc::new(MemoryStorage::new()));
        session.set_token(token.map(str::to_string));
        ApiClient::new(ApiConfig::local(), session, Rc::new(MemoryNavigator::new()))
    }

    #[test]
    fn test_headers_without_token() {
        let headers = client_with_token(None).headers();

        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), JSON);
        assert_eq!(headers.get(ACCEPT).unwrap(), JSON);
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_headers_with_token() {
        let headers = client_with_token(Some("T1")).headers();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer T1");
    }

    #[test]
    fn test_headers_follow_session_changes() {
        let client = client_with_token(Some("T1"));
        client.session().set_token(Some("T2".to_string()));
        assert_eq!(client.headers().get(AUTHORIZATION).unwrap(), "Bearer T2");

        client.session().clear();
        assert!(client.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_invalid_token_header_is_skipped() {
        let headers = client_with_token(Some("bad\ntoken")).headers();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_handle_unauthorized_is_idempotent() {
        let navigator = MemoryNavigator::new();
        let session = Session::restore(Rc::new(MemoryStorage::new()));
        session.set_token(Some("T1".to_string()));
        let client = ApiClient::new(ApiConfig::local(), session, Rc::new(navigator.clone()));

        client.handle_unauthorized();
        client.handle_unauthorized();

        assert!(!client.session().is_authenticated());
        assert_eq!(navigator.history(), vec![LOGIN_PATH, LOGIN_PATH]);
    }

    #[test]
    fn test_api_message_prefers_message_over_detail() {
        let msg: ApiMessage =
            serde_json::from_str(r#"{"message":"bad creds","detail":"other"}"#).unwrap();
        assert_eq!(msg.into_text().as_deref(), Some("bad creds"));

        let detail: ApiMessage = serde_json::from_str(r#"{"detail":"Not found."}"#).unwrap();
        assert_eq!(detail.into_text().as_deref(), Some("Not found."));

        let empty: ApiMessage = serde_json::from_str(r#"{"message":""}"#).unwrap();
        assert!(empty.into_text().is_none());
    }
}
